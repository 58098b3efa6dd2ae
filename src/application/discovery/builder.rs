use super::connector::ServerConnector;
use super::retry::{RetryPolicy, Sleeper};
use super::types::{DiscoveredServer, DiscoveryError, DiscoverySummary, LoadStatus};
use crate::application::tooling::{Connector, ToolDescriptor, ToolRegistry};
use crate::types::ServerAddress;
use std::sync::Arc;
use tracing::warn;

/// Everything a discovery run produced.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    pub registry: ToolRegistry,
    pub servers: Vec<DiscoveredServer>,
    pub summary: DiscoverySummary,
}

/// Walks the configured addresses one at a time and aggregates their tools.
///
/// Never fails: unreachable servers are recorded as [`LoadStatus::Failed`] and
/// skipped. When two servers expose the same tool name the later server wins.
#[derive(Clone)]
pub struct ToolRegistryBuilder {
    connector: ServerConnector,
}

impl ToolRegistryBuilder {
    pub fn new(connector: Arc<dyn Connector>, policy: RetryPolicy) -> Self {
        Self {
            connector: ServerConnector::new(connector, policy),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.connector = self.connector.with_sleeper(sleeper);
        self
    }

    pub async fn build(&self, addresses: &[ServerAddress]) -> ToolRegistry {
        self.discover(addresses).await.registry
    }

    pub async fn discover(&self, addresses: &[ServerAddress]) -> DiscoveryReport {
        let mut registry = ToolRegistry::new();
        let mut servers = Vec::with_capacity(addresses.len());

        for address in addresses {
            match self.connector.connect(address).await {
                Ok(connected) => {
                    for info in &connected.tools {
                        let descriptor =
                            ToolDescriptor::new(info.clone(), Arc::clone(&connected.server));
                        if let Some(previous) = registry.insert(descriptor) {
                            warn!(
                                tool = %info.name,
                                previous_server = %previous.server_address(),
                                server = %address,
                                "Duplicate tool name, later server takes precedence"
                            );
                        }
                    }
                    let load_status = if connected.tools.is_empty() {
                        LoadStatus::NoTools
                    } else {
                        LoadStatus::Success
                    };
                    servers.push(DiscoveredServer {
                        address: address.clone(),
                        tools: connected.tools,
                        attempts: connected.attempts,
                        load_status,
                    });
                }
                Err(err) => {
                    let message = err.to_string();
                    let DiscoveryError::RetriesExhausted { attempts, .. } = err;
                    servers.push(DiscoveredServer {
                        address: address.clone(),
                        tools: Vec::new(),
                        attempts,
                        load_status: LoadStatus::Failed(message),
                    });
                }
            }
        }

        let summary = DiscoverySummary::from_servers(&servers);
        DiscoveryReport {
            registry,
            servers,
            summary,
        }
    }
}
