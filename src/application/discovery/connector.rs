use super::retry::{RetryPolicy, Sleeper, TokioSleeper};
use super::types::{ConnectionAttempt, DiscoveryError};
use crate::application::tooling::{
    Connector, ServerToolInfo, ToolInvokeError, ToolServerInterface,
};
use crate::types::ServerAddress;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// A server that answered `tools/list`.
pub struct ConnectedServer {
    pub server: Arc<dyn ToolServerInterface>,
    pub tools: Vec<ServerToolInfo>,
    pub attempts: Vec<ConnectionAttempt>,
}

impl ConnectedServer {
    pub fn transient_failures(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_failure()).count()
    }
}

/// Connects to one address and lists its tools, retrying on any failure.
#[derive(Clone)]
pub struct ServerConnector {
    connector: Arc<dyn Connector>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ServerConnector {
    pub fn new(connector: Arc<dyn Connector>, policy: RetryPolicy) -> Self {
        Self {
            connector,
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn connect(&self, address: &ServerAddress) -> Result<ConnectedServer, DiscoveryError> {
        let max_attempts = self.policy.attempts();
        let mut attempts = Vec::new();
        let mut last_error = String::new();

        for attempt_number in 1..=max_attempts {
            match self.attempt(address).await {
                Ok((server, tools)) => {
                    info!(
                        address = %address,
                        attempt = attempt_number,
                        tools = tools.len(),
                        "Connected to tool server"
                    );
                    attempts.push(ConnectionAttempt::success(address, attempt_number));
                    return Ok(ConnectedServer {
                        server,
                        tools,
                        attempts,
                    });
                }
                Err(err) => {
                    warn!(
                        address = %address,
                        attempt = attempt_number,
                        max_attempts,
                        error = %err,
                        "Tool server unreachable"
                    );
                    last_error = err.to_string();
                    attempts.push(ConnectionAttempt::failure(address, attempt_number, &last_error));
                    if attempt_number < max_attempts {
                        self.sleeper.sleep(self.policy.delay).await;
                    }
                }
            }
        }

        error!(
            address = %address,
            attempts = attempts.len(),
            "Max retries reached, skipping tool server"
        );
        Err(DiscoveryError::RetriesExhausted {
            address: address.clone(),
            attempts,
            last_error,
        })
    }

    async fn attempt(
        &self,
        address: &ServerAddress,
    ) -> Result<(Arc<dyn ToolServerInterface>, Vec<ServerToolInfo>), ToolInvokeError> {
        let work = async {
            let server = self.connector.connect(address).await?;
            let tools = server.list_tools().await?;
            Ok((server, tools))
        };
        timeout(self.policy.attempt_timeout, work)
            .await
            .map_err(|_| ToolInvokeError::TimedOut {
                server: address.to_string(),
                after: self.policy.attempt_timeout,
            })?
    }
}
