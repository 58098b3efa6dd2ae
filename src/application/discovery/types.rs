//! Discovery Types
//!
//! Records produced while connecting to the configured tool servers.

use crate::application::tooling::ServerToolInfo;
use crate::types::ServerAddress;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    TransientFailure,
}

/// One connect-and-list attempt against one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionAttempt {
    pub address: ServerAddress,
    /// 1-based
    pub attempt_number: u32,
    pub outcome: AttemptOutcome,
    pub error_detail: Option<String>,
}

impl ConnectionAttempt {
    pub fn success(address: &ServerAddress, attempt_number: u32) -> Self {
        Self {
            address: address.clone(),
            attempt_number,
            outcome: AttemptOutcome::Success,
            error_detail: None,
        }
    }

    pub fn failure(address: &ServerAddress, attempt_number: u32, detail: impl Into<String>) -> Self {
        Self {
            address: address.clone(),
            attempt_number,
            outcome: AttemptOutcome::TransientFailure,
            error_detail: Some(detail.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == AttemptOutcome::TransientFailure
    }
}

/// Final state of one configured server after discovery.
#[derive(Debug, Clone)]
pub struct DiscoveredServer {
    pub address: ServerAddress,
    pub tools: Vec<ServerToolInfo>,
    pub attempts: Vec<ConnectionAttempt>,
    pub load_status: LoadStatus,
}

impl DiscoveredServer {
    pub fn is_loaded(&self) -> bool {
        self.load_status.is_success()
    }

    pub fn failed_attempts(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_failure()).count()
    }
}

/// Status of loading a server and fetching its tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Server answered and listed at least one tool
    Success,
    /// Server answered but has no tools
    NoTools,
    /// Retries exhausted
    Failed(String),
}

impl LoadStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, LoadStatus::Success)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Aggregate statistics about one discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    pub servers: usize,
    pub loaded: usize,
    pub failed: usize,
    pub no_tools: usize,
    /// Tools listed across all servers, before duplicate names are collapsed
    pub total_tools: usize,
}

impl DiscoverySummary {
    pub fn from_servers(servers: &[DiscoveredServer]) -> Self {
        let mut summary = Self {
            servers: servers.len(),
            ..Self::default()
        };

        for server in servers {
            match &server.load_status {
                LoadStatus::Success => {
                    summary.loaded += 1;
                    summary.total_tools += server.tools.len();
                }
                LoadStatus::Failed(_) => summary.failed += 1,
                LoadStatus::NoTools => summary.no_tools += 1,
            }
        }

        summary
    }

    /// Zero tools were found; the agent still starts.
    pub fn is_degraded(&self) -> bool {
        self.total_tools == 0
    }
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("gave up on '{address}' after {} attempts: {last_error}", .attempts.len())]
    RetriesExhausted {
        address: ServerAddress,
        attempts: Vec<ConnectionAttempt>,
        last_error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(status: LoadStatus, tools: usize) -> DiscoveredServer {
        DiscoveredServer {
            address: ServerAddress::new("http://demo/mcp"),
            tools: (0..tools)
                .map(|i| ServerToolInfo {
                    name: format!("t{i}"),
                    description: None,
                    input_schema: None,
                })
                .collect(),
            attempts: Vec::new(),
            load_status: status,
        }
    }

    #[test]
    fn summary_counts_each_status() {
        let servers = vec![
            server(LoadStatus::Success, 2),
            server(LoadStatus::Failed("connection refused".into()), 0),
            server(LoadStatus::NoTools, 0),
        ];

        let summary = DiscoverySummary::from_servers(&servers);
        assert_eq!(summary.servers, 3);
        assert_eq!(summary.loaded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.no_tools, 1);
        assert_eq!(summary.total_tools, 2);
        assert!(!summary.is_degraded());
    }

    #[test]
    fn empty_discovery_is_degraded() {
        assert!(DiscoverySummary::from_servers(&[]).is_degraded());
    }

    #[test]
    fn load_status_error_message() {
        assert!(LoadStatus::Success.error_message().is_none());
        let failed = LoadStatus::Failed("connection error".to_string());
        assert_eq!(failed.error_message(), Some("connection error"));
    }
}
