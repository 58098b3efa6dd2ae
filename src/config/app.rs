use super::error::ConfigError;
use super::model::ModelConfig;
use crate::constants::{
    DEFAULT_AGENT_NAME, DEFAULT_ATTEMPT_TIMEOUT_SECS, DEFAULT_BIND, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RETRY_DELAY_SECS, DEFAULT_SYSTEM_PROMPT, DEFAULT_TOOL_TIMEOUT_SECS,
};
use crate::types::ServerAddress;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Application configuration loaded from bridge.toml
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Tool servers, in discovery order
    pub servers: Vec<ServerAddress>,
    pub system_prompt: String,
    pub model: ModelConfig,
    pub discovery: DiscoverySettings,
    pub agent: AgentSettings,
    pub rest_server: RestServerConfig,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model: ModelConfig::default(),
            discovery: DiscoverySettings::default(),
            agent: AgentSettings::default(),
            rest_server: RestServerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiscoverySettings {
    pub retry_delay_secs: u64,
    pub max_attempts: u32,
    /// Upper bound for one connect-and-list attempt
    pub attempt_timeout_secs: u64,
}

impl DiscoverySettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_timeout_secs: DEFAULT_ATTEMPT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentSettings {
    pub name: String,
    /// Model calls allowed per turn before giving up
    pub max_iterations: usize,
    pub tool_timeout_secs: u64,
    /// Log every tool invocation and result
    pub verbose: bool,
}

impl AgentSettings {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_AGENT_NAME.to_string(),
            max_iterations: crate::agent::DEFAULT_MAX_ITERATIONS,
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            verbose: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RestServerConfig {
    pub bind: String,
    pub cors_origins: Vec<String>,
}

impl RestServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|source| ConfigError::InvalidBind {
                value: self.bind.clone(),
                source,
            })
    }
}

impl Default for RestServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            cors_origins: Vec::new(),
        }
    }
}
