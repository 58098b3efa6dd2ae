use super::app::{AgentSettings, AppConfig, DiscoverySettings, RestServerConfig};
use super::error::ConfigError;
use super::model::{ModelConfig, RawModelConfig};
use super::server::{expand_address, parse_server_list};
use crate::constants::{CONFIG_PATH, ENV_PATH, SERVERS_ENV};
use dotenvy::from_filename;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::{debug, info};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawConfig {
    pub servers: Vec<String>,
    pub system_prompt: Option<String>,
    pub model: RawModelConfig,
    pub discovery: DiscoverySettings,
    pub agent: AgentSettings,
    pub rest_server: RestServerConfig,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration.
///
/// An explicit path must exist. Without one, `config/bridge.toml` is read when
/// present and built-in defaults are used otherwise. `MCP_SERVERS` replaces the
/// configured server list when set.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();

    let raw = match path {
        Some(path) => read_config(path)?,
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path)?
            } else {
                info!(
                    path = CONFIG_PATH,
                    "No configuration file found, using built-in defaults"
                );
                RawConfig::default()
            }
        }
    };

    let mut config = build(raw);
    apply_server_override(&mut config, env::var(SERVERS_ENV).ok());
    validate(&config)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<RawConfig, ConfigError> {
    debug!(path = %path.display(), "Reading bridge configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn build(raw: RawConfig) -> AppConfig {
    let defaults = AppConfig::default();
    AppConfig {
        servers: raw
            .servers
            .iter()
            .map(String::as_str)
            .filter(|entry| !entry.trim().is_empty())
            .map(expand_address)
            .collect(),
        system_prompt: raw
            .system_prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .unwrap_or(defaults.system_prompt),
        model: ModelConfig::from(raw.model),
        discovery: raw.discovery,
        agent: raw.agent,
        rest_server: raw.rest_server,
    }
}

pub(super) fn apply_server_override(config: &mut AppConfig, value: Option<String>) {
    if let Some(value) = value {
        let servers = parse_server_list(&value);
        info!(
            count = servers.len(),
            "Using tool servers from {SERVERS_ENV}"
        );
        config.servers = servers;
    }
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.model.model.trim().is_empty() {
        return Err(ConfigError::MissingModel);
    }
    if config.model.endpoint.trim().is_empty() {
        return Err(ConfigError::MissingEndpoint);
    }
    let positive = [
        ("[model].timeout_secs", config.model.timeout_secs as u128),
        ("[discovery].max_attempts", config.discovery.max_attempts as u128),
        (
            "[discovery].attempt_timeout_secs",
            config.discovery.attempt_timeout_secs as u128,
        ),
        ("[agent].max_iterations", config.agent.max_iterations as u128),
        ("[agent].tool_timeout_secs", config.agent.tool_timeout_secs as u128),
    ];
    for (field, value) in positive {
        if value == 0 {
            return Err(ConfigError::ZeroValue { field });
        }
    }
    config.rest_server.socket_addr()?;
    Ok(())
}
