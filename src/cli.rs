use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "mcp-agent-bridge",
    version,
    about = "Exposes a tool-calling LLM agent backed by MCP servers over HTTP"
)]
pub struct Cli {
    /// Configuration file (defaults to config/bridge.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = RunMode::Rest)]
    pub mode: RunMode,
    /// REST bind address, overrides `[rest_server].bind`
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    /// System prompt, overrides `system_prompt`
    #[arg(long)]
    pub system: Option<String>,
    /// Model identifier, overrides `[model].model`
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Serve `POST /api/agent`
    Rest,
    /// Interactive prompt on the terminal
    Stdio,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(addr) = self.addr {
            config.rest_server.bind = addr.to_string();
        }
        if let Some(system) = &self.system {
            config.system_prompt = system.clone();
        }
        if let Some(model) = self.model.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            config.model.model = model.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let cli = Cli::parse_from([
            "mcp-agent-bridge",
            "--mode",
            "stdio",
            "--addr",
            "0.0.0.0:9000",
            "--model",
            "llama3.1",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(cli.mode, RunMode::Stdio);
        assert_eq!(config.rest_server.bind, "0.0.0.0:9000");
        assert_eq!(config.model.model, "llama3.1");
        assert_eq!(config.system_prompt, AppConfig::default().system_prompt);
    }

    #[test]
    fn rest_is_the_default_mode() {
        let cli = Cli::parse_from(["mcp-agent-bridge"]);
        assert_eq!(cli.mode, RunMode::Rest);
        assert!(cli.config.is_none());
    }
}
