//! Application constants
//!
//! Single source of truth for paths and defaults.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/bridge.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Comma-separated list of tool-server addresses; replaces the configured list when set
pub const SERVERS_ENV: &str = "MCP_SERVERS";

/// MCP protocol revision sent during `initialize`
pub const PROTOCOL_VERSION: &str = "2025-06-18";

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_MODEL_TYPE: &str = "ollama";
pub const DEFAULT_MODEL_ENDPOINT: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "qwen3:32b";
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_AGENT_NAME: &str = "Jorge";

pub const DEFAULT_SYSTEM_PROMPT: &str = "Usa herramientas cuando sea necesario.
Si la información ya está en el contexto de la conversación, puedes responder sin usar tools.
Si no sabes la respuesta, responde con \"No sé\".";
