// Config loading tests - file parsing, defaults, environment override and
// validation errors.

use mcp_agent_bridge::config::{AppConfig, ConfigError};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("bridge.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

fn clear_server_override() {
    unsafe { env::remove_var("MCP_SERVERS") };
}

#[test]
#[serial]
fn returns_error_when_file_not_found() {
    let result = AppConfig::load(Some(Path::new("/nonexistent/path/bridge.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
#[serial]
fn loads_every_section() {
    clear_server_override();
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
servers = ["http://localhost:8001/mcp", "  ", "http://localhost:8002/sse"]
system_prompt = "Responde en español."

[model]
type = "openai"
endpoint = "https://api.groq.com/openai"
model = "llama-3.3-70b"
api_key = "GROQ_API_KEY"
timeout_secs = 30

[discovery]
retry_delay_secs = 1
max_attempts = 5

[agent]
name = "Jorge"
max_iterations = 4
tool_timeout_secs = 15
verbose = false

[rest_server]
bind = "0.0.0.0:9000"
cors_origins = ["http://localhost:5173"]
"#,
    );

    let config = AppConfig::load(Some(&path)).expect("valid config");

    let servers: Vec<&str> = config.servers.iter().map(|s| s.as_str()).collect();
    assert_eq!(
        servers,
        vec!["http://localhost:8001/mcp", "http://localhost:8002/sse"]
    );
    assert_eq!(config.system_prompt, "Responde en español.");
    assert!(!config.model.is_ollama());
    assert_eq!(config.model.api_key.as_deref(), Some("GROQ_API_KEY"));
    assert_eq!(config.model.timeout(), Duration::from_secs(30));
    assert_eq!(config.discovery.max_attempts, 5);
    assert_eq!(config.discovery.retry_delay(), Duration::from_secs(1));
    assert_eq!(config.agent.max_iterations, 4);
    assert!(!config.agent.verbose);
    assert_eq!(
        config.rest_server.socket_addr().unwrap().to_string(),
        "0.0.0.0:9000"
    );
}

#[test]
#[serial]
fn missing_sections_fall_back_to_defaults() {
    clear_server_override();
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "servers = []\n");

    let config = AppConfig::load(Some(&path)).expect("valid config");
    let defaults = AppConfig::default();

    assert!(config.servers.is_empty());
    assert_eq!(config.model, defaults.model);
    assert!(config.model.is_ollama());
    assert_eq!(config.discovery.max_attempts, 30);
    assert_eq!(config.agent.max_iterations, 8);
    assert_eq!(config.system_prompt, defaults.system_prompt);
}

#[test]
#[serial]
fn environment_list_replaces_file_servers() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), r#"servers = ["http://file/mcp"]"#);

    unsafe { env::set_var("MCP_SERVERS", "http://a:1/mcp, ,python tools.py") };
    let result = AppConfig::load(Some(&path));
    clear_server_override();

    let config = result.expect("valid config");
    let servers: Vec<&str> = config.servers.iter().map(|s| s.as_str()).collect();
    assert_eq!(servers, vec!["http://a:1/mcp", "python tools.py"]);
}

#[test]
#[serial]
fn rejects_zero_attempts_and_bad_bind() {
    clear_server_override();
    let dir = tempdir().expect("tempdir");

    let zero = write_config(dir.path(), "[discovery]\nmax_attempts = 0\n");
    assert!(matches!(
        AppConfig::load(Some(&zero)),
        Err(ConfigError::ZeroValue { .. })
    ));

    let bad_bind = write_config(dir.path(), "[rest_server]\nbind = \"not-an-address\"\n");
    assert!(matches!(
        AppConfig::load(Some(&bad_bind)),
        Err(ConfigError::InvalidBind { .. })
    ));

    let empty_model = write_config(dir.path(), "[model]\nmodel = \"  \"\n");
    assert!(matches!(
        AppConfig::load(Some(&empty_model)),
        Err(ConfigError::MissingModel)
    ));
}

#[test]
#[serial]
fn malformed_toml_is_a_parse_error() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "servers = [\"unterminated\n");
    assert!(matches!(
        AppConfig::load(Some(&path)),
        Err(ConfigError::Parse { .. })
    ));
}
