//! # Model Connection Configuration
//!
//! Describes the single inference back-end the agent talks to.
//!
//! | Type | Wire format | API Key Required |
//! |------|-------------|-----------------|
//! | `ollama` | `/api/chat` with native tool calling | No |
//! | anything else | OpenAI-compatible `/v1/chat/completions` | Yes |
//!
//! ```toml
//! [model]
//! type = "ollama"
//! endpoint = "http://127.0.0.1:11434"
//! model = "qwen3:32b"
//! timeout_secs = 300
//! ```

use crate::constants::{
    DEFAULT_MODEL, DEFAULT_MODEL_ENDPOINT, DEFAULT_MODEL_TIMEOUT_SECS, DEFAULT_MODEL_TYPE,
};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Determines the wire format: "ollama" or an OpenAI-compatible type
    pub provider_type: String,
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key: Option<String>,
    /// Custom API path override (e.g. "/openai/v1/chat/completions")
    pub api_path: Option<String>,
    pub timeout_secs: u64,
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_ollama(&self) -> bool {
        matches!(
            self.provider_type.to_lowercase().as_str(),
            "ollama" | "localai"
        )
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider_type: DEFAULT_MODEL_TYPE.to_string(),
            endpoint: DEFAULT_MODEL_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_path: None,
            timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(super) struct RawModelConfig {
    #[serde(rename = "type")]
    provider_type: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    api_path: Option<String>,
    timeout_secs: Option<u64>,
}

impl From<RawModelConfig> for ModelConfig {
    fn from(raw: RawModelConfig) -> Self {
        let defaults = ModelConfig::default();
        Self {
            provider_type: raw.provider_type.unwrap_or(defaults.provider_type),
            endpoint: raw.endpoint.unwrap_or(defaults.endpoint),
            model: raw.model.unwrap_or(defaults.model),
            api_key: raw.api_key.filter(|key| !key.trim().is_empty()),
            api_path: raw.api_path,
            timeout_secs: raw.timeout_secs.unwrap_or(defaults.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_local_ollama() {
        let config = ModelConfig::from(RawModelConfig {
            model: Some("llama3.1".into()),
            ..RawModelConfig::default()
        });

        assert!(config.is_ollama());
        assert_eq!(config.endpoint, DEFAULT_MODEL_ENDPOINT);
        assert_eq!(config.model, "llama3.1");
        assert_eq!(config.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn blank_api_key_name_is_ignored() {
        let config = ModelConfig::from(RawModelConfig {
            provider_type: Some("openai".into()),
            api_key: Some("   ".into()),
            ..RawModelConfig::default()
        });

        assert!(!config.is_ollama());
        assert!(config.api_key.is_none());
    }
}
