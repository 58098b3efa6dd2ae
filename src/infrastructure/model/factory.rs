//! Provider factory - creates clients from config

use super::clients::{OllamaClient, OpenAIClient};
use super::traits::ModelProvider;
use crate::config::ModelConfig;
use std::env;
use std::sync::Arc;
use tracing::warn;

/// Resolve API key from the environment variable named in config
pub fn resolve_api_key(provider: &str, env_var: Option<&str>) -> Option<String> {
    let raw = env_var.map(str::trim).filter(|name| !name.is_empty())?;
    match env::var(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                provider,
                env_var = raw,
                %err,
                "API key environment variable is not set"
            );
            None
        }
    }
}

/// Factory for creating model clients from config.
pub struct ProviderFactory;

impl ProviderFactory {
    /// `ollama` and `localai` speak the Ollama format; everything else is
    /// treated as OpenAI-compatible.
    pub fn create(config: &ModelConfig) -> Arc<dyn ModelProvider> {
        if config.is_ollama() {
            Arc::new(OllamaClient::from_config(config))
        } else {
            Arc::new(OpenAIClient::from_config(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn api_key_comes_from_named_variable() {
        unsafe { env::set_var("BRIDGE_TEST_KEY", "sk-test") };
        assert_eq!(
            resolve_api_key("openai", Some("BRIDGE_TEST_KEY")).as_deref(),
            Some("sk-test")
        );
        unsafe { env::remove_var("BRIDGE_TEST_KEY") };
        assert_eq!(resolve_api_key("openai", Some("BRIDGE_TEST_KEY")), None);
        assert_eq!(resolve_api_key("openai", Some("  ")), None);
    }

    #[test]
    fn factory_picks_wire_format() {
        let ollama = ProviderFactory::create(&ModelConfig::default());
        assert_eq!(ollama.id(), "ollama");

        let openai = ProviderFactory::create(&ModelConfig {
            provider_type: "openai".into(),
            ..ModelConfig::default()
        });
        assert_eq!(openai.id(), "openai");
    }
}
