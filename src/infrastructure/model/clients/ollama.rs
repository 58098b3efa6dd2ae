//! Ollama client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ModelConfig;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};
use crate::types::ToolCall;

/// Ollama client for local LLM
#[derive(Clone)]
pub struct OllamaClient {
    base: HttpClientBase,
}

impl OllamaClient {
    /// Creates client from model config.
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            base: HttpClientBase::new(config.provider_type.clone(), config.endpoint.clone(), None),
        }
    }
}

#[async_trait]
impl ModelProvider for OllamaClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url("/api/chat");

        let payload = OllamaRequest {
            model: request.model.clone(),
            messages: MessageAdapter::to_ollama_format(
                request.system_prompt.as_deref(),
                &request.messages,
            ),
            tools: MessageAdapter::to_function_tools(&request.tools),
            stream: false,
        };

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending request to Ollama"
        );

        let response: OllamaResponse = self.base.post_no_auth(&url, &payload).await?;
        debug!("Received response from Ollama");

        let message = response
            .message
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing message"))?;

        Ok(into_model_response(message))
    }
}

fn into_model_response(message: OllamaMessage) -> ModelResponse {
    if message.tool_calls.is_empty() {
        return ModelResponse::text(message.content);
    }
    let calls = message
        .tool_calls
        .into_iter()
        .map(|call| ToolCall::new(call.function.name, normalize_arguments(call.function.arguments)))
        .collect();
    ModelResponse::tool_calls(message.content, calls)
}

/// Some models emit the arguments as an encoded JSON string.
fn normalize_arguments(arguments: Value) -> Value {
    match arguments {
        Value::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        other => other,
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: Option<OllamaMessage>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<OllamaToolCall>,
}

#[derive(Deserialize)]
struct OllamaToolCall {
    function: OllamaFunction,
}

#[derive(Deserialize)]
struct OllamaFunction {
    name: String,
    #[serde(default)]
    arguments: Value,
}
