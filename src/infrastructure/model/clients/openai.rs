//! OpenAI-compatible client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ModelConfig;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};
use crate::types::ToolCall;

const DEFAULT_API_PATH: &str = "/v1/chat/completions";

/// OpenAI-compatible client (works with OpenAI, Groq, LM Studio, vLLM, etc.)
#[derive(Clone)]
pub struct OpenAIClient {
    base: HttpClientBase,
    api_path: String,
}

impl OpenAIClient {
    pub fn from_config(config: &ModelConfig) -> Self {
        let api_key = resolve_api_key(&config.provider_type, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.provider_type.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_API_PATH.to_string()),
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAIClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url(&self.api_path);

        let payload = OpenAIRequest {
            model: request.model.clone(),
            messages: MessageAdapter::to_openai_format(
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
            "Sending request to OpenAI-compatible provider"
        );

        let response: OpenAIResponse = self.base.post_with_bearer(&url, &payload).await?;
        debug!("Received response from OpenAI-compatible provider");

        let message = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing message"))?;

        Ok(into_model_response(message))
    }
}

fn into_model_response(message: OpenAIMessage) -> ModelResponse {
    let content = message.content.unwrap_or_default();
    if message.tool_calls.is_empty() {
        return ModelResponse::text(content);
    }
    let calls = message
        .tool_calls
        .into_iter()
        .enumerate()
        .map(|(index, call)| {
            let arguments = parse_arguments(call.function.arguments);
            let id = call.id.unwrap_or_else(|| format!("call_{index}"));
            ToolCall::new(call.function.name, arguments).with_id(id)
        })
        .collect();
    ModelResponse::tool_calls(content, calls)
}

/// Arguments arrive JSON-encoded; text that does not parse is kept as a string
/// so argument validation can report it.
fn parse_arguments(raw: Option<String>) -> Value {
    match raw {
        None => Value::Null,
        Some(text) if text.trim().is_empty() => Value::Null,
        Some(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    stream: bool,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIMessage>,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<OpenAIToolCall>,
}

#[derive(Deserialize)]
struct OpenAIToolCall {
    id: Option<String>,
    function: OpenAIFunction,
}

#[derive(Deserialize)]
struct OpenAIFunction {
    name: String,
    arguments: Option<String>,
}
