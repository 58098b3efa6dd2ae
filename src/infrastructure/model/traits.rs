//! Model traits

use super::types::{ModelError, ModelRequest, ModelResponse};
use async_trait::async_trait;

/// Inference back-end: answers with text or with tool calls.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Identifier used in logs and errors
    fn id(&self) -> &str;

    /// Send a chat request to the model provider
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}
