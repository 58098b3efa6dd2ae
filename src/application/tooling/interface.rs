use super::error::ToolInvokeError;
use crate::types::ServerAddress;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// One entry of a server's `tools/list` answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerToolInfo {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Option<Value>,
}

/// A `tools/call` result flattened to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallOutput {
    pub text: String,
    /// The tool reported failure (`isError: true`)
    pub is_error: bool,
}

impl ToolCallOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// An initialised connection to one tool server.
#[async_trait]
pub trait ToolServerInterface: Send + Sync {
    fn address(&self) -> &ServerAddress;

    async fn list_tools(&self) -> Result<Vec<ServerToolInfo>, ToolInvokeError>;

    async fn invoke_tool(
        &self,
        tool: &str,
        arguments: Value,
    ) -> Result<ToolCallOutput, ToolInvokeError>;
}
