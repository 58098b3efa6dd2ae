use super::error::ToolInvokeError;
use super::interface::{ServerToolInfo, ToolCallOutput, ToolServerInterface};
use crate::types::ServerAddress;
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

/// A named, schema-typed tool bound to the server connection it came from.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    input_schema: Value,
    server: Arc<dyn ToolServerInterface>,
}

impl ToolDescriptor {
    pub fn new(info: ServerToolInfo, server: Arc<dyn ToolServerInterface>) -> Self {
        Self {
            name: info.name,
            description: info.description.unwrap_or_default(),
            input_schema: info
                .input_schema
                .unwrap_or_else(|| json!({"type": "object", "properties": {}})),
            server,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    pub fn server_address(&self) -> &ServerAddress {
        self.server.address()
    }

    pub async fn invoke(&self, arguments: Value) -> Result<ToolCallOutput, ToolInvokeError> {
        self.server.invoke_tool(&self.name, arguments).await
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("server", self.server.address())
            .finish()
    }
}
