use crate::application::tooling::ToolDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AgentRequest {
    /// A missing field is treated like a blank message
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AgentResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolEntry {
    pub name: String,
    pub description: String,
    #[schema(value_type = Object)]
    pub input_schema: Value,
    /// Address of the server the tool was discovered on
    pub server: String,
}

impl From<&ToolDescriptor> for ToolEntry {
    fn from(tool: &ToolDescriptor) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema().clone(),
            server: tool.server_address().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolInventoryResponse {
    pub tools: Vec<ToolEntry>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// The agent session is installed and accepting messages
    pub ready: bool,
    pub tools: usize,
}
