use crate::application::tooling::{SchemaViolation, ToolInvokeError};
use crate::model::ModelError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("{stage} timed out after {}s", .after.as_secs())]
    Timeout { stage: String, after: Duration },
    #[error("tool loop exhausted: no final answer after {max_iterations} model calls")]
    ToolLoopExhausted { max_iterations: usize },
}

impl AgentError {
    /// Whether the caller may reasonably resend the same message.
    pub fn is_retryable(&self) -> bool {
        match self {
            AgentError::Timeout { .. } => true,
            AgentError::Model(err) => err.is_transient(),
            AgentError::Tool(ToolError::Execution { .. }) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),
    #[error("invalid arguments for tool '{tool}': {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: SchemaViolation,
    },
    #[error("failed to execute tool '{tool}': {source}")]
    Execution {
        tool: String,
        #[source]
        source: ToolInvokeError,
    },
}
