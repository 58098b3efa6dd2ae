use crate::types::{ChatMessage, ToolCall};

/// What the model asked for on one iteration.
#[derive(Debug)]
pub enum AgentDirective {
    Final { response: String },
    CallTools { content: String, calls: Vec<ToolCall> },
}

impl From<ChatMessage> for AgentDirective {
    fn from(message: ChatMessage) -> Self {
        if message.has_tool_calls() {
            AgentDirective::CallTools {
                content: message.content,
                calls: message.tool_calls,
            }
        } else {
            AgentDirective::Final {
                response: message.content,
            }
        }
    }
}
