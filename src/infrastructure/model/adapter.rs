//! Message adapters - convert between different API formats

use super::types::ToolSpec;
use crate::types::{ChatMessage, MessageRole};
use serde_json::{Value, json};

/// Adapter for converting messages to different API formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// OpenAI chat-completions format. Tool-call arguments travel as JSON strings
    /// and tool observations reference the call id.
    pub fn to_openai_format(system_prompt: Option<&str>, messages: &[ChatMessage]) -> Vec<Value> {
        let mut converted = Self::system_message(system_prompt);
        for (index, msg) in messages.iter().enumerate() {
            let value = match msg.role {
                MessageRole::Assistant if msg.has_tool_calls() => json!({
                    "role": "assistant",
                    "content": msg.content,
                    "tool_calls": msg.tool_calls.iter().enumerate().map(|(call_index, call)| json!({
                        "id": call.id.clone().unwrap_or_else(|| fallback_call_id(index, call_index)),
                        "type": "function",
                        "function": {
                            "name": call.name,
                            "arguments": call.arguments.to_string(),
                        }
                    })).collect::<Vec<_>>()
                }),
                MessageRole::Tool => json!({
                    "role": "tool",
                    "tool_call_id": msg.tool_call_id.clone().unwrap_or_default(),
                    "content": msg.content,
                }),
                role => json!({
                    "role": role.as_str(),
                    "content": msg.content,
                }),
            };
            converted.push(value);
        }
        converted
    }

    /// Ollama `/api/chat` format. Arguments stay JSON objects and tool
    /// observations carry the tool name.
    pub fn to_ollama_format(system_prompt: Option<&str>, messages: &[ChatMessage]) -> Vec<Value> {
        let mut converted = Self::system_message(system_prompt);
        converted.extend(messages.iter().map(|msg| match msg.role {
            MessageRole::Assistant if msg.has_tool_calls() => json!({
                "role": "assistant",
                "content": msg.content,
                "tool_calls": msg.tool_calls.iter().map(|call| json!({
                    "function": {
                        "name": call.name,
                        "arguments": call.arguments,
                    }
                })).collect::<Vec<_>>()
            }),
            MessageRole::Tool => json!({
                "role": "tool",
                "content": msg.content,
                "tool_name": msg.tool_name.clone().unwrap_or_default(),
            }),
            role => json!({
                "role": role.as_str(),
                "content": msg.content,
            }),
        }));
        converted
    }

    /// `[{"type": "function", "function": {name, description, parameters}}]`,
    /// understood by both back-ends.
    pub fn to_function_tools(tools: &[ToolSpec]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }
                })
            })
            .collect()
    }

    fn system_message(system_prompt: Option<&str>) -> Vec<Value> {
        system_prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .map(|prompt| vec![json!({"role": "system", "content": prompt})])
            .unwrap_or_default()
    }
}

fn fallback_call_id(message_index: usize, call_index: usize) -> String {
    format!("call_{message_index}_{call_index}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;

    fn turn() -> Vec<ChatMessage> {
        let call = ToolCall::new("greet", json!({"name": "Juan"})).with_id("call_1");
        vec![
            ChatMessage::user("Saluda a Juan"),
            ChatMessage::assistant_with_tool_calls("", vec![call.clone()]),
            ChatMessage::tool_result(&call, "Hola, Juan!"),
        ]
    }

    #[test]
    fn openai_format_stringifies_arguments() {
        let messages = MessageAdapter::to_openai_format(Some("be brief"), &turn());

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], json!({"role": "system", "content": "be brief"}));
        let call = &messages[2]["tool_calls"][0];
        assert_eq!(call["id"], "call_1");
        assert_eq!(call["function"]["arguments"], "{\"name\":\"Juan\"}");
        assert_eq!(messages[3]["tool_call_id"], "call_1");
    }

    #[test]
    fn ollama_format_keeps_argument_objects() {
        let messages = MessageAdapter::to_ollama_format(None, &turn());

        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages[1]["tool_calls"][0]["function"]["arguments"],
            json!({"name": "Juan"})
        );
        assert_eq!(messages[2]["tool_name"], "greet");
    }

    #[test]
    fn function_tools_wrap_schema() {
        let tools = MessageAdapter::to_function_tools(&[ToolSpec {
            name: "greet".into(),
            description: "Saluda".into(),
            parameters: json!({"type": "object"}),
        }]);
        assert_eq!(tools[0]["type"], "function");
        assert_eq!(tools[0]["function"]["name"], "greet");
    }
}
