use crate::types::{ChatMessage, MessageRole};

/// The single dialogue history shared by every turn of a session.
///
/// Append-only: nothing is removed, even when a turn fails halfway.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    messages: Vec<ChatMessage>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Every assistant message that requested tools is immediately followed by
    /// one tool observation per call, in call order.
    pub fn is_well_formed(&self) -> bool {
        let mut index = 0;
        while index < self.messages.len() {
            let message = &self.messages[index];
            index += 1;
            if message.role != MessageRole::Assistant || !message.has_tool_calls() {
                if message.role == MessageRole::Tool {
                    return false;
                }
                continue;
            }
            for call in &message.tool_calls {
                let Some(observation) = self.messages.get(index) else {
                    return false;
                };
                if observation.role != MessageRole::Tool
                    || observation.tool_name.as_deref() != Some(call.name.as_str())
                    || observation.tool_call_id != call.id
                {
                    return false;
                }
                index += 1;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;
    use serde_json::json;

    #[test]
    fn paired_observations_are_well_formed() {
        let call = ToolCall::new("greet", json!({"name": "Juan"})).with_id("c1");
        let mut context = ConversationContext::new();
        context.push(ChatMessage::user("hola"));
        context.push(ChatMessage::assistant_with_tool_calls("", vec![call.clone()]));
        context.push(ChatMessage::tool_result(&call, "Hola, Juan!"));
        context.push(ChatMessage::assistant("¡Hola, Juan!"));
        assert!(context.is_well_formed());
        assert_eq!(context.len(), 4);
    }

    #[test]
    fn missing_or_stray_observations_are_detected() {
        let call = ToolCall::new("greet", json!({}));
        let mut dangling = ConversationContext::new();
        dangling.push(ChatMessage::assistant_with_tool_calls("", vec![call.clone()]));
        dangling.push(ChatMessage::user("next"));
        assert!(!dangling.is_well_formed());

        let mut stray = ConversationContext::new();
        stray.push(ChatMessage::user("hola"));
        stray.push(ChatMessage::tool_result(&call, "orphan"));
        assert!(!stray.is_well_formed());
    }
}
