use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

/// Observable progress of a turn, emitted in the order things happen.
///
/// Events never influence control flow; a dropped receiver is ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// Emitted immediately before a tool executes.
    ToolInvoked { name: String, arguments: Value },
    /// Emitted immediately after, with the observation appended to the context.
    ToolResult {
        name: String,
        result: String,
        is_error: bool,
    },
}

pub type EventSender = mpsc::UnboundedSender<AgentEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<AgentEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

pub(crate) fn emit(events: Option<&EventSender>, event: AgentEvent) {
    if let Some(sender) = events {
        let _ = sender.send(event);
    }
}
