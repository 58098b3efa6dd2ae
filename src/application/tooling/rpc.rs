//! JSON-RPC framing shared by every MCP transport.

use super::error::ToolInvokeError;
use super::interface::{ServerToolInfo, ToolCallOutput};
use crate::constants::PROTOCOL_VERSION;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tracing::debug;

type Responder = oneshot::Sender<Result<Value, ToolInvokeError>>;

pub(crate) fn request(id: &str, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

pub(crate) fn notification(method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params
    })
}

pub(crate) fn initialize_params() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "clientInfo": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        },
        "capabilities": {}
    })
}

pub(crate) fn call_params(tool: &str, arguments: Value) -> Value {
    json!({
        "name": tool,
        "arguments": match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        }
    })
}

pub(crate) fn response_key(id: &Value) -> Option<String> {
    match id {
        Value::String(value) => Some(value.clone()),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    }
}

/// Unwraps a JSON-RPC response into its `result`, mapping `error` payloads.
pub(crate) fn into_result(server: &str, response: Value) -> Result<Value, ToolInvokeError> {
    if let Some(error) = response.get("error") {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(-32000);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(ToolInvokeError::Rpc {
            server: server.to_string(),
            code,
            message,
        });
    }
    Ok(response.get("result").cloned().unwrap_or(Value::Null))
}

pub(crate) fn parse_tool_list(
    server: &str,
    result: &Value,
) -> Result<Vec<ServerToolInfo>, ToolInvokeError> {
    let array = result
        .get("tools")
        .and_then(Value::as_array)
        .ok_or_else(|| ToolInvokeError::protocol(server, "tools/list result has no 'tools' array"))?;

    Ok(array
        .iter()
        .filter_map(|tool| {
            let name = tool.get("name").and_then(Value::as_str)?;
            Some(ServerToolInfo {
                name: name.to_string(),
                description: tool
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                input_schema: tool.get("inputSchema").cloned(),
            })
        })
        .collect())
}

/// Text blocks joined by newlines; falls back to `structuredContent`.
pub(crate) fn tool_output(result: &Value) -> ToolCallOutput {
    let is_error = result
        .get("isError")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut text = result
        .get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|block| block.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(structured) = result.get("structuredContent") {
            text = structured
                .get("error")
                .and_then(|err| err.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| structured.to_string());
        }
    }

    ToolCallOutput { text, is_error }
}

/// In-flight requests awaiting a response from an asynchronous reader.
#[derive(Default)]
pub(crate) struct PendingRequests {
    inner: Mutex<HashMap<String, Responder>>,
}

impl PendingRequests {
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Responder>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `id`; the entry is removed again when the returned waiter is
    /// dropped, whether or not a response arrived.
    pub(crate) fn register(&self, id: &str) -> PendingResponse<'_> {
        let (tx, rx) = oneshot::channel();
        self.entries().insert(id.to_string(), tx);
        PendingResponse {
            pending: self,
            id: id.to_string(),
            rx,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries().len()
    }

    /// Routes a response message to its waiter. Returns false when nobody was waiting.
    pub(crate) fn resolve(&self, server: &str, message: Value) -> bool {
        let Some(key) = message.get("id").and_then(response_key) else {
            return false;
        };
        let responder = self.entries().remove(&key);
        match responder {
            Some(sender) => {
                let _ = sender.send(into_result(server, message));
                true
            }
            None => {
                debug!(server, response_id = key, "received response for unknown request");
                false
            }
        }
    }

    pub(crate) fn fail_all(&self, server: &str) {
        for (_, sender) in self.entries().drain() {
            let _ = sender.send(Err(ToolInvokeError::Terminated {
                server: server.to_string(),
            }));
        }
    }
}

/// Waiter for one registered request.
pub(crate) struct PendingResponse<'a> {
    pending: &'a PendingRequests,
    id: String,
    rx: oneshot::Receiver<Result<Value, ToolInvokeError>>,
}

impl PendingResponse<'_> {
    /// Awaits the response, mapping a dropped responder to cancellation.
    pub(crate) async fn wait(mut self, server: &str) -> Result<Value, ToolInvokeError> {
        match (&mut self.rx).await {
            Ok(result) => result,
            Err(_) => Err(ToolInvokeError::Cancelled {
                server: server.to_string(),
            }),
        }
    }
}

impl Drop for PendingResponse<'_> {
    fn drop(&mut self) {
        self.pending.entries().remove(&self.id);
    }
}
