use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolInvokeError {
    #[error("failed to spawn MCP server '{server}': {source}")]
    Spawn {
        server: String,
        #[source]
        source: std::io::Error,
    },
    #[error("MCP server '{server}' transport error: {message}")]
    Transport { server: String, message: String },
    #[error("MCP server '{server}' answered HTTP {status}: {body}")]
    Http {
        server: String,
        status: u16,
        body: String,
    },
    #[error("MCP server '{server}' returned invalid JSON: {source}")]
    InvalidJson {
        server: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MCP server '{server}' violated the protocol: {message}")]
    Protocol { server: String, message: String },
    #[error("MCP server '{server}' returned JSON-RPC error {code}: {message}")]
    Rpc {
        server: String,
        code: i64,
        message: String,
    },
    #[error("MCP server '{server}' did not answer within {}s", .after.as_secs_f64())]
    TimedOut { server: String, after: Duration },
    #[error("MCP server '{server}' terminated unexpectedly")]
    Terminated { server: String },
    #[error("MCP server '{server}' request cancelled")]
    Cancelled { server: String },
}

impl ToolInvokeError {
    pub(crate) fn transport(server: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            server: server.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn protocol(server: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            server: server.into(),
            message: message.into(),
        }
    }

    /// The server understood the request and rejected it; the connection is still usable.
    pub fn is_remote_rejection(&self) -> bool {
        matches!(self, ToolInvokeError::Rpc { .. })
    }
}
