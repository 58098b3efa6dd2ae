//! Stdio transport: the address is a command line whose process speaks
//! newline-delimited JSON-RPC on stdin/stdout.

use super::error::ToolInvokeError;
use super::interface::{ServerToolInfo, ToolCallOutput, ToolServerInterface};
use super::rpc::{self, PendingRequests};
use crate::types::ServerAddress;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

type SharedWriter = Arc<Mutex<BufWriter<ChildStdin>>>;

pub struct StdioServer {
    address: ServerAddress,
    writer: SharedWriter,
    pending: Arc<PendingRequests>,
    id_counter: AtomicU64,
    // Killed on drop.
    _child: Child,
}

impl StdioServer {
    pub async fn spawn(address: ServerAddress) -> Result<Self, ToolInvokeError> {
        let name = address.as_str().to_string();
        let mut parts = address.as_str().split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ToolInvokeError::transport(&name, "empty command line"))?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolInvokeError::Spawn {
                server: name.clone(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ToolInvokeError::transport(&name, "failed to capture server stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ToolInvokeError::transport(&name, "failed to capture server stdout"))?;

        let writer: SharedWriter = Arc::new(Mutex::new(BufWriter::new(stdin)));
        let pending = Arc::new(PendingRequests::default());
        tokio::spawn(reader_loop(
            stdout,
            name,
            Arc::clone(&pending),
            Arc::clone(&writer),
        ));

        let server = Self {
            address,
            writer,
            pending,
            id_counter: AtomicU64::new(1),
            _child: child,
        };
        server
            .send_request("initialize", rpc::initialize_params())
            .await?;
        write_message(
            server.name(),
            &server.writer,
            &rpc::notification("notifications/initialized", json!({})),
        )
        .await?;
        Ok(server)
    }

    fn name(&self) -> &str {
        self.address.as_str()
    }

    async fn send_request(&self, method: &str, params: Value) -> Result<Value, ToolInvokeError> {
        let id = format!("req-{}", self.id_counter.fetch_add(1, Ordering::SeqCst));
        let waiter = self.pending.register(&id);
        let payload = rpc::request(&id, method, params);
        write_message(self.name(), &self.writer, &payload).await?;
        waiter.wait(self.name()).await
    }
}

async fn reader_loop(
    stdout: ChildStdout,
    server: String,
    pending: Arc<PendingRequests>,
    writer: SharedWriter,
) {
    let mut lines = BufReader::new(stdout).lines();
    while let Ok(Some(raw)) = lines.next_line().await {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('\u{1b}') {
            debug!(
                server = %server,
                line = trimmed,
                "skipping non-JSON ANSI log line from MCP server"
            );
            continue;
        }
        let value = match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => value,
            Err(source) => {
                warn!(
                    server = %server,
                    line = trimmed,
                    %source,
                    "received invalid JSON from MCP server"
                );
                continue;
            }
        };

        let id = value.get("id").cloned();
        let method = value
            .get("method")
            .and_then(Value::as_str)
            .map(str::to_string);
        match (id, method.as_deref()) {
            (Some(id), Some(method)) => {
                if let Err(err) = answer_server_request(&server, &writer, id, method).await {
                    warn!(server = %server, %err, "failed to answer server request");
                }
            }
            (Some(_), None) => {
                pending.resolve(&server, value);
            }
            (None, Some(method)) => {
                debug!(server = %server, method, "received notification from server");
            }
            (None, None) => {}
        }
    }

    pending.fail_all(&server);
}

async fn answer_server_request(
    server: &str,
    writer: &SharedWriter,
    id: Value,
    method: &str,
) -> Result<(), ToolInvokeError> {
    let reply = if method == "ping" {
        json!({ "jsonrpc": "2.0", "id": id, "result": {} })
    } else {
        warn!(server, method, "server sent unsupported request");
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {
                "code": -32601,
                "message": format!("client does not implement method '{method}'"),
            }
        })
    };
    write_message(server, writer, &reply).await
}

async fn write_message(
    server: &str,
    writer: &SharedWriter,
    message: &Value,
) -> Result<(), ToolInvokeError> {
    let mut encoded =
        serde_json::to_vec(message).map_err(|source| ToolInvokeError::InvalidJson {
            server: server.to_string(),
            source,
        })?;
    encoded.push(b'\n');

    let mut stream = writer.lock().await;
    stream
        .write_all(&encoded)
        .await
        .map_err(|err| ToolInvokeError::transport(server, err))?;
    stream
        .flush()
        .await
        .map_err(|err| ToolInvokeError::transport(server, err))
}

#[async_trait]
impl ToolServerInterface for StdioServer {
    fn address(&self) -> &ServerAddress {
        &self.address
    }

    async fn list_tools(&self) -> Result<Vec<ServerToolInfo>, ToolInvokeError> {
        let result = self.send_request("tools/list", json!({})).await?;
        rpc::parse_tool_list(self.name(), &result)
    }

    async fn invoke_tool(
        &self,
        tool: &str,
        arguments: Value,
    ) -> Result<ToolCallOutput, ToolInvokeError> {
        let result = self
            .send_request("tools/call", rpc::call_params(tool, arguments))
            .await?;
        Ok(rpc::tool_output(&result))
    }
}
