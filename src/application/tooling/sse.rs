//! Legacy SSE transport.
//!
//! A long-lived `GET` stream first announces the POST endpoint through an
//! `endpoint` event; afterwards every JSON-RPC response arrives on the stream
//! as a `message` event while requests are POSTed to the announced endpoint.

use super::error::ToolInvokeError;
use super::interface::{ServerToolInfo, ToolCallOutput, ToolServerInterface};
use super::rpc::{self, PendingRequests};
use crate::types::ServerAddress;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Url};
use reqwest_eventsource::{Event, EventSource};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

const ENDPOINT_WAIT: Duration = Duration::from_secs(10);

pub struct SseServer {
    address: ServerAddress,
    http: Client,
    endpoint: Url,
    pending: Arc<PendingRequests>,
    id_counter: AtomicU64,
    _listener: ListenerGuard,
}

/// Stops the stream listener when the connection is dropped.
struct ListenerGuard(JoinHandle<()>);

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl SseServer {
    pub async fn connect(address: ServerAddress, http: Client) -> Result<Self, ToolInvokeError> {
        let name = address.as_str().to_string();
        let base = Url::parse(address.as_str())
            .map_err(|err| ToolInvokeError::transport(&name, err))?;
        let source = EventSource::new(http.get(base.clone()))
            .map_err(|err| ToolInvokeError::transport(&name, err))?;

        let pending = Arc::new(PendingRequests::default());
        let (endpoint_tx, endpoint_rx) = oneshot::channel();
        let listener = ListenerGuard(tokio::spawn(listen(
            source,
            name.clone(),
            Arc::clone(&pending),
            endpoint_tx,
        )));

        let announced = timeout(ENDPOINT_WAIT, endpoint_rx)
            .await
            .map_err(|_| ToolInvokeError::TimedOut {
                server: name.clone(),
                after: ENDPOINT_WAIT,
            })?
            .map_err(|_| ToolInvokeError::Terminated {
                server: name.clone(),
            })?;
        let endpoint = base
            .join(announced.trim())
            .map_err(|err| ToolInvokeError::protocol(&name, format!("bad endpoint event: {err}")))?;
        debug!(server = %name, %endpoint, "SSE endpoint announced");

        let server = Self {
            address,
            http,
            endpoint,
            pending,
            id_counter: AtomicU64::new(1),
            _listener: listener,
        };
        server
            .send_request("initialize", rpc::initialize_params())
            .await?;
        server
            .post(&rpc::notification("notifications/initialized", json!({})))
            .await?;
        Ok(server)
    }

    fn name(&self) -> &str {
        self.address.as_str()
    }

    async fn post(&self, payload: &Value) -> Result<(), ToolInvokeError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|err| ToolInvokeError::transport(self.name(), err))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolInvokeError::Http {
                server: self.name().to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn send_request(&self, method: &str, params: Value) -> Result<Value, ToolInvokeError> {
        let id = format!("req-{}", self.id_counter.fetch_add(1, Ordering::SeqCst));
        let waiter = self.pending.register(&id);
        self.post(&rpc::request(&id, method, params)).await?;
        waiter.wait(self.name()).await
    }
}

async fn listen(
    mut source: EventSource,
    server: String,
    pending: Arc<PendingRequests>,
    endpoint_tx: oneshot::Sender<String>,
) {
    let mut endpoint_tx = Some(endpoint_tx);
    while let Some(event) = source.next().await {
        match event {
            Ok(Event::Open) => debug!(server = %server, "SSE stream opened"),
            Ok(Event::Message(message)) if message.event == "endpoint" => {
                if let Some(tx) = endpoint_tx.take() {
                    let _ = tx.send(message.data);
                }
            }
            Ok(Event::Message(message)) => match serde_json::from_str::<Value>(&message.data) {
                Ok(value) if value.get("id").is_some() && value.get("method").is_none() => {
                    pending.resolve(&server, value);
                }
                Ok(value) => {
                    let method = value.get("method").and_then(Value::as_str).unwrap_or_default();
                    debug!(server = %server, method, "ignoring server-initiated SSE message");
                }
                Err(source) => warn!(
                    server = %server,
                    %source,
                    "received invalid JSON on SSE stream"
                ),
            },
            Err(err) => {
                warn!(server = %server, %err, "SSE stream closed");
                break;
            }
        }
    }
    source.close();
    pending.fail_all(&server);
}

#[async_trait]
impl ToolServerInterface for SseServer {
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
