//! Streamable HTTP transport: every JSON-RPC message is POSTed to one endpoint
//! and the answer arrives either as a JSON body or as an SSE-framed body.

use super::error::ToolInvokeError;
use super::interface::{ServerToolInfo, ToolCallOutput, ToolServerInterface};
use super::rpc;
use crate::types::ServerAddress;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

pub(crate) const SESSION_HEADER: &str = "Mcp-Session-Id";

pub struct StreamableHttpServer {
    address: ServerAddress,
    http: Client,
    session_id: Mutex<Option<String>>,
}

impl StreamableHttpServer {
    /// Performs the `initialize` handshake; the server is usable once this returns.
    pub async fn connect(address: ServerAddress, http: Client) -> Result<Self, ToolInvokeError> {
        let server = Self {
            address,
            http,
            session_id: Mutex::new(None),
        };
        server
            .send_request("initialize", rpc::initialize_params())
            .await?;
        server
            .send_notification("notifications/initialized", json!({}))
            .await?;
        debug!(server = %server.address, "Streamable HTTP session initialised");
        Ok(server)
    }

    fn name(&self) -> &str {
        self.address.as_str()
    }

    async fn post(&self, payload: &Value) -> Result<reqwest::Response, ToolInvokeError> {
        let mut request = self
            .http
            .post(self.address.as_str())
            .header(ACCEPT, "application/json, text/event-stream")
            .json(payload);
        if let Some(session) = self.session_id.lock().await.clone() {
            request = request.header(SESSION_HEADER, session);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ToolInvokeError::transport(self.name(), err))?;

        if let Some(session) = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            *self.session_id.lock().await = Some(session.to_string());
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolInvokeError::Http {
                server: self.name().to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_request(&self, method: &str, params: Value) -> Result<Value, ToolInvokeError> {
        let id = Uuid::new_v4().to_string();
        let response = self.post(&rpc::request(&id, method, params)).await?;

        let is_event_stream = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("text/event-stream"))
            .unwrap_or(false);
        let body = response
            .text()
            .await
            .map_err(|err| ToolInvokeError::transport(self.name(), err))?;

        let message = if is_event_stream {
            find_sse_response(&body, &id).ok_or_else(|| {
                ToolInvokeError::protocol(
                    self.name(),
                    format!("event stream carried no response for request {id}"),
                )
            })?
        } else {
            serde_json::from_str(&body).map_err(|source| ToolInvokeError::InvalidJson {
                server: self.name().to_string(),
                source,
            })?
        };

        rpc::into_result(self.name(), message)
    }

    async fn send_notification(&self, method: &str, params: Value) -> Result<(), ToolInvokeError> {
        self.post(&rpc::notification(method, params)).await?;
        Ok(())
    }
}

#[async_trait]
impl ToolServerInterface for StreamableHttpServer {
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

/// Scans an SSE body for the JSON-RPC message answering `id`.
fn find_sse_response(body: &str, id: &str) -> Option<Value> {
    body.replace("\r\n", "\n")
        .split("\n\n")
        .filter_map(|event| {
            let data: Vec<&str> = event
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .map(|line| line.strip_prefix(' ').unwrap_or(line))
                .collect();
            if data.is_empty() {
                None
            } else {
                serde_json::from_str::<Value>(&data.join("\n")).ok()
            }
        })
        .find(|message| {
            message
                .get("id")
                .and_then(rpc::response_key)
                .map(|key| key == id)
                .unwrap_or(false)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_matching_response_among_notifications() {
        let body = concat!(
            "event: message\n",
            "data: {\"jsonrpc\":\"2.0\",\"method\":\"notifications/progress\",\"params\":{}}\n",
            "\n",
            "event: message\n",
            "data: {\"jsonrpc\":\"2.0\",\"id\":\"abc\",\"result\":{\"tools\":[]}}\n",
            "\n"
        );

        let message = find_sse_response(body, "abc").expect("response present");
        assert_eq!(message["result"], json!({"tools": []}));
    }

    #[test]
    fn ignores_responses_for_other_requests() {
        let body = "data: {\"jsonrpc\":\"2.0\",\"id\":\"other\",\"result\":{}}\r\n\r\n";
        assert!(find_sse_response(body, "abc").is_none());
    }
}
