// MCP transport tests - in-process axum servers speaking streamable HTTP and
// legacy SSE, driven through the real connector and the full agent pipeline.

mod common;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::ScriptedProvider;
use futures::stream;
use mcp_agent_bridge::agent::AgentSession;
use mcp_agent_bridge::discovery::{RetryPolicy, ToolRegistryBuilder};
use mcp_agent_bridge::handler::RequestHandler;
use mcp_agent_bridge::model::ModelResponse;
use mcp_agent_bridge::tooling::{Connector, McpConnector, ToolInvokeError, ToolServerInterface};
use mcp_agent_bridge::types::{ServerAddress, ToolCall};
use serde_json::{Value, json};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

const SESSION: &str = "session-42";

/// JSON-RPC behaviour shared by both fake servers: one `greet` tool.
fn answer(request: &Value) -> Option<Value> {
    let id = request.get("id")?.clone();
    let method = request["method"].as_str().unwrap_or_default();
    let reply = match method {
        "initialize" => json!({
            "jsonrpc": "2.0", "id": id,
            "result": {
                "protocolVersion": "2025-06-18",
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "greeter", "version": "1.0.0"}
            }
        }),
        "tools/list" => json!({
            "jsonrpc": "2.0", "id": id,
            "result": {"tools": [{
                "name": "greet",
                "description": "Saluda a una persona",
                "inputSchema": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}},
                    "required": ["name"]
                }
            }]}
        }),
        "tools/call" if request["params"]["name"] == "greet" => {
            let name = request["params"]["arguments"]["name"].as_str().unwrap_or("mundo");
            json!({
                "jsonrpc": "2.0", "id": id,
                "result": {"content": [{"type": "text", "text": format!("Hola, {name}!")}], "isError": false}
            })
        }
        _ => json!({
            "jsonrpc": "2.0", "id": id,
            "error": {"code": -32602, "message": format!("unknown tool or method: {method}")}
        }),
    };
    Some(reply)
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[derive(Default)]
struct HttpLog {
    /// Session header seen on each request after `initialize`
    sessions: Mutex<Vec<Option<String>>>,
}

async fn streamable_endpoint(
    State(log): State<Arc<HttpLog>>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    let method = request["method"].as_str().unwrap_or_default().to_string();
    if method != "initialize" {
        let session = headers
            .get("mcp-session-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        log.sessions.lock().unwrap().push(session);
    }

    let Some(reply) = answer(&request) else {
        return StatusCode::ACCEPTED.into_response();
    };
    match method.as_str() {
        "initialize" => {
            let mut response = Json(reply).into_response();
            response
                .headers_mut()
                .insert("mcp-session-id", HeaderValue::from_static(SESSION));
            response
        }
        // Answer through an SSE-framed body, preceded by an unrelated notification.
        "tools/list" => {
            let body = format!(
                "event: message\ndata: {}\n\nevent: message\ndata: {}\n\n",
                json!({"jsonrpc": "2.0", "method": "notifications/message", "params": {}}),
                reply
            );
            ([("content-type", "text/event-stream")], body).into_response()
        }
        _ => Json(reply).into_response(),
    }
}

async fn streamable_server() -> (ServerAddress, Arc<HttpLog>) {
    let log = Arc::new(HttpLog::default());
    let app = Router::new()
        .route("/mcp", post(streamable_endpoint))
        .with_state(log.clone());
    let addr = spawn(app).await;
    (ServerAddress::new(format!("http://{addr}/mcp")), log)
}

#[derive(Default)]
struct SseState {
    stream: Mutex<Option<mpsc::UnboundedSender<Event>>>,
}

async fn sse_stream(State(state): State<Arc<SseState>>) -> impl IntoResponse {
    let (tx, rx) = mpsc::unbounded_channel();
    let _ = tx.send(Event::default().event("endpoint").data("/messages?session=1"));
    *state.stream.lock().unwrap() = Some(tx);
    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (Ok::<_, Infallible>(event), rx))
    });
    Sse::new(events)
}

async fn sse_messages(State(state): State<Arc<SseState>>, Json(request): Json<Value>) -> StatusCode {
    if let Some(reply) = answer(&request) {
        if let Some(tx) = state.stream.lock().unwrap().as_ref() {
            let _ = tx.send(Event::default().event("message").data(reply.to_string()));
        }
    }
    StatusCode::ACCEPTED
}

async fn sse_server() -> ServerAddress {
    let app = Router::new()
        .route("/sse", get(sse_stream))
        .route("/messages", post(sse_messages))
        .with_state(Arc::new(SseState::default()));
    let addr = spawn(app).await;
    ServerAddress::new(format!("http://{addr}/sse"))
}

#[tokio::test]
async fn streamable_http_lists_and_calls_tools() {
    let (address, log) = streamable_server().await;

    let server = McpConnector::default().connect(&address).await.unwrap();
    let tools = server.list_tools().await.unwrap();
    let output = server
        .invoke_tool("greet", json!({"name": "Juan"}))
        .await
        .unwrap();

    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "greet");
    assert_eq!(tools[0].input_schema.as_ref().unwrap()["required"], json!(["name"]));
    assert_eq!(output.text, "Hola, Juan!");
    assert!(!output.is_error);
    let sessions = log.sessions.lock().unwrap().clone();
    assert_eq!(sessions.len(), 3);
    assert!(sessions.iter().all(|s| s.as_deref() == Some(SESSION)));
}

#[tokio::test]
async fn remote_rejection_is_distinguished_from_transport_failure() {
    let (address, _) = streamable_server().await;
    let server = McpConnector::default().connect(&address).await.unwrap();

    let err = server.invoke_tool("launch_rockets", json!({})).await.unwrap_err();
    assert!(matches!(err, ToolInvokeError::Rpc { code: -32602, .. }));
    assert!(err.is_remote_rejection());

    let refused = McpConnector::default()
        .connect(&ServerAddress::new("http://127.0.0.1:1/mcp"))
        .await
        .err()
        .expect("nothing listens on port 1");
    assert!(!refused.is_remote_rejection());
}

#[tokio::test]
async fn legacy_sse_lists_and_calls_tools() {
    let address = sse_server().await;

    let server = McpConnector::default().connect(&address).await.unwrap();
    let tools = server.list_tools().await.unwrap();
    let output = server
        .invoke_tool("greet", json!({"name": "Ana"}))
        .await
        .unwrap();

    assert_eq!(tools[0].name, "greet");
    assert_eq!(output.text, "Hola, Ana!");
}

#[tokio::test]
async fn discovered_tools_drive_a_full_agent_turn() {
    let (http_address, _) = streamable_server().await;
    let builder = ToolRegistryBuilder::new(
        Arc::new(McpConnector::default()),
        RetryPolicy {
            delay: Duration::from_millis(10),
            max_attempts: 2,
            attempt_timeout: Duration::from_secs(5),
        },
    );
    let report = builder.discover(&[http_address]).await;
    assert_eq!(report.registry.names(), vec!["greet"]);

    let provider = Arc::new(ScriptedProvider::new(vec![
        ModelResponse::tool_calls(
            "",
            vec![ToolCall::new("greet", json!({"name": "Juan"})).with_id("call_1")],
        ),
        ModelResponse::text("¡Hola, Juan!"),
    ]));
    let session = AgentSession::new(provider.clone(), "qwen3:32b", Arc::new(report.registry));
    let handler = RequestHandler::with_session(Arc::new(session), true);

    let answer = handler.handle("Saluda a Juan").await.unwrap();

    assert_eq!(answer, "¡Hola, Juan!");
    let requests = provider.requests.lock().unwrap();
    let observation = requests[1].messages.last().unwrap();
    assert_eq!(observation.content, "Hola, Juan!");
}
