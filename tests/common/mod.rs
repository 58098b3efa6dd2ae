// Shared fakes for integration tests: scripted tool servers, connectors,
// sleepers and model providers.
#![allow(dead_code)]

use async_trait::async_trait;
use mcp_agent_bridge::discovery::Sleeper;
use mcp_agent_bridge::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use mcp_agent_bridge::tooling::{
    Connector, ServerToolInfo, ToolCallOutput, ToolInvokeError, ToolServerInterface,
};
use mcp_agent_bridge::types::ServerAddress;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// In-memory tool server answering `greet` with "Hola, {name}!".
pub struct StubServer {
    address: ServerAddress,
    tools: Vec<ServerToolInfo>,
    pub calls: Mutex<Vec<(String, Value)>>,
}

impl StubServer {
    pub fn new(address: &str, tools: Vec<ServerToolInfo>) -> Self {
        Self {
            address: ServerAddress::new(address),
            tools,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ToolServerInterface for StubServer {
    fn address(&self) -> &ServerAddress {
        &self.address
    }

    async fn list_tools(&self) -> Result<Vec<ServerToolInfo>, ToolInvokeError> {
        Ok(self.tools.clone())
    }

    async fn invoke_tool(
        &self,
        tool: &str,
        arguments: Value,
    ) -> Result<ToolCallOutput, ToolInvokeError> {
        self.calls
            .lock()
            .unwrap()
            .push((tool.to_string(), arguments.clone()));
        let name = arguments["name"].as_str().unwrap_or("mundo");
        Ok(ToolCallOutput::success(format!("Hola, {name}!")))
    }
}

pub fn tool(name: &str, description: &str) -> ServerToolInfo {
    ServerToolInfo {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema: Some(json!({
            "type": "object",
            "properties": {"name": {"type": "string"}},
            "required": ["name"]
        })),
    }
}

/// Behaviour of one address behind [`ScriptedConnector`].
pub enum Script {
    /// Fail this many times, then answer with these tools
    FailThenServe(u32, Vec<ServerToolInfo>),
    AlwaysFail,
}

/// Connector whose per-address outcome is scripted; records every call.
pub struct ScriptedConnector {
    scripts: HashMap<String, Script>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedConnector {
    pub fn new(scripts: Vec<(&str, Script)>) -> Self {
        Self {
            scripts: scripts
                .into_iter()
                .map(|(address, script)| (address.to_string(), script))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls_to(&self, address: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| called.as_str() == address)
            .count()
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(
        &self,
        address: &ServerAddress,
    ) -> Result<Arc<dyn ToolServerInterface>, ToolInvokeError> {
        let previous = self.calls_to(address.as_str()) as u32;
        self.calls.lock().unwrap().push(address.to_string());
        let refused = || ToolInvokeError::Transport {
            server: address.to_string(),
            message: "connection refused".to_string(),
        };
        match self.scripts.get(address.as_str()) {
            Some(Script::FailThenServe(failures, tools)) if previous >= *failures => {
                Ok(Arc::new(StubServer::new(address.as_str(), tools.clone())))
            }
            _ => Err(refused()),
        }
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    pub naps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn naps(&self) -> Vec<Duration> {
        self.naps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.naps.lock().unwrap().push(duration);
    }
}

/// Model that replays canned responses and records what it was sent.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<ModelResponse>>,
    pub requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ModelResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ModelError::invalid_response("scripted", "script exhausted"))
    }
}
