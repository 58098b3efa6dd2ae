use super::error::ToolInvokeError;
use super::http::StreamableHttpServer;
use super::interface::ToolServerInterface;
use super::sse::SseServer;
use super::stdio::StdioServer;
use crate::types::{ServerAddress, TransportKind};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// Opens an initialised connection to a tool server.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        address: &ServerAddress,
    ) -> Result<Arc<dyn ToolServerInterface>, ToolInvokeError>;
}

/// Picks the MCP transport from the shape of the address.
#[derive(Clone, Default)]
pub struct McpConnector {
    http: Client,
}

impl McpConnector {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Connector for McpConnector {
    async fn connect(
        &self,
        address: &ServerAddress,
    ) -> Result<Arc<dyn ToolServerInterface>, ToolInvokeError> {
        let transport = address.transport();
        debug!(server = %address, ?transport, "Opening MCP connection");
        let server: Arc<dyn ToolServerInterface> = match transport {
            TransportKind::StreamableHttp => Arc::new(
                StreamableHttpServer::connect(address.clone(), self.http.clone()).await?,
            ),
            TransportKind::Sse => {
                Arc::new(SseServer::connect(address.clone(), self.http.clone()).await?)
            }
            TransportKind::Stdio => Arc::new(StdioServer::spawn(address.clone()).await?),
        };
        Ok(server)
    }
}
