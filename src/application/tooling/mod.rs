//! # Tooling Module
//!
//! MCP client plumbing: one connection per tool server over streamable HTTP,
//! legacy SSE or a stdio child process, plus the name-keyed registry the agent
//! resolves tool calls against.

mod connector;
mod descriptor;
mod error;
mod http;
mod interface;
mod registry;
pub(crate) mod rpc;
pub mod schema;
mod sse;
mod stdio;

pub use connector::{Connector, McpConnector};
pub use descriptor::ToolDescriptor;
pub use error::ToolInvokeError;
pub use http::StreamableHttpServer;
pub use interface::{ServerToolInfo, ToolCallOutput, ToolServerInterface};
pub use registry::ToolRegistry;
pub use schema::{SchemaViolation, validate_arguments};
pub use sse::SseServer;
pub use stdio::StdioServer;
