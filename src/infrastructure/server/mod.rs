//! REST facade over the request handler.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /api/agent` | one agent turn: `{"message"}` to `{"response"}` or `{"detail"}` |
//! | `GET /api/tools` | tools found during discovery |
//! | `GET /api/health` | `{"ready", "tools"}` |
//! | `GET /api-doc/openapi.json` | OpenAPI document |

mod docs;
pub mod dto;
mod error;
mod router;
mod routes;
mod state;

pub use error::ServerError;

use crate::handler::RequestHandler;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Routes with state and CORS applied; served by [`serve`] or driven directly in tests.
pub fn router(handler: Arc<RequestHandler>, cors_origins: &[String]) -> Router {
    router::build(handler, cors_origins)
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    router::bind(addr).await
}

/// Serves on an already bound listener until the process stops.
pub async fn serve(
    listener: TcpListener,
    handler: Arc<RequestHandler>,
    cors_origins: &[String],
) -> Result<(), ServerError> {
    router::serve(listener, router(handler, cors_origins)).await
}
