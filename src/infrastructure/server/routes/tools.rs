use super::super::dto::{ToolEntry, ToolInventoryResponse};
use super::super::state::ServerState;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::debug;

#[utoipa::path(
    get,
    path = "/api/tools",
    tag = "tools",
    responses(
        (status = 200, description = "Tools found during discovery", body = ToolInventoryResponse)
    )
)]
pub async fn tools_handler(State(state): State<Arc<ServerState>>) -> Json<ToolInventoryResponse> {
    let tools: Vec<ToolEntry> = state
        .handler()
        .session()
        .map(|session| session.registry().iter().map(ToolEntry::from).collect())
        .unwrap_or_default();
    debug!(tool_count = tools.len(), "Serving /api/tools request");
    Json(ToolInventoryResponse { tools })
}
