use super::super::dto::HealthResponse;
use super::super::state::ServerState;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Readiness of the agent session", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    let session = state.handler().session();
    Json(HealthResponse {
        ready: session.is_some(),
        tools: session.map(|s| s.registry().len()).unwrap_or(0),
    })
}
