use super::super::dto::{AgentRequest, AgentResponse, ErrorResponse};
use super::super::state::ServerState;
use crate::handler::HandlerError;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{error, info};

#[utoipa::path(
    post,
    path = "/api/agent",
    tag = "agent",
    request_body = AgentRequest,
    responses(
        (status = 200, description = "Final answer of the agent", body = AgentResponse),
        (status = 400, description = "Blank message", body = ErrorResponse),
        (status = 500, description = "Session not ready or execution failed", body = ErrorResponse)
    )
)]
pub async fn agent_handler(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<AgentRequest>,
) -> Result<Json<AgentResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(chars = payload.message.chars().count(), "Received /api/agent request");

    match state.handler().handle(&payload.message).await {
        Ok(response) => Ok(Json(AgentResponse { response })),
        Err(err) => {
            let status = status_for(&err);
            error!(%status, error = %err, "Agent request failed");
            Err((
                status,
                Json(ErrorResponse {
                    detail: err.to_string(),
                }),
            ))
        }
    }
}

fn status_for(err: &HandlerError) -> StatusCode {
    match err {
        HandlerError::InvalidInput => StatusCode::BAD_REQUEST,
        HandlerError::NotReady | HandlerError::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
