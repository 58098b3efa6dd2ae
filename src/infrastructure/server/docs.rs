use super::dto::{
    AgentRequest, AgentResponse, ErrorResponse, HealthResponse, ToolEntry, ToolInventoryResponse,
};
use super::routes;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::agent::agent_handler,
        routes::tools::tools_handler,
        routes::health::health_handler
    ),
    components(
        schemas(
            AgentRequest,
            AgentResponse,
            ErrorResponse,
            ToolEntry,
            ToolInventoryResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "agent", description = "Send a message to the agent"),
        (name = "tools", description = "Tools discovered on the MCP servers"),
        (name = "health", description = "Readiness probe")
    )
)]
pub(super) struct ApiDoc;
