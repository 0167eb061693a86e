//! # API Module
//!
//! Optional HTTP surface for the Adamik MCP server, enabled with `--http`.
//!
//! ## Available Endpoints
//!
//! - `GET /api/health` - liveness check
//! - `POST /api/rpc` - JSON-RPC endpoint, same methods as the stdio transport
//! - `GET /api/tools` - tool definitions with their input schemas
//! - `POST /api/tools/:name` - invoke a tool with the JSON body as its parameters

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::McpServer;

pub mod health;
pub mod rpc;
pub mod tools;

/// Create the full router, nested under `/api`
pub fn create_router(server: McpServer) -> Router {
    let api_router = Router::new()
        // Health check
        .route("/health", get(health::health_handler))
        // JSON-RPC endpoint for MCP clients
        .route("/rpc", post(rpc::rpc_handler))
        // Direct tool access
        .route("/tools", get(tools::list_tools_handler))
        .route("/tools/:name", post(tools::call_tool_handler));

    Router::new()
        .nest("/api", api_router)
        .with_state(server)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
