use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::mcp::protocol::ToolResult;
use crate::McpServer;

/// GET /api/tools
pub async fn list_tools_handler(State(server): State<McpServer>) -> Json<Value> {
    Json(json!({ "tools": server.registry.describe_all() }))
}

/// POST /api/tools/:name
///
/// Always answers 200: tool failures are part of the result body, as on the
/// stdio transport. A missing body means no parameters.
pub async fn call_tool_handler(
    State(server): State<McpServer>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> Json<ToolResult> {
    let params = body.map(|Json(v)| v).unwrap_or(Value::Null);
    Json(server.registry.dispatch(&name, params, &server.state).await)
}
