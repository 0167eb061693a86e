//! Pass-through to any Adamik endpoint.

use serde_json::Value;
use tracing::{debug, info};

use super::presentation::{annotate, Annotated};
use crate::blockchain::client::AdamikClient;
use crate::blockchain::models::{CallApiParams, HttpMethod};
use crate::error::ToolError;

/// Parses a raw POST body. A missing or blank body is sent as no body at all.
pub fn parse_body(body: Option<&str>) -> Result<Option<Value>, ToolError> {
    match body {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| ToolError::InvalidJson(e.to_string())),
        _ => Ok(None),
    }
}

/// Calls `path` with `method` and annotates the payload with a presentation hint.
///
/// For POST the body is parsed before anything is sent; a malformed body
/// never reaches the network.
pub async fn call_api(client: &AdamikClient, params: &CallApiParams) -> Result<Annotated, ToolError> {
    info!("call-adamik-api: {} {}", params.method.as_str(), params.path);

    let outcome = match params.method {
        HttpMethod::Get => client.get(&params.path).await,
        HttpMethod::Post => {
            let body = parse_body(params.body.as_deref())?;
            debug!("Parsed request body: {:?}", body);
            client.call(&params.path, HttpMethod::Post, body.as_ref()).await
        }
    };

    let data = outcome.into_result()?;
    Ok(annotate(&params.path, data))
}
