//! Utility functions for the Adamik MCP server

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ToolError;

/// Decodes validated tool arguments into the tool's parameter struct.
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidParams(e.to_string()))
}
