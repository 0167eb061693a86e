//! Error types for tool dispatch.

use thiserror::Error;

/// Failure side of every tool outcome.
///
/// Nothing here ever reaches the transport as a fault: the registry flattens
/// it into an `"Error: ..."` text block when the `ToolResult` is built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("chain '{chain_id}' is not supported (supported chains: {supported})")]
    UnsupportedChain { chain_id: String, supported: String },

    #[error("invalid JSON in request body: {0}")]
    InvalidJson(String),

    /// Non-2xx response, timeout or network failure from the Adamik API
    #[error("Adamik API request failed with status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors raised while building the tool table at startup.
#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
}
