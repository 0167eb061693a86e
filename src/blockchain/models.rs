// src/blockchain/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolError;

// --- API client models ---

/// HTTP verbs the Adamik API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Normalized result of one upstream HTTP call.
///
/// The client always returns one of these; failures are described by
/// `success == false` plus `error`, never by an `Err`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiOutcome {
    pub data: Option<Value>,
    pub status: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiOutcome {
    pub fn ok(status: u16, data: Value) -> Self {
        Self {
            data: Some(data),
            status,
            success: true,
            error: None,
        }
    }

    pub fn failed(status: u16, error: impl Into<String>) -> Self {
        Self {
            data: None,
            status,
            success: false,
            error: Some(error.into()),
        }
    }

    /// Converts the outcome into the handler-facing result type.
    pub fn into_result(self) -> Result<Value, ToolError> {
        if self.success {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            Err(ToolError::Upstream {
                status: self.status,
                message: self.error.unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }
}

// --- Tool parameter models ---
//
// One struct per tool, decoded after the registry has checked the raw
// arguments against the tool's input schema.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainParams {
    pub chain_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetailsParams {
    pub chain_id: String,
    pub token_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeriveAddressParams {
    pub chain_id: String,
    pub pubkey: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountParams {
    pub chain_id: String,
    pub account_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHistoryParams {
    pub chain_id: String,
    pub account_id: String,
    #[serde(default)]
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorsParams {
    pub chain_id: String,
    #[serde(default)]
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionParams {
    pub chain_id: String,
    pub transaction_id: String,
}

/// Shared by `encodeTransaction` (transaction intent) and `broadcastTransaction` (signed payload).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBodyParams {
    pub chain_id: String,
    pub body: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSpecificationParams {
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub refresh: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallApiParams {
    pub path: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub body: Option<String>,
}
