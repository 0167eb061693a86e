// src/mcp/protocol.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolError;

// --- JSON-RPC 2.0 framing ---

#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

fn default_jsonrpc() -> String {
    "2.0".to_string()
}

impl Request {
    pub fn is_notification(&self) -> bool {
        self.id.is_null()
    }
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(ErrorObject {
                code,
                message,
                data: None,
            }),
        }
    }
}

// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
}

// --- Simple tool envelope ---

/// `{id, toolName, parameters}`: one tool call, consumed once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    #[serde(default)]
    pub id: Value,
    pub tool_name: String,
    #[serde(default)]
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// What every tool call returns on the wire.
///
/// Failures are text blocks starting with `Error:`; `isError` is set as well
/// for callers that prefer a structured flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(err: &ToolError) -> Self {
        Self {
            content: vec![ContentBlock::Text {
                text: format!("Error: {}", err),
            }],
            is_error: true,
        }
    }

    /// First text block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().map(|block| match block {
            ContentBlock::Text { text } => text.as_str(),
        }).next()
    }
}

/// `{id, content, isError?}`: reply to a [`ToolInvocation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub id: Value,
    #[serde(flatten)]
    pub result: ToolResult,
}

/// Any message accepted on the transport channel.
#[derive(Debug)]
pub enum Inbound {
    JsonRpc(Request),
    Invocation(ToolInvocation),
    /// JSON-RPC object (it has `method`) that does not decode as a request.
    InvalidRequest { id: Value, reason: String },
    /// Envelope without a usable `toolName`; answered as a failed tool call.
    MalformedInvocation { id: Value, reason: String },
}

impl Inbound {
    /// Sorts a decoded line into one of the accepted shapes.
    ///
    /// Objects carrying `method` are JSON-RPC, every other object is a tool
    /// envelope. Only non-object values are rejected outright.
    pub fn classify(value: Value) -> Result<Self, String> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(format!(
                    "expected a JSON object, got {}",
                    json_type_name(&other)
                ))
            }
        };
        let id = object.get("id").cloned().unwrap_or(Value::Null);

        if object.contains_key("method") {
            return Ok(match serde_json::from_value(Value::Object(object)) {
                Ok(request) => Inbound::JsonRpc(request),
                Err(e) => Inbound::InvalidRequest {
                    id,
                    reason: format!("Invalid request: {}", e),
                },
            });
        }

        match object.remove("toolName") {
            Some(Value::String(tool_name)) => Ok(Inbound::Invocation(ToolInvocation {
                id,
                tool_name,
                parameters: object.remove("parameters").unwrap_or(Value::Null),
            })),
            None | Some(Value::Null) => Ok(Inbound::MalformedInvocation {
                id,
                reason: "missing required field 'toolName'".into(),
            }),
            Some(_) => Ok(Inbound::MalformedInvocation {
                id,
                reason: "field 'toolName' must be a string".into(),
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
