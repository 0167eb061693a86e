//! # Tool Registry
//!
//! Binds each tool name to its description, input schema and handler, and
//! mediates every call: lookup, argument validation, execution and
//! conversion of the outcome into a [`ToolResult`].
//!
//! Nothing that goes wrong inside a tool escapes [`ToolRegistry::dispatch`]:
//! unknown names, bad arguments, handler errors and handler panics all come
//! back as an error-describing `ToolResult`.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use crate::error::{RegistryError, ToolError};
use crate::mcp::protocol::ToolResult;
use crate::AppState;

/// Successful tool payload, flattened to text only at the wire boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Compact JSON
    Json(Value),
    /// JSON with 2-space indentation
    PrettyJson(Value),
    Text(String),
}

impl ToolOutput {
    pub fn into_text(self) -> Result<String, ToolError> {
        match self {
            ToolOutput::Json(value) => {
                serde_json::to_string(&value).map_err(|e| ToolError::Internal(e.to_string()))
            }
            ToolOutput::PrettyJson(value) => serde_json::to_string_pretty(&value)
                .map_err(|e| ToolError::Internal(e.to_string())),
            ToolOutput::Text(text) => Ok(text),
        }
    }
}

pub type ToolFuture = BoxFuture<'static, Result<ToolOutput, ToolError>>;

/// Handlers receive a clone of the shared state and arguments that already
/// passed schema validation.
pub type ToolHandler = fn(AppState, Value) -> ToolFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Boolean,
    Object,
    Enum(&'static [&'static str]),
}

impl ParamKind {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::Object => value.is_object(),
            ParamKind::Enum(allowed) => value
                .as_str()
                .map(|s| allowed.contains(&s))
                .unwrap_or(false),
        }
    }

    fn expectation(&self) -> String {
        match self {
            ParamKind::String => "a string".to_string(),
            ParamKind::Boolean => "a boolean".to_string(),
            ParamKind::Object => "a JSON object".to_string(),
            ParamKind::Enum(allowed) => format!("one of: {}", allowed.join(", ")),
        }
    }

    fn json_schema(&self) -> Value {
        match self {
            ParamKind::String => json!({ "type": "string" }),
            ParamKind::Boolean => json!({ "type": "boolean" }),
            ParamKind::Object => json!({ "type": "object" }),
            ParamKind::Enum(allowed) => json!({ "type": "string", "enum": allowed }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self { name, kind, required: true, description }
    }

    pub const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self { name, kind, required: false, description }
    }
}

/// Ordered parameter list of one tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    params: Vec<ParamSpec>,
}

impl InputSchema {
    pub fn new(params: Vec<ParamSpec>) -> Self {
        Self { params }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Checks presence and type of every declared parameter.
    ///
    /// Undeclared keys are ignored. An explicit `null` counts as absent.
    pub fn validate(&self, args: &Map<String, Value>) -> Result<(), ToolError> {
        for spec in &self.params {
            match args.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        return Err(ToolError::InvalidParams(format!(
                            "missing required parameter '{}'",
                            spec.name
                        )));
                    }
                }
                Some(value) => {
                    if !spec.kind.accepts(value) {
                        return Err(ToolError::InvalidParams(format!(
                            "parameter '{}' must be {}",
                            spec.name,
                            spec.kind.expectation()
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// JSON Schema advertised by `tools/list`.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for spec in &self.params {
            let mut schema = spec.kind.json_schema();
            if !spec.description.is_empty() {
                schema["description"] = json!(spec.description);
            }
            properties.insert(spec.name.to_string(), schema);
            if spec.required {
                required.push(spec.name);
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: InputSchema,
    pub handler: ToolHandler,
}

impl ToolDefinition {
    /// Entry for a `tools/list` reply.
    pub fn describe(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema.to_json_schema(),
        })
    }
}

/// Name -> definition table, filled once at startup and read-only afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool. Names are unique within a registry.
    pub fn register(&mut self, tool: ToolDefinition) -> Result<(), RegistryError> {
        if self.index.contains_key(tool.name) {
            return Err(RegistryError::DuplicateTool(tool.name.to_string()));
        }
        self.index.insert(tool.name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn describe_all(&self) -> Vec<Value> {
        self.tools.iter().map(ToolDefinition::describe).collect()
    }

    /// Runs one tool call and always produces a `ToolResult`.
    pub async fn dispatch(&self, tool_name: &str, parameters: Value, state: &AppState) -> ToolResult {
        match self.execute(tool_name, parameters, state).await {
            Ok(text) => ToolResult::text(text),
            Err(err) => ToolResult::error(&err),
        }
    }

    /// Like [`dispatch`](Self::dispatch) but keeps the outcome typed.
    pub async fn execute(
        &self,
        tool_name: &str,
        parameters: Value,
        state: &AppState,
    ) -> Result<String, ToolError> {
        let tool = self.get(tool_name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", tool_name);
            ToolError::UnknownTool(tool_name.to_string())
        })?;

        let args = match parameters {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            _ => {
                warn!("Rejected non-object parameters for {}", tool_name);
                return Err(ToolError::InvalidParams(
                    "parameters must be a JSON object".into(),
                ));
            }
        };
        if let Err(err) = tool.input_schema.validate(&args) {
            warn!("Invalid parameters for {}: {}", tool_name, err);
            return Err(err);
        }

        info!("Executing tool: {}", tool_name);
        let handler = tool.handler;
        let state = state.clone();
        let run = async move { handler(state, Value::Object(args)).await };

        let output = match AssertUnwindSafe(run).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("Tool {} panicked: {}", tool_name, message);
                Err(ToolError::Internal(format!(
                    "tool '{}' failed unexpectedly: {}",
                    tool_name, message
                )))
            }
        };

        match output {
            Ok(output) => output.into_text(),
            Err(err) => {
                error!("Tool {} failed: {}", tool_name, err);
                Err(err)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
