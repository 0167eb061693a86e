//! # MCP Handler Module
//!
//! Message-level dispatch for the Adamik MCP server. Two request shapes share
//! the transport:
//!
//! - the simple tool envelope `{id, toolName, parameters}`, answered with
//!   `{id, content}`;
//! - JSON-RPC 2.0 as spoken by MCP clients (`initialize`, `tools/list`,
//!   `tools/call`, `ping`). A method named after a registered tool is
//!   treated as a `tools/call` of that tool.
//!
//! Tool-level failures never become JSON-RPC errors: they are returned as
//! error text inside the tool result. JSON-RPC errors are reserved for
//! framing problems (bad JSON, unknown method, missing tool name).

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::error::ToolError;
use crate::mcp::protocol::{
    error_codes, Inbound, Request, Response, ToolInvocation, ToolResponse, ToolResult,
};
use crate::McpServer;

pub const SERVER_NAME: &str = "adamik-mcp-server";
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Serves line-delimited messages from `reader` until EOF, writing one reply
/// line per answered message to `writer`.
///
/// A line that cannot be decoded is answered with a parse error and the loop
/// moves on. Only I/O errors end it early.
pub async fn serve_lines<R, W>(mut reader: R, mut writer: W, server: &McpServer) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            info!("EOF received, shutting down MCP server");
            return Ok(());
        }

        let reply = match std::str::from_utf8(&buf) {
            Ok(line) => handle_line(line, server).await,
            Err(e) => {
                warn!("Discarding line that is not valid UTF-8: {}", e);
                parse_error_reply(e)
            }
        };

        if let Some(json) = reply {
            writer.write_all(json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }
}

/// Handles one raw line from the transport. Returns the line to write back, if any.
pub async fn handle_line(line: &str, server: &McpServer) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    debug!("Received: {}", line);

    let value = match serde_json::from_str::<Value>(line) {
        Ok(value) => value,
        Err(e) => {
            error!("JSON parse error: {}", e);
            return parse_error_reply(e);
        }
    };

    let reply = match Inbound::classify(value) {
        Ok(Inbound::JsonRpc(request)) => handle_mcp_request(request, server)
            .await
            .and_then(|response| serde_json::to_string(&response).ok()),
        Ok(Inbound::Invocation(invocation)) => {
            let response = handle_invocation(invocation, server).await;
            serde_json::to_string(&response).ok()
        }
        Ok(Inbound::MalformedInvocation { id, reason }) => {
            warn!("Rejected tool envelope: {}", reason);
            let response = ToolResponse {
                id,
                result: ToolResult::error(&ToolError::InvalidParams(reason)),
            };
            serde_json::to_string(&response).ok()
        }
        Ok(Inbound::InvalidRequest { id, reason }) => {
            warn!("Rejected JSON-RPC request: {}", reason);
            let response = Response::error(id, error_codes::INVALID_REQUEST, reason);
            serde_json::to_string(&response).ok()
        }
        Err(reason) => parse_error_reply(reason),
    };

    if let Some(ref json) = reply {
        debug!("Sending: {}", json);
    }
    reply
}

fn parse_error_reply(cause: impl std::fmt::Display) -> Option<String> {
    let response = Response::error(
        Value::Null,
        error_codes::PARSE_ERROR,
        format!("Parse error: {}", cause),
    );
    serde_json::to_string(&response).ok()
}

/// Runs a simple-envelope tool call.
pub async fn handle_invocation(invocation: ToolInvocation, server: &McpServer) -> ToolResponse {
    let result = server
        .registry
        .dispatch(&invocation.tool_name, invocation.parameters, &server.state)
        .await;
    ToolResponse {
        id: invocation.id,
        result,
    }
}

/// This is the main dispatcher for all incoming JSON-RPC requests.
pub async fn handle_mcp_request(req: Request, server: &McpServer) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "ping" => Response::success(req.id.clone(), json!({})),
        "tools/list" => handle_tools_list(&req, server),
        "tools/call" => handle_tool_call(req, server).await,
        // Convenience aliases: a tool name used directly as the method
        method if server.registry.contains(method) => {
            let name = req.method.clone();
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": name,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, server).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it through the registry.
async fn handle_tool_call(req: Request, server: &McpServer) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
    let result = server.registry.dispatch(tool_name, args, &server.state).await;

    match serde_json::to_value(&result) {
        Ok(value) => Response::success(req.id, value),
        Err(e) => Response::error(req.id, error_codes::INVALID_REQUEST, e.to_string()),
    }
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions =
        "Adamik blockchain data server: account state, history, validators, token metadata, transaction encoding and broadcast across 60+ chains. Call readMeFirst before other tools.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request from the registry's definitions.
fn handle_tools_list(req: &Request, server: &McpServer) -> Response {
    Response::success(
        req.id.clone(),
        json!({ "tools": server.registry.describe_all() }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn server() -> McpServer {
        let config = Config::from_lookup(|key| match key {
            "ADAMIK_API_BASE_URL" => Some("http://127.0.0.1:9/api".to_string()),
            "ADAMIK_API_KEY" => Some("test-key".to_string()),
            _ => None,
        })
        .unwrap();
        McpServer::new(config).unwrap()
    }

    async fn roundtrip(line: &str) -> Value {
        let reply = handle_line(line, &server()).await.expect("expected a reply");
        serde_json::from_str(&reply).unwrap()
    }

    #[tokio::test]
    async fn test_blank_line_is_ignored() {
        assert!(handle_line("   ", &server()).await.is_none());
    }

    #[tokio::test]
    async fn test_garbage_line_yields_parse_error() {
        let reply = roundtrip("{not json").await;
        assert_eq!(reply["error"]["code"], error_codes::PARSE_ERROR);
        assert!(reply["id"].is_null());
    }

    #[tokio::test]
    async fn test_envelope_supported_chains() {
        let reply = roundtrip(r#"{"id":"a1","toolName":"getSupportedChains","parameters":{}}"#).await;
        assert_eq!(reply["id"], "a1");
        let text = reply["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("ethereum,bitcoin"));
        assert!(reply.get("isError").is_none());
    }

    #[tokio::test]
    async fn test_envelope_unknown_tool() {
        let reply = roundtrip(r#"{"id":2,"toolName":"signMessage","parameters":{}}"#).await;
        assert_eq!(reply["id"], 2);
        assert_eq!(reply["isError"], true);
        assert_eq!(reply["content"][0]["text"], "Error: unknown tool 'signMessage'");
    }

    #[tokio::test]
    async fn test_initialize_and_tools_list() {
        let init = roundtrip(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#).await;
        assert_eq!(init["result"]["serverInfo"]["name"], SERVER_NAME);

        let list = roundtrip(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;
        let tools = list["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 14);
        assert_eq!(tools[0]["name"], "readMeFirst");
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let reply = handle_line(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            &server(),
        )
        .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let reply = roundtrip(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#).await;
        assert_eq!(reply["error"]["code"], error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tools_call_without_name() {
        let reply =
            roundtrip(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{}}"#).await;
        assert_eq!(reply["error"]["code"], error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tools_call_validation_error_is_a_result() {
        let reply = roundtrip(
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"getAccountState","arguments":{"chainId":"ethereum"}}}"#,
        )
        .await;
        assert!(reply.get("error").is_none());
        assert_eq!(reply["result"]["isError"], true);
        assert_eq!(
            reply["result"]["content"][0]["text"],
            "Error: invalid parameters: missing required parameter 'accountId'"
        );
    }

    #[tokio::test]
    async fn test_tool_name_alias() {
        let reply =
            roundtrip(r#"{"jsonrpc":"2.0","id":6,"method":"getSupportedChains"}"#).await;
        let text = reply["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("optimism"));
    }

    #[tokio::test]
    async fn test_envelope_with_non_string_tool_name_keeps_id() {
        let reply = roundtrip(r#"{"id":"r9","toolName":42,"parameters":{}}"#).await;
        assert_eq!(reply["id"], "r9");
        assert_eq!(reply["isError"], true);
        assert_eq!(
            reply["content"][0]["text"],
            "Error: invalid parameters: field 'toolName' must be a string"
        );
        assert!(reply.get("error").is_none());
    }

    #[tokio::test]
    async fn test_envelope_without_tool_name_keeps_id() {
        let reply = roundtrip(r#"{"id":"r10","parameters":{}}"#).await;
        assert_eq!(reply["id"], "r10");
        assert_eq!(reply["isError"], true);
        assert_eq!(
            reply["content"][0]["text"],
            "Error: invalid parameters: missing required field 'toolName'"
        );
    }

    #[tokio::test]
    async fn test_malformed_jsonrpc_request_keeps_id() {
        let reply = roundtrip(r#"{"jsonrpc":"2.0","id":11,"method":["tools/list"]}"#).await;
        assert_eq!(reply["id"], 11);
        assert_eq!(reply["error"]["code"], error_codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_non_object_line_yields_parse_error() {
        let reply = roundtrip("[1,2,3]").await;
        assert_eq!(reply["error"]["code"], error_codes::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_serve_lines_survives_invalid_utf8() {
        let input: &[u8] =
            b"\xff\xfe\n{\"id\":1,\"toolName\":\"getSupportedChains\",\"parameters\":{}}\n";
        let mut output = Vec::new();

        serve_lines(input, &mut output, &server()).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["error"]["code"], error_codes::PARSE_ERROR);
        assert_eq!(lines[1]["id"], 1);
        assert!(lines[1]["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("ethereum,bitcoin"));
    }

    #[tokio::test]
    async fn test_serve_lines_answers_in_order_and_skips_notifications() {
        let input: &[u8] = concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n",
            "\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
            "{\"id\":\"b\",\"toolName\":\"readMeFirst\"}"
        )
        .as_bytes();
        let mut output = Vec::new();

        serve_lines(input, &mut output, &server()).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[0]["result"], json!({}));
        assert_eq!(lines[1]["id"], "b");
    }

    #[tokio::test]
    async fn test_unsupported_chain_via_envelope() {
        let reply = roundtrip(
            r#"{"id":"x","toolName":"listFeatures","parameters":{"chainId":"dogecoin"}}"#,
        )
        .await;
        let text = reply["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Error:"));
        assert!(text.contains("dogecoin"));
    }
}
