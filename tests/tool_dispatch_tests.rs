//! Tool dispatch against a mock Adamik API

use adamik_mcp_server::{config::Config, mcp::protocol::ToolResult, McpServer};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};

const API_KEY: &str = "test-api-key";

fn server_with_base(base_url: String) -> McpServer {
    let config = Config::from_lookup(move |key| match key {
        "ADAMIK_API_BASE_URL" => Some(base_url.clone()),
        "ADAMIK_API_KEY" => Some(API_KEY.to_string()),
        _ => None,
    })
    .unwrap();
    McpServer::new(config).unwrap()
}

fn server_for(mock: &ServerGuard) -> McpServer {
    server_with_base(format!("{}/api", mock.url()))
}

async fn call(server: &McpServer, tool: &str, params: Value) -> ToolResult {
    server.registry.dispatch(tool, params, &server.state).await
}

fn text(result: &ToolResult) -> &str {
    result.first_text().expect("result has a text block")
}

/// Mocks that fail the test if any request reaches the server.
async fn forbid_network(mock: &mut ServerGuard) -> Vec<Mock> {
    let get = mock
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let post = mock
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    vec![get, post]
}

#[tokio::test]
async fn test_get_payload_round_trips_unchanged() {
    let mut mock = Server::new_async().await;
    let payload = json!({
        "accountId": "0x1",
        "balances": {
            "native": { "available": "5354656887913579", "total": "5354656887913579" },
            "tokens": [{ "token": { "id": "0xa0b8", "decimals": "6" }, "amount": "2245100" }]
        }
    });
    let m = mock
        .mock("GET", "/api/ethereum/account/0x1/state")
        .match_header("authorization", API_KEY)
        .match_header("accept", "application/json")
        .match_header("user-agent", "Adamik MCP Server")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(payload.to_string())
        .expect(1)
        .create_async()
        .await;

    let server = server_for(&mock);
    let result = call(
        &server,
        "getAccountState",
        json!({"chainId": "ethereum", "accountId": "0x1"}),
    )
    .await;

    m.assert_async().await;
    assert!(!result.is_error);
    let parsed: Value = serde_json::from_str(text(&result)).unwrap();
    assert_eq!(parsed, payload);
}

#[tokio::test]
async fn test_unknown_tool_makes_no_network_call() {
    let mut mock = Server::new_async().await;
    let guards = forbid_network(&mut mock).await;

    let server = server_for(&mock);
    let result = call(&server, "sign-starknet-message", json!({"message": "hi"})).await;

    assert!(result.is_error);
    assert!(text(&result).starts_with("Error:"));
    assert!(text(&result).contains("sign-starknet-message"));
    for guard in guards {
        guard.assert_async().await;
    }
}

#[tokio::test]
async fn test_list_features_rejects_unsupported_chain_before_network() {
    let mut mock = Server::new_async().await;
    let guards = forbid_network(&mut mock).await;

    let server = server_for(&mock);
    let result = call(&server, "listFeatures", json!({"chainId": "dogecoin"})).await;

    assert!(result.is_error);
    assert!(text(&result).contains("chain 'dogecoin' is not supported"));
    for guard in guards {
        guard.assert_async().await;
    }
}

#[tokio::test]
async fn test_list_features_for_supported_chain() {
    let mut mock = Server::new_async().await;
    let details = json!({"chain": {"id": "optimism", "ticker": "ETH", "decimals": 18}});
    let m = mock
        .mock("GET", "/api/chains/optimism")
        .with_status(200)
        .with_body(details.to_string())
        .expect(1)
        .create_async()
        .await;

    let server = server_for(&mock);
    let result = call(&server, "listFeatures", json!({"chainId": "optimism"})).await;

    m.assert_async().await;
    assert_eq!(serde_json::from_str::<Value>(text(&result)).unwrap(), details);
}

#[tokio::test]
async fn test_generic_post_with_invalid_json_makes_no_network_call() {
    let mut mock = Server::new_async().await;
    let guards = forbid_network(&mut mock).await;

    let server = server_for(&mock);
    let result = call(
        &server,
        "call-adamik-api",
        json!({"path": "/ethereum/transaction/encode", "method": "POST", "body": "{\"transaction\": "}),
    )
    .await;

    assert!(result.is_error);
    assert!(text(&result).starts_with("Error: invalid JSON"));
    for guard in guards {
        guard.assert_async().await;
    }
}

#[tokio::test]
async fn test_generic_post_forwards_parsed_body() {
    let mut mock = Server::new_async().await;
    let body = json!({"transaction": {"data": {"mode": "transfer", "amount": "1000"}}});
    let m = mock
        .mock("POST", "/api/ethereum/transaction/encode")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(body.clone()))
        .with_status(200)
        .with_body(r#"{"encoded":"0xf86c"}"#)
        .expect(1)
        .create_async()
        .await;

    let server = server_for(&mock);
    let result = call(
        &server,
        "call-adamik-api",
        json!({"path": "ethereum/transaction/encode", "method": "POST", "body": body.to_string()}),
    )
    .await;

    m.assert_async().await;
    let parsed: Value = serde_json::from_str(text(&result)).unwrap();
    assert_eq!(parsed["data"], json!({"encoded": "0xf86c"}));
    assert_eq!(parsed["presentation"]["style"], "default");
}

#[tokio::test]
async fn test_generic_get_adds_presentation_hints() {
    let mut mock = Server::new_async().await;
    let m = mock
        .mock("GET", "/api/ethereum/account/0x1/balances")
        .with_status(200)
        .with_body(r#"{"native":"42"}"#)
        .create_async()
        .await;

    let server = server_for(&mock);
    let result = call(
        &server,
        "call-adamik-api",
        json!({"path": "/ethereum/account/0x1/balances", "method": "GET"}),
    )
    .await;

    m.assert_async().await;
    let parsed: Value = serde_json::from_str(text(&result)).unwrap();
    assert_eq!(parsed["data"], json!({"native": "42"}));
    assert_eq!(parsed["presentation"]["style"], "tabular");
    assert_eq!(parsed["presentation"]["title"], "Wallet Balance");
}

#[tokio::test]
async fn test_generic_tool_rejects_unknown_method() {
    let mut mock = Server::new_async().await;
    let guards = forbid_network(&mut mock).await;

    let server = server_for(&mock);
    let result = call(
        &server,
        "call-adamik-api",
        json!({"path": "/chains", "method": "DELETE"}),
    )
    .await;

    assert!(result.is_error);
    assert!(text(&result).contains("'method' must be one of: GET, POST"));
    for guard in guards {
        guard.assert_async().await;
    }
}

#[tokio::test]
async fn test_api_specification_is_fetched_once() {
    let mut mock = Server::new_async().await;
    let spec = json!({"openapi": "3.1.0", "paths": {"/api/chains": {}}, "components": {}});
    let m = mock
        .mock("GET", "/openapi.json")
        .with_status(200)
        .with_body(spec.to_string())
        .expect(1)
        .create_async()
        .await;

    let server = server_for(&mock);
    let first = call(&server, "getApiSpecification", json!({})).await;
    let second = call(&server, "getApiSpecification", json!({"section": "paths"})).await;

    m.assert_async().await;
    assert_eq!(serde_json::from_str::<Value>(text(&first)).unwrap(), spec);
    assert_eq!(
        serde_json::from_str::<Value>(text(&second)).unwrap(),
        json!({"/api/chains": {}})
    );
    // pretty-printed output
    assert!(text(&first).contains("\n  \"openapi\""));
}

#[tokio::test]
async fn test_api_specification_refresh_fetches_again() {
    let mut mock = Server::new_async().await;
    let m = mock
        .mock("GET", "/openapi.json")
        .with_status(200)
        .with_body(r#"{"openapi":"3.1.0"}"#)
        .expect(2)
        .create_async()
        .await;

    let server = server_for(&mock);
    call(&server, "getApiSpecification", json!({})).await;
    let refreshed = call(&server, "getApiSpecification", json!({"refresh": true})).await;

    m.assert_async().await;
    assert!(!refreshed.is_error);
}

#[tokio::test]
async fn test_failed_specification_fetch_is_not_cached() {
    let mut mock = Server::new_async().await;
    let m = mock
        .mock("GET", "/openapi.json")
        .with_status(503)
        .with_body(r#"{"message":"maintenance"}"#)
        .expect(2)
        .create_async()
        .await;

    let server = server_for(&mock);
    let first = call(&server, "getApiSpecification", json!({})).await;
    let second = call(&server, "getApiSpecification", json!({})).await;

    m.assert_async().await;
    assert!(first.is_error && second.is_error);
    assert!(text(&first).contains("maintenance"));
    assert!(!server.state.spec_cache.is_populated().await);
}

#[tokio::test]
async fn test_documentation_is_fetched_from_api_root() {
    let mut mock = Server::new_async().await;
    let docs = json!({"name": "Adamik API", "docs": "https://docs.adamik.io"});
    let m = mock
        .mock("GET", "/api")
        .match_header("authorization", API_KEY)
        .with_status(200)
        .with_body(docs.to_string())
        .expect(2)
        .create_async()
        .await;

    let server = server_for(&mock);
    let first = call(&server, "get-adamik-documentation", json!({})).await;
    let second = call(&server, "get-adamik-documentation", json!({})).await;

    m.assert_async().await;
    assert_eq!(serde_json::from_str::<Value>(text(&first)).unwrap(), docs);
    assert_eq!(text(&first), text(&second));
}

#[tokio::test]
async fn test_account_history_forwards_cursor() {
    let mut mock = Server::new_async().await;
    let m = mock
        .mock("GET", "/api/ethereum/account/0x1/history")
        .match_query(Matcher::UrlEncoded("nextPage".into(), "abc".into()))
        .with_status(200)
        .with_body(r#"{"transactions":[],"pagination":{"nextPage":null}}"#)
        .expect(1)
        .create_async()
        .await;

    let server = server_for(&mock);
    let result = call(
        &server,
        "getAccountHistory",
        json!({"chainId": "ethereum", "accountId": "0x1", "nextPage": "abc"}),
    )
    .await;

    m.assert_async().await;
    assert!(!result.is_error);
}

#[tokio::test]
async fn test_upstream_error_keeps_status_and_message() {
    let mut mock = Server::new_async().await;
    let m = mock
        .mock("GET", "/api/ethereum/transaction/0xdead")
        .with_status(404)
        .with_body(r#"{"status":{"errors":[]},"message":"Transaction not found"}"#)
        .create_async()
        .await;

    let server = server_for(&mock);
    let result = call(
        &server,
        "getTransactionDetails",
        json!({"chainId": "ethereum", "transactionId": "0xdead"}),
    )
    .await;

    m.assert_async().await;
    assert!(result.is_error);
    assert_eq!(
        text(&result),
        "Error: Adamik API request failed with status 404: Transaction not found"
    );
}

#[tokio::test]
async fn test_upstream_error_without_message_field() {
    let mut mock = Server::new_async().await;
    let _m = mock
        .mock("GET", "/api/bitcoin/validators")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let server = server_for(&mock);
    let result = call(&server, "getChainValidators", json!({"chainId": "bitcoin"})).await;

    assert!(text(&result).contains("status 502"));
    assert!(text(&result).contains("Request failed with status code 502"));
}

#[tokio::test]
async fn test_encode_and_broadcast_forward_body() {
    let mut mock = Server::new_async().await;
    let intent = json!({"transaction": {"data": {"mode": "transfer", "senderAddress": "0x1", "recipientAddress": "0x2", "amount": "10"}}});
    let signed = json!({"transaction": {"data": {"mode": "transfer"}, "encoded": "0xf86c", "signature": "0xabc"}});
    let encode = mock
        .mock("POST", "/api/sepolia/transaction/encode")
        .match_body(Matcher::Json(intent.clone()))
        .with_status(200)
        .with_body(r#"{"transaction":{"encoded":"0xf86c"}}"#)
        .expect(1)
        .create_async()
        .await;
    let broadcast = mock
        .mock("POST", "/api/sepolia/transaction/broadcast")
        .match_body(Matcher::Json(signed.clone()))
        .with_status(200)
        .with_body(r#"{"hash":"0x123"}"#)
        .expect(1)
        .create_async()
        .await;

    let server = server_for(&mock);
    let encoded = call(
        &server,
        "encodeTransaction",
        json!({"chainId": "sepolia", "body": intent}),
    )
    .await;
    let sent = call(
        &server,
        "broadcastTransaction",
        json!({"chainId": "sepolia", "body": signed}),
    )
    .await;

    encode.assert_async().await;
    broadcast.assert_async().await;
    assert_eq!(text(&encoded), r#"{"transaction":{"encoded":"0xf86c"}}"#);
    assert_eq!(text(&sent), r#"{"hash":"0x123"}"#);
}

#[tokio::test]
async fn test_broadcast_requires_object_body() {
    let mut mock = Server::new_async().await;
    let guards = forbid_network(&mut mock).await;

    let server = server_for(&mock);
    let result = call(
        &server,
        "broadcastTransaction",
        json!({"chainId": "sepolia", "body": "0xf86c"}),
    )
    .await;

    assert!(result.is_error);
    assert!(text(&result).contains("'body' must be a JSON object"));
    for guard in guards {
        guard.assert_async().await;
    }
}

#[tokio::test]
async fn test_derive_address_posts_pubkey() {
    let mut mock = Server::new_async().await;
    let m = mock
        .mock("POST", "/api/ethereum/address/encode")
        .match_body(Matcher::Json(json!({"pubkey": "0x04abcd"})))
        .with_status(200)
        .with_body(r#"{"chainId":"ethereum","addresses":[{"type":"evm","address":"0x1"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let server = server_for(&mock);
    let result = call(
        &server,
        "deriveAddress",
        json!({"chainId": "ethereum", "pubkey": "0x04abcd"}),
    )
    .await;

    m.assert_async().await;
    assert!(!result.is_error);
}

#[tokio::test]
async fn test_token_details() {
    let mut mock = Server::new_async().await;
    let m = mock
        .mock("GET", "/api/ethereum/token/0xa0b8")
        .with_status(200)
        .with_body(r#"{"token":{"id":"0xa0b8","ticker":"USDC","decimals":"6"}}"#)
        .expect(1)
        .create_async()
        .await;

    let server = server_for(&mock);
    let result = call(
        &server,
        "getTokenDetails",
        json!({"chainId": "ethereum", "tokenId": "0xa0b8"}),
    )
    .await;

    m.assert_async().await;
    assert!(text(&result).contains("USDC"));
}

#[tokio::test]
async fn test_network_failure_is_reported_not_raised() {
    // nothing listens on the discard port
    let server = server_with_base("http://127.0.0.1:9/api".to_string());
    let result = call(
        &server,
        "getAccountState",
        json!({"chainId": "ethereum", "accountId": "0x1"}),
    )
    .await;

    assert!(result.is_error);
    assert!(text(&result).starts_with("Error: Adamik API request failed with status 500"));
}

#[tokio::test]
async fn test_every_tool_returns_a_result_when_upstream_is_down() {
    let server = server_with_base("http://127.0.0.1:9/api".to_string());
    let tools: Vec<_> = server
        .registry
        .definitions()
        .map(|t| (t.name, t.input_schema.to_json_schema()))
        .collect();

    for (name, schema) in tools {
        let mut args = serde_json::Map::new();
        for (param, spec) in schema["properties"].as_object().unwrap() {
            let value = match (param.as_str(), spec["type"].as_str()) {
                ("chainId", _) => json!("ethereum"),
                ("method", _) => json!("GET"),
                (_, Some("object")) => json!({}),
                (_, Some("boolean")) => json!(false),
                _ => json!("x"),
            };
            args.insert(param.clone(), value);
        }

        let result = call(&server, name, Value::Object(args)).await;
        assert_eq!(result.content.len(), 1, "tool {}", name);
    }
}
