//! HTTP client for the Adamik API.
//!
//! Every call goes through [`AdamikClient::call`], which attaches the fixed
//! headers, applies the configured timeout and folds every possible failure
//! into an [`ApiOutcome`]. Handlers never see a transport error directly.

use anyhow::{Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode,
};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::debug;

use crate::blockchain::models::{ApiOutcome, HttpMethod};
use crate::config::Config;

pub const USER_AGENT: &str = "Adamik MCP Server";

/// Status reported when no HTTP response was received at all.
const NO_RESPONSE_STATUS: u16 = 500;

#[derive(Clone)]
pub struct AdamikClient {
    http: Client,
    base_url: String,
}

impl AdamikClient {
    /// Create a client bound to the configured base URL and API key
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(config.api_key.expose_secret())
            .context("ADAMIK_API_KEY contains characters not allowed in an HTTP header")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins an endpoint path onto the base URL. No other validation is applied.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Perform one request against `<base_url>/<path>`.
    pub async fn call(&self, path: &str, method: HttpMethod, body: Option<&Value>) -> ApiOutcome {
        let url = self.endpoint_url(path);
        self.call_url(&url, method, body).await
    }

    /// GET helper
    pub async fn get(&self, path: &str) -> ApiOutcome {
        self.call(path, HttpMethod::Get, None).await
    }

    /// POST helper
    pub async fn post(&self, path: &str, body: &Value) -> ApiOutcome {
        self.call(path, HttpMethod::Post, Some(body)).await
    }

    /// Same as [`call`](Self::call) but with a fully-built URL, for documents
    /// that live outside the API prefix.
    pub async fn call_url(&self, url: &str, method: HttpMethod, body: Option<&Value>) -> ApiOutcome {
        debug!("Adamik API request: {} {}", method.as_str(), url);

        let mut request = match method {
            HttpMethod::Get => self.http.get(url),
            HttpMethod::Post => self.http.post(url),
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Adamik API request to {} failed: {}", url, e);
                return ApiOutcome::failed(NO_RESPONSE_STATUS, e.to_string());
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return ApiOutcome::failed(NO_RESPONSE_STATUS, e.to_string()),
        };
        debug!("Adamik API response: {} from {}", status.as_u16(), url);

        let payload = parse_body(&text);
        if status.is_success() {
            ApiOutcome::ok(status.as_u16(), payload)
        } else {
            ApiOutcome::failed(status.as_u16(), error_message(status, &payload))
        }
    }
}

// Empty bodies become null; non-JSON bodies are kept as a string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

// Prefer the upstream `message` field, fall back to a generic status line.
fn error_message(status: StatusCode, payload: &Value) -> String {
    payload
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()))
}
