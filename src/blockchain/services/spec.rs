//! Self-description of the Adamik API: the OpenAPI document, fetched once and
//! kept for the process lifetime, and the root document of the API prefix.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::info;
use url::Url;

use crate::blockchain::client::AdamikClient;
use crate::blockchain::models::HttpMethod;
use crate::error::ToolError;

/// Single-entry cache for the OpenAPI document.
///
/// Only an explicit refresh replaces a cached document. The lock is held
/// across the fetch so concurrent callers never trigger a second request.
#[derive(Clone, Default)]
pub struct SpecCache {
    inner: Arc<Mutex<Option<Value>>>,
}

impl SpecCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_populated(&self) -> bool {
        self.inner.lock().await.is_some()
    }
}

/// `https://api.adamik.io/api` -> `https://api.adamik.io/openapi.json`
pub fn openapi_url(base_url: &str) -> Result<String, ToolError> {
    let mut url = Url::parse(base_url).map_err(|e| {
        ToolError::Internal(format!("invalid API base URL '{}': {}", base_url, e))
    })?;
    let path = url.path().trim_end_matches('/');
    let root = path.strip_suffix("/api").unwrap_or(path).to_string();
    url.set_path(&format!("{}/openapi.json", root));
    Ok(url.to_string())
}

/// Returns the top-level `section` of `spec`, or the whole document when the
/// section is not given, missing or null.
pub fn select_section(spec: &Value, section: Option<&str>) -> Value {
    match section.and_then(|name| spec.get(name)) {
        Some(found) if !found.is_null() => found.clone(),
        _ => spec.clone(),
    }
}

pub async fn get_api_specification(
    client: &AdamikClient,
    cache: &SpecCache,
    section: Option<&str>,
    refresh: bool,
) -> Result<Value, ToolError> {
    let mut cached = cache.inner.lock().await;

    if cached.is_none() || refresh {
        let url = openapi_url(client.base_url())?;
        info!("Fetching Adamik API specification from {}", url);
        let spec = client
            .call_url(&url, HttpMethod::Get, None)
            .await
            .into_result()?;
        *cached = Some(spec);
    }

    let spec = cached
        .as_ref()
        .ok_or_else(|| ToolError::Internal("API specification cache is empty".into()))?;
    Ok(select_section(spec, section))
}

/// Root document of the API prefix, fetched fresh on every call.
pub async fn get_documentation(client: &AdamikClient) -> Result<Value, ToolError> {
    client
        .call_url(client.base_url(), HttpMethod::Get, None)
        .await
        .into_result()
}
