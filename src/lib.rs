// src/lib.rs

use std::sync::Arc;

use anyhow::Result;

pub mod api;
pub mod blockchain;
pub mod chains;
pub mod config;
pub mod error;
pub mod mcp;
pub mod utils;

use blockchain::{client::AdamikClient, services::spec::SpecCache};
use config::Config;
use mcp::registry::ToolRegistry;

/// Application state handed to every tool handler
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, read-only after startup
    pub config: Arc<Config>,
    /// Client for the Adamik API
    pub api_client: AdamikClient,
    /// Cached OpenAPI document of the Adamik API
    pub spec_cache: SpecCache,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let api_client = AdamikClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            api_client,
            spec_cache: SpecCache::new(),
        })
    }
}

/// Tool table plus state: everything a transport needs to serve requests.
#[derive(Clone)]
pub struct McpServer {
    pub registry: Arc<ToolRegistry>,
    pub state: AppState,
}

impl McpServer {
    pub fn new(config: Config) -> Result<Self> {
        let registry = mcp::tools::build_registry()?;
        Ok(Self {
            registry: Arc::new(registry),
            state: AppState::new(config)?,
        })
    }
}
