// src/config.rs

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use validator::Validate;

use crate::chains::ChainAllowList;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PORT: u16 = 8080;

// A struct to hold all configuration, loaded once at startup from the environment / .env file.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the Adamik API, e.g. `https://api.adamik.io/api`
    pub api_base_url: String,
    /// Raw API key sent in the `Authorization` header
    pub api_key: SecretString,
    /// Reserved for a future signing tool; no tool reads it today
    pub starknet_private_key: Option<SecretString>,
    /// Per-request timeout applied by the API client
    pub request_timeout: Duration,
    /// Chains accepted by chain-scoped tools that check the allow-list
    pub supported_chains: ChainAllowList,

    // Server settings (HTTP mode only)
    pub port: u16,
}

// Required settings, checked with `validator` before they are wrapped in secrets.
#[derive(Debug, Validate)]
struct RequiredSettings {
    #[validate(url)]
    api_base_url: String,
    #[validate(length(min = 1))]
    api_key: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = RequiredSettings {
            api_base_url: lookup("ADAMIK_API_BASE_URL")
                .context("ADAMIK_API_BASE_URL must be set")?
                .trim()
                .trim_end_matches('/')
                .to_string(),
            api_key: lookup("ADAMIK_API_KEY")
                .context("ADAMIK_API_KEY must be set")?
                .trim()
                .to_string(),
        };
        required.validate().map_err(|errors| {
            anyhow!("Configuration validation failed: {}", errors)
        })?;

        let request_timeout = match lookup("ADAMIK_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .context("ADAMIK_REQUEST_TIMEOUT_SECS must be a valid number")?,
            ),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let supported_chains = match lookup("ADAMIK_SUPPORTED_CHAINS") {
            Some(raw) => {
                let list = ChainAllowList::parse(&raw);
                if list.is_empty() {
                    return Err(anyhow!(
                        "ADAMIK_SUPPORTED_CHAINS must name at least one chain"
                    ));
                }
                list
            }
            None => ChainAllowList::default(),
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().context("PORT must be a valid number")?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            api_base_url: required.api_base_url,
            api_key: SecretString::new(required.api_key),
            starknet_private_key: lookup("STARKNET_PRIVATE_KEY")
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::new),
            request_timeout,
            supported_chains,
            port,
        })
    }

    /// Returns the list of configured chain IDs
    pub fn supported_chains(&self) -> &[String] {
        self.supported_chains.as_slice()
    }

    /// Checks if a chain ID is supported
    pub fn is_chain_supported(&self, chain_id: &str) -> bool {
        self.supported_chains.contains(chain_id)
    }
}
