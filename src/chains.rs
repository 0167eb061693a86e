//! Chain allow-list.
//!
//! The full list of chains the Adamik API knows about is much larger; this is the
//! subset enabled for this deployment. `ADAMIK_SUPPORTED_CHAINS` replaces it.

use crate::error::ToolError;

/// Chains enabled when no override is configured.
pub const DEFAULT_CHAINS: &[&str] = &[
    "ethereum",
    "bitcoin",
    "babylon",
    "starknet",
    "aptos",
    "sepolia",
    "holesky",
    "optimism",
    "optimism-sepolia",
    "bnb",
];

/// Ordered, read-only set of chain identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainAllowList {
    chains: Vec<String>,
}

impl Default for ChainAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_CHAINS.iter().map(|c| c.to_string()))
    }
}

impl ChainAllowList {
    pub fn new<I: IntoIterator<Item = String>>(chains: I) -> Self {
        let mut list: Vec<String> = Vec::new();
        for chain in chains {
            if !list.contains(&chain) {
                list.push(chain);
            }
        }
        Self { chains: list }
    }

    /// Parses a comma-separated list, ignoring blanks and surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        Self::new(
            raw.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        )
    }

    pub fn contains(&self, chain_id: &str) -> bool {
        self.chains.iter().any(|c| c == chain_id)
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.chains
    }

    /// Fails with `UnsupportedChain` when `chain_id` is not enabled.
    pub fn ensure_supported(&self, chain_id: &str) -> Result<(), ToolError> {
        if self.contains(chain_id) {
            Ok(())
        } else {
            Err(ToolError::UnsupportedChain {
                chain_id: chain_id.to_string(),
                supported: self.chains.join(", "),
            })
        }
    }

    /// Comma-joined form returned by `getSupportedChains`.
    pub fn joined(&self) -> String {
        self.chains.join(",")
    }
}
