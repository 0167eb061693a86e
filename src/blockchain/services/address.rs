use serde_json::{json, Value};

use crate::blockchain::client::AdamikClient;
use crate::blockchain::models::DeriveAddressParams;
use crate::error::ToolError;

pub fn address_encode_path(chain_id: &str) -> String {
    format!("/{}/address/encode", chain_id)
}

/// Derives the chain address(es) for a public key.
pub async fn derive_address(
    client: &AdamikClient,
    params: &DeriveAddressParams,
) -> Result<Value, ToolError> {
    let body = json!({ "pubkey": params.pubkey });
    client
        .post(&address_encode_path(&params.chain_id), &body)
        .await
        .into_result()
}
