use serde_json::Value;

use crate::blockchain::client::AdamikClient;
use crate::blockchain::models::TokenDetailsParams;
use crate::error::ToolError;

pub fn token_details_path(chain_id: &str, token_id: &str) -> String {
    format!("/{}/token/{}", chain_id, token_id)
}

/// Metadata (name, ticker, decimals) of a non-native token.
pub async fn get_token_details(
    client: &AdamikClient,
    params: &TokenDetailsParams,
) -> Result<Value, ToolError> {
    client
        .get(&token_details_path(&params.chain_id, &params.token_id))
        .await
        .into_result()
}
