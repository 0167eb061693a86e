use serde_json::Value;
use tracing::info;

use crate::blockchain::client::AdamikClient;
use crate::chains::ChainAllowList;
use crate::error::ToolError;

pub fn chain_details_path(chain_id: &str) -> String {
    format!("/chains/{}", chain_id)
}

/// Fetches chain details (features, native currency ticker and decimals).
///
/// The chain must be in the allow-list; otherwise no request is made.
pub async fn list_features(
    client: &AdamikClient,
    allow_list: &ChainAllowList,
    chain_id: &str,
) -> Result<Value, ToolError> {
    allow_list.ensure_supported(chain_id)?;
    info!("Fetching chain details for {}", chain_id);
    client.get(&chain_details_path(chain_id)).await.into_result()
}
