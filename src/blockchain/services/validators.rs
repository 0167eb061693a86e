use serde_json::Value;

use super::with_next_page;
use crate::blockchain::client::AdamikClient;
use crate::blockchain::models::ValidatorsParams;
use crate::error::ToolError;

pub fn validators_path(chain_id: &str, next_page: Option<&str>) -> String {
    with_next_page(format!("/{}/validators", chain_id), next_page)
}

/// One page of known validators for a chain.
pub async fn get_chain_validators(
    client: &AdamikClient,
    params: &ValidatorsParams,
) -> Result<Value, ToolError> {
    client
        .get(&validators_path(&params.chain_id, params.next_page.as_deref()))
        .await
        .into_result()
}
