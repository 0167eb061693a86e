use serde_json::Value;

use super::with_next_page;
use crate::blockchain::client::AdamikClient;
use crate::blockchain::models::{AccountHistoryParams, AccountParams};
use crate::error::ToolError;

pub fn account_state_path(chain_id: &str, account_id: &str) -> String {
    format!("/{}/account/{}/state", chain_id, account_id)
}

pub fn account_history_path(chain_id: &str, account_id: &str, next_page: Option<&str>) -> String {
    with_next_page(
        format!("/{}/account/{}/history", chain_id, account_id),
        next_page,
    )
}

/// Balances (native + tokens, in smallest units) and staking positions.
pub async fn get_account_state(
    client: &AdamikClient,
    params: &AccountParams,
) -> Result<Value, ToolError> {
    client
        .get(&account_state_path(&params.chain_id, &params.account_id))
        .await
        .into_result()
}

/// One page of transaction history. The cursor is opaque and owned by the API.
pub async fn get_account_history(
    client: &AdamikClient,
    params: &AccountHistoryParams,
) -> Result<Value, ToolError> {
    let path = account_history_path(
        &params.chain_id,
        &params.account_id,
        params.next_page.as_deref(),
    );
    client.get(&path).await.into_result()
}
