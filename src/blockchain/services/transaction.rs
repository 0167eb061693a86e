//! Transaction lookup and the encode / broadcast lifecycle.
//!
//! Payloads are forwarded as-is: nothing is validated, signed or simulated here.

use serde_json::Value;
use tracing::info;

use crate::blockchain::client::AdamikClient;
use crate::blockchain::models::{TransactionBodyParams, TransactionParams};
use crate::error::ToolError;

pub fn transaction_details_path(chain_id: &str, transaction_id: &str) -> String {
    format!("/{}/transaction/{}", chain_id, transaction_id)
}

pub fn encode_path(chain_id: &str) -> String {
    format!("/{}/transaction/encode", chain_id)
}

pub fn broadcast_path(chain_id: &str) -> String {
    format!("/{}/transaction/broadcast", chain_id)
}

pub async fn get_transaction_details(
    client: &AdamikClient,
    params: &TransactionParams,
) -> Result<Value, ToolError> {
    client
        .get(&transaction_details_path(&params.chain_id, &params.transaction_id))
        .await
        .into_result()
}

/// Turns a transaction intent into an encoded, ready-to-sign transaction.
pub async fn encode_transaction(
    client: &AdamikClient,
    params: &TransactionBodyParams,
) -> Result<Value, ToolError> {
    info!("Encoding transaction on {}", params.chain_id);
    client
        .post(&encode_path(&params.chain_id), &params.body)
        .await
        .into_result()
}

/// Submits an already signed transaction.
pub async fn broadcast_transaction(
    client: &AdamikClient,
    params: &TransactionBodyParams,
) -> Result<Value, ToolError> {
    info!("Broadcasting transaction on {}", params.chain_id);
    client
        .post(&broadcast_path(&params.chain_id), &params.body)
        .await
        .into_result()
}
