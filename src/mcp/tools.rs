//! # Tool table
//!
//! Every tool the server exposes, built once at startup by [`build_registry`].
//!
//! ### Chain information
//! - `readMeFirst` - usage guidance for the agent
//! - `getSupportedChains` - chains enabled on this deployment
//! - `listFeatures` - chain details, features and native currency decimals
//! - `getTokenDetails` - non-native token metadata
//! - `getChainValidators` - known validators (paginated)
//!
//! ### Accounts
//! - `deriveAddress` - address from a public key
//! - `getAccountState` - balances and staking positions
//! - `getAccountHistory` - transaction history (paginated)
//!
//! ### Transactions
//! - `getTransactionDetails`, `encodeTransaction`, `broadcastTransaction`
//!
//! ### Reference
//! - `getApiSpecification` - cached OpenAPI document
//! - `get-adamik-documentation` - root document of the API
//! - `call-adamik-api` - any endpoint, with presentation hints

use futures::FutureExt;
use serde_json::Value;

use crate::blockchain::models::{
    AccountHistoryParams, AccountParams, ApiSpecificationParams, CallApiParams, ChainParams,
    DeriveAddressParams, TokenDetailsParams, TransactionBodyParams, TransactionParams,
    ValidatorsParams,
};
use crate::blockchain::services::{
    account, address, chains, generic, spec, token, transaction, validators,
};
use crate::error::{RegistryError, ToolError};
use crate::mcp::registry::{
    InputSchema, ParamKind, ParamSpec, ToolDefinition, ToolOutput, ToolRegistry,
};
use crate::utils::parse_args;
use crate::AppState;

const CHAIN_ID: ParamSpec = ParamSpec::required(
    "chainId",
    ParamKind::String,
    "Adamik chain identifier, e.g. 'ethereum', 'bitcoin', 'optimism'",
);
const NEXT_PAGE: ParamSpec = ParamSpec::optional(
    "nextPage",
    ParamKind::String,
    "Pagination cursor returned by the previous page; omit for the first page",
);

const README_TEXT: &str = "\
This MCP server lets an agent read data from and prepare transactions for more than 60 blockchain \
networks through the Adamik API. Read operations work on their own. Anything that needs a wallet \
or a signature (connecting a wallet, signing, submitting) needs a separate signer server; this \
server never holds keys.

## TOOL CATEGORIES

OPERATIONAL TOOLS (current data and actions):
- getSupportedChains, listFeatures: chain capabilities
- getAccountState, getAccountHistory: account data
- getTokenDetails, getChainValidators: network information
- deriveAddress: address generation
- encodeTransaction, broadcastTransaction: transaction lifecycle
- getTransactionDetails: transaction status

SPECIFICATION TOOL (exact API contract):
- getApiSpecification: schemas, formats and validation rules

Use the operational tools for live data. Use getApiSpecification to look up correct formats or \
to troubleshoot an error.

## DECIMALS

Every balance is returned in the chain's SMALLEST UNIT (wei, satoshi, ...), never as a \
human-readable amount.

Native currency:
1. listFeatures(chainId) gives the native currency decimals
2. getAccountState(chainId, accountId) gives the raw balances
3. human_readable = raw_amount / 10^decimals
Example: an Optimism balance of '5354656887913579' with 18 decimals is 0.0054 ETH.

Tokens:
1. getAccountState(chainId, accountId) gives raw token balances and token IDs
2. getTokenDetails(chainId, tokenId) gives the decimals of EACH token
3. human_readable = raw_amount / 10^token_decimals
Example: a USDC balance of '2245100' with 6 decimals is 2.2451 USDC.

## ADDRESSES

Most account operations need an address. Use one the user provided (0x... for EVM chains, \
bc1... for Bitcoin) or obtain one from a signer server. If neither is available, ask the user \
for an address.";

/// Builds the full tool table. Fails only if two tools share a name.
pub fn build_registry() -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    for tool in tool_definitions() {
        registry.register(tool)?;
    }
    Ok(registry)
}

fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "readMeFirst",
            description: "Explains how the tools of this server fit together. Call it before using any other tool.",
            input_schema: InputSchema::empty(),
            handler: |state, args| read_me_first(state, args).boxed(),
        },
        ToolDefinition {
            name: "getSupportedChains",
            description: "Get the list of chain IDs enabled on this server",
            input_schema: InputSchema::empty(),
            handler: |state, args| get_supported_chains(state, args).boxed(),
        },
        ToolDefinition {
            name: "listFeatures",
            description: "Get chain details: supported features (read, write, token, validators) and native currency information (ticker, decimals, chain name)",
            input_schema: InputSchema::new(vec![CHAIN_ID]),
            handler: |state, args| list_features(state, args).boxed(),
        },
        ToolDefinition {
            name: "getTokenDetails",
            description: "Get metadata of a non-native token (ERC-20, TRC-20, SPL, ...). Its 'decimals' field converts raw token amounts from getAccountState into human-readable values: raw_amount / 10^decimals",
            input_schema: InputSchema::new(vec![
                CHAIN_ID,
                ParamSpec::required("tokenId", ParamKind::String, "Token identifier, usually the contract address"),
            ]),
            handler: |state, args| get_token_details(state, args).boxed(),
        },
        ToolDefinition {
            name: "deriveAddress",
            description: "Derive a blockchain address for a given chain from a public key",
            input_schema: InputSchema::new(vec![
                CHAIN_ID,
                ParamSpec::required("pubkey", ParamKind::String, "Hex-encoded public key"),
            ]),
            handler: |state, args| derive_address(state, args).boxed(),
        },
        ToolDefinition {
            name: "getAccountState",
            description: "Get the state of an account (balances and staking positions). Amounts are in smallest units: use listFeatures for native decimals and getTokenDetails for token decimals",
            input_schema: InputSchema::new(vec![
                CHAIN_ID,
                ParamSpec::required("accountId", ParamKind::String, "Account address"),
            ]),
            handler: |state, args| get_account_state(state, args).boxed(),
        },
        ToolDefinition {
            name: "getAccountHistory",
            description: "Get the transaction history for an account",
            input_schema: InputSchema::new(vec![
                CHAIN_ID,
                ParamSpec::required("accountId", ParamKind::String, "Account address"),
                NEXT_PAGE,
            ]),
            handler: |state, args| get_account_history(state, args).boxed(),
        },
        ToolDefinition {
            name: "getChainValidators",
            description: "Get the list of known validators for a chain. Mostly useful when the user has to pick a validator to delegate to",
            input_schema: InputSchema::new(vec![CHAIN_ID, NEXT_PAGE]),
            handler: |state, args| get_chain_validators(state, args).boxed(),
        },
        ToolDefinition {
            name: "getTransactionDetails",
            description: "Get information about a transaction",
            input_schema: InputSchema::new(vec![
                CHAIN_ID,
                ParamSpec::required("transactionId", ParamKind::String, "Transaction hash or identifier"),
            ]),
            handler: |state, args| get_transaction_details(state, args).boxed(),
        },
        ToolDefinition {
            name: "encodeTransaction",
            description: "Turn a transaction intent in Adamik JSON format into an encoded transaction for the given chain, ready to sign. For staking on babylon, stakeId is mandatory and amount optional; otherwise amount is mandatory and stakeId omitted",
            input_schema: InputSchema::new(vec![
                CHAIN_ID,
                ParamSpec::required("body", ParamKind::Object, "Transaction intent, e.g. {\"transaction\": {\"data\": {\"mode\": \"transfer\", ...}}}"),
            ]),
            handler: |state, args| encode_transaction(state, args).boxed(),
        },
        ToolDefinition {
            name: "broadcastTransaction",
            description: "Broadcast a signed transaction. Signing has to happen elsewhere, usually in a dedicated key-management server",
            input_schema: InputSchema::new(vec![
                CHAIN_ID,
                ParamSpec::required("body", ParamKind::Object, "Encoded transaction together with its signature"),
            ]),
            handler: |state, args| broadcast_transaction(state, args).boxed(),
        },
        ToolDefinition {
            name: "getApiSpecification",
            description: "Get the OpenAPI specification of the Adamik API: request/response schemas for every transaction type, chain families and features, parameter formats, encoding formats, account state schemas, error patterns and pagination. Use it when exact API contract details are needed",
            input_schema: InputSchema::new(vec![
                ParamSpec::optional("section", ParamKind::String, "Top-level section such as 'paths' or 'components'. Returns the full specification when omitted"),
                ParamSpec::optional("refresh", ParamKind::Boolean, "Fetch the specification again instead of using the cached copy"),
            ]),
            handler: |state, args| get_api_specification(state, args).boxed(),
        },
        ToolDefinition {
            name: "get-adamik-documentation",
            description: "Get the Adamik documentation served at the root of the API",
            input_schema: InputSchema::empty(),
            handler: |state, args| get_adamik_documentation(state, args).boxed(),
        },
        ToolDefinition {
            name: "call-adamik-api",
            description: "Call one of the endpoints of the Adamik API. The response includes the data and presentation hints for rendering it",
            input_schema: InputSchema::new(vec![
                ParamSpec::required("path", ParamKind::String, "The path of the endpoint to call"),
                ParamSpec::required("method", ParamKind::Enum(&["GET", "POST"]), "The HTTP method to use"),
                ParamSpec::optional("body", ParamKind::String, "JSON request body for POST requests"),
            ]),
            handler: |state, args| call_adamik_api(state, args).boxed(),
        },
    ]
}

// --- Handlers ---

async fn read_me_first(_state: AppState, _args: Value) -> Result<ToolOutput, ToolError> {
    Ok(ToolOutput::Text(README_TEXT.to_string()))
}

async fn get_supported_chains(state: AppState, _args: Value) -> Result<ToolOutput, ToolError> {
    Ok(ToolOutput::Text(state.config.supported_chains.joined()))
}

async fn list_features(state: AppState, args: Value) -> Result<ToolOutput, ToolError> {
    let params: ChainParams = parse_args(args)?;
    let details = chains::list_features(
        &state.api_client,
        &state.config.supported_chains,
        &params.chain_id,
    )
    .await?;
    Ok(ToolOutput::Json(details))
}

async fn get_token_details(state: AppState, args: Value) -> Result<ToolOutput, ToolError> {
    let params: TokenDetailsParams = parse_args(args)?;
    Ok(ToolOutput::Json(
        token::get_token_details(&state.api_client, &params).await?,
    ))
}

async fn derive_address(state: AppState, args: Value) -> Result<ToolOutput, ToolError> {
    let params: DeriveAddressParams = parse_args(args)?;
    Ok(ToolOutput::Json(
        address::derive_address(&state.api_client, &params).await?,
    ))
}

async fn get_account_state(state: AppState, args: Value) -> Result<ToolOutput, ToolError> {
    let params: AccountParams = parse_args(args)?;
    Ok(ToolOutput::Json(
        account::get_account_state(&state.api_client, &params).await?,
    ))
}

async fn get_account_history(state: AppState, args: Value) -> Result<ToolOutput, ToolError> {
    let params: AccountHistoryParams = parse_args(args)?;
    Ok(ToolOutput::Json(
        account::get_account_history(&state.api_client, &params).await?,
    ))
}

async fn get_chain_validators(state: AppState, args: Value) -> Result<ToolOutput, ToolError> {
    let params: ValidatorsParams = parse_args(args)?;
    Ok(ToolOutput::Json(
        validators::get_chain_validators(&state.api_client, &params).await?,
    ))
}

async fn get_transaction_details(state: AppState, args: Value) -> Result<ToolOutput, ToolError> {
    let params: TransactionParams = parse_args(args)?;
    Ok(ToolOutput::Json(
        transaction::get_transaction_details(&state.api_client, &params).await?,
    ))
}

async fn encode_transaction(state: AppState, args: Value) -> Result<ToolOutput, ToolError> {
    let params: TransactionBodyParams = parse_args(args)?;
    Ok(ToolOutput::Json(
        transaction::encode_transaction(&state.api_client, &params).await?,
    ))
}

async fn broadcast_transaction(state: AppState, args: Value) -> Result<ToolOutput, ToolError> {
    let params: TransactionBodyParams = parse_args(args)?;
    Ok(ToolOutput::Json(
        transaction::broadcast_transaction(&state.api_client, &params).await?,
    ))
}

async fn get_api_specification(state: AppState, args: Value) -> Result<ToolOutput, ToolError> {
    let params: ApiSpecificationParams = parse_args(args)?;
    let document = spec::get_api_specification(
        &state.api_client,
        &state.spec_cache,
        params.section.as_deref(),
        params.refresh.unwrap_or(false),
    )
    .await?;
    Ok(ToolOutput::PrettyJson(document))
}

async fn get_adamik_documentation(state: AppState, _args: Value) -> Result<ToolOutput, ToolError> {
    Ok(ToolOutput::Json(spec::get_documentation(&state.api_client).await?))
}

async fn call_adamik_api(state: AppState, args: Value) -> Result<ToolOutput, ToolError> {
    let params: CallApiParams = parse_args(args)?;
    let annotated = generic::call_api(&state.api_client, &params).await?;
    let value = serde_json::to_value(annotated).map_err(|e| ToolError::Internal(e.to_string()))?;
    Ok(ToolOutput::Json(value))
}
