use alloy_primitives::{hex, TxHash, B256, U256};
use alloy_sol_types::{Revert, SolError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::blocks::{poll_new_blocks, subscribe_new_heads};
use super::{BlockStream, ChainRpc};
use crate::config::RpcConfig;
use crate::error::{Error, Result};
use crate::types::{
    deserialize_quantity, deserialize_quantity_u64, BlockHeader, ReceiptStatus, TransactionCall,
    TransactionReceipt,
};

/// JSON-RPC error code nodes use for reverted calls
const EXECUTION_REVERTED: i64 = 3;

/// JSON-RPC "internal error", used for results this client cannot accept
const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptDto {
    transaction_hash: TxHash,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    block_number: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    status: Option<u64>,
}

impl From<ReceiptDto> for TransactionReceipt {
    fn from(dto: ReceiptDto) -> Self {
        // Receipts from before Byzantium carry no status
        let status = match dto.status {
            Some(0) => ReceiptStatus::Failed,
            _ => ReceiptStatus::Success,
        };
        Self {
            transaction_hash: dto.transaction_hash,
            block_number: dto.block_number,
            status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct HeaderDto {
    #[serde(deserialize_with = "deserialize_quantity_u64")]
    number: u64,
    #[serde(default)]
    hash: Option<B256>,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    timestamp: Option<u64>,
}

impl From<HeaderDto> for BlockHeader {
    fn from(dto: HeaderDto) -> Self {
        Self {
            number: dto.number,
            hash: dto.hash,
            timestamp: dto.timestamp,
        }
    }
}

/// Pull a readable revert reason out of a JSON-RPC error
fn revert_reason(error: &JsonRpcError) -> Option<String> {
    let decoded = error
        .data
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|data| hex::decode(data).ok())
        .and_then(|bytes| Revert::abi_decode(&bytes, true).ok())
        .map(|revert| revert.reason);
    decoded.or_else(|| {
        error
            .message
            .strip_prefix("execution reverted")
            .map(|rest| rest.trim_start_matches(':').trim().to_string())
            .filter(|rest| !rest.is_empty())
    })
}

fn is_revert(error: &JsonRpcError) -> bool {
    error.code == EXECUTION_REVERTED || error.message.to_lowercase().contains("revert")
}

/// [`ChainRpc`] over JSON-RPC 2.0 on HTTP
///
/// New blocks come from a WebSocket `newHeads` subscription when
/// [`RpcConfig::ws_url`] is set, and from polling the latest block otherwise.
#[derive(Debug, Clone)]
pub struct HttpRpcClient {
    http: reqwest::Client,
    config: RpcConfig,
    next_id: Arc<AtomicU64>,
}

impl HttpRpcClient {
    /// Create a new HttpRpcClient
    ///
    /// # Arguments
    /// * `config` - Endpoints, poll interval and request timeout
    pub fn new(config: RpcConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            http,
            config,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Send one request; a JSON-RPC error object comes back as the inner `Err`
    async fn send(
        &self,
        method: &str,
        params: Value,
    ) -> Result<std::result::Result<Value, JsonRpcError>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "rpc request");

        let response: JsonRpcResponse = self
            .http
            .post(&self.config.http_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match (response.error, response.result) {
            (Some(error), _) => Ok(Err(error)),
            (None, result) => Ok(Ok(result.unwrap_or(Value::Null))),
        }
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        match self.send(method, params).await? {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(error) => {
                warn!(method, code = error.code, message = %error.message, "rpc error");
                Err(Error::Rpc {
                    code: error.code,
                    message: error.message,
                })
            }
        }
    }

    /// Header of the most recent block
    pub async fn latest_block(&self) -> Result<BlockHeader> {
        let header: HeaderDto = self
            .request("eth_getBlockByNumber", json!(["latest", false]))
            .await?;
        Ok(header.into())
    }
}

#[async_trait]
impl ChainRpc for HttpRpcClient {
    async fn estimate_gas(&self, call: &TransactionCall) -> Result<u64> {
        match self.send("eth_estimateGas", json!([call])).await? {
            Ok(value) => {
                let gas: U256 = serde_json::from_value(value)?;
                u64::try_from(gas).map_err(|_| Error::Rpc {
                    code: INTERNAL_ERROR,
                    message: format!("gas estimate {} does not fit in 64 bits", gas),
                })
            }
            Err(error) if is_revert(&error) => {
                let reason = revert_reason(&error);
                warn!(?reason, "gas estimation reverted");
                Err(Error::EstimationReverted { reason })
            }
            Err(error) => Err(Error::Rpc {
                code: error.code,
                message: error.message,
            }),
        }
    }

    async fn gas_price(&self) -> Result<U256> {
        self.request("eth_gasPrice", json!([])).await
    }

    async fn send_transaction(&self, call: &TransactionCall) -> Result<TxHash> {
        self.request("eth_sendTransaction", json!([call])).await
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionReceipt>> {
        let receipt: Option<ReceiptDto> = self
            .request("eth_getTransactionReceipt", json!([tx_hash]))
            .await?;
        Ok(receipt.map(TransactionReceipt::from))
    }

    async fn subscribe_new_blocks(&self) -> Result<BlockStream> {
        match &self.config.ws_url {
            Some(ws_url) => subscribe_new_heads(ws_url).await,
            None => Ok(poll_new_blocks(self.clone(), self.config.poll_interval)),
        }
    }
}
