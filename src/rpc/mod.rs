//! Node access.
//!
//! [`ChainRpc`] is the narrow capability the transaction submitter needs from
//! a node. [`HttpRpcClient`] implements it over JSON-RPC.

mod blocks;
mod http;

use alloy_primitives::{TxHash, U256};
use async_trait::async_trait;
use futures_util::Stream;
use std::pin::Pin;

use crate::error::Result;
use crate::types::{BlockHeader, TransactionCall, TransactionReceipt};

pub use http::HttpRpcClient;

/// Stream of newly produced blocks
pub type BlockStream = Pin<Box<dyn Stream<Item = Result<BlockHeader>> + Send>>;

/// What the library needs from a blockchain node
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Gas units the call would consume
    ///
    /// Fails with [`Error::EstimationReverted`](crate::Error::EstimationReverted)
    /// when the call would revert.
    async fn estimate_gas(&self, call: &TransactionCall) -> Result<u64>;

    /// The node's recommended gas price, in wei
    async fn gas_price(&self) -> Result<U256>;

    /// Submit a transaction from an account the node manages
    async fn send_transaction(&self, call: &TransactionCall) -> Result<TxHash>;

    /// Receipt of a mined transaction, `None` while pending
    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionReceipt>>;

    /// Headers of blocks produced from now on
    async fn subscribe_new_blocks(&self) -> Result<BlockStream>;
}
