use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
use serde::Serialize;

/// A call as handed to the node for estimation or submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
}

/// A transaction to send, with optional gas price and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    /// Resolved from the node when absent
    pub gas_price: Option<U256>,
    /// Defaults to zero
    pub value: Option<U256>,
    pub await_confirmation: bool,
}

impl RawTransaction {
    pub fn new(from: Address, to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            from,
            to,
            data: data.into(),
            gas_price: None,
            value: None,
            await_confirmation: false,
        }
    }

    pub fn with_gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn await_confirmation(mut self, await_confirmation: bool) -> Self {
        self.await_confirmation = await_confirmation;
        self
    }
}

/// Outcome recorded in a mined transaction's receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Failed,
}

/// Receipt fields the submitter cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub status: ReceiptStatus,
}

/// A new block announced by the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub number: u64,
    pub hash: Option<B256>,
    pub timestamp: Option<u64>,
}

/// Where a sent transaction currently stands
///
/// A transaction that has not been sent yet is just a [`RawTransaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Sent(TxHash),
    Mined(TxHash),
    Failed(TxHash),
}
