use alloy_primitives::{Address, Bytes, TxHash, U256};
use futures_util::StreamExt;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::rpc::ChainRpc;
use crate::types::{
    RawTransaction, ReceiptStatus, SubmissionState, TransactionCall, TransactionReceipt,
};

/// Sends transactions through a [`ChainRpc`] and tracks them to confirmation
///
/// Nothing is retried: a transaction is not safe to resubmit without the
/// caller deciding about nonces, so every node failure is returned as is.
pub struct TransactionSubmitter<C> {
    rpc: C,
}

impl<C: ChainRpc> TransactionSubmitter<C> {
    /// Create a new TransactionSubmitter
    ///
    /// # Arguments
    /// * `rpc` - The node connection
    pub fn new(rpc: C) -> Self {
        Self { rpc }
    }

    pub fn rpc(&self) -> &C {
        &self.rpc
    }

    /// Estimate gas usage for a call
    ///
    /// # Arguments
    /// * `from` - Address sending the transaction
    /// * `to` - Destination contract address
    /// * `data` - Call data
    /// * `value` - Wei sent along with the call
    pub async fn estimate_gas(
        &self,
        from: Option<Address>,
        to: Option<Address>,
        data: Option<Bytes>,
        value: Option<U256>,
    ) -> Result<u64> {
        let call = TransactionCall {
            from,
            to,
            data,
            value,
            ..Default::default()
        };
        self.rpc.estimate_gas(&call).await
    }

    /// The node's current gas price, in wei
    pub async fn get_current_gas_price(&self) -> Result<U256> {
        self.rpc.gas_price().await
    }

    /// Send a transaction and hand back a handle to track it
    ///
    /// An omitted gas price is taken from the node and the gas limit is
    /// estimated before sending. Confirmation is not awaited here, whatever
    /// `tx.await_confirmation` says.
    pub async fn submit(&self, tx: RawTransaction) -> Result<PendingTransaction<'_, C>> {
        debug!(from = %tx.from, to = %tx.to, "submitting transaction");

        let gas_price = match tx.gas_price {
            Some(price) => price,
            None => self.get_current_gas_price().await?,
        };
        let value = tx.value.unwrap_or(U256::ZERO);
        let gas = self
            .estimate_gas(Some(tx.from), Some(tx.to), Some(tx.data.clone()), Some(value))
            .await?;

        let call = TransactionCall {
            from: Some(tx.from),
            to: Some(tx.to),
            data: Some(tx.data),
            value: Some(value),
            gas: Some(U256::from(gas)),
            gas_price: Some(gas_price),
        };
        let tx_hash = self.rpc.send_transaction(&call).await?;
        info!(%tx_hash, gas, %gas_price, "transaction sent");

        Ok(PendingTransaction {
            submitter: self,
            tx_hash,
            state: SubmissionState::Sent(tx_hash),
        })
    }

    /// Send a transaction, optionally waiting until it is mined
    ///
    /// With `await_confirmation` set this only returns once the node reports
    /// the transaction mined. There is no built-in timeout; wrap the call in
    /// `tokio::time::timeout` to bound it. Use [`submit`](Self::submit) to keep
    /// hold of the hash if the wait may be abandoned.
    ///
    /// # Errors
    ///
    /// [`Error::ConfirmationFailed`] if the transaction was mined but reverted.
    pub async fn send_raw_transaction(&self, tx: RawTransaction) -> Result<TxHash> {
        let await_confirmation = tx.await_confirmation;
        let mut pending = self.submit(tx).await?;
        if await_confirmation {
            pending.confirm().await?;
        }
        Ok(pending.tx_hash())
    }

    /// Wait until `tx_hash` is mined
    pub async fn confirm_transaction(&self, tx_hash: TxHash) -> Result<TransactionReceipt> {
        // Subscribe before the first receipt check so no block slips between them
        let mut blocks = self.rpc.subscribe_new_blocks().await?;

        if let Some(receipt) = self.rpc.transaction_receipt(tx_hash).await? {
            return check_receipt(tx_hash, receipt);
        }

        while let Some(header) = blocks.next().await {
            let header = header?;
            debug!(%tx_hash, block = header.number, "checking receipt");
            if let Some(receipt) = self.rpc.transaction_receipt(tx_hash).await? {
                return check_receipt(tx_hash, receipt);
            }
        }

        Err(Error::ChainUnreachable(format!(
            "block subscription ended before {} was mined",
            tx_hash
        )))
    }
}

fn check_receipt(tx_hash: TxHash, receipt: TransactionReceipt) -> Result<TransactionReceipt> {
    match receipt.status {
        ReceiptStatus::Success => {
            info!(%tx_hash, block = ?receipt.block_number, "transaction mined");
            Ok(receipt)
        }
        ReceiptStatus::Failed => {
            warn!(%tx_hash, block = ?receipt.block_number, "transaction reverted");
            Err(Error::ConfirmationFailed {
                tx_hash,
                reason: "transaction reverted".to_string(),
            })
        }
    }
}

/// A sent transaction whose outcome may still be unknown
///
/// Dropping this (or a future awaiting [`confirm`](Self::confirm)) does not
/// retract anything from the chain.
pub struct PendingTransaction<'a, C> {
    submitter: &'a TransactionSubmitter<C>,
    tx_hash: TxHash,
    state: SubmissionState,
}

impl<C: ChainRpc> PendingTransaction<'_, C> {
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Wait until the transaction is mined
    pub async fn confirm(&mut self) -> Result<TransactionReceipt> {
        match self.submitter.confirm_transaction(self.tx_hash).await {
            Ok(receipt) => {
                self.state = SubmissionState::Mined(self.tx_hash);
                Ok(receipt)
            }
            Err(e @ Error::ConfirmationFailed { .. }) => {
                self.state = SubmissionState::Failed(self.tx_hash);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::BlockStream;
    use crate::types::BlockHeader;
    use alloy_primitives::B256;
    use async_trait::async_trait;
    use futures_util::stream;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    const GAS_PRICE: u64 = 42_000_000_000;
    const GAS: u64 = 21_000;

    #[derive(Default)]
    struct FakeChain {
        sent: Mutex<Vec<TransactionCall>>,
        gas_price_calls: Mutex<u32>,
        receipts: Mutex<VecDeque<Option<ReceiptStatus>>>,
        revert_estimation: bool,
        blocks: Option<u64>,
    }

    impl FakeChain {
        fn with_receipts(receipts: Vec<Option<ReceiptStatus>>) -> Self {
            Self {
                receipts: Mutex::new(receipts.into()),
                blocks: Some(10),
                ..Default::default()
            }
        }
    }

    fn tx_hash() -> TxHash {
        B256::repeat_byte(0xaa)
    }

    #[async_trait]
    impl ChainRpc for FakeChain {
        async fn estimate_gas(&self, _call: &TransactionCall) -> Result<u64> {
            if self.revert_estimation {
                return Err(Error::EstimationReverted {
                    reason: Some("Order expired".to_string()),
                });
            }
            Ok(GAS)
        }

        async fn gas_price(&self) -> Result<U256> {
            *self.gas_price_calls.lock().unwrap() += 1;
            Ok(U256::from(GAS_PRICE))
        }

        async fn send_transaction(&self, call: &TransactionCall) -> Result<TxHash> {
            self.sent.lock().unwrap().push(call.clone());
            Ok(tx_hash())
        }

        async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionReceipt>> {
            let next = self.receipts.lock().unwrap().pop_front().flatten();
            Ok(next.map(|status| TransactionReceipt {
                transaction_hash: tx_hash,
                block_number: Some(1),
                status,
            }))
        }

        async fn subscribe_new_blocks(&self) -> Result<BlockStream> {
            match self.blocks {
                Some(count) => Ok(Box::pin(stream::iter((1..=count).map(|number| {
                    Ok(BlockHeader {
                        number,
                        hash: None,
                        timestamp: None,
                    })
                })))),
                None => Ok(Box::pin(stream::pending())),
            }
        }
    }

    fn raw_tx() -> RawTransaction {
        RawTransaction::new(
            Address::repeat_byte(0x11),
            Address::repeat_byte(0x22),
            vec![0xab, 0x00, 0x01],
        )
    }

    #[tokio::test]
    async fn test_gas_price_resolved_before_sending() {
        let submitter = TransactionSubmitter::new(FakeChain::with_receipts(vec![]));
        let hash = submitter.send_raw_transaction(raw_tx()).await.unwrap();
        assert_ne!(hash, TxHash::ZERO);

        let sent = submitter.rpc().sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].gas_price, Some(U256::from(GAS_PRICE)));
        assert_eq!(sent[0].gas, Some(U256::from(GAS)));
        assert_eq!(sent[0].value, Some(U256::ZERO));
        assert_eq!(*submitter.rpc().gas_price_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_explicit_gas_price_is_kept() {
        let submitter = TransactionSubmitter::new(FakeChain::with_receipts(vec![]));
        let tx = raw_tx()
            .with_gas_price(U256::from(7))
            .with_value(U256::from(1_000));
        submitter.send_raw_transaction(tx).await.unwrap();

        let sent = submitter.rpc().sent.lock().unwrap().clone();
        assert_eq!(sent[0].gas_price, Some(U256::from(7)));
        assert_eq!(sent[0].value, Some(U256::from(1_000)));
        assert_eq!(*submitter.rpc().gas_price_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_waits_for_confirmation() {
        // pending on the first check and two blocks, then mined
        let chain = FakeChain::with_receipts(vec![None, None, None, Some(ReceiptStatus::Success)]);
        let submitter = TransactionSubmitter::new(chain);
        let hash = submitter
            .send_raw_transaction(raw_tx().await_confirmation(true))
            .await
            .unwrap();
        assert_eq!(hash, tx_hash());
        assert!(submitter.rpc().receipts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reverted_transaction_keeps_hash() {
        let chain = FakeChain::with_receipts(vec![None, Some(ReceiptStatus::Failed)]);
        let submitter = TransactionSubmitter::new(chain);

        let mut pending = submitter.submit(raw_tx()).await.unwrap();
        assert_eq!(pending.state(), SubmissionState::Sent(tx_hash()));

        match pending.confirm().await {
            Err(Error::ConfirmationFailed { tx_hash: hash, .. }) => assert_eq!(hash, tx_hash()),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(pending.state(), SubmissionState::Failed(tx_hash()));
    }

    #[tokio::test]
    async fn test_mined_state() {
        let chain = FakeChain::with_receipts(vec![Some(ReceiptStatus::Success)]);
        let submitter = TransactionSubmitter::new(chain);
        let mut pending = submitter.submit(raw_tx()).await.unwrap();
        let receipt = pending.confirm().await.unwrap();
        assert_eq!(receipt.transaction_hash, tx_hash());
        assert_eq!(pending.state(), SubmissionState::Mined(tx_hash()));
    }

    #[tokio::test]
    async fn test_estimation_revert_stops_submission() {
        let chain = FakeChain {
            revert_estimation: true,
            ..Default::default()
        };
        let submitter = TransactionSubmitter::new(chain);
        let result = submitter.send_raw_transaction(raw_tx()).await;
        assert!(matches!(result, Err(Error::EstimationReverted { .. })));
        assert!(submitter.rpc().sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_ending_is_reported() {
        let submitter = TransactionSubmitter::new(FakeChain::with_receipts(vec![]));
        let result = submitter.confirm_transaction(tx_hash()).await;
        assert!(matches!(result, Err(Error::ChainUnreachable(_))));
    }

    #[tokio::test]
    async fn test_state_only_moves_on_a_receipt() {
        // the block stream ends before any receipt shows up
        let submitter = TransactionSubmitter::new(FakeChain::with_receipts(vec![None]));
        let mut pending = submitter.submit(raw_tx()).await.unwrap();
        assert_eq!(pending.state(), SubmissionState::Sent(tx_hash()));

        assert!(matches!(
            pending.confirm().await,
            Err(Error::ChainUnreachable(_))
        ));
        assert_eq!(pending.state(), SubmissionState::Sent(tx_hash()));
    }

    #[tokio::test]
    async fn test_caller_imposed_timeout() {
        // no blocks ever arrive
        let submitter = TransactionSubmitter::new(FakeChain::default());
        let mut pending = submitter.submit(raw_tx()).await.unwrap();

        let waited = tokio::time::timeout(Duration::from_millis(20), pending.confirm()).await;
        assert!(waited.is_err());
        // outcome unknown, hash still available for follow-up
        assert_eq!(pending.tx_hash(), tx_hash());
        assert_eq!(pending.state(), SubmissionState::Sent(tx_hash()));
    }
}
