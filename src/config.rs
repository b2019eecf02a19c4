//! Exchange and node configuration.
//!
//! Everything that used to be a process-wide constant (exchange address, fee
//! recipient, basis-point denominator) lives in [`ExchangeConfig`] and is
//! handed to the components that need it.

use alloy_primitives::{address, Address, B256, U256};
use bigdecimal::BigDecimal;
use std::time::Duration;

use crate::error::{Error, Result};

/// The zero address, used for "any taker" and "no static target"
pub const NULL_ADDRESS: Address = Address::ZERO;

/// The zero block hash
pub const NULL_BLOCK_HASH: B256 = B256::ZERO;

/// Largest uint256 value
pub const MAX_UINT_256: U256 = U256::MAX;

/// Fees are expressed in basis points of this denominator
pub const INVERSE_BASIS_POINT: u32 = 10_000;

/// Default fee recipient for orders built by this library
pub const DEFAULT_FEE_RECIPIENT: Address = address!("5b3256965e7c3cf26e11fcaf296dfc8807c01073");

/// Wyvern exchange deployment on Ethereum mainnet
pub const WYVERN_EXCHANGE_ADDRESS_MAINNET: Address =
    address!("7be8076f4ea4a4ad08075c2508e481d6c946d12b");

/// Wyvern exchange deployment on Rinkeby
pub const WYVERN_EXCHANGE_ADDRESS_RINKEBY: Address =
    address!("5206e78b21ce315ce284fb24cf05e0585a93b1d9");

/// Networks with a known exchange deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Main,
    Rinkeby,
}

impl Network {
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Main => 1,
            Network::Rinkeby => 4,
        }
    }

    pub fn exchange_address(&self) -> Address {
        match self {
            Network::Main => WYVERN_EXCHANGE_ADDRESS_MAINNET,
            Network::Rinkeby => WYVERN_EXCHANGE_ADDRESS_RINKEBY,
        }
    }
}

/// Immutable exchange parameters injected into builders and price helpers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    pub chain_id: u64,
    pub exchange_address: Address,
    pub fee_recipient: Address,
    pub inverse_basis_point: u32,
}

impl ExchangeConfig {
    /// Configuration for a known network
    pub fn for_network(network: Network) -> Self {
        Self {
            chain_id: network.chain_id(),
            exchange_address: network.exchange_address(),
            fee_recipient: DEFAULT_FEE_RECIPIENT,
            inverse_basis_point: INVERSE_BASIS_POINT,
        }
    }

    pub fn mainnet() -> Self {
        Self::for_network(Network::Main)
    }

    pub fn rinkeby() -> Self {
        Self::for_network(Network::Rinkeby)
    }

    /// Configuration for a custom deployment
    pub fn custom(chain_id: u64, exchange_address: Address) -> Self {
        Self {
            chain_id,
            exchange_address,
            fee_recipient: DEFAULT_FEE_RECIPIENT,
            inverse_basis_point: INVERSE_BASIS_POINT,
        }
    }

    pub fn with_fee_recipient(mut self, fee_recipient: Address) -> Self {
        self.fee_recipient = fee_recipient;
        self
    }

    pub fn with_inverse_basis_point(mut self, inverse_basis_point: u32) -> Result<Self> {
        if inverse_basis_point == 0 {
            return Err(Error::Config(
                "inverse basis point must be non-zero".to_string(),
            ));
        }
        self.inverse_basis_point = inverse_basis_point;
        Ok(self)
    }

    /// Basis-point denominator as a decimal
    pub fn basis_point_denominator(&self) -> BigDecimal {
        BigDecimal::from(self.inverse_basis_point)
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

/// Node connection settings for [`HttpRpcClient`](crate::rpc::HttpRpcClient)
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// JSON-RPC endpoint
    pub http_url: String,
    /// Optional WebSocket endpoint used for `newHeads` subscriptions
    pub ws_url: Option<String>,
    /// How often to poll for the latest block when no WebSocket is configured
    pub poll_interval: Duration,
    /// Per-request timeout for HTTP calls
    pub request_timeout: Duration,
}

impl RpcConfig {
    pub fn new(http_url: impl Into<String>) -> Self {
        Self {
            http_url: http_url.into(),
            ws_url: None,
            poll_interval: Duration::from_secs(4),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_ws_url(mut self, ws_url: impl Into<String>) -> Self {
        self.ws_url = Some(ws_url.into());
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::new("http://localhost:8545")
    }
}
