//! # wyvern-rs
//!
//! A Rust client library for preparing, signing, pricing and submitting orders
//! on the Wyvern exchange protocol.
//!
//! This library provides:
//! - Canonical order hashing (the order's on-chain identity) and the
//!   personal-message hash signers sign
//! - Current-price estimation for fixed-price and Dutch-auction orders
//! - Personal-message signing through a pluggable signer
//! - Transaction submission with optional confirmation tracking
//! - Lossless order JSON (decimals as strings, bytes as `0x` hex)
//!
//! ## Features
//!
//! - **Decimal Precision**: Prices are arbitrary-precision decimals covering the full uint256 range
//! - **Closed Enums**: Sides, sale kinds and schemas are exhaustive; unknown tags are rejected
//! - **Pluggable Collaborators**: Node access and signing sit behind [`ChainRpc`] and [`PersonalSigner`]
//! - **Proper Error Handling**: No panics, every failure is a typed [`Error`]
//!
//! ## Example
//!
//! ```no_run
//! use wyvern_rs::orders::{estimate_current_price, OrderBuilder, OrderParams};
//! use wyvern_rs::{ExchangeConfig, LocalSigner, OrderMetadata, PrivateKeySigner, Side};
//! use wyvern_rs::{WyvernAsset, WyvernSchemaName};
//! use bigdecimal::BigDecimal;
//!
//! # async fn run() -> wyvern_rs::Result<()> {
//! let key = PrivateKeySigner::random();
//! let maker = key.address();
//! let builder = OrderBuilder::new(LocalSigner::new(key), ExchangeConfig::mainnet());
//!
//! let token = "0x06012c8cf97bead5deae237070f9587f8e7a266d".parse().unwrap();
//! let metadata = OrderMetadata {
//!     asset: WyvernAsset::new(WyvernSchemaName::Erc721, "1", token, None),
//!     schema: WyvernSchemaName::Erc721,
//!     referrer_address: None,
//! };
//! let params = OrderParams::new(
//!     Side::Sell,
//!     token,
//!     vec![0x23, 0xb8, 0x72, 0xdd],
//!     vec![0x00, 0x00, 0x00, 0x00],
//!     BigDecimal::from(1_000_000_000_000_000_000u64),
//!     metadata,
//! );
//! let order = builder.create_order(maker, params).await?;
//! let price = estimate_current_price(&order, None, true)?;
//! println!("{} costs {} wei", order.hash, price);
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod client;
pub mod config;
pub mod error;
pub mod orders;
pub mod rpc;
pub mod signing;
pub mod types;

// Internal modules
mod utils;

// Re-export commonly used types
pub use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
pub use alloy_signer_local::PrivateKeySigner;
pub use bigdecimal::BigDecimal;
pub use config::{ExchangeConfig, Network, RpcConfig};
pub use error::{Error, Result};
pub use types::{
    EcSignature, FeeMethod, HowToCall, Order, OrderMetadata, RawTransaction, SaleKind, Side,
    UnhashedOrder, WyvernAsset, WyvernSchemaName,
};
pub use utils::make_decimal;

// Re-export clients
pub use client::{PendingTransaction, TransactionSubmitter};
pub use rpc::{ChainRpc, HttpRpcClient};

// Re-export order builder
pub use orders::OrderBuilder;

// Re-export signer trait
pub use signing::{LocalSigner, PersonalSigner};
