use alloy_primitives::{Address, Bytes, B256, U256};
use bigdecimal::BigDecimal;
use std::ops::Deref;

use super::enums::{FeeMethod, HowToCall, SaleKind, Side, WyvernSchemaName};

/// The asset an order trades
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WyvernAsset {
    /// Token id, absent for fungible assets
    pub id: Option<String>,
    /// Token contract address
    pub address: Address,
    /// Amount, for fungible and semi-fungible assets
    pub quantity: Option<BigDecimal>,
}

impl WyvernAsset {
    /// Build the asset representation a schema expects
    ///
    /// Fungible schemas drop the token id and carry a quantity instead.
    pub fn new(
        schema: WyvernSchemaName,
        token_id: impl Into<String>,
        token_address: Address,
        quantity: Option<BigDecimal>,
    ) -> Self {
        if schema.is_fungible() {
            Self {
                id: None,
                address: token_address,
                quantity: Some(quantity.unwrap_or_else(|| BigDecimal::from(1))),
            }
        } else {
            Self {
                id: Some(token_id.into()),
                address: token_address,
                quantity,
            }
        }
    }
}

/// Off-chain metadata attached to an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMetadata {
    pub asset: WyvernAsset,
    pub schema: WyvernSchemaName,
    pub referrer_address: Option<Address>,
}

/// An order before its identity (hash) and signature are assigned
///
/// Callers should keep `expiration_time` either zero or no earlier than
/// `listing_time`; this is not checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnhashedOrder {
    pub exchange: Address,
    pub maker: Address,
    pub taker: Address,
    pub maker_relayer_fee: BigDecimal,
    pub taker_relayer_fee: BigDecimal,
    pub maker_protocol_fee: BigDecimal,
    pub taker_protocol_fee: BigDecimal,
    pub maker_referrer_fee: BigDecimal,
    pub fee_recipient: Address,
    pub fee_method: FeeMethod,
    pub side: Side,
    pub sale_kind: SaleKind,
    pub target: Address,
    pub how_to_call: HowToCall,
    pub calldata: Bytes,
    pub replacement_pattern: Bytes,
    pub static_target: Address,
    pub static_extradata: Bytes,
    pub payment_token: Address,
    pub quantity: BigDecimal,
    /// Price in the payment token's smallest unit
    pub base_price: BigDecimal,
    /// Total price movement of a Dutch auction
    pub extra: BigDecimal,
    pub listing_time: u64,
    /// Zero means the order never expires
    pub expiration_time: u64,
    pub salt: U256,
    pub waiting_for_best_counter_order: bool,
    pub english_auction_reserve_price: Option<BigDecimal>,
    pub metadata: OrderMetadata,
}

/// ECDSA signature in the form the exchange contract recovers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcSignature {
    /// Recovery id, always 27 or 28
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

/// A hashed and signed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub order: UnhashedOrder,
    pub hash: B256,
    pub signature: EcSignature,
}

impl Order {
    pub fn new(order: UnhashedOrder, hash: B256, signature: EcSignature) -> Self {
        Self {
            order,
            hash,
            signature,
        }
    }

    pub fn into_unhashed(self) -> UnhashedOrder {
        self.order
    }
}

impl Deref for Order {
    type Target = UnhashedOrder;

    fn deref(&self) -> &UnhashedOrder {
        &self.order
    }
}

impl AsRef<UnhashedOrder> for Order {
    fn as_ref(&self) -> &UnhashedOrder {
        &self.order
    }
}

impl AsRef<UnhashedOrder> for UnhashedOrder {
    fn as_ref(&self) -> &UnhashedOrder {
        self
    }
}
