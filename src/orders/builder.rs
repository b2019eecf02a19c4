use alloy_primitives::{Address, Bytes, U256};
use rand::Rng;
use bigdecimal::BigDecimal;
use tracing::debug;

use super::hash::hash_order;
use crate::config::{ExchangeConfig, NULL_ADDRESS};
use crate::error::{Error, Result};
use crate::signing::{personal_sign, PersonalSigner};
use crate::types::{
    FeeMethod, HowToCall, Order, OrderMetadata, SaleKind, Side, UnhashedOrder,
};
use crate::utils::unix_now;

/// Random 256-bit salt making otherwise identical orders hash differently
pub fn generate_salt() -> U256 {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    U256::from_be_bytes(bytes)
}

/// What the maker wants to trade; everything the exchange config does not decide
#[derive(Debug, Clone)]
pub struct OrderParams {
    pub side: Side,
    pub sale_kind: SaleKind,
    pub target: Address,
    pub calldata: Bytes,
    pub replacement_pattern: Bytes,
    pub base_price: BigDecimal,
    pub extra: BigDecimal,
    pub metadata: OrderMetadata,
    /// `None` lists the order now
    pub listing_time: Option<u64>,
    /// Zero means never
    pub expiration_time: u64,
    /// Zero address means any taker
    pub taker: Address,
    /// Zero address means the chain's native currency
    pub payment_token: Address,
    pub maker_relayer_fee: BigDecimal,
    pub taker_relayer_fee: BigDecimal,
    pub maker_referrer_fee: BigDecimal,
    pub how_to_call: HowToCall,
    pub static_target: Address,
    pub static_extradata: Bytes,
    pub quantity: BigDecimal,
    pub waiting_for_best_counter_order: bool,
    pub english_auction_reserve_price: Option<BigDecimal>,
}

impl OrderParams {
    /// Fixed-price order with no fees, open to any taker, paid in ether
    pub fn new(
        side: Side,
        target: Address,
        calldata: impl Into<Bytes>,
        replacement_pattern: impl Into<Bytes>,
        base_price: BigDecimal,
        metadata: OrderMetadata,
    ) -> Self {
        Self {
            side,
            sale_kind: SaleKind::FixedPrice,
            target,
            calldata: calldata.into(),
            replacement_pattern: replacement_pattern.into(),
            base_price,
            extra: BigDecimal::from(0),
            metadata,
            listing_time: None,
            expiration_time: 0,
            taker: NULL_ADDRESS,
            payment_token: NULL_ADDRESS,
            maker_relayer_fee: BigDecimal::from(0),
            taker_relayer_fee: BigDecimal::from(0),
            maker_referrer_fee: BigDecimal::from(0),
            how_to_call: HowToCall::Call,
            static_target: NULL_ADDRESS,
            static_extradata: Bytes::new(),
            quantity: BigDecimal::from(1),
            waiting_for_best_counter_order: false,
            english_auction_reserve_price: None,
        }
    }

    /// Turn the order into a Dutch auction moving by `extra` until `expiration_time`
    pub fn dutch_auction(mut self, extra: BigDecimal, expiration_time: u64) -> Self {
        self.sale_kind = SaleKind::DutchAuction;
        self.extra = extra;
        self.expiration_time = expiration_time;
        self
    }

    pub fn with_times(mut self, listing_time: u64, expiration_time: u64) -> Self {
        self.listing_time = Some(listing_time);
        self.expiration_time = expiration_time;
        self
    }

    pub fn with_fees(mut self, maker_relayer_fee: BigDecimal, taker_relayer_fee: BigDecimal) -> Self {
        self.maker_relayer_fee = maker_relayer_fee;
        self.taker_relayer_fee = taker_relayer_fee;
        self
    }

    pub fn with_taker(mut self, taker: Address) -> Self {
        self.taker = taker;
        self
    }

    pub fn with_payment_token(mut self, payment_token: Address) -> Self {
        self.payment_token = payment_token;
        self
    }
}

/// Builds and signs orders against one exchange deployment
pub struct OrderBuilder {
    signer: Box<dyn PersonalSigner>,
    config: ExchangeConfig,
}

impl OrderBuilder {
    /// Create a new OrderBuilder
    ///
    /// # Arguments
    /// * `signer` - Signs order hashes on behalf of makers
    /// * `config` - Exchange address, fee recipient and fee denominator
    pub fn new(signer: impl PersonalSigner + 'static, config: ExchangeConfig) -> Self {
        Self {
            signer: Box::new(signer),
            config,
        }
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Assemble an unhashed order for `maker` with a fresh salt
    pub fn build_order(&self, maker: Address, params: OrderParams) -> Result<UnhashedOrder> {
        let listing_time = params.listing_time.unwrap_or_else(unix_now);
        if params.expiration_time != 0 && params.expiration_time < listing_time {
            return Err(Error::malformed(
                "expirationTime",
                "expires before it is listed",
            ));
        }

        Ok(UnhashedOrder {
            exchange: self.config.exchange_address,
            maker,
            taker: params.taker,
            maker_relayer_fee: params.maker_relayer_fee,
            taker_relayer_fee: params.taker_relayer_fee,
            maker_protocol_fee: BigDecimal::from(0),
            taker_protocol_fee: BigDecimal::from(0),
            maker_referrer_fee: params.maker_referrer_fee,
            fee_recipient: self.config.fee_recipient,
            fee_method: FeeMethod::SplitFee,
            side: params.side,
            sale_kind: params.sale_kind,
            target: params.target,
            how_to_call: params.how_to_call,
            calldata: params.calldata,
            replacement_pattern: params.replacement_pattern,
            static_target: params.static_target,
            static_extradata: params.static_extradata,
            payment_token: params.payment_token,
            quantity: params.quantity,
            base_price: params.base_price,
            extra: params.extra,
            listing_time,
            expiration_time: params.expiration_time,
            salt: generate_salt(),
            waiting_for_best_counter_order: params.waiting_for_best_counter_order,
            english_auction_reserve_price: params.english_auction_reserve_price,
            metadata: params.metadata,
        })
    }

    /// Hash an order and have its maker sign the hash
    pub async fn sign_order(&self, order: UnhashedOrder) -> Result<Order> {
        let hash = hash_order(&order)?;
        debug!(%hash, maker = %order.maker, "signing order");
        let signature = personal_sign(self.signer.as_ref(), hash.as_slice(), order.maker).await?;
        Ok(Order::new(order, hash, signature))
    }

    /// Build, hash and sign an order in one step
    pub async fn create_order(&self, maker: Address, params: OrderParams) -> Result<Order> {
        let order = self.build_order(maker, params)?;
        self.sign_order(order).await
    }
}
