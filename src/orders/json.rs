//! Plain-field JSON representation of orders.
//!
//! Decimals travel as numeric strings and byte strings as `0x` hex so nothing
//! passes through a float. Enum fields carry their numeric protocol tag.

use alloy_primitives::{hex, Address, B256};
use bigdecimal::BigDecimal;
use num::bigint::ToBigInt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::hash::hash_order;
use super::rounding::decimal_to_u256;
use crate::error::{Error, Result};
use crate::types::{
    EcSignature, FeeMethod, HowToCall, Order, OrderMetadata, SaleKind, Side, UnhashedOrder,
    WyvernAsset, WyvernSchemaName,
};
use crate::utils::{parse_decimal_field, parse_hex_bytes, parse_u256};

/// JSON form of an order's asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WyvernAssetJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

/// JSON form of an order's metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMetadataJson {
    pub asset: WyvernAssetJson,
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer_address: Option<String>,
}

/// JSON form of an order, hashed or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderJson {
    pub exchange: String,
    pub maker: String,
    pub taker: String,
    pub maker_relayer_fee: String,
    pub taker_relayer_fee: String,
    pub maker_protocol_fee: String,
    pub taker_protocol_fee: String,
    #[serde(default = "zero_string")]
    pub maker_referrer_fee: String,
    pub fee_recipient: String,
    pub fee_method: u8,
    pub side: u8,
    pub sale_kind: u8,
    pub target: String,
    pub how_to_call: u8,
    pub calldata: String,
    pub replacement_pattern: String,
    pub static_target: String,
    pub static_extradata: String,
    pub payment_token: String,
    #[serde(default = "one_string")]
    pub quantity: String,
    pub base_price: String,
    pub extra: String,
    pub listing_time: u64,
    pub expiration_time: u64,
    pub salt: String,
    #[serde(default)]
    pub waiting_for_best_counter_order: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_auction_reserve_price: Option<String>,
    pub metadata: OrderMetadataJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
}

fn zero_string() -> String {
    "0".to_string()
}

fn one_string() -> String {
    "1".to_string()
}

/// Whole numbers as plain digits, whatever exponent they were parsed with
fn decimal_string(value: &BigDecimal) -> String {
    match value.is_integer().then(|| value.to_bigint()).flatten() {
        Some(int) => int.to_string(),
        None => value.to_string(),
    }
}

fn hex_string(bytes: impl AsRef<[u8]>) -> String {
    hex::encode_prefixed(bytes)
}

fn parse_address(field: &str, value: &str) -> Result<Address> {
    let bytes = parse_hex_bytes(field, value)?;
    if bytes.len() != 20 {
        return Err(Error::malformed(
            field,
            format!("expected 20 bytes, got {}", bytes.len()),
        ));
    }
    Ok(Address::from_slice(&bytes))
}

fn parse_word(field: &str, value: &str) -> Result<B256> {
    let bytes = parse_hex_bytes(field, value)?;
    if bytes.len() != 32 {
        return Err(Error::malformed(
            field,
            format!("expected 32 bytes, got {}", bytes.len()),
        ));
    }
    Ok(B256::from_slice(&bytes))
}

fn asset_to_json(asset: &WyvernAsset) -> WyvernAssetJson {
    WyvernAssetJson {
        id: asset.id.clone(),
        address: hex_string(asset.address),
        quantity: asset.quantity.as_ref().map(decimal_string),
    }
}

fn metadata_to_json(metadata: &OrderMetadata) -> OrderMetadataJson {
    OrderMetadataJson {
        asset: asset_to_json(&metadata.asset),
        schema: metadata.schema.as_str().to_string(),
        referrer_address: metadata.referrer_address.map(hex_string),
    }
}

fn metadata_from_json(json: &OrderMetadataJson) -> Result<OrderMetadata> {
    Ok(OrderMetadata {
        asset: WyvernAsset {
            id: json.asset.id.clone(),
            address: parse_address("metadata.asset.address", &json.asset.address)?,
            quantity: json
                .asset
                .quantity
                .as_deref()
                .map(|q| parse_decimal_field("metadata.asset.quantity", q))
                .transpose()?,
        },
        schema: WyvernSchemaName::from_str(&json.schema)?,
        referrer_address: json
            .referrer_address
            .as_deref()
            .map(|a| parse_address("metadata.referrerAddress", a))
            .transpose()?,
    })
}

impl OrderJson {
    fn from_unhashed(order: &UnhashedOrder) -> Self {
        Self {
            exchange: hex_string(order.exchange),
            maker: hex_string(order.maker),
            taker: hex_string(order.taker),
            maker_relayer_fee: decimal_string(&order.maker_relayer_fee),
            taker_relayer_fee: decimal_string(&order.taker_relayer_fee),
            maker_protocol_fee: decimal_string(&order.maker_protocol_fee),
            taker_protocol_fee: decimal_string(&order.taker_protocol_fee),
            maker_referrer_fee: decimal_string(&order.maker_referrer_fee),
            fee_recipient: hex_string(order.fee_recipient),
            fee_method: order.fee_method.as_u8(),
            side: order.side.as_u8(),
            sale_kind: order.sale_kind.as_u8(),
            target: hex_string(order.target),
            how_to_call: order.how_to_call.as_u8(),
            calldata: hex_string(&order.calldata),
            replacement_pattern: hex_string(&order.replacement_pattern),
            static_target: hex_string(order.static_target),
            static_extradata: hex_string(&order.static_extradata),
            payment_token: hex_string(order.payment_token),
            quantity: decimal_string(&order.quantity),
            base_price: decimal_string(&order.base_price),
            extra: decimal_string(&order.extra),
            listing_time: order.listing_time,
            expiration_time: order.expiration_time,
            salt: order.salt.to_string(),
            waiting_for_best_counter_order: order.waiting_for_best_counter_order,
            english_auction_reserve_price: order
                .english_auction_reserve_price
                .as_ref()
                .map(decimal_string),
            metadata: metadata_to_json(&order.metadata),
            hash: None,
            v: None,
            r: None,
            s: None,
        }
    }

    /// Parse and validate the order fields, ignoring hash and signature
    pub fn to_unhashed(&self) -> Result<UnhashedOrder> {
        let decimal = |field: &str, value: &str| -> Result<BigDecimal> {
            let parsed = parse_decimal_field(field, value)?;
            if parsed < BigDecimal::from(0) {
                return Err(Error::malformed(field, "must not be negative"));
            }
            Ok(parsed)
        };
        // Fees and prices are uint256 on chain, so they must also hash
        let uint = |field: &str, value: &str| -> Result<BigDecimal> {
            let parsed = parse_decimal_field(field, value)?;
            decimal_to_u256(field, &parsed)?;
            Ok(parsed)
        };

        Ok(UnhashedOrder {
            exchange: parse_address("exchange", &self.exchange)?,
            maker: parse_address("maker", &self.maker)?,
            taker: parse_address("taker", &self.taker)?,
            maker_relayer_fee: uint("makerRelayerFee", &self.maker_relayer_fee)?,
            taker_relayer_fee: uint("takerRelayerFee", &self.taker_relayer_fee)?,
            maker_protocol_fee: uint("makerProtocolFee", &self.maker_protocol_fee)?,
            taker_protocol_fee: uint("takerProtocolFee", &self.taker_protocol_fee)?,
            maker_referrer_fee: uint("makerReferrerFee", &self.maker_referrer_fee)?,
            fee_recipient: parse_address("feeRecipient", &self.fee_recipient)?,
            fee_method: FeeMethod::try_from(self.fee_method)?,
            side: Side::try_from(self.side)?,
            sale_kind: SaleKind::try_from(self.sale_kind)?,
            target: parse_address("target", &self.target)?,
            how_to_call: HowToCall::try_from(self.how_to_call)?,
            calldata: parse_hex_bytes("calldata", &self.calldata)?,
            replacement_pattern: parse_hex_bytes("replacementPattern", &self.replacement_pattern)?,
            static_target: parse_address("staticTarget", &self.static_target)?,
            static_extradata: parse_hex_bytes("staticExtradata", &self.static_extradata)?,
            payment_token: parse_address("paymentToken", &self.payment_token)?,
            quantity: decimal("quantity", &self.quantity)?,
            base_price: uint("basePrice", &self.base_price)?,
            extra: uint("extra", &self.extra)?,
            listing_time: self.listing_time,
            expiration_time: self.expiration_time,
            salt: parse_u256("salt", &self.salt)?,
            waiting_for_best_counter_order: self.waiting_for_best_counter_order,
            english_auction_reserve_price: self
                .english_auction_reserve_price
                .as_deref()
                .map(|p| decimal("englishAuctionReservePrice", p))
                .transpose()?,
            metadata: metadata_from_json(&self.metadata)?,
        })
    }
}

/// Convert an order to JSON, hashing it if it has no hash yet
pub fn order_to_json(order: &UnhashedOrder) -> Result<OrderJson> {
    let mut json = OrderJson::from_unhashed(order);
    json.hash = Some(hex_string(hash_order(order)?));
    Ok(json)
}

/// Convert a hashed and signed order to JSON
pub fn signed_order_to_json(order: &Order) -> OrderJson {
    let mut json = OrderJson::from_unhashed(&order.order);
    json.hash = Some(hex_string(order.hash));
    json.v = Some(order.signature.v);
    json.r = Some(hex_string(order.signature.r));
    json.s = Some(hex_string(order.signature.s));
    json
}

/// Read an unhashed order from JSON, ignoring any hash or signature
pub fn unhashed_order_from_json(json: &OrderJson) -> Result<UnhashedOrder> {
    json.to_unhashed()
}

/// Read a hashed and signed order from JSON
///
/// The stored hash must match the hash of the fields.
pub fn order_from_json(json: &OrderJson) -> Result<Order> {
    let order = json.to_unhashed()?;

    let hash = json
        .hash
        .as_deref()
        .ok_or_else(|| Error::malformed("hash", "missing"))
        .and_then(|h| parse_word("hash", h))?;
    if hash != hash_order(&order)? {
        return Err(Error::malformed("hash", "does not match order fields"));
    }

    let v = json.v.ok_or_else(|| Error::malformed("v", "missing"))?;
    if v != 27 && v != 28 {
        return Err(Error::malformed("v", format!("expected 27 or 28, got {}", v)));
    }
    let r = json
        .r
        .as_deref()
        .ok_or_else(|| Error::malformed("r", "missing"))
        .and_then(|r| parse_word("r", r))?;
    let s = json
        .s
        .as_deref()
        .ok_or_else(|| Error::malformed("s", "missing"))
        .and_then(|s| parse_word("s", s))?;

    Ok(Order::new(order, hash, EcSignature { v, r, s }))
}

impl UnhashedOrder {
    /// Parse an unhashed order from a JSON string
    pub fn from_json_str(s: &str) -> Result<Self> {
        let json: OrderJson = serde_json::from_str(s)?;
        json.to_unhashed()
    }
}

impl Order {
    /// Parse a signed order from a JSON string
    pub fn from_json_str(s: &str) -> Result<Self> {
        let json: OrderJson = serde_json::from_str(s)?;
        order_from_json(&json)
    }

    /// Serialize to a JSON string
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&signed_order_to_json(self))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::test_utils::{sample_order, sample_signature};

    fn signed_sample() -> Order {
        let order = sample_order();
        let hash = hash_order(&order).unwrap();
        Order::new(order, hash, sample_signature())
    }

    #[test]
    fn test_json_round_trip() {
        let order = signed_sample();
        let json = signed_order_to_json(&order);
        let text = serde_json::to_string(&json).unwrap();

        let parsed: OrderJson = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json);
        let back = order_from_json(&parsed).unwrap();
        assert_eq!(back, order);
        assert_eq!(signed_order_to_json(&back), json);
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_decimals_are_strings_without_precision_loss() {
        let mut order = sample_order();
        // wider than 128 bits
        order.base_price = dec("123456789012345678901234567890123456789");
        order.extra = dec("1000000000000000000000000000001");
        order.quantity = dec("0.000000000000000001");
        let json = order_to_json(&order).unwrap();
        let value = serde_json::to_value(&json).unwrap();
        assert_eq!(value["basePrice"], "123456789012345678901234567890123456789");
        assert_eq!(value["extra"], "1000000000000000000000000000001");
        assert_eq!(value["salt"], order.salt.to_string());

        let back = unhashed_order_from_json(&json).unwrap();
        assert_eq!(back.base_price, order.base_price);
        assert_eq!(back.extra, order.extra);
        assert_eq!(back.quantity, order.quantity);
        assert_eq!(order_to_json(&back).unwrap(), json);
    }

    #[test]
    fn test_parsed_orders_serialize_back() {
        let mut json = order_to_json(&sample_order()).unwrap();
        json.base_price = "1e30".to_string();
        let order = json.to_unhashed().unwrap();
        let again = order_to_json(&order).unwrap();
        assert_eq!(again.base_price, "1000000000000000000000000000000");
        assert_eq!(unhashed_order_from_json(&again).unwrap(), order);
    }

    #[test]
    fn test_fractional_uint_fields_rejected() {
        for field in ["basePrice", "extra", "takerRelayerFee", "makerReferrerFee"] {
            let mut value =
                serde_json::to_value(order_to_json(&sample_order()).unwrap()).unwrap();
            value[field] = serde_json::Value::String("0.000000000000000001".to_string());
            let json: OrderJson = serde_json::from_value(value).unwrap();
            match json.to_unhashed() {
                Err(Error::MalformedOrderField { field: name, .. }) => assert_eq!(name, field),
                other => panic!("{} accepted: {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_bytes_are_prefixed_hex() {
        let order = sample_order();
        let json = order_to_json(&order).unwrap();
        assert_eq!(json.calldata, format!("0x{}", hex::encode(&order.calldata)));
        assert!(json.exchange.starts_with("0x"));
        assert_eq!(json.exchange, json.exchange.to_lowercase());
        assert_eq!(json.hash, Some(hex_string(hash_order(&order).unwrap())));
    }

    #[test]
    fn test_malformed_calldata() {
        let mut json = order_to_json(&sample_order()).unwrap();
        json.calldata = "0x123".to_string();
        match json.to_unhashed() {
            Err(Error::MalformedOrderField { field, .. }) => assert_eq!(field, "calldata"),
            other => panic!("unexpected result: {:?}", other),
        }

        json.calldata = "0x00".to_string();
        json.replacement_pattern = "0xgg".to_string();
        match json.to_unhashed() {
            Err(Error::MalformedOrderField { field, .. }) => {
                assert_eq!(field, "replacementPattern")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tags_rejected() {
        let mut json = order_to_json(&sample_order()).unwrap();
        json.sale_kind = 5;
        assert!(matches!(
            json.to_unhashed(),
            Err(Error::MalformedOrderField { .. })
        ));

        let mut json = order_to_json(&sample_order()).unwrap();
        json.metadata.schema = "ERC404".to_string();
        assert!(matches!(
            json.to_unhashed(),
            Err(Error::MalformedOrderField { .. })
        ));
    }

    #[test]
    fn test_hash_mismatch_rejected() {
        let mut json = signed_order_to_json(&signed_sample());
        json.salt = "1".to_string();
        match order_from_json(&json) {
            Err(Error::MalformedOrderField { field, .. }) => assert_eq!(field, "hash"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_signature_rejected() {
        let json = order_to_json(&sample_order()).unwrap();
        assert!(order_from_json(&json).is_err());
        assert!(unhashed_order_from_json(&json).is_ok());
    }

    #[test]
    fn test_from_json_str_defaults() {
        let mut value = serde_json::to_value(order_to_json(&sample_order()).unwrap()).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("quantity");
        obj.remove("makerReferrerFee");
        obj.remove("waitingForBestCounterOrder");
        let order = UnhashedOrder::from_json_str(&value.to_string()).unwrap();
        assert_eq!(order.quantity, BigDecimal::from(1));
        assert_eq!(order.maker_referrer_fee, BigDecimal::from(0));
        assert!(!order.waiting_for_best_counter_order);
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut json = order_to_json(&sample_order()).unwrap();
        json.base_price = "-5".to_string();
        assert!(json.to_unhashed().is_err());
    }
}
