//! Canonical order hashing.
//!
//! The exchange contract identifies an order by the keccak-256 of its fields
//! packed the way Solidity's `abi.encodePacked` lays them out: addresses as 20
//! bytes, uint256 as 32 big-endian bytes, enums as a single byte and byte
//! strings verbatim. Signers sign the EIP-191 personal-message hash of that
//! digest, which is what the contract's `ecrecover` check expects.

use alloy_primitives::{eip191_hash_message, keccak256, Address, B256, U256};
use bigdecimal::BigDecimal;

use super::rounding::decimal_to_u256;
use crate::error::Result;
use crate::types::UnhashedOrder;

/// Packed field writer mirroring the contract's hashing layout
struct PackedEncoder {
    buf: Vec<u8>,
}

impl PackedEncoder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    fn address(&mut self, value: &Address) -> &mut Self {
        self.buf.extend_from_slice(value.as_slice());
        self
    }

    fn uint256(&mut self, value: U256) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes::<32>());
        self
    }

    fn decimal(&mut self, field: &str, value: &BigDecimal) -> Result<&mut Self> {
        Ok(self.uint256(decimal_to_u256(field, value)?))
    }

    fn uint8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(value);
        self
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Packed encoding of every hashed field, in contract order
pub fn encode_order(order: &UnhashedOrder) -> Result<Vec<u8>> {
    // 7 addresses, 9 words, 4 tags and the three byte strings
    let capacity = 7 * 20
        + 9 * 32
        + 4
        + order.calldata.len()
        + order.replacement_pattern.len()
        + order.static_extradata.len();
    let mut enc = PackedEncoder::with_capacity(capacity);

    enc.address(&order.exchange)
        .address(&order.maker)
        .address(&order.taker);
    enc.decimal("makerRelayerFee", &order.maker_relayer_fee)?
        .decimal("takerRelayerFee", &order.taker_relayer_fee)?
        .decimal("makerProtocolFee", &order.maker_protocol_fee)?
        .decimal("takerProtocolFee", &order.taker_protocol_fee)?;
    enc.address(&order.fee_recipient)
        .uint8(order.fee_method.as_u8())
        .uint8(order.side.as_u8())
        .uint8(order.sale_kind.as_u8())
        .address(&order.target)
        .uint8(order.how_to_call.as_u8())
        .bytes(&order.calldata)
        .bytes(&order.replacement_pattern)
        .address(&order.static_target)
        .bytes(&order.static_extradata)
        .address(&order.payment_token);
    enc.decimal("basePrice", &order.base_price)?
        .decimal("extra", &order.extra)?
        .uint256(U256::from(order.listing_time))
        .uint256(U256::from(order.expiration_time))
        .uint256(order.salt);

    Ok(enc.finish())
}

/// Content hash of an order, its on-chain identity
pub fn hash_order(order: &UnhashedOrder) -> Result<B256> {
    Ok(keccak256(encode_order(order)?))
}

/// Wrap a hash with the `"\x19Ethereum Signed Message:\n32"` prefix and hash again
pub fn personal_message_hash(hash: &B256) -> B256 {
    eip191_hash_message(hash)
}

/// The digest a signer's personal signature actually covers
pub fn hash_to_sign(order: &UnhashedOrder) -> Result<B256> {
    Ok(personal_message_hash(&hash_order(order)?))
}

/// The plain (unprefixed) order hash
///
/// Kept separate from [`hash_to_sign`] on purpose: the order's identity is the
/// unprefixed hash, and only signatures use the prefixed one.
pub fn get_order_hash(order: &UnhashedOrder) -> Result<B256> {
    hash_order(order)
}
