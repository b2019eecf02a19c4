use alloy_primitives::{hex, Bytes, U256};
use bigdecimal::BigDecimal;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::orders::u256_to_decimal;

/// Build an arbitrary-precision decimal from a number or numeric string
///
/// The value is always parsed from its string form, so `0.1_f64` becomes
/// exactly `0.1`. Scientific notation (`1e18`) and node-style hex quantities
/// up to 256 bits (`0x1a`, with a bare `0x` read as zero) are accepted.
///
/// # Example
///
/// ```
/// use wyvern_rs::make_decimal;
/// use bigdecimal::BigDecimal;
///
/// assert_eq!(make_decimal("1e18").unwrap(), BigDecimal::from(1_000_000_000_000_000_000u64));
/// assert_eq!(make_decimal(0.1).unwrap().to_string(), "0.1");
/// assert!(make_decimal("ten").is_err());
/// ```
pub fn make_decimal(arg: impl Display) -> Result<BigDecimal> {
    let raw = arg.to_string();
    let text = raw.trim();
    let invalid = || Error::InvalidNumberFormat(raw.clone());

    if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if digits.is_empty() {
            return Ok(BigDecimal::from(0));
        }
        let value = U256::from_str_radix(digits, 16).map_err(|_| invalid())?;
        return Ok(u256_to_decimal(value));
    }

    BigDecimal::from_str(text).map_err(|_| invalid())
}

/// Parse a `0x`-prefixed hex string into bytes, naming the field on failure
pub(crate) fn parse_hex_bytes(field: &str, value: &str) -> Result<Bytes> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| Error::malformed(field, "missing 0x prefix"))?;
    if digits.len() % 2 != 0 {
        return Err(Error::malformed(field, "odd hex length"));
    }
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| Error::malformed(field, e.to_string()))
}

/// Parse a uint256 from a decimal or `0x` hex string
pub(crate) fn parse_u256(field: &str, value: &str) -> Result<U256> {
    U256::from_str(value.trim()).map_err(|e| Error::malformed(field, e.to_string()))
}

/// Parse a numeric string field, mapping failures to the named field
pub(crate) fn parse_decimal_field(field: &str, value: &str) -> Result<BigDecimal> {
    make_decimal(value).map_err(|_| Error::malformed(field, format!("not a number: {:?}", value)))
}

/// Current unix time in seconds
pub(crate) fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_make_decimal_from_strings() {
        assert_eq!(make_decimal("100").unwrap(), BigDecimal::from(100));
        assert_eq!(make_decimal(" 42.50 ").unwrap(), dec("42.5"));
        assert_eq!(make_decimal("-3").unwrap(), BigDecimal::from(-3));
        assert_eq!(make_decimal("1.5e3").unwrap(), BigDecimal::from(1500));
    }

    #[test]
    fn test_make_decimal_avoids_float_error() {
        let sum = make_decimal(0.1).unwrap() + make_decimal(0.2).unwrap();
        assert_eq!(sum, dec("0.3"));
    }

    #[test]
    fn test_make_decimal_from_integers() {
        assert_eq!(make_decimal(7u64).unwrap(), BigDecimal::from(7));
        assert_eq!(make_decimal(u64::MAX).unwrap(), BigDecimal::from(u64::MAX));
    }

    #[test]
    fn test_make_decimal_keeps_wei_beyond_96_bits() {
        // a trillion 18-decimal tokens
        assert_eq!(
            make_decimal("1000000000000000000000000000000").unwrap(),
            dec("1e30")
        );
        assert_eq!(
            make_decimal("123456789012345678901234567890.000000000000000001").unwrap()
                - dec("123456789012345678901234567890"),
            dec("0.000000000000000001")
        );
    }

    #[test]
    fn test_make_decimal_hex() {
        assert_eq!(make_decimal("0x").unwrap(), BigDecimal::from(0));
        assert_eq!(make_decimal("0x1a").unwrap(), BigDecimal::from(26));
        // 2^132, wider than any native integer
        assert_eq!(
            make_decimal("0x1000000000000000000000000000000000").unwrap(),
            dec("5444517870735015415413993718908291383296")
        );
        assert_eq!(
            make_decimal(format!("0x{}", "f".repeat(64))).unwrap(),
            u256_to_decimal(U256::MAX)
        );
    }

    #[test]
    fn test_make_decimal_rejects_garbage() {
        assert!(matches!(
            make_decimal("abc"),
            Err(Error::InvalidNumberFormat(_))
        ));
        assert!(matches!(make_decimal(""), Err(Error::InvalidNumberFormat(_))));
        assert!(matches!(
            make_decimal("0xzz"),
            Err(Error::InvalidNumberFormat(_))
        ));
        // wider than uint256
        assert!(matches!(
            make_decimal(format!("0x1{}", "0".repeat(64))),
            Err(Error::InvalidNumberFormat(_))
        ));
    }
    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(
            parse_hex_bytes("calldata", "0xdeadbeef").unwrap().as_ref(),
            &[0xde, 0xad, 0xbe, 0xef]
        );
        assert!(parse_hex_bytes("calldata", "0x").unwrap().is_empty());
        assert!(matches!(
            parse_hex_bytes("calldata", "0xabc"),
            Err(Error::MalformedOrderField { .. })
        ));
        assert!(matches!(
            parse_hex_bytes("replacementPattern", "0xzz"),
            Err(Error::MalformedOrderField { .. })
        ));
        assert!(matches!(
            parse_hex_bytes("calldata", "dead"),
            Err(Error::MalformedOrderField { .. })
        ));
    }

    #[test]
    fn test_parse_u256() {
        assert_eq!(parse_u256("salt", "255").unwrap(), U256::from(255));
        assert_eq!(parse_u256("salt", "0xff").unwrap(), U256::from(255));
        assert!(parse_u256("salt", "-1").is_err());
    }
}
