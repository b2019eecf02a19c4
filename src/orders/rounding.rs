use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use num::bigint::{Sign, ToBigInt};
use num::BigInt;

use crate::error::{Error, Result};

/// Round a price to whole wei, either up (ceil) or toward zero
pub fn round_to_wei(amount: &BigDecimal, round_up: bool) -> BigDecimal {
    // with_scale drops digits toward zero
    let truncated = amount.with_scale(0);
    if round_up && truncated < *amount {
        truncated + BigDecimal::from(1)
    } else {
        truncated
    }
}

/// Exact decimal value of a uint256 word
pub fn u256_to_decimal(value: U256) -> BigDecimal {
    let bytes = value.to_be_bytes::<32>();
    BigDecimal::from(BigInt::from_bytes_be(Sign::Plus, &bytes))
}

/// Convert a non-negative whole decimal into a uint256 word
///
/// Fractional, negative or oversized values cannot be represented on chain
/// and are reported against `field`.
pub fn decimal_to_u256(field: &str, amount: &BigDecimal) -> Result<U256> {
    if amount.sign() == Sign::Minus {
        return Err(Error::malformed(field, format!("negative value {}", amount)));
    }
    if !amount.is_integer() {
        return Err(Error::malformed(
            field,
            format!("fractional value {} is not a whole number", amount),
        ));
    }
    let (_, bytes) = amount
        .to_bigint()
        .ok_or_else(|| Error::malformed(field, format!("not an integer: {}", amount)))?
        .to_bytes_be();
    U256::try_from_be_slice(&bytes)
        .ok_or_else(|| Error::malformed(field, format!("value {} exceeds uint256", amount)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_to_wei() {
        assert_eq!(round_to_wei(&dec("33.0001"), true), dec("34"));
        assert_eq!(round_to_wei(&dec("33.9999"), false), dec("33"));
        assert_eq!(round_to_wei(&dec("80.00"), true), dec("80"));
        assert_eq!(round_to_wei(&dec("80.00"), false).to_string(), "80");
        assert_eq!(round_to_wei(&BigDecimal::from(0), true), BigDecimal::from(0));
        assert_eq!(round_to_wei(&dec("-1.5"), true), dec("-1"));
        assert_eq!(round_to_wei(&dec("-1.5"), false), dec("-1"));
    }

    #[test]
    fn test_round_to_wei_beyond_96_bits() {
        let amount = dec("1000000000000000000000000000000.25");
        assert_eq!(
            round_to_wei(&amount, true),
            dec("1000000000000000000000000000001")
        );
        assert_eq!(
            round_to_wei(&amount, false),
            dec("1000000000000000000000000000000")
        );
    }

    #[test]
    fn test_decimal_to_u256() {
        assert_eq!(decimal_to_u256("basePrice", &dec("100")).unwrap(), U256::from(100));
        assert_eq!(decimal_to_u256("basePrice", &dec("100.000")).unwrap(), U256::from(100));
        assert_eq!(decimal_to_u256("basePrice", &dec("1e21")).unwrap(), U256::from(10u128.pow(21)));
        assert_eq!(decimal_to_u256("extra", &dec("-0")).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_full_uint256_range() {
        let max = u256_to_decimal(U256::MAX);
        assert_eq!(
            max.to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
        assert_eq!(decimal_to_u256("basePrice", &max).unwrap(), U256::MAX);

        let too_big = max + BigDecimal::from(1);
        assert!(matches!(
            decimal_to_u256("basePrice", &too_big),
            Err(Error::MalformedOrderField { .. })
        ));
    }

    #[test]
    fn test_decimal_to_u256_rejects_non_integral() {
        match decimal_to_u256("basePrice", &dec("1.5")) {
            Err(Error::MalformedOrderField { field, .. }) => assert_eq!(field, "basePrice"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(decimal_to_u256("extra", &dec("-1")).is_err());
    }
}
