//! Deserializers for JSON-RPC hex quantities (`"0x1a"`).

use serde::{de, Deserialize, Deserializer};

fn parse_quantity<E: de::Error>(raw: &str) -> Result<u64, E> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| E::custom(format!("quantity {:?} is missing 0x prefix", raw)))?;
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16).map_err(E::custom)
}

pub(crate) fn deserialize_quantity_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_quantity(&raw)
}

pub(crate) fn deserialize_quantity<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.as_deref().map(parse_quantity).transpose()
}
