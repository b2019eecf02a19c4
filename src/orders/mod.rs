mod builder;
mod hash;
mod json;
mod price;
mod rounding;

pub use builder::{generate_salt, OrderBuilder, OrderParams};
pub use hash::{encode_order, get_order_hash, hash_order, hash_to_sign, personal_message_hash};
pub use json::{
    order_from_json, order_to_json, signed_order_to_json, unhashed_order_from_json,
    OrderJson, OrderMetadataJson, WyvernAssetJson,
};
pub use price::{
    apply_taker_fee, estimate_current_price, estimate_price_at, estimate_price_with_fees,
    exact_price_at, DEFAULT_SECONDS_TO_BACKTRACK,
};
pub use rounding::{decimal_to_u256, round_to_wei, u256_to_decimal};
