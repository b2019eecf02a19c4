use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use num::BigInt;

use super::rounding::{round_to_wei, u256_to_decimal};
use crate::config::ExchangeConfig;
use crate::error::{Error, Result};
use crate::types::{SaleKind, Side, UnhashedOrder};
use crate::utils::unix_now;

/// Default number of seconds subtracted from "now" to absorb clock skew
/// between this machine and block timestamps
pub const DEFAULT_SECONDS_TO_BACKTRACK: u64 = 30;

/// A price the exchange contract could not settle is an error, not a quote
fn ensure_uint256(price: BigDecimal) -> Result<BigDecimal> {
    if price > u256_to_decimal(U256::MAX) {
        return Err(Error::Decimal(format!("price {} exceeds uint256", price)));
    }
    Ok(price)
}

/// How far a Dutch auction has moved at `now`: `extra * elapsed / duration`
///
/// Elapsed time is clamped to `[0, duration]`. An order with no positive
/// duration (including `expiration_time == 0`) is treated as fully moved.
fn auction_diff(order: &UnhashedOrder, now: i128) -> BigDecimal {
    let listing = i128::from(order.listing_time);
    let duration = i128::from(order.expiration_time) - listing;
    if duration <= 0 {
        return order.extra.clone();
    }
    let elapsed = (now - listing).clamp(0, duration);

    // Multiply first so whole-wei results stay exact
    let elapsed = BigDecimal::from(BigInt::from(elapsed));
    let duration = BigDecimal::from(BigInt::from(duration));
    &order.extra * elapsed / duration
}

/// Unrounded price of an order at unix time `now`
pub fn exact_price_at(
    order: &UnhashedOrder,
    now: u64,
    seconds_to_backtrack: u64,
) -> Result<BigDecimal> {
    let now = i128::from(now) - i128::from(seconds_to_backtrack);

    let price = match order.sale_kind {
        SaleKind::FixedPrice => order.base_price.clone(),
        SaleKind::DutchAuction => {
            let diff = auction_diff(order, now);
            match order.side {
                // Sell side starts at base price and falls by up to `extra`
                Side::Sell => (&order.base_price - diff).max(BigDecimal::from(0)),
                // Buy side starts at base price and rises by up to `extra`
                Side::Buy => &order.base_price + diff,
            }
        }
    };
    ensure_uint256(price)
}

/// Price of an order at unix time `now`, rounded to whole wei
///
/// This is a pure function of its arguments, so concurrent callers need no
/// coordination.
///
/// # Arguments
/// * `order` - The order to price (hashed or not)
/// * `now` - Unix time in seconds
/// * `seconds_to_backtrack` - Seconds subtracted from `now` so a quote is not
///   rejected because the next block's timestamp lags the local clock
/// * `should_round_up` - Round fractional wei up instead of truncating
///
/// # Example
///
/// ```
/// # use wyvern_rs::orders::estimate_price_at;
/// # fn demo(order: &wyvern_rs::UnhashedOrder) -> wyvern_rs::Result<()> {
/// let price = estimate_price_at(order, 1_700_000_500, 0, true)?;
/// # Ok(())
/// # }
/// ```
pub fn estimate_price_at(
    order: &UnhashedOrder,
    now: u64,
    seconds_to_backtrack: u64,
    should_round_up: bool,
) -> Result<BigDecimal> {
    let exact = exact_price_at(order, now, seconds_to_backtrack)?;
    ensure_uint256(round_to_wei(&exact, should_round_up))
}

/// Price of an order right now, by the wall clock
///
/// `seconds_to_backtrack` defaults to [`DEFAULT_SECONDS_TO_BACKTRACK`].
pub fn estimate_current_price(
    order: &UnhashedOrder,
    seconds_to_backtrack: Option<u64>,
    should_round_up: bool,
) -> Result<BigDecimal> {
    estimate_price_at(
        order,
        unix_now(),
        seconds_to_backtrack.unwrap_or(DEFAULT_SECONDS_TO_BACKTRACK),
        should_round_up,
    )
}

/// Add the taker relayer fee a buyer pays on top of a sell order's price
///
/// Orders waiting for a best counter order (English auctions) and buy
/// orders are returned unchanged.
pub fn apply_taker_fee(
    order: &UnhashedOrder,
    price: BigDecimal,
    config: &ExchangeConfig,
) -> Result<BigDecimal> {
    if order.side != Side::Sell || order.waiting_for_best_counter_order {
        return Ok(price);
    }
    let fee = &price * &order.taker_relayer_fee / config.basis_point_denominator();
    ensure_uint256(price + fee)
}

/// Price a taker pays at unix time `now`, including the taker fee, rounded to wei
pub fn estimate_price_with_fees(
    order: &UnhashedOrder,
    now: u64,
    seconds_to_backtrack: u64,
    should_round_up: bool,
    config: &ExchangeConfig,
) -> Result<BigDecimal> {
    let exact = exact_price_at(order, now, seconds_to_backtrack)?;
    let with_fee = apply_taker_fee(order, exact, config)?;
    ensure_uint256(round_to_wei(&with_fee, should_round_up))
}
