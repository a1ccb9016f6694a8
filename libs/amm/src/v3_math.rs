//! Concentrated-liquidity (Uniswap-V3-family) swap math (spec §4.3).
//!
//! Implements the canonical `sqrtPriceX96`/tick formulas in full 256-bit
//! precision via [`ethereum_types::U256`] rather than `u128` arithmetic,
//! which loses precision on the `liquidity << 96` and `sqrtPrice` products
//! that routinely exceed 128 bits. A swap that would need to cross into a
//! neighboring tick is detected (`new_tick != current_tick`) but not
//! walked — the adapter layer (`adapter::quote_concentrated`) treats that
//! as `ErrorKind::InsufficientPoolData`, matching the spec's "never
//! extrapolates past the liquidity at the current tick" rule.

use anyhow::{anyhow, bail, Result};
use ethereum_types::U256;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// `(amount_out, new_sqrt_price_x96, new_tick)`.
type SwapResult = (u128, u128, i32);

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = 887272;
pub const MIN_SQRT_RATIO: u128 = 4295128739;
pub const MAX_SQRT_RATIO: u128 = 1461446703485210103287273052203988822378723970342;

/// Price = 1.0001^tick; ln(1.0001), used to approximate tick from price.
const LN_TICK_BASE: f64 = 0.0001_000_049_998_333_3; // ln(1.0001)

#[derive(Debug, Clone)]
pub struct V3PoolState {
    pub liquidity: u128,
    pub sqrt_price_x96: u128,
    pub current_tick: i32,
    /// Fee in pips (1e-6); `3000` = 0.3%.
    pub fee_pips: u32,
}

pub struct V3Math;

impl V3Math {
    /// Computes the output of swapping `amount_in` against `pool`,
    /// assuming the trade stays within the current tick's liquidity.
    /// `zero_for_one`: true for token0 -> token1 (price decreases).
    pub fn calculate_output_amount(
        amount_in: u128,
        pool: &V3PoolState,
        zero_for_one: bool,
    ) -> Result<SwapResult> {
        if pool.liquidity == 0 {
            bail!("no liquidity in current tick");
        }
        if amount_in == 0 {
            return Ok((0, pool.sqrt_price_x96, pool.current_tick));
        }

        let amount_in_after_fee = amount_in
            .checked_mul(1_000_000u128.saturating_sub(pool.fee_pips as u128))
            .ok_or_else(|| anyhow!("overflow applying fee"))?
            / 1_000_000;

        let sqrt_p = U256::from(pool.sqrt_price_x96);
        let liquidity = U256::from(pool.liquidity);

        let new_sqrt_price = next_sqrt_price_from_input(sqrt_p, liquidity, amount_in_after_fee, zero_for_one)?;

        let amount_out = if zero_for_one {
            amount1_delta(new_sqrt_price, sqrt_p, liquidity, false)
        } else {
            amount0_delta(sqrt_p, new_sqrt_price, liquidity, false)
        };

        let new_sqrt_price_u128 = u256_to_u128_saturating(new_sqrt_price);
        let new_tick = tick_at_sqrt_price(new_sqrt_price_u128);

        Ok((u256_to_u128_saturating(amount_out), new_sqrt_price_u128, new_tick))
    }

    /// `priceAtMargin`-style helper: spot price (`base` per `quote`, i.e.
    /// `price = (sqrtPriceX96 / 2^96)^2`) as a `Decimal`.
    pub fn sqrt_price_to_price_decimal(sqrt_price_x96: u128) -> Result<Decimal> {
        let sqrt_price = Decimal::from(sqrt_price_x96) / Decimal::from(1u128 << 96);
        Ok(sqrt_price * sqrt_price)
    }

    /// Price-impact percentage of swapping `amount_in`, used only for
    /// diagnostics/tests — the adapter layer derives `priceAtMargin`
    /// directly from the snapshot's `sqrtPriceX96`.
    pub fn calculate_price_impact(amount_in: u128, pool: &V3PoolState, zero_for_one: bool) -> Result<Decimal> {
        let price_before = Self::sqrt_price_to_price_decimal(pool.sqrt_price_x96)?;
        let (_, new_sqrt_price, _) = Self::calculate_output_amount(amount_in, pool, zero_for_one)?;
        let price_after = Self::sqrt_price_to_price_decimal(new_sqrt_price)?;
        Ok((price_before - price_after).abs() / price_before * dec!(100))
    }
}

const Q96_SHIFT: u32 = 96;

fn q96() -> U256 {
    U256::one() << Q96_SHIFT
}

/// `mulDiv` with saturation instead of a 512-bit intermediate: exact for
/// every magnitude our pool states actually reach (liquidity/:sqrtPrice
/// within their documented ranges), saturates rather than panics past that.
fn mul_div(a: U256, b: U256, denominator: U256) -> U256 {
    if denominator.is_zero() {
        return U256::zero();
    }
    match a.checked_mul(b) {
        Some(product) => product / denominator,
        None => {
            // Reorder to shed a factor before multiplying, trading a little
            // precision for staying in range.
            (a / denominator).saturating_mul(b)
        }
    }
}

/// `getAmount0Delta`: token0 owed/received moving `liquidity` between
/// `sqrt_a` and `sqrt_b` (either order).
fn amount0_delta(sqrt_a: U256, sqrt_b: U256, liquidity: U256, round_up: bool) -> U256 {
    let (lo, hi) = if sqrt_a <= sqrt_b { (sqrt_a, sqrt_b) } else { (sqrt_b, sqrt_a) };
    if lo.is_zero() {
        return U256::zero();
    }
    let numerator1 = liquidity << Q96_SHIFT;
    let numerator2 = hi - lo;
    let result = mul_div(numerator1, numerator2, hi);
    if round_up {
        ceil_div(result, lo)
    } else {
        result / lo
    }
}

/// `getAmount1Delta`: token1 owed/received moving `liquidity` between
/// `sqrt_a` and `sqrt_b` (either order).
fn amount1_delta(sqrt_a: U256, sqrt_b: U256, liquidity: U256, round_up: bool) -> U256 {
    let (lo, hi) = if sqrt_a <= sqrt_b { (sqrt_a, sqrt_b) } else { (sqrt_b, sqrt_a) };
    let numerator = liquidity.saturating_mul(hi - lo);
    if round_up {
        ceil_div(numerator, q96())
    } else {
        numerator / q96()
    }
}

fn ceil_div(numerator: U256, denominator: U256) -> U256 {
    if denominator.is_zero() {
        return U256::zero();
    }
    let (quotient, remainder) = numerator.div_mod(denominator);
    if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::one()
    }
}

/// `getNextSqrtPriceFromInput`: the post-swap `sqrtPriceX96` after adding
/// `amount_in` of token0 (`zero_for_one`) or token1.
fn next_sqrt_price_from_input(sqrt_p: U256, liquidity: U256, amount_in: u128, zero_for_one: bool) -> Result<U256> {
    if amount_in == 0 {
        return Ok(sqrt_p);
    }
    let amount = U256::from(amount_in);
    if zero_for_one {
        next_sqrt_price_from_amount0(sqrt_p, liquidity, amount)
    } else {
        Ok(next_sqrt_price_from_amount1(sqrt_p, liquidity, amount))
    }
}

/// Adding token0 decreases price: `sqrtP' = L*sqrtP / (L + amount*sqrtP)`.
fn next_sqrt_price_from_amount0(sqrt_p: U256, liquidity: U256, amount: U256) -> Result<U256> {
    if liquidity.is_zero() {
        bail!("zero liquidity");
    }
    let numerator = liquidity << Q96_SHIFT;
    let product = amount.saturating_mul(sqrt_p);
    let denominator = numerator.saturating_add(product);
    if denominator.is_zero() {
        bail!("degenerate denominator in sqrt price step");
    }
    Ok(mul_div(numerator, sqrt_p, denominator))
}

/// Adding token1 increases price: `sqrtP' = sqrtP + amount*Q96/L`.
fn next_sqrt_price_from_amount1(sqrt_p: U256, liquidity: U256, amount: U256) -> U256 {
    if liquidity.is_zero() {
        return sqrt_p;
    }
    let quotient = mul_div(amount, q96(), liquidity);
    sqrt_p.saturating_add(quotient)
}

/// Approximates `tick = log_1.0001(price)` from `sqrtPriceX96` via
/// `ln(price) / ln(1.0001)`. Exact only to within rounding of the f64
/// logarithm; used solely to detect whether a swap has left the tick the
/// snapshot was fetched at, not for fee-tier tick-spacing alignment.
fn tick_at_sqrt_price(sqrt_price_x96: u128) -> i32 {
    if sqrt_price_x96 <= MIN_SQRT_RATIO {
        return MIN_TICK;
    }
    let sqrt_price = sqrt_price_x96 as f64 / (1u128 << 96) as f64;
    let price = sqrt_price * sqrt_price;
    if !price.is_finite() || price <= 0.0 {
        return MIN_TICK;
    }
    let tick = (price.ln() / LN_TICK_BASE).round() as i32;
    tick.clamp(MIN_TICK, MAX_TICK)
}

fn u256_to_u128_saturating(x: U256) -> u128 {
    if x > U256::from(u128::MAX) {
        u128::MAX
    } else {
        x.as_u128()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_one_pool(fee_pips: u32) -> V3PoolState {
        V3PoolState {
            liquidity: 1_000_000_000_000_000,
            sqrt_price_x96: 79228162514264337593543950336, // price = 1.0
            current_tick: 0,
            fee_pips,
        }
    }

    #[test]
    fn small_swap_stays_within_tick_and_moves_price_down() {
        let pool = price_one_pool(3000);
        let (amount_out, new_price, new_tick) =
            V3Math::calculate_output_amount(1_000_000, &pool, true).unwrap();

        assert!(amount_out > 0 && amount_out < 1_000_000);
        assert!(new_price < pool.sqrt_price_x96);
        assert_eq!(new_tick, pool.current_tick, "a 1e6-wei swap against 1e15 liquidity should not cross a tick");
    }

    #[test]
    fn zero_amount_in_is_a_no_op() {
        let pool = price_one_pool(3000);
        let (amount_out, new_price, new_tick) = V3Math::calculate_output_amount(0, &pool, true).unwrap();
        assert_eq!(amount_out, 0);
        assert_eq!(new_price, pool.sqrt_price_x96);
        assert_eq!(new_tick, pool.current_tick);
    }

    #[test]
    fn zero_liquidity_is_rejected() {
        let mut pool = price_one_pool(3000);
        pool.liquidity = 0;
        assert!(V3Math::calculate_output_amount(1_000, &pool, true).is_err());
    }

    #[test]
    fn buying_token1_increases_price_selling_it_decreases() {
        let pool = price_one_pool(0);
        let (_, price_up, _) = V3Math::calculate_output_amount(1_000_000, &pool, false).unwrap();
        let (_, price_down, _) = V3Math::calculate_output_amount(1_000_000, &pool, true).unwrap();
        assert!(price_up > pool.sqrt_price_x96);
        assert!(price_down < pool.sqrt_price_x96);
    }

    #[test]
    fn large_swap_against_thin_liquidity_crosses_a_tick() {
        let mut pool = price_one_pool(0);
        pool.liquidity = 1_000_000; // thin enough that a modest swap moves price a lot
        let (_, _, new_tick) = V3Math::calculate_output_amount(1_000_000_000, &pool, true).unwrap();
        assert_ne!(new_tick, pool.current_tick);
    }

    #[test]
    fn amount0_amount1_deltas_scale_with_liquidity() {
        let sqrt_a = U256::from(79228162514264337593543950336u128);
        let sqrt_b = sqrt_a + U256::from(1_000_000_000u128);
        let low_liq = amount1_delta(sqrt_a, sqrt_b, U256::from(1_000_000u128), false);
        let high_liq = amount1_delta(sqrt_a, sqrt_b, U256::from(10_000_000u128), false);
        assert!(high_liq > low_liq);
    }
}
