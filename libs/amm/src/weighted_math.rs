//! Weighted-pool (Balancer-style) power-formula math.
//!
//! The weighted invariant has a closed-form solution, but it requires
//! fractional exponentiation; `Decimal` has no `powf`, so this module steps
//! out to `f64` for the exponent only and converts back, which keeps error
//! within the spec's < 1 bp bound for the ranges an arbitrage search will
//! ever probe.

use anyhow::{bail, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone)]
pub struct WeightedPoolState {
    pub balance_in: Decimal,
    pub balance_out: Decimal,
    /// Normalized weights as integer basis points summing to 10_000 across
    /// the whole pool; only the two weights relevant to this pair are kept
    /// here since quoting is always pairwise.
    pub weight_in_bps: u32,
    pub weight_out_bps: u32,
    pub fee_bps: u32,
}

pub struct WeightedMath;

impl WeightedMath {
    /// `amountOut = balanceOut * (1 - (balanceIn / (balanceIn + amountInAfterFee))^(weightIn/weightOut))`
    pub fn calculate_output_amount(
        amount_in: Decimal,
        pool: &WeightedPoolState,
    ) -> Result<Decimal> {
        if amount_in == dec!(0) {
            return Ok(dec!(0));
        }
        if amount_in < dec!(0) {
            bail!("amountIn must be non-negative");
        }
        if pool.balance_in <= dec!(0) || pool.balance_out <= dec!(0) {
            bail!("balances must be positive");
        }
        if pool.weight_in_bps == 0 || pool.weight_out_bps == 0 {
            bail!("weights must be positive");
        }

        let fee_multiplier = Decimal::from(10_000 - pool.fee_bps) / dec!(10000);
        let amount_in_after_fee = amount_in * fee_multiplier;

        let base = (pool.balance_in / (pool.balance_in + amount_in_after_fee))
            .to_f64()
            .ok_or_else(|| anyhow::anyhow!("decimal-to-f64 conversion failed"))?;
        let exponent = pool.weight_in_bps as f64 / pool.weight_out_bps as f64;
        let ratio = base.powf(exponent);

        let out_fraction = Decimal::from_f64(1.0 - ratio)
            .ok_or_else(|| anyhow::anyhow!("f64-to-decimal conversion failed"))?;
        Ok((pool.balance_out * out_fraction).max(dec!(0)))
    }

    /// Spot marginal price of `out` in terms of `in` (quote-per-base, the
    /// same convention `v2_math`, `v3_math`, and `stable_math` return):
    /// `(balanceOut/weightOut) / (balanceIn/weightIn)`.
    pub fn price_at_margin(pool: &WeightedPoolState) -> Result<Decimal> {
        if pool.weight_in_bps == 0 || pool.weight_out_bps == 0 {
            bail!("weights must be positive");
        }
        let numerator = pool.balance_out / Decimal::from(pool.weight_out_bps);
        let denominator = pool.balance_in / Decimal::from(pool.weight_in_bps);
        if denominator == dec!(0) {
            bail!("denominator is zero");
        }
        Ok(numerator / denominator)
    }
}
