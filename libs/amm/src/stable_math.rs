//! Stable-swap (Curve-style) invariant math.
//!
//! Unlike the V2/V3 modules, convergence is not guaranteed in closed form —
//! both `get_d` and `get_y` are Newton iterations on the invariant and must
//! report failure to converge rather than return a degraded answer, per the
//! adapter contract's `NoConvergence` error.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

pub const MAX_ITERATIONS: u32 = 32;
const CONVERGENCE_EPSILON: Decimal = dec!(0.000000000001);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StableSwapError {
    #[error("stable-swap invariant did not converge after {iterations} iterations")]
    NoConvergence { iterations: u32 },
    #[error("invalid stable-swap pool: {0}")]
    InvalidPool(String),
}

/// Multi-asset stable-swap pool state: `reserves[i]` in a common numeraire,
/// amplification coefficient `a` (Curve's `A`).
#[derive(Debug, Clone)]
pub struct StablePoolState {
    pub reserves: Vec<Decimal>,
    pub amplification: u32,
    pub fee_bps: u32,
}

pub struct StableMath;

impl StableMath {
    /// Solve the StableSwap invariant `D` for the current reserves via
    /// Newton's method. `Ann = A * n^n`.
    ///
    /// `D_{k+1} = (Ann*S + D_P*n) * D_k / ((Ann-1)*D_k + (n+1)*D_P)`
    /// where `D_P = D_k^(n+1) / (n^n * prod(reserves))`.
    pub fn get_d(reserves: &[Decimal], amplification: u32) -> Result<Decimal, StableSwapError> {
        let n = reserves.len();
        if n < 2 {
            return Err(StableSwapError::InvalidPool(
                "need at least two reserves".into(),
            ));
        }
        let n_dec = Decimal::from(n as u64);
        let s: Decimal = reserves.iter().sum();
        if s == dec!(0) {
            return Ok(dec!(0));
        }

        let ann = Decimal::from(amplification) * n_dec.powi(n as i64);
        let mut d = s;

        for i in 0..MAX_ITERATIONS {
            let mut d_p = d;
            for r in reserves {
                if *r == dec!(0) {
                    return Err(StableSwapError::InvalidPool("zero reserve".into()));
                }
                d_p = d_p * d / (r * n_dec);
            }
            let d_prev = d;
            let numerator = (ann * s + d_p * n_dec) * d;
            let denominator = (ann - dec!(1)) * d + (n_dec + dec!(1)) * d_p;
            if denominator == dec!(0) {
                return Err(StableSwapError::InvalidPool(
                    "degenerate denominator".into(),
                ));
            }
            d = numerator / denominator;

            if (d - d_prev).abs() <= CONVERGENCE_EPSILON {
                return Ok(d);
            }
            if i == MAX_ITERATIONS - 1 {
                return Err(StableSwapError::NoConvergence {
                    iterations: MAX_ITERATIONS,
                });
            }
        }
        Err(StableSwapError::NoConvergence {
            iterations: MAX_ITERATIONS,
        })
    }

    /// Solve for the new balance of coin `j` given every other reserve and
    /// target invariant `d`, with coin `i` already updated to `x_i`.
    fn get_y(
        i: usize,
        j: usize,
        x_i: Decimal,
        reserves: &[Decimal],
        amplification: u32,
        d: Decimal,
    ) -> Result<Decimal, StableSwapError> {
        let n = reserves.len();
        let n_dec = Decimal::from(n as u64);
        let ann = Decimal::from(amplification) * n_dec.powi(n as i64);

        let mut c = d;
        let mut s_ = dec!(0);
        for (k, r) in reserves.iter().enumerate() {
            let x_k = if k == i { x_i } else if k == j { continue } else { *r };
            s_ += x_k;
            c = c * d / (x_k * n_dec);
        }
        c = c * d / (ann * n_dec);
        let b = s_ + d / ann;

        let mut y = d;
        for iter in 0..MAX_ITERATIONS {
            let y_prev = y;
            let numerator = y * y + c;
            let denominator = dec!(2) * y + b - d;
            if denominator == dec!(0) {
                return Err(StableSwapError::InvalidPool(
                    "degenerate get_y denominator".into(),
                ));
            }
            y = numerator / denominator;
            if (y - y_prev).abs() <= CONVERGENCE_EPSILON {
                return Ok(y);
            }
            if iter == MAX_ITERATIONS - 1 {
                return Err(StableSwapError::NoConvergence {
                    iterations: MAX_ITERATIONS,
                });
            }
        }
        Err(StableSwapError::NoConvergence {
            iterations: MAX_ITERATIONS,
        })
    }

    /// Quote an exchange of `amount_in` of coin `i` for coin `j`.
    pub fn calculate_output_amount(
        pool: &StablePoolState,
        i: usize,
        j: usize,
        amount_in: Decimal,
    ) -> Result<Decimal, StableSwapError> {
        if amount_in == dec!(0) {
            return Ok(dec!(0));
        }
        if i == j || i >= pool.reserves.len() || j >= pool.reserves.len() {
            return Err(StableSwapError::InvalidPool(
                "invalid coin indices".into(),
            ));
        }

        let d = Self::get_d(&pool.reserves, pool.amplification)?;
        let x_i = pool.reserves[i] + amount_in;
        let y_new = Self::get_y(i, j, x_i, &pool.reserves, pool.amplification, d)?;
        let raw_out = pool.reserves[j] - y_new;
        if raw_out <= dec!(0) {
            return Ok(dec!(0));
        }

        let fee_multiplier = Decimal::from(10_000 - pool.fee_bps) / dec!(10000);
        Ok(raw_out * fee_multiplier)
    }

    /// Marginal price of coin `i` in terms of coin `j`, approximated by a
    /// tiny probe trade (the invariant has no closed-form derivative once
    /// `A != 0`).
    pub fn price_at_margin(
        pool: &StablePoolState,
        i: usize,
        j: usize,
    ) -> Result<Decimal, StableSwapError> {
        let probe = pool.reserves[i] * dec!(0.000001);
        let out = Self::calculate_output_amount(pool, i, j, probe)?;
        if probe == dec!(0) {
            return Ok(dec!(1));
        }
        Ok(out / probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced_pool() -> StablePoolState {
        StablePoolState {
            reserves: vec![dec!(1_000_000), dec!(1_000_000), dec!(1_000_000)],
            amplification: 100,
            fee_bps: 4,
        }
    }

    #[test]
    fn d_converges_for_balanced_pool() {
        let pool = balanced_pool();
        let d = StableMath::get_d(&pool.reserves, pool.amplification).unwrap();
        // For a perfectly balanced pool, D should be close to the sum of reserves.
        let s: Decimal = pool.reserves.iter().sum();
        assert!((d - s).abs() / s < dec!(0.0001));
    }

    #[test]
    fn small_trade_near_parity_in_balanced_pool() {
        let pool = balanced_pool();
        let out = StableMath::calculate_output_amount(&pool, 0, 1, dec!(1000)).unwrap();
        // Stable pools should return close to 1:1 for small trades around parity.
        assert!((out - dec!(1000)).abs() < dec!(1));
    }

    #[test]
    fn zero_amount_in_yields_zero_out() {
        let pool = balanced_pool();
        let out = StableMath::calculate_output_amount(&pool, 0, 1, dec!(0)).unwrap();
        assert_eq!(out, dec!(0));
    }

    #[test]
    fn rejects_same_coin_swap() {
        let pool = balanced_pool();
        assert!(StableMath::calculate_output_amount(&pool, 0, 0, dec!(10)).is_err());
    }
}
