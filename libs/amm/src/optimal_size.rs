//! Trade-size optimizer (spec's Size Optimizer component): picks the
//! input amount that maximizes net profit along an already-discovered
//! route, deducting AMM fees (already embedded in `adapter::quote`),
//! chain-indexed gas cost, and a linearized slippage penalty.
//!
//! ## Purpose
//! Given a route (an ordered list of pools to swap through) and the
//! chain's trade-size grid, searches for the best `amountIn` rather than
//! assuming a fixed test size — the previous generation of this crate
//! used a fixed `1_000_000_000` probe and a 10-iteration binary search
//! hand-rolled per protocol pair; this version runs one grid-plus-ternary
//! search over the unified `adapter::quote` entry point regardless of
//! which AMM families the route crosses.
//!
//! ## Integration Points
//! Consumes `PoolDescriptor`/`PoolSnapshot` pairs from the registry (the
//! same shape `price-feed` and `search` already use) plus the chain's
//! `SizeGrid` and the active `PolicyConfig`; produces a `SizedRoute` the
//! orchestrator folds into a `PairPlan`.
//!
//! ## Architecture Role
//! Pure function, no I/O: one call per candidate per scan round.

use crate::adapter::quote;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use types::chain::ChainDescriptor;
use types::config_snapshot::PolicyConfig;
use types::pool::{PoolDescriptor, PoolSnapshot};
use types::ErrorKind;

/// Floor below which a route is rejected even if it clears `roiMinBps`
/// (spec §4.6 names this `minProfitUsd` without giving it a home in
/// `PolicyConfig`; kept as a fixed constant here — see DESIGN.md).
const MIN_PROFIT_USD_FLOOR: Decimal = dec!(1.0);

/// Cap on ternary-search refinement iterations (spec §4.6: "≤ 8").
const MAX_TERNARY_ITERATIONS: u32 = 8;

/// One pool traversed by the route under evaluation, in swap order.
pub struct RouteLeg<'a> {
    pub descriptor: &'a PoolDescriptor,
    pub snapshot: &'a PoolSnapshot,
}

/// Everything the optimizer needs to size one candidate route.
pub struct SizingInput<'a> {
    pub chain: &'a ChainDescriptor,
    pub policy: &'a PolicyConfig,
    pub legs: &'a [RouteLeg<'a>],
    /// USD price of one native gas token (e.g. ETH, BNB) on this chain.
    pub native_price_usd: Decimal,
    /// USD price of the route's input token, to convert token-denominated
    /// profit into dollars.
    pub token_price_usd: Decimal,
}

/// The optimizer's verdict for one route: the chosen size and its
/// resulting economics, or a reject reason if nothing on the grid
/// cleared the profitability bar.
#[derive(Debug, Clone)]
pub struct SizedRoute {
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    pub est_gross_bps: i64,
    pub est_slippage_bps: i64,
    pub est_gas_usd: Decimal,
    pub est_profit_usd: Decimal,
    pub est_profit_bps: i64,
    pub atomic: bool,
    pub is_profitable: bool,
}

impl SizedRoute {
    fn rejected(reason_atomic: bool) -> Self {
        Self {
            amount_in: dec!(0),
            amount_out: dec!(0),
            est_gross_bps: 0,
            est_slippage_bps: 0,
            est_gas_usd: dec!(0),
            est_profit_usd: dec!(0),
            est_profit_bps: 0,
            atomic: reason_atomic,
            is_profitable: false,
        }
    }
}

/// Runs the route through every leg in order and returns the final
/// output amount, or `None` if any leg can't be quoted at this size
/// (insufficient liquidity, tick-crossing, zero reserves, etc).
fn amount_out_for(legs: &[RouteLeg], amount_in: Decimal) -> Option<Decimal> {
    let mut current = amount_in;
    for leg in legs {
        match quote(leg.descriptor, leg.snapshot, current) {
            Ok(q) => current = q.amount_out,
            Err(_) => return None,
        }
    }
    Some(current)
}

/// `gasCost(chain, legs)` (spec §4.6): the chain's 2-hop gas-units hint
/// scaled by how many legs this route actually has, times the gas-price
/// floor and the native token's USD price.
fn gas_cost_usd(chain: &ChainDescriptor, num_legs: usize, native_price_usd: Decimal) -> Decimal {
    let scale = Decimal::from(num_legs as u64) / dec!(2);
    let gas_units = Decimal::from(chain.gas_units_hint_roundtrip_v2) * scale;
    let gas_price_gwei = Decimal::try_from(chain.gas_price_floor_gwei).unwrap_or(dec!(0));
    gas_units * gas_price_gwei * native_price_usd / dec!(1_000_000_000)
}

/// Linearized slippage penalty (spec §4.6): `amountIn × 0.0001` per leg,
/// capped by the policy's `slippageBps`.
fn slippage_penalty(amount_in: Decimal, num_legs: usize, policy: &PolicyConfig) -> Decimal {
    let linear_bps = dec!(1) * Decimal::from(num_legs as u64); // 0.0001 * 10_000 = 1 bp per leg
    let cap_bps = Decimal::from(policy.slippage_bps.max(0));
    let applied_bps = linear_bps.min(cap_bps);
    amount_in * applied_bps / dec!(10_000)
}

/// Net profit in the route's input-token units at size `x`, before
/// converting to USD: `amountOut(x) - x - slippagePenalty(x)`. Gas is
/// USD-denominated and subtracted separately by the caller.
fn net_profit_tokens(legs: &[RouteLeg], policy: &PolicyConfig, x: Decimal) -> Option<Decimal> {
    if x <= dec!(0) {
        return None;
    }
    let out = amount_out_for(legs, x)?;
    let penalty = slippage_penalty(x, legs.len(), policy);
    Some(out - x - penalty)
}

/// Grid-searches `chain.size_grid`, then refines with ternary search
/// around the arg-max (spec §4.6: AMM profit curves are unimodal in the
/// single-route case), and evaluates the final economics at that size.
pub fn optimize(input: &SizingInput) -> SizedRoute {
    if input.legs.is_empty() {
        return SizedRoute::rejected(false);
    }

    let atomic = input.legs.iter().all(|l| l.descriptor.flash_loan_compatible)
        && input
            .legs
            .iter()
            .all(|l| l.descriptor.chain_id == input.chain.chain_id);

    let grid_points: Vec<Decimal> = input
        .chain
        .size_grid
        .points()
        .into_iter()
        .filter_map(|p| Decimal::try_from(p).ok())
        .collect();
    if grid_points.is_empty() {
        return SizedRoute::rejected(atomic);
    }

    let mut best_x = grid_points[0];
    let mut best_profit = f64::NEG_INFINITY;
    let mut best_idx = 0usize;
    for (i, &x) in grid_points.iter().enumerate() {
        if let Some(profit) = net_profit_tokens(input.legs, input.policy, x) {
            let profit_f = profit.to_f64().unwrap_or(f64::NEG_INFINITY);
            if profit_f > best_profit {
                best_profit = profit_f;
                best_x = x;
                best_idx = i;
            }
        }
    }

    if best_profit == f64::NEG_INFINITY {
        return SizedRoute::rejected(atomic);
    }

    // Ternary-refine within the grid cell bracketing the arg-max.
    let lo = grid_points[best_idx.saturating_sub(1)];
    let hi = grid_points[(best_idx + 1).min(grid_points.len() - 1)];
    let refined_x = ternary_refine(input.legs, input.policy, lo, hi, best_x);

    let amount_in = refined_x;
    let Some(amount_out) = amount_out_for(input.legs, amount_in) else {
        return SizedRoute::rejected(atomic);
    };
    let tokens_profit = amount_out - amount_in - slippage_penalty(amount_in, input.legs.len(), input.policy);

    let gas_usd = gas_cost_usd(input.chain, input.legs.len(), input.native_price_usd);
    let gross_usd = amount_out * input.token_price_usd;
    let amount_in_usd = amount_in * input.token_price_usd;
    let est_profit_usd = tokens_profit * input.token_price_usd - gas_usd;

    let est_gross_bps = bps_of(gross_usd - amount_in_usd, amount_in_usd);
    let est_slippage_bps =
        bps_of(slippage_penalty(amount_in, input.legs.len(), input.policy) * input.token_price_usd, amount_in_usd);
    let est_profit_bps = bps_of(est_profit_usd, amount_in_usd);

    let min_pnl_bps = input.policy.roi_min_bps.max(0);
    let min_bar = (amount_in_usd * Decimal::from(min_pnl_bps) / dec!(10_000)).max(MIN_PROFIT_USD_FLOOR);
    let is_profitable = atomic && est_profit_usd >= min_bar;

    SizedRoute {
        amount_in,
        amount_out,
        est_gross_bps,
        est_slippage_bps,
        est_gas_usd: gas_usd,
        est_profit_usd,
        est_profit_bps,
        atomic,
        is_profitable,
    }
}

fn bps_of(numerator: Decimal, denominator: Decimal) -> i64 {
    if denominator <= dec!(0) {
        return 0;
    }
    (numerator / denominator * dec!(10_000)).round().to_i64().unwrap_or(0)
}

/// Ternary search for the profit-maximizing `x` in `[lo, hi]`, capped at
/// `MAX_TERNARY_ITERATIONS` passes; falls back to `fallback` if the
/// bracket collapses to nothing usable.
fn ternary_refine(
    legs: &[RouteLeg],
    policy: &PolicyConfig,
    mut lo: Decimal,
    mut hi: Decimal,
    fallback: Decimal,
) -> Decimal {
    if lo >= hi {
        return fallback;
    }
    let eval = |x: Decimal| -> f64 {
        net_profit_tokens(legs, policy, x)
            .and_then(|p| p.to_f64())
            .unwrap_or(f64::NEG_INFINITY)
    };

    for _ in 0..MAX_TERNARY_ITERATIONS {
        let third = (hi - lo) / dec!(3);
        let m1 = lo + third;
        let m2 = hi - third;
        if eval(m1) < eval(m2) {
            lo = m1;
        } else {
            hi = m2;
        }
    }
    let mid = (lo + hi) / dec!(2);
    if eval(mid) > eval(fallback) {
        mid
    } else {
        fallback
    }
}

/// Whether quoting `pool`/`snapshot` failed for a reason that makes this
/// route permanently unsizeable this round (as opposed to just this
/// particular `x`), surfaced so callers can log a specific reject reason.
pub fn leg_error(pool: &PoolDescriptor, snapshot: &PoolSnapshot, amount_in: Decimal) -> Option<ErrorKind> {
    quote(pool, snapshot, amount_in).err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::chain::SizeGrid;
    use types::pool::{FamilyParams, PoolFamily};

    fn chain() -> ChainDescriptor {
        ChainDescriptor {
            chain_id: 56,
            name: "bsc".into(),
            wrapped_native: "0x0000000000000000000000000000000000dead".into(),
            gas_price_floor_gwei: 3.0,
            size_grid: SizeGrid { min: 100.0, max: 10_000.0, steps: 6 },
            gas_units_hint_roundtrip_v2: 215_000,
        }
    }

    fn pool(dex_id: &str, address: &str, fee_bps: u32) -> PoolDescriptor {
        PoolDescriptor {
            chain_id: 56,
            dex_id: dex_id.into(),
            address: address.into(),
            base: "0xweth".into(),
            quote: "0xusdc".into(),
            fee_bps,
            family: PoolFamily::ConstantProduct,
            params: FamilyParams::ConstantProduct,
            flash_loan_compatible: true,
        }
    }

    fn snap(reserve_base: u128, reserve_quote: u128) -> PoolSnapshot {
        PoolSnapshot::ConstantProduct {
            reserve_base,
            reserve_quote,
            block_number: 1,
            observed_at_ms: 1_000,
            source: "rpc".into(),
        }
    }

    #[test]
    fn sizes_a_profitable_two_leg_route() {
        let chain = chain();
        let policy = PolicyConfig::default();
        let buy = pool("pancakeswap", "0xpoolA", 30);
        let sell = pool("sushiswap", "0xpoolB", 30);
        let buy_snap = snap(1_000_000, 100_000_000); // cheap: 1 base = 100 quote
        let sell_snap = snap(1_000_000, 103_000_000); // expensive: 1 base = 103 quote

        let legs = vec![
            RouteLeg { descriptor: &buy, snapshot: &buy_snap },
            RouteLeg { descriptor: &sell, snapshot: &sell_snap },
        ];
        let input = SizingInput {
            chain: &chain,
            policy: &policy,
            legs: &legs,
            native_price_usd: dec!(300),
            token_price_usd: dec!(1),
        };
        let sized = optimize(&input);
        assert!(sized.atomic);
        assert!(sized.amount_in > dec!(0));
    }

    #[test]
    fn empty_route_is_rejected() {
        let chain = chain();
        let policy = PolicyConfig::default();
        let input = SizingInput {
            chain: &chain,
            policy: &policy,
            legs: &[],
            native_price_usd: dec!(300),
            token_price_usd: dec!(1),
        };
        let sized = optimize(&input);
        assert!(!sized.is_profitable);
        assert_eq!(sized.amount_in, dec!(0));
    }

    #[test]
    fn non_flash_loan_compatible_leg_marks_route_non_atomic() {
        let chain = chain();
        let policy = PolicyConfig::default();
        let mut buy = pool("pancakeswap", "0xpoolA", 30);
        buy.flash_loan_compatible = false;
        let sell = pool("sushiswap", "0xpoolB", 30);
        let buy_snap = snap(1_000_000, 100_000_000);
        let sell_snap = snap(1_000_000, 103_000_000);

        let legs = vec![
            RouteLeg { descriptor: &buy, snapshot: &buy_snap },
            RouteLeg { descriptor: &sell, snapshot: &sell_snap },
        ];
        let input = SizingInput {
            chain: &chain,
            policy: &policy,
            legs: &legs,
            native_price_usd: dec!(300),
            token_price_usd: dec!(1),
        };
        let sized = optimize(&input);
        assert!(!sized.atomic);
        assert!(!sized.is_profitable);
    }

    #[test]
    fn gas_cost_scales_with_native_price() {
        let chain = chain();
        let expected = Decimal::from(chain.gas_units_hint_roundtrip_v2) * dec!(3) * dec!(300) / dec!(1_000_000_000);
        assert_eq!(gas_cost_usd(&chain, 2, dec!(300)), expected);
    }
}
