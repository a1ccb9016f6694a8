//! The six ordered admission rules (spec §4.7). Each returns on first
//! block; nothing downstream of a blocked rule is evaluated, matching
//! the spec's "first-matching rule's reason" propagation policy.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use types::asset::AssetDescriptor;
use types::config_snapshot::ConfigSnapshot;
use types::pair::PairPlan;

/// `liquidityUsd ≥ TVL_MIN_USD` (spec §4.7 rule 2 default).
pub const TVL_MIN_USD: Decimal = dec!(1_000_000);
/// `safetyScore ≥ MIN_SAFETY_SCORE` (spec §4.7 rule 3 default).
pub const MIN_SAFETY_SCORE: u8 = 70;
/// `[MIN_HOPS, MAX_HOPS]` route length window (spec §4.7 rule 4).
pub const MIN_HOPS: u8 = 2;
pub const MAX_HOPS: u8 = 3;

/// The reason an asset was blocked, in the order rules are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotConfigured,
    LowLiq,
    LowScore,
    NoPairs,
    NoProfit,
    NotAtomic,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::NotConfigured => "NOT_CONFIGURED",
            RejectReason::LowLiq => "LOW_LIQ",
            RejectReason::LowScore => "LOW_SCORE",
            RejectReason::NoPairs => "NO_PAIRS",
            RejectReason::NoProfit => "NO_PROFIT",
            RejectReason::NotAtomic => "NOT_ATOMIC",
        }
    }
}

/// Rule 1: the asset's chain must be active with at least one HTTPS RPC
/// endpoint and at least one configured DEX. Having only one HTTPS
/// endpoint is a warning, not a block.
pub fn check_configured(asset: &AssetDescriptor, config: &ConfigSnapshot) -> Result<(), RejectReason> {
    let Some(chain) = config.chain(asset.chain_id) else {
        return Err(RejectReason::NotConfigured);
    };
    if chain.rpc_pool.https.is_empty() || chain.dexes.is_empty() {
        return Err(RejectReason::NotConfigured);
    }
    if chain.rpc_pool.https.len() < 2 {
        tracing::warn!(
            chain_id = asset.chain_id,
            https_count = chain.rpc_pool.https.len(),
            "fewer than 2 HTTPS RPC endpoints configured; failover capacity is reduced"
        );
    }
    Ok(())
}

/// Rule 2: the asset must appear in at least one pool with sufficient
/// USD liquidity. The orchestrator has no USD price oracle of its own
/// (spec §1 non-goal); callers supply the figure, typically the largest
/// pool's `reserveUsd` estimate from an upstream price feed.
pub fn check_liquidity(liquidity_usd: Decimal) -> Result<(), RejectReason> {
    if liquidity_usd < TVL_MIN_USD {
        return Err(RejectReason::LowLiq);
    }
    Ok(())
}

/// Rule 3: pre-computed external safety signal must clear the floor.
pub fn check_safety_score(asset: &AssetDescriptor) -> Result<(), RejectReason> {
    if asset.safety_score < MIN_SAFETY_SCORE {
        return Err(RejectReason::LowScore);
    }
    Ok(())
}

/// Rule 4: at least one candidate pair must land in the hop window with
/// a positive gross spread. Returns the surviving subset so later rules
/// don't re-scan the full candidate list.
pub fn check_has_pairs(candidates: &[PairPlan]) -> Result<Vec<PairPlan>, RejectReason> {
    let eligible: Vec<PairPlan> = candidates
        .iter()
        .filter(|p| (MIN_HOPS..=MAX_HOPS).contains(&p.hops) && p.est_gross_bps > 0)
        .cloned()
        .collect();
    if eligible.is_empty() {
        return Err(RejectReason::NoPairs);
    }
    Ok(eligible)
}

/// Rule 5: after deducting slippage and the gas-safety margin, at least
/// one pair must clear `roiMinBps`.
pub fn check_profitable(candidates: Vec<PairPlan>, config: &ConfigSnapshot) -> Result<Vec<PairPlan>, RejectReason> {
    let policy = &config.policies;
    let profitable: Vec<PairPlan> = candidates
        .into_iter()
        .map(|mut p| {
            p.recompute_profit(policy.gas_safety_bps);
            p
        })
        .filter(|p| p.est_profit_bps >= policy.roi_min_bps)
        .collect();
    if profitable.is_empty() {
        return Err(RejectReason::NoProfit);
    }
    Ok(profitable)
}

/// Rule 6: the route must be flash-loan-atomic (spec §4.6).
pub fn check_atomic(candidates: Vec<PairPlan>) -> Result<Vec<PairPlan>, RejectReason> {
    let atomic: Vec<PairPlan> = candidates.into_iter().filter(|p| p.atomic).collect();
    if atomic.is_empty() {
        return Err(RejectReason::NotAtomic);
    }
    Ok(atomic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(hops: u8, gross_bps: i64, atomic: bool) -> PairPlan {
        PairPlan {
            route: vec!["a".into(), "b".into()],
            hops,
            est_gross_bps: gross_bps,
            est_slippage_bps: 10,
            est_gas_usd: 0.1,
            est_profit_bps: 0,
            atomic,
            pools_used: vec![],
            reasons_block: None,
        }
    }

    #[test]
    fn liquidity_rule_rejects_below_floor() {
        assert_eq!(check_liquidity(dec!(999_999)), Err(RejectReason::LowLiq));
        assert!(check_liquidity(dec!(1_000_000)).is_ok());
    }

    #[test]
    fn pairs_rule_filters_by_hop_window_and_positive_spread() {
        let candidates = vec![plan(1, 50, true), plan(4, 50, true), plan(2, -10, true)];
        assert_eq!(check_has_pairs(&candidates), Err(RejectReason::NoPairs));
        let candidates = vec![plan(2, 50, true)];
        assert_eq!(check_has_pairs(&candidates).unwrap().len(), 1);
    }

    #[test]
    fn atomic_rule_drops_non_atomic_routes() {
        let candidates = vec![plan(2, 50, false)];
        assert_eq!(check_atomic(candidates), Err(RejectReason::NotAtomic));
    }
}
