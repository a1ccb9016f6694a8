//! Candidate pairs and admitted plans produced by search (C5) and refined by
//! the size optimizer (C6) before the orchestrator (C7) admits them.

use serde::{Deserialize, Serialize};

/// `(tokenIn, tokenOut)` generated only when `tokenOut` belongs to the
/// configured quote-set (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairCandidate {
    pub token_in: String,
    pub token_out: String,
}

/// Reference to one pool used within a route, carried on `PairPlan` for
/// downstream execution/auditing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRef {
    pub dex_id: String,
    pub address: String,
}

/// An admitted route with full economics (spec §3).
///
/// Invariants enforced by the orchestrator before publication:
/// `est_profit_bps >= roi_min_bps && atomic == true && hops in [2,3]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairPlan {
    pub route: Vec<String>,
    pub hops: u8,
    pub est_gross_bps: i64,
    pub est_slippage_bps: i64,
    pub est_gas_usd: f64,
    pub est_profit_bps: i64,
    pub atomic: bool,
    pub pools_used: Vec<PoolRef>,
    /// Populated only when a promising route was dropped during
    /// optimization (`NO_PROFIT`, `NOT_ATOMIC`, stale snapshot) — spec §7.
    pub reasons_block: Option<Vec<String>>,
}

impl PairPlan {
    pub fn recompute_profit(&mut self, gas_safety_bps: i64) {
        self.est_profit_bps = self.est_gross_bps - self.est_slippage_bps - gas_safety_bps;
    }

    pub fn is_publishable(&self, roi_min_bps: i64) -> bool {
        self.est_profit_bps >= roi_min_bps && self.atomic && (2..=3).contains(&self.hops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> PairPlan {
        PairPlan {
            route: vec!["pancakeswap".into(), "sushiswap".into()],
            hops: 2,
            est_gross_bps: 100,
            est_slippage_bps: 10,
            est_gas_usd: 0.2,
            est_profit_bps: 70,
            atomic: true,
            pools_used: vec![],
            reasons_block: None,
        }
    }

    #[test]
    fn publishable_requires_profit_atomicity_and_hop_count() {
        let mut p = plan();
        assert!(p.is_publishable(5));
        p.atomic = false;
        assert!(!p.is_publishable(5));
        p.atomic = true;
        p.hops = 4;
        assert!(!p.is_publishable(5));
    }

    #[test]
    fn recompute_profit_subtracts_slippage_and_gas_safety() {
        let mut p = plan();
        p.recompute_profit(20);
        assert_eq!(p.est_profit_bps, 100 - 10 - 20);
    }
}
