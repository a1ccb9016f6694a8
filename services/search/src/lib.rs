//! Arbitrage Search (spec §4.5 / C5): scans one chain's pool set for
//! 2-leg (cross-DEX) and 3-leg (circular) arbitrage routes and returns
//! them ranked by the spec's tie-break order.
//!
//! ## Purpose
//! Pure function of a pool snapshot set — no RPC, no state held across
//! rounds. Each scan is a fresh arena (`graph::Arena`) built and
//! discarded within the call.
//!
//! ## Integration Points
//! Takes `(PoolDescriptor, PoolSnapshot)` pairs from `registry`, returns
//! `Candidate`s for the size optimizer (C6) to size and the orchestrator
//! (C7) to admit.
//!
//! ## Architecture Role
//! 2-leg and 3-leg detection are kept as separate modules (`two_leg`,
//! `graph`) since they use different representations — pairwise price
//! comparison vs. a negative-cycle graph — and are combined here only at
//! the ranking step.

pub mod candidate;
pub mod graph;
pub mod two_leg;

pub use candidate::{Candidate, OrderedDecimal};

use types::pool::{PoolDescriptor, PoolSnapshot};

/// Cap on 3-leg cycles returned per chain per round (spec §4.5).
pub const MAX_CYCLES_PER_ROUND: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub ttl_ms: u64,
    pub max_cycles_per_round: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { ttl_ms: 2_000, max_cycles_per_round: MAX_CYCLES_PER_ROUND }
    }
}

/// Runs both scans over one chain's pool set and returns every candidate
/// found, sorted by the spec §4.5 tie-break:
/// `(est_gross_bps desc, hops asc, min_pool_depth desc, dex_ids asc)`.
pub fn scan_chain(
    chain_id: u64,
    pools: &[(PoolDescriptor, PoolSnapshot)],
    now_ms: u64,
    config: &SearchConfig,
) -> Vec<Candidate> {
    let mut candidates = two_leg::scan_two_leg(chain_id, pools, now_ms, config.ttl_ms);

    let arena = graph::build_arena(pools, now_ms, config.ttl_ms);
    candidates.extend(graph::find_negative_cycles(chain_id, &arena, config.max_cycles_per_round));

    candidates.sort_by_key(|c| c.tie_break_key());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::pool::{FamilyParams, PoolFamily};

    fn pool(dex_id: &str, address: &str, base: &str, quote: &str, fee_bps: u32) -> PoolDescriptor {
        PoolDescriptor {
            chain_id: 56,
            dex_id: dex_id.into(),
            address: address.into(),
            base: base.into(),
            quote: quote.into(),
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
    fn combines_and_ranks_both_scan_kinds() {
        let pools = vec![
            (pool("pancakeswap", "0xpoolA", "0xweth", "0xusdc", 30), snap(100, 250_000)),
            (pool("sushiswap", "0xpoolB", "0xweth", "0xusdc", 30), snap(100, 252_500)),
        ];
        let config = SearchConfig::default();
        let candidates = scan_chain(56, &pools, 2_000, &config);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].hops, 2);
    }

    #[test]
    fn empty_pool_set_yields_no_candidates() {
        let config = SearchConfig::default();
        assert!(scan_chain(56, &[], 2_000, &config).is_empty());
    }
}
