//! 2-leg pair scan (spec §4.5): group pools by unordered token-pair key,
//! compare every unordered pair of pools from distinct DEXs, emit a
//! candidate when the price gap clears the 1bp threshold.

use crate::candidate::{is_stale, pool_depth, Candidate};
use price_feed::price_at_margin;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use types::pair::PoolRef;
use types::pool::{PoolDescriptor, PoolSnapshot};

/// Minimum relative price gap to emit a candidate (spec §4.5: `>= 1bp`).
const MIN_PRICE_GAP: Decimal = dec!(0.0001);

/// Scans one chain's pools for 2-leg inter-DEX arbitrage.
///
/// `pools` is every pool on the chain with its latest snapshot, as handed
/// out by the registry at scan start (spec §5: all pools in one round
/// are sampled from snapshots observed at the same logical instant).
pub fn scan_two_leg(
    chain_id: u64,
    pools: &[(PoolDescriptor, PoolSnapshot)],
    now_ms: u64,
    ttl_ms: u64,
) -> Vec<Candidate> {
    let mut groups: HashMap<(String, String), Vec<&(PoolDescriptor, PoolSnapshot)>> = HashMap::new();
    for entry @ (descriptor, snapshot) in pools {
        if is_stale(snapshot, now_ms, ttl_ms) {
            continue;
        }
        groups.entry(descriptor.token_pair_key()).or_default().push(entry);
    }

    let mut candidates = Vec::new();
    for group in groups.values() {
        if group.len() < 2 {
            continue;
        }
        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                let (d1, s1) = group[i];
                let (d2, s2) = group[j];
                // Same-DEX 2-leg routes are skipped (spec §4.5).
                if d1.dex_id == d2.dex_id {
                    continue;
                }
                if let Some(candidate) = evaluate_pair(chain_id, d1, s1, d2, s2) {
                    candidates.push(candidate);
                }
            }
        }
    }
    candidates
}

fn evaluate_pair(
    chain_id: u64,
    d1: &PoolDescriptor,
    s1: &PoolSnapshot,
    d2: &PoolDescriptor,
    s2: &PoolSnapshot,
) -> Option<Candidate> {
    let p1 = price_at_margin(d1, s1).ok()?;
    let p2 = price_at_margin(d2, s2).ok()?;
    if p1 <= Decimal::ZERO || p2 <= Decimal::ZERO {
        return None;
    }

    let min_price = p1.min(p2);
    let gap = (p1 - p2).abs() / min_price;
    if gap < MIN_PRICE_GAP {
        return None;
    }

    // Buy base where it's cheap (lower base->quote price means more base
    // per unit quote), sell where it's expensive.
    let (cheap, expensive) = if p1 < p2 { (d1, d2) } else { (d2, d1) };

    let depth = pool_depth(s1).min(pool_depth(s2));
    let mut dex_ids = vec![cheap.dex_id.clone(), expensive.dex_id.clone()];
    dex_ids.sort();

    Some(Candidate {
        chain_id,
        token_path: vec![cheap.quote.clone(), cheap.base.clone(), expensive.quote.clone()],
        pools: vec![
            PoolRef { dex_id: cheap.dex_id.clone(), address: cheap.address.clone() },
            PoolRef { dex_id: expensive.dex_id.clone(), address: expensive.address.clone() },
        ],
        dex_ids,
        hops: 2,
        est_gross_bps: (gap * dec!(10000)).round().to_i64().unwrap_or(i64::MAX),
        min_pool_depth: depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::pool::{FamilyParams, PoolFamily};

    fn pool(dex_id: &str, address: &str) -> PoolDescriptor {
        PoolDescriptor {
            chain_id: 56,
            dex_id: dex_id.into(),
            address: address.into(),
            base: "0xweth".into(),
            quote: "0xusdc".into(),
            fee_bps: 30,
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

    /// Spec §8 scenario 1: two pools for (WETH, USDC) on chain 56 with a
    /// ~1% price gap — emits a 2-hop candidate.
    #[test]
    fn emits_candidate_for_cross_dex_price_gap() {
        let pools = vec![
            (pool("pancakeswap", "0xpoolA"), snap(100 * 10u128.pow(18), 250_000 * 10u128.pow(6))),
            (pool("sushiswap", "0xpoolB"), snap(100 * 10u128.pow(18), 252_500 * 10u128.pow(6))),
        ];
        let candidates = scan_two_leg(56, &pools, 2_000, 2_000);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].hops, 2);
        assert!(candidates[0].est_gross_bps >= 90 && candidates[0].est_gross_bps <= 110);
    }

    #[test]
    fn same_dex_pair_is_skipped() {
        let pools = vec![
            (pool("pancakeswap", "0xpoolA"), snap(100, 250_000)),
            (pool("pancakeswap", "0xpoolB"), snap(100, 300_000)),
        ];
        assert!(scan_two_leg(56, &pools, 2_000, 2_000).is_empty());
    }

    #[test]
    fn stale_snapshot_is_skipped() {
        let mut pools = vec![
            (pool("pancakeswap", "0xpoolA"), snap(100, 250_000)),
            (pool("sushiswap", "0xpoolB"), snap(100, 252_500)),
        ];
        // observed_at_ms = 1_000, ttl = 100 -> stale if now - observed > 200
        pools[1].1 = PoolSnapshot::ConstantProduct {
            reserve_base: 100,
            reserve_quote: 252_500,
            block_number: 1,
            observed_at_ms: 0,
            source: "rpc".into(),
        };
        assert!(scan_two_leg(56, &pools, 1_000, 100).is_empty());
    }

    #[test]
    fn tiny_price_gap_below_one_bp_is_not_emitted() {
        let pools = vec![
            (pool("pancakeswap", "0xpoolA"), snap(100, 250_000)),
            (pool("sushiswap", "0xpoolB"), snap(100, 250_001)),
        ];
        assert!(scan_two_leg(56, &pools, 2_000, 2_000).is_empty());
    }
}
