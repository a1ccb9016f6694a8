//! 3-leg circular scan (spec §4.5, §9): a flat, per-round arena graph —
//! tokens indexed `0..N`, edges in a `Vec<(fromIdx, toIdx, weight,
//! poolIdx)>` — with Bellman-Ford run from each start token to find
//! negative-weight cycles (profitable circular routes). No heap pointers
//! between nodes; the whole arena is dropped at the end of the scan
//! round, matching the design note's "single deallocation" requirement.

use crate::candidate::{is_stale, pool_depth, Candidate};
use price_feed::price_at_margin;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;
use types::pair::PoolRef;
use types::pool::{PoolDescriptor, PoolSnapshot};

struct Edge {
    from: usize,
    to: usize,
    /// `-ln(effective price after fee)`, base->quote direction of travel.
    weight: f64,
    pool_address: String,
    dex_id: String,
    depth: rust_decimal::Decimal,
}

/// The per-round token/edge arena.
pub struct Arena {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
}

impl Arena {
    pub fn new() -> Self {
        Self { tokens: Vec::new(), index: HashMap::new(), edges: Vec::new() }
    }

    fn token_idx(&mut self, token: &str) -> usize {
        if let Some(&idx) = self.index.get(token) {
            return idx;
        }
        let idx = self.tokens.len();
        self.tokens.push(token.to_string());
        self.index.insert(token.to_string(), idx);
        idx
    }

    /// Adds both directed edges for one pool: `base->quote` at the quoted
    /// price, `quote->base` at its reciprocal, each net of `feeBps`.
    fn add_pool(&mut self, descriptor: &PoolDescriptor, snapshot: &PoolSnapshot) {
        let Ok(price) = price_at_margin(descriptor, snapshot) else { return };
        if price <= rust_decimal::Decimal::ZERO {
            return;
        }
        let Some(price_f) = price.to_f64() else { return };
        if !price_f.is_finite() || price_f <= 0.0 {
            return;
        }
        let fee_mult = 1.0 - (descriptor.fee_bps as f64 / 10_000.0);
        if fee_mult <= 0.0 {
            return;
        }
        let depth = pool_depth(snapshot);

        let base = self.token_idx(&descriptor.base);
        let quote = self.token_idx(&descriptor.quote);

        // base -> quote: `price_f` quote per base, net of fee.
        self.edges.push(Edge {
            from: base,
            to: quote,
            weight: -(price_f * fee_mult).ln(),
            pool_address: descriptor.address.clone(),
            dex_id: descriptor.dex_id.clone(),
            depth,
        });
        // quote -> base: reciprocal price, net of fee.
        self.edges.push(Edge {
            from: quote,
            to: base,
            weight: -((1.0 / price_f) * fee_mult).ln(),
            pool_address: descriptor.address.clone(),
            dex_id: descriptor.dex_id.clone(),
            depth,
        });
    }

    pub fn node_count(&self) -> usize {
        self.tokens.len()
    }
}

/// Builds the arena from one chain's pools, skipping stale snapshots
/// (spec §4.5 edge-case policy) the same way the 2-leg scan does.
pub fn build_arena(pools: &[(PoolDescriptor, PoolSnapshot)], now_ms: u64, ttl_ms: u64) -> Arena {
    let mut arena = Arena::new();
    for (descriptor, snapshot) in pools {
        if is_stale(snapshot, now_ms, ttl_ms) {
            continue;
        }
        arena.add_pool(descriptor, snapshot);
    }
    arena
}

/// Runs Bellman-Ford from every token, collecting the most-negative
/// 3-hop cycle per start token, capped at `max_cycles` total (spec §4.5:
/// "cap at 10 cycles/chain/round").
pub fn find_negative_cycles(chain_id: u64, arena: &Arena, max_cycles: usize) -> Vec<Candidate> {
    let n = arena.node_count();
    let mut results = Vec::new();
    if n == 0 {
        return results;
    }

    for start in 0..n {
        if results.len() >= max_cycles {
            break;
        }
        if let Some(candidate) = bellman_ford_cycle_from(chain_id, arena, start) {
            results.push(candidate);
        }
    }
    results
}

const EPS: f64 = 1e-12;

fn bellman_ford_cycle_from(chain_id: u64, arena: &Arena, start: usize) -> Option<Candidate> {
    let n = arena.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut pred_edge: Vec<Option<usize>> = vec![None; n];
    dist[start] = 0.0;

    for _ in 0..n.saturating_sub(1) {
        let mut changed = false;
        for (ei, e) in arena.edges.iter().enumerate() {
            if dist[e.from].is_finite() && dist[e.from] + e.weight < dist[e.to] - EPS {
                dist[e.to] = dist[e.from] + e.weight;
                pred_edge[e.to] = Some(ei);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    // One more relaxation pass: any edge that still relaxes touches a
    // negative cycle.
    let mut cycle_node = None;
    for e in arena.edges.iter() {
        if dist[e.from].is_finite() && dist[e.from] + e.weight < dist[e.to] - EPS {
            cycle_node = Some(e.to);
            break;
        }
    }
    let mut x = cycle_node?;

    // Walk back n times to guarantee landing inside the cycle.
    for _ in 0..n {
        x = arena.edges[pred_edge[x]?].from;
    }

    // Walk the cycle from `x` until we return to it, collecting edges.
    let mut cycle_edges = Vec::new();
    let mut cur = x;
    loop {
        let ei = pred_edge[cur]?;
        cycle_edges.push(ei);
        cur = arena.edges[ei].from;
        if cur == x {
            break;
        }
        if cycle_edges.len() > n {
            // Defensive: malformed predecessor chain, bail rather than loop forever.
            return None;
        }
    }
    cycle_edges.reverse();

    // Spec §4.5: only 3-leg cycles qualify here (2-leg is the other scan).
    if cycle_edges.len() != 3 {
        return None;
    }

    // Routes that reuse the same physical pool in both directions are skipped.
    let pool_addrs: Vec<&str> = cycle_edges.iter().map(|&ei| arena.edges[ei].pool_address.as_str()).collect();
    if pool_addrs[0] == pool_addrs[1] || pool_addrs[1] == pool_addrs[2] || pool_addrs[0] == pool_addrs[2] {
        return None;
    }

    let total_weight: f64 = cycle_edges.iter().map(|&ei| arena.edges[ei].weight).sum();
    if total_weight >= 0.0 {
        return None;
    }

    // gross fraction = exp(-total_weight) - 1; total_weight = -ln(product of effective prices).
    let gross_fraction = (-total_weight).exp() - 1.0;
    let est_gross_bps = (gross_fraction * 10_000.0).round() as i64;

    let mut token_path = Vec::with_capacity(4);
    token_path.push(arena.tokens[arena.edges[cycle_edges[0]].from].clone());
    let mut pools = Vec::with_capacity(3);
    let mut dex_ids = Vec::with_capacity(3);
    let mut min_depth = None;
    for &ei in &cycle_edges {
        let e = &arena.edges[ei];
        token_path.push(arena.tokens[e.to].clone());
        pools.push(PoolRef { dex_id: e.dex_id.clone(), address: e.pool_address.clone() });
        dex_ids.push(e.dex_id.clone());
        min_depth = Some(match min_depth {
            None => e.depth,
            Some(d) => if e.depth < d { e.depth } else { d },
        });
    }
    dex_ids.sort();

    Some(Candidate {
        chain_id,
        token_path,
        pools,
        dex_ids,
        hops: 3,
        est_gross_bps,
        min_pool_depth: min_depth.unwrap_or_default(),
    })
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

    fn cp_snap(reserve_base: u128, reserve_quote: u128) -> PoolSnapshot {
        PoolSnapshot::ConstantProduct {
            reserve_base,
            reserve_quote,
            block_number: 1,
            observed_at_ms: 1_000,
            source: "rpc".into(),
        }
    }

    /// Spec §8 scenario 2: USDC->DAI (1.002), DAI->USDT (1.001),
    /// USDT->USDC (0.998) with 30bps fees per leg nets negative — no cycle.
    #[test]
    fn unprofitable_cycle_after_fees_emits_nothing() {
        let pools = vec![
            (pool("x", "0xp1", "0xusdc", "0xdai", 30), cp_snap(1_002_000, 1_000_000)),
            (pool("x", "0xp2", "0xdai", "0xusdt", 30), cp_snap(1_001_000, 1_000_000)),
            (pool("x", "0xp3", "0xusdt", "0xusdc", 30), cp_snap(998_000, 1_000_000)),
        ];
        let arena = build_arena(&pools, 2_000, 2_000);
        let cycles = find_negative_cycles(56, &arena, 10);
        assert!(cycles.is_empty(), "expected no profitable cycle, got {cycles:?}");
    }

    #[test]
    fn profitable_triangle_is_detected() {
        // Large, fee-free mispricing: going around the triangle multiplies
        // out to a net gain even after fees.
        let pools = vec![
            (pool("x", "0xp1", "0xusdc", "0xdai", 0), cp_snap(1_100_000, 1_000_000)),
            (pool("x", "0xp2", "0xdai", "0xusdt", 0), cp_snap(1_000_000, 1_000_000)),
            (pool("x", "0xp3", "0xusdt", "0xusdc", 0), cp_snap(1_000_000, 1_000_000)),
        ];
        let arena = build_arena(&pools, 2_000, 2_000);
        let cycles = find_negative_cycles(56, &arena, 10);
        assert!(!cycles.is_empty());
        assert_eq!(cycles[0].hops, 3);
        assert!(cycles[0].est_gross_bps > 0);
    }

    #[test]
    fn cap_limits_cycles_per_round() {
        let pools = vec![
            (pool("x", "0xp1", "0xusdc", "0xdai", 0), cp_snap(1_100_000, 1_000_000)),
            (pool("x", "0xp2", "0xdai", "0xusdt", 0), cp_snap(1_000_000, 1_000_000)),
            (pool("x", "0xp3", "0xusdt", "0xusdc", 0), cp_snap(1_000_000, 1_000_000)),
        ];
        let arena = build_arena(&pools, 2_000, 2_000);
        let cycles = find_negative_cycles(56, &arena, 1);
        assert!(cycles.len() <= 1);
    }
}
