//! The raw candidate route produced by either scan, before the size
//! optimizer (C6) has picked a trade size or the orchestrator (C7) has
//! admitted it.

use rust_decimal::Decimal;
use types::pair::PoolRef;
use types::pool::PoolSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub chain_id: u64,
    /// Token addresses visited, length `hops + 1`. For a 3-leg cycle the
    /// first and last entries are the same token.
    pub token_path: Vec<String>,
    /// Pools traversed, in order, length `hops`.
    pub pools: Vec<PoolRef>,
    /// `dexId` per pool, parallel to `pools` — kept alongside for the
    /// lexicographic tie-break (spec §4.5) without re-deriving it from
    /// `pools`.
    pub dex_ids: Vec<String>,
    pub hops: u8,
    /// Estimated gross spread before fees/gas/slippage, in bps.
    pub est_gross_bps: i64,
    /// Smallest single-pool depth along the route — a relative proxy
    /// used only for the tie-break in spec §4.5, not an absolute
    /// liquidity threshold (that's the orchestrator's `LOW_LIQ` rule,
    /// which needs a USD-denominated figure this subsystem never
    /// computes).
    pub min_pool_depth: Decimal,
}

impl Candidate {
    /// Tie-break order from spec §4.5: fewer hops, then higher minimum
    /// pool liquidity, then lexicographically smaller `dexId` list —
    /// applied only when `est_gross_bps` ties, via the caller sorting on
    /// `(Reverse(est_gross_bps), hops, Reverse(min_pool_depth), dex_ids)`.
    pub fn tie_break_key(&self) -> (std::cmp::Reverse<i64>, u8, std::cmp::Reverse<OrderedDecimal>, Vec<String>) {
        (
            std::cmp::Reverse(self.est_gross_bps),
            self.hops,
            std::cmp::Reverse(OrderedDecimal(self.min_pool_depth)),
            self.dex_ids.clone(),
        )
    }
}

/// `Decimal` doesn't implement `Ord` in a way `Reverse` likes directly for
/// sort keys mixed with other tuple members in older rust_decimal
/// versions callers might pin; wrapping keeps the tie-break key simple
/// and total-ordered.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct OrderedDecimal(pub Decimal);

impl Eq for OrderedDecimal {}
impl Ord for OrderedDecimal {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(std::cmp::Ordering::Equal)
    }
}

/// Family-agnostic depth proxy: the smaller side of a pool's state, used
/// only to compare pools against each other within one scan round.
pub fn pool_depth(snapshot: &PoolSnapshot) -> Decimal {
    use rust_decimal::prelude::FromPrimitive;
    let to_dec = |x: u128| Decimal::from_u128(x).unwrap_or(Decimal::MAX);
    match snapshot {
        PoolSnapshot::ConstantProduct { reserve_base, reserve_quote, .. } => {
            to_dec(*reserve_base).min(to_dec(*reserve_quote))
        }
        PoolSnapshot::Concentrated { liquidity, .. } => to_dec(*liquidity),
        PoolSnapshot::StableSwap { reserves, .. } => {
            reserves.iter().map(|r| to_dec(*r)).min().unwrap_or(Decimal::ZERO)
        }
        PoolSnapshot::Weighted { balances, .. } => {
            balances.iter().map(|b| to_dec(*b)).min().unwrap_or(Decimal::ZERO)
        }
    }
}

/// Is this snapshot too old to trust in the current scan round (spec
/// §4.5 edge-case policy: stale snapshots, older than `2*ttl`, are
/// skipped)?
pub fn is_stale(snapshot: &PoolSnapshot, now_ms: u64, ttl_ms: u64) -> bool {
    snapshot.is_stale(now_ms, ttl_ms)
}
