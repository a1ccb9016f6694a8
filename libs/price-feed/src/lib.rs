//! Price Feed (spec §4.4 / C4): aggregates `priceAtMargin` across a
//! caller-specified pool set into a `poolAddress -> price` map.
//!
//! ## Purpose
//! A pure dispatcher over `amm::adapter::quote` — it holds no state and
//! makes no RPC calls of its own. The arbitrage search (`search` crate)
//! calls this once per scan round over the pools it is about to compare,
//! rather than re-deriving marginal price from snapshots itself.
//!
//! ## Integration Points
//! Consumes `(PoolDescriptor, PoolSnapshot)` pairs the way `registry`
//! hands them out; produces the `base->quote` price every pool in the
//! scan round needs for the 2-leg price-diff comparison and the 3-leg
//! log-price graph edge weights.
//!
//! ## Architecture Role
//! Kept as its own crate (rather than folded into `amm` or `search`) so
//! the aggregation/decimals-adjustment policy has one home and both
//! search strategies share it instead of reimplementing pool-to-price
//! conversion twice.

use rust_decimal::Decimal;
use std::collections::HashMap;
use types::{ErrorKind, PoolDescriptor, PoolSnapshot};

/// One pool's quoted marginal price, decimals-adjusted `base -> quote`.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolPrice {
    pub pool_address: String,
    pub dex_id: String,
    pub base: String,
    pub quote: String,
    pub price: Decimal,
    pub fee_bps: u32,
}

/// Quotes `price_at_margin` for every `(descriptor, snapshot)` pair,
/// skipping (not failing) pools the adapter can't currently price —
/// those are the same pools the search stage would skip anyway (spec
/// §4.5 edge-case policy), so the feed just omits them from the map
/// rather than surfacing a per-pool error to the caller.
pub fn aggregate(pools: &[(PoolDescriptor, PoolSnapshot)]) -> HashMap<String, PoolPrice> {
    let mut out = HashMap::with_capacity(pools.len());
    for (descriptor, snapshot) in pools {
        match price_at_margin(descriptor, snapshot) {
            Ok(price) => {
                out.insert(
                    descriptor.address.clone(),
                    PoolPrice {
                        pool_address: descriptor.address.clone(),
                        dex_id: descriptor.dex_id.clone(),
                        base: descriptor.base.clone(),
                        quote: descriptor.quote.clone(),
                        price,
                        fee_bps: descriptor.fee_bps,
                    },
                );
            }
            Err(e) => {
                tracing::debug!(pool = %descriptor.address, error = %e, "price feed skipping unquotable pool");
            }
        }
    }
    out
}

/// Spot marginal price `base -> quote`, independent of trade size: the
/// adapter computes this from the snapshot's reserves/sqrt-price/balances
/// regardless of `amountIn`, so a zero-amount quote is sufficient and
/// never double-charges fees into the spot price.
pub fn price_at_margin(descriptor: &PoolDescriptor, snapshot: &PoolSnapshot) -> Result<Decimal, ErrorKind> {
    amm::adapter::quote(descriptor, snapshot, Decimal::ZERO).map(|q| q.price_at_margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use types::pool::{FamilyParams, PoolFamily};

    fn pool(address: &str, base: &str, quote: &str) -> PoolDescriptor {
        PoolDescriptor {
            chain_id: 56,
            dex_id: "pancakeswap".into(),
            address: address.into(),
            base: base.into(),
            quote: quote.into(),
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
            observed_at_ms: 0,
            source: "rpc".into(),
        }
    }

    #[test]
    fn aggregate_computes_price_per_pool() {
        let pools = vec![
            (pool("0xpoolA", "0xweth", "0xusdc"), snap(100, 250_000)),
            (pool("0xpoolB", "0xweth", "0xusdc"), snap(100, 252_500)),
        ];
        let prices = aggregate(&pools);
        assert_eq!(prices.len(), 2);
        assert_eq!(prices["0xpoolA"].price, dec!(2500));
        assert_eq!(prices["0xpoolB"].price, dec!(2525));
    }

    #[test]
    fn aggregate_skips_unquotable_pools_without_erroring() {
        let pools = vec![(pool("0xdead", "0xweth", "0xusdc"), snap(0, 1000))];
        let prices = aggregate(&pools);
        assert!(prices.is_empty());
    }
}
