//! One chain's scan round: fetch fresh snapshots, search for candidates,
//! size each one, and hand back `PairPlan`s ready for the orchestrator.
//!
//! This is the engine's version of the spec's scan-round description
//! (§5): "within one scan round, all pools used by a candidate route are
//! sampled from snapshots observed in the same logical instant" — we
//! achieve that by calling `bulk_refresh` once up front and reading only
//! from the resulting map for the rest of the round.

use amm::optimal_size::{self, RouteLeg, SizingInput};
use registry::PoolRegistry;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use search::SearchConfig;
use std::collections::HashMap;
use types::chain::ChainDescriptor;
use types::config_snapshot::PolicyConfig;
use types::pair::{PairPlan, PoolRef};
use types::pool::{PoolDescriptor, PoolSnapshot};

/// A sized candidate plus the fields `Opportunity` needs that don't
/// belong on `PairPlan` itself (that type is shared with the
/// orchestrator's admission contract and only carries bps/atomicity).
#[derive(Debug, Clone)]
pub struct ScannedOpportunity {
    pub plan: PairPlan,
    pub amount_in: Decimal,
    pub est_profit_usd: Decimal,
    pub dex_in: String,
    pub dex_out: String,
}

impl ScannedOpportunity {
    pub fn base_token(&self) -> &str {
        self.plan.route.first().map(String::as_str).unwrap_or_default()
    }

    pub fn quote_token(&self) -> &str {
        self.plan.route.last().map(String::as_str).unwrap_or_default()
    }
}

/// What a scan round hands back to the engine: every sized candidate,
/// plus a per-token liquidity estimate the orchestrator's `LOW_LIQ` rule
/// can use without the orchestrator itself depending on `price-feed`.
pub struct ScanRoundResult {
    pub opportunities: Vec<ScannedOpportunity>,
    pub liquidity_usd: HashMap<String, Decimal>,
}

/// Runs one scan round for `chain`, returning every candidate produced,
/// sized but not yet orchestrator-admitted.
pub async fn scan_chain_round(
    registry: &PoolRegistry,
    chain: &ChainDescriptor,
    pool_descriptors: &[PoolDescriptor],
    policy: &PolicyConfig,
    quote_set: &[String],
    native_price_usd: Decimal,
    now_ms: u64,
    search_config: &SearchConfig,
) -> ScanRoundResult {
    let snapshots = registry.bulk_refresh(chain.chain_id, now_ms).await;

    let mut by_address: HashMap<String, PoolSnapshot> = HashMap::with_capacity(snapshots.len());
    for (address, result) in snapshots {
        match result {
            Ok(snapshot) => {
                by_address.insert(address, snapshot);
            }
            Err(e) => {
                tracing::debug!(pool = %address, error = %e, "skipping pool with unrefreshable snapshot this round");
            }
        }
    }

    let pools: Vec<(PoolDescriptor, PoolSnapshot)> = pool_descriptors
        .iter()
        .filter_map(|d| by_address.get(&d.address).map(|s| (d.clone(), s.clone())))
        .collect();

    let liquidity_usd = liquidity_proxy(&pools, quote_set);

    let candidates = search::scan_chain(chain.chain_id, &pools, now_ms, search_config);
    tracing::info!(chain_id = chain.chain_id, count = candidates.len(), "scan round produced candidates");

    let by_address_desc: HashMap<&str, &PoolDescriptor> =
        pool_descriptors.iter().map(|d| (d.address.as_str(), d)).collect();

    let mut plans = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let Some(descriptors) = resolve_legs(&candidate.pools, &by_address_desc) else {
            continue;
        };
        let legs: Vec<RouteLeg> = descriptors
            .iter()
            .filter_map(|d| by_address.get(&d.address).map(|s| RouteLeg { descriptor: d, snapshot: s }))
            .collect();
        if legs.len() != descriptors.len() {
            continue; // a leg's snapshot vanished between search and sizing
        }

        let sizing_input = SizingInput {
            chain,
            policy,
            legs: &legs,
            native_price_usd,
            // A route's profit is denominated in its own input token;
            // treating it as already USD-equivalent here is the same
            // simplification `price-feed` makes for quote-set tokens.
            token_price_usd: Decimal::ONE,
        };
        let sized = optimal_size::optimize(&sizing_input);

        let plan = PairPlan {
            route: candidate.token_path.clone(),
            hops: candidate.hops,
            est_gross_bps: sized.est_gross_bps.max(candidate.est_gross_bps),
            est_slippage_bps: sized.est_slippage_bps,
            est_gas_usd: sized.est_gas_usd.to_f64().unwrap_or(0.0),
            est_profit_bps: sized.est_profit_bps,
            atomic: sized.atomic,
            pools_used: candidate.pools.clone(),
            reasons_block: if sized.is_profitable { None } else { Some(vec!["NO_PROFIT".to_string()]) },
        };
        plans.push(ScannedOpportunity {
            plan,
            amount_in: sized.amount_in,
            est_profit_usd: sized.est_profit_usd,
            dex_in: descriptors.first().map(|d| d.dex_id.clone()).unwrap_or_default(),
            dex_out: descriptors.last().map(|d| d.dex_id.clone()).unwrap_or_default(),
        });
    }

    ScanRoundResult { opportunities: plans, liquidity_usd }
}

fn resolve_legs<'a>(
    refs: &[PoolRef],
    by_address: &HashMap<&str, &'a PoolDescriptor>,
) -> Option<Vec<&'a PoolDescriptor>> {
    refs.iter().map(|r| by_address.get(r.address.as_str()).copied()).collect()
}

/// Per-token liquidity estimate for the orchestrator's `LOW_LIQ` rule
/// (spec §4.7 rule 2), built without a real USD price oracle (spec §1
/// non-goal): every pool's non-quote-set side is valued through
/// `price_feed::price_at_margin` into its quote-set side, and a
/// quote-set token is assumed to be worth $1 — true for the configured
/// stablecoins/majors (`USDC`/`USDT`/`DAI`/`WETH`/`WBTC`) this engine
/// ships with by default, an approximation for anything else an operator
/// adds to `quote_set`.
fn liquidity_proxy(pools: &[(PoolDescriptor, PoolSnapshot)], quote_set: &[String]) -> HashMap<String, Decimal> {
    use search::candidate::pool_depth;
    let mut out: HashMap<String, Decimal> = HashMap::new();

    for (descriptor, snapshot) in pools {
        let depth = pool_depth(snapshot);
        if quote_set.iter().any(|q| q == &descriptor.quote) {
            let Ok(price) = price_feed::price_at_margin(descriptor, snapshot) else {
                continue;
            };
            let value_in_quote = depth * price;
            *out.entry(descriptor.base.clone()).or_insert(Decimal::ZERO) += value_in_quote;
        }
        if quote_set.iter().any(|q| q == &descriptor.base) {
            *out.entry(descriptor.quote.clone()).or_insert(Decimal::ZERO) += depth;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use types::pool::{FamilyParams, PoolFamily};

    fn v2_pool(address: &str, base: &str, quote: &str, reserve_base: u128, reserve_quote: u128) -> (PoolDescriptor, PoolSnapshot) {
        let descriptor = PoolDescriptor {
            chain_id: 56,
            dex_id: "pancakeswap".into(),
            address: address.into(),
            base: base.into(),
            quote: quote.into(),
            fee_bps: 30,
            family: PoolFamily::ConstantProduct,
            params: FamilyParams::ConstantProduct,
            flash_loan_compatible: true,
        };
        let snapshot = PoolSnapshot::ConstantProduct {
            reserve_base,
            reserve_quote,
            block_number: 1,
            observed_at_ms: 0,
            source: "test".into(),
        };
        (descriptor, snapshot)
    }

    #[test]
    fn liquidity_proxy_values_base_side_through_quote_price() {
        let pools = vec![v2_pool("0xpool", "0xweth", "0xusdc", 10u128.pow(18), 3_000 * 10u128.pow(6))];
        let quote_set = vec!["0xusdc".to_string()];
        let result = liquidity_proxy(&pools, &quote_set);
        let weth_liquidity = result.get("0xweth").copied().unwrap_or(dec!(0));
        assert!(weth_liquidity > dec!(0));
    }

    #[test]
    fn liquidity_proxy_ignores_pools_with_no_quote_set_side() {
        let pools = vec![v2_pool("0xpool", "0xfoo", "0xbar", 1_000, 1_000)];
        let quote_set = vec!["0xusdc".to_string()];
        let result = liquidity_proxy(&pools, &quote_set);
        assert!(result.is_empty());
    }
}
