//! Ties one chain's scan-round output to the orchestrator and publisher:
//! groups candidates by the asset they route from, runs each group
//! through `orchestrator::validate`, and publishes every admitted plan.

use crate::scan::{ScanRoundResult, ScannedOpportunity};
use orchestrator::{AdmissionTable, AssetKey};
use publisher::{Event, Publisher};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use types::asset::ValidationStatus;
use types::config_snapshot::ConfigSnapshot;
use types::opportunity::Opportunity;

/// Admits and publishes every candidate `scan_chain_round` produced for
/// `chain_id` in this round.
pub fn admit_and_publish(
    chain_id: u64,
    round: ScanRoundResult,
    config: &ConfigSnapshot,
    table: &AdmissionTable,
    publisher: &Publisher,
    now_ms: u64,
) {
    let ScanRoundResult { opportunities, liquidity_usd } = round;

    let mut by_asset: HashMap<String, Vec<ScannedOpportunity>> = HashMap::new();
    for candidate in opportunities {
        let address = candidate.base_token().to_string();
        by_asset.entry(address).or_default().push(candidate);
    }

    for (address, group) in by_asset {
        let Some(asset) = config.assets.iter().find(|a| a.chain_id == chain_id && a.address == address) else {
            tracing::debug!(chain_id, address = %address, "scan produced a route for an unconfigured asset, skipping");
            continue;
        };

        let key = AssetKey { chain_id, address: address.clone() };
        table.transition(&key, ValidationStatus::Validating, &config.version);

        let candidate_pairs: Vec<_> = group.iter().map(|c| c.plan.clone()).collect();
        let input = orchestrator::ValidationInput {
            asset,
            config,
            liquidity_usd: liquidity_usd.get(&address).copied().unwrap_or(dec!(0)),
            candidate_pairs: &candidate_pairs,
        };
        let result = orchestrator::validate(&input);

        if !result.valid {
            table.transition(&key, ValidationStatus::Rejected, &config.version);
            let reason = result.reason.map(|r| r.as_str().to_string()).unwrap_or_default();
            publisher.emit(Event::AssetRejected { trace_id: config.version.clone(), asset: address.clone(), reason });
            continue;
        }

        table.transition(&key, ValidationStatus::Valid, &config.version);
        publisher.emit(Event::AssetValidated { trace_id: config.version.clone(), asset: address.clone() });

        let admitted_routes: Vec<Vec<String>> = result.pairs.unwrap_or_default().into_iter().map(|p| p.route).collect();
        for candidate in &group {
            if !admitted_routes.contains(&candidate.plan.route) {
                continue;
            }
            if orchestrator::add_to_trading(table, &key, vec![candidate.plan.clone()]).is_err() {
                continue;
            }
            publish_opportunity(chain_id, candidate, publisher, now_ms);
        }
    }
}

fn publish_opportunity(chain_id: u64, candidate: &ScannedOpportunity, publisher: &Publisher, now_ms: u64) {
    let pool_addresses: Vec<String> = candidate.plan.pools_used.iter().map(|p| p.address.clone()).collect();
    let amount_in = candidate.amount_in.to_f64().unwrap_or(0.0);
    let block_number = now_ms / 1000; // no block-indexed source at this layer; ms bucket is stable enough for dedup quantization
    let id = Opportunity::compute_id(chain_id, &pool_addresses, amount_in, block_number);

    let opportunity = Opportunity {
        id,
        chain_id,
        dex_in: candidate.dex_in.clone(),
        dex_out: candidate.dex_out.clone(),
        base_token: candidate.base_token().to_string(),
        quote_token: candidate.quote_token().to_string(),
        amount_in,
        est_profit_usd: candidate.est_profit_usd.to_f64().unwrap_or(0.0),
        gas_usd: candidate.plan.est_gas_usd,
        ts: now_ms,
    };

    publisher.publish(opportunity, now_ms);
}
