//! Config snapshot validation (spec's `validate(snapshot)` operation).
//!
//! Every rule here is additive: one `errors` push makes the snapshot
//! invalid, `warnings` never do. Kept as a free function rather than a
//! method on `ConfigSnapshot` so the types crate doesn't need to depend on
//! validation policy (address shape, RPC-count recommendations, bridged
//! symbols) that belongs to this plane, not the data model.

use types::ConfigSnapshot;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Bridged-symbol markers this plane recognizes. Scoped to USDC variants only
/// per the source's actual behavior (see DESIGN.md open-question resolution);
/// USDT/DAI variants are not policed.
const BRIDGED_SYMBOL_MARKERS: &[&str] = &["USDC.e", "USDC_e", "axlUSDC"];

pub fn validate(snapshot: &ConfigSnapshot) -> ValidationReport {
    let mut report = ValidationReport::default();

    for chain in &snapshot.chains {
        let d = &chain.descriptor;
        if !is_40_hex_address(&d.wrapped_native) {
            report.errors.push(format!(
                "chain {}: wrappedNative '{}' is not a 40-hex-digit address",
                d.chain_id, d.wrapped_native
            ));
        }

        let https_count = chain.rpc_pool.https.len();
        if https_count == 0 {
            report.errors.push(format!(
                "chain {}: at least one HTTPS RPC endpoint is required",
                d.chain_id
            ));
        } else if https_count == 1 {
            report.warnings.push(format!(
                "chain {}: only one HTTPS RPC endpoint configured, two are recommended",
                d.chain_id
            ));
        }
        if chain.rpc_pool.wss.is_empty() {
            report.warnings.push(format!(
                "chain {}: no WSS endpoint configured, event-driven invalidation is degraded",
                d.chain_id
            ));
        }

        if !d.size_grid.is_valid() {
            report.errors.push(format!(
                "chain {}: sizeGrid must have min < max and steps >= 3 (got min={}, max={}, steps={})",
                d.chain_id, d.size_grid.min, d.size_grid.max, d.size_grid.steps
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for pool in &chain.pools {
            let key = pool.pool_key();
            if !seen.insert(key.clone()) {
                report.errors.push(format!(
                    "chain {}: duplicate (dexId, address) pair {:?}",
                    d.chain_id, key
                ));
            }
            if pool.fee_bps > 10_000 {
                report.errors.push(format!(
                    "chain {}: pool {} feeBps {} is out of range [0,10000]",
                    d.chain_id, pool.address, pool.fee_bps
                ));
            }
        }
    }

    if !snapshot.risk.allow_bridged_symbols {
        for asset in &snapshot.assets {
            if BRIDGED_SYMBOL_MARKERS
                .iter()
                .any(|marker| asset.symbol.contains(marker))
            {
                report.errors.push(format!(
                    "asset {} ({}): bridged-symbol variant not allowed by risk.allowBridgedSymbols=false",
                    asset.symbol, asset.address
                ));
            }
        }
    }

    report
}

fn is_40_hex_address(s: &str) -> bool {
    s.len() == 42 && s.starts_with("0x") && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}
