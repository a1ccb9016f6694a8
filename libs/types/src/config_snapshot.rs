//! The immutable config document (spec §3 ConfigSnapshot, §6 persisted
//! config layout). Behavior (load/validate/apply) lives in the `config`
//! crate; this module only defines the shape, owned read-only by every
//! component once hydrated.

use crate::chain::ChainDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcPoolConfig {
    pub wss: Vec<String>,
    pub https: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexConfig {
    pub dex_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConfig {
    pub roi_min_bps: i64,
    pub gas_safety_bps: i64,
    pub slippage_bps: i64,
    pub cap_pct_tvl: f64,
    pub bundle_max_blocks: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            roi_min_bps: 5,
            gas_safety_bps: 20,
            slippage_bps: 50,
            cap_pct_tvl: 0.10,
            bundle_max_blocks: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RiskConfig {
    pub blocklists: Vec<String>,
    pub tax_like: Vec<String>,
    pub allow_bridged_symbols: bool,
}

/// Per-chain configuration bundle: RPC pool, DEX set, pools, and the chain
/// descriptor itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub descriptor: ChainDescriptor,
    pub rpc_pool: RpcPoolConfig,
    pub dexes: Vec<DexConfig>,
    pub pools: Vec<crate::pool::PoolDescriptor>,
}

/// Immutable, versioned configuration document (spec §3, §4.8).
///
/// Ownership: owned by the Config Plane; shared read-only with all
/// components; old snapshots are referenced by in-flight operations until
/// they complete (capture-at-scan-start semantics, spec §5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    /// ISO-8601 version string.
    pub version: String,
    pub chains: Vec<ChainConfig>,
    pub assets: Vec<crate::asset::AssetDescriptor>,
    /// Quote-set a `PairCandidate` must land in (spec §4.5, §4.7 rule 4).
    pub quote_set: Vec<String>,
    pub policies: PolicyConfig,
    pub risk: RiskConfig,
    pub last_updated_epoch_ms: u64,
}

impl ConfigSnapshot {
    pub fn empty(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            chains: Vec::new(),
            assets: Vec::new(),
            quote_set: vec![
                "USDC".into(),
                "USDT".into(),
                "DAI".into(),
                "WETH".into(),
                "WBTC".into(),
            ],
            policies: PolicyConfig::default(),
            risk: RiskConfig::default(),
            last_updated_epoch_ms: 0,
        }
    }

    pub fn chain(&self, chain_id: u64) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.descriptor.chain_id == chain_id)
    }

    pub fn total_dexs(&self) -> usize {
        self.chains.iter().map(|c| c.dexes.len()).sum()
    }

    pub fn summary(&self) -> ConfigSummary {
        let mut pools_by_chain = HashMap::new();
        for c in &self.chains {
            pools_by_chain.insert(c.descriptor.chain_id, c.pools.len());
        }
        ConfigSummary {
            chains: self.chains.len(),
            dexs: self.total_dexs(),
            pools: pools_by_chain.values().sum(),
        }
    }
}

/// Payload of the `config.applied{version, summary}` event (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub chains: usize,
    pub dexs: usize,
    pub pools: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_default_quote_set() {
        let s = ConfigSnapshot::empty("2026-01-01T00:00:00Z");
        assert!(s.quote_set.contains(&"USDC".to_string()));
        assert_eq!(s.chains.len(), 0);
    }
}
