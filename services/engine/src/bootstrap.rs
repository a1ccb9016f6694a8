//! Turns a `ConfigSnapshot` into the live `Transport`/`PoolRegistry` pair
//! each configured chain needs, registering every configured pool up
//! front so a scan round only ever has to resolve descriptors it already
//! knows about.

use registry::PoolRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use transport::{EndpointPool, Transport};
use types::config_snapshot::ConfigSnapshot;

/// Default TTL for the registry's snapshot cache (spec §4.2): a snapshot
/// older than this is refetched rather than served stale.
pub const SNAPSHOT_TTL_MS: u64 = 2_000;

pub struct ChainRuntime {
    pub registry: Arc<PoolRegistry>,
}

/// Builds one shared `Transport` spanning every configured chain, then one
/// `PoolRegistry` per chain registered against it with every pool from that
/// chain's config pre-loaded.
pub fn build_runtime(config: &ConfigSnapshot) -> (Arc<Transport>, HashMap<u64, ChainRuntime>) {
    let mut endpoint_pools = HashMap::with_capacity(config.chains.len());
    for chain in &config.chains {
        endpoint_pools.insert(
            chain.descriptor.chain_id,
            EndpointPool::new(
                chain.descriptor.chain_id,
                chain.rpc_pool.https.clone(),
                chain.rpc_pool.wss.clone(),
            ),
        );
    }
    let transport = Arc::new(Transport::new(endpoint_pools));

    let mut runtimes = HashMap::with_capacity(config.chains.len());
    for chain in &config.chains {
        let registry = PoolRegistry::new(transport.clone(), SNAPSHOT_TTL_MS);
        for pool in &chain.pools {
            registry.register_pool(pool.clone());
        }
        runtimes.insert(chain.descriptor.chain_id, ChainRuntime { registry: Arc::new(registry) });
    }

    (transport, runtimes)
}

/// Whether any configured chain currently has at least one endpoint that
/// answers `eth_blockNumber` — used at startup to decide between exit
/// codes `0`/`2` (spec §6).
pub async fn has_healthy_rpc(transport: &Transport, config: &ConfigSnapshot) -> bool {
    for chain in &config.chains {
        if transport
            .call(chain.descriptor.chain_id, "eth_blockNumber", serde_json::json!([]))
            .await
            .is_ok()
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::chain::{ChainDescriptor, SizeGrid};
    use types::config_snapshot::{ChainConfig, DexConfig, RpcPoolConfig};

    fn chain_config(chain_id: u64) -> ChainConfig {
        ChainConfig {
            descriptor: ChainDescriptor {
                chain_id,
                name: "bsc".into(),
                wrapped_native: "0x".to_string() + &"a".repeat(40),
                gas_price_floor_gwei: 3.0,
                size_grid: SizeGrid { min: 10.0, max: 10_000.0, steps: 6 },
                gas_units_hint_roundtrip_v2: ChainDescriptor::DEFAULT_GAS_UNITS_HINT,
            },
            rpc_pool: RpcPoolConfig { wss: vec![], https: vec!["https://x".into()] },
            dexes: vec![DexConfig { dex_id: "pancakeswap".into(), name: "PancakeSwap".into() }],
            pools: vec![],
        }
    }

    #[test]
    fn builds_one_registry_per_configured_chain() {
        let mut config = ConfigSnapshot::empty("v0");
        config.chains.push(chain_config(56));
        config.chains.push(chain_config(137));

        let (_transport, runtimes) = build_runtime(&config);
        assert_eq!(runtimes.len(), 2);
        assert!(runtimes.contains_key(&56));
        assert!(runtimes.contains_key(&137));
    }
}
