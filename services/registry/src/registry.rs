//! `PoolRegistry`: the public C2 contract over [`DescriptorTable`] +
//! [`SnapshotCache`].

use crate::descriptors::{DescriptorKey, DescriptorTable};
use crate::snapshots::SnapshotCache;
use std::collections::HashMap;
use std::sync::Arc;
use transport::Transport;
use types::pool::{PoolDescriptor, PoolSnapshot};
use types::ErrorKind;

pub struct PoolRegistry {
    descriptors: DescriptorTable,
    snapshots: SnapshotCache,
    transport: Arc<Transport>,
}

impl PoolRegistry {
    pub fn new(transport: Arc<Transport>, ttl_ms: u64) -> Self {
        Self {
            descriptors: DescriptorTable::new(),
            snapshots: SnapshotCache::new(ttl_ms),
            transport,
        }
    }

    pub fn register_pool(&self, descriptor: PoolDescriptor) -> DescriptorKey {
        self.descriptors.upsert(descriptor)
    }

    pub fn descriptor(&self, key: &DescriptorKey) -> Option<PoolDescriptor> {
        self.descriptors.get(key)
    }

    /// `getSnapshot(pool) → Snapshot` (spec §4.2): cached-if-fresh, coalesced
    /// fetch-on-miss via the registry's single RPC call per pool.
    pub async fn get_snapshot(&self, key: &DescriptorKey, now_ms: u64) -> Result<PoolSnapshot, ErrorKind> {
        let descriptor = self.descriptors.get(key).ok_or_else(|| ErrorKind::InsufficientPoolData {
            pool: key.address.clone(),
            reason: "pool not registered".into(),
        })?;
        let transport = self.transport.clone();
        let address = key.address.clone();

        self.snapshots
            .get_snapshot(&key.address, now_ms, move || async move {
                fetch_snapshot(&transport, &descriptor, &address, now_ms).await
            })
            .await
    }

    pub fn invalidate(&self, key: &DescriptorKey) {
        self.snapshots.invalidate(&key.address);
    }

    /// `bulkRefresh(chainId)`: one batched multicall round for every
    /// registered pool on the chain, used at scan start.
    pub async fn bulk_refresh(&self, chain_id: u64, now_ms: u64) -> HashMap<String, Result<PoolSnapshot, ErrorKind>> {
        let pools = self.descriptors.pools_for_chain(chain_id);
        let calls: Vec<(String, serde_json::Value)> = pools
            .iter()
            .map(|(_, d)| ("eth_call".to_string(), multicall_params(d)))
            .collect();

        let raw = self.transport.batch(chain_id, calls).await;

        let mut out = HashMap::with_capacity(pools.len());
        for ((key, descriptor), result) in pools.into_iter().zip(raw) {
            let parsed = result.and_then(|v| decode_snapshot(&descriptor, &key.address, &v, now_ms));
            if let Ok(snapshot) = &parsed {
                self.snapshots.invalidate(&key.address);
                let snapshot = snapshot.clone();
                // Seed the cache directly so the next getSnapshot is a hit.
                let _ = self
                    .snapshots
                    .get_snapshot(&key.address, now_ms, move || async move { Ok(snapshot) })
                    .await;
            }
            out.insert(key.address, parsed);
        }
        out
    }

    pub fn pool_count(&self, chain_id: u64) -> usize {
        self.descriptors.pools_for_chain(chain_id).len()
    }
}

fn multicall_params(descriptor: &PoolDescriptor) -> serde_json::Value {
    serde_json::json!({ "to": descriptor.address, "data": reserves_selector(descriptor) })
}

fn reserves_selector(descriptor: &PoolDescriptor) -> &'static str {
    match descriptor.family {
        types::pool::PoolFamily::ConstantProduct => "0x0902f1ac", // getReserves()
        types::pool::PoolFamily::Concentrated => "0x3850c7bd",    // slot0()
        types::pool::PoolFamily::StableSwap => "0x9b2cb5d8",      // get_balances()
        types::pool::PoolFamily::Weighted => "0xf94d4668",        // getPoolTokens()
    }
}

/// Decodes one multicall response into the family's `PoolSnapshot` variant.
/// The wire layout itself is out of scope here (owned by `dex_abi` decoders);
/// this assumes the transport has already normalized the result into the
/// field shape each family needs.
fn decode_snapshot(
    descriptor: &PoolDescriptor,
    address: &str,
    raw: &serde_json::Value,
    now_ms: u64,
) -> Result<PoolSnapshot, ErrorKind> {
    let source = "multicall".to_string();
    match &descriptor.params {
        types::pool::FamilyParams::ConstantProduct => Ok(PoolSnapshot::ConstantProduct {
            reserve_base: field_u128(raw, address, "reserveBase")?,
            reserve_quote: field_u128(raw, address, "reserveQuote")?,
            block_number: field_u64(raw, "blockNumber").unwrap_or(0),
            observed_at_ms: now_ms,
            source,
        }),
        types::pool::FamilyParams::Concentrated { .. } => Ok(PoolSnapshot::Concentrated {
            sqrt_price_x96: field_u128(raw, address, "sqrtPriceX96")?,
            liquidity: field_u128(raw, address, "liquidity")?,
            tick: field_i32(raw, address, "tick")?,
            observed_at_ms: now_ms,
            source,
        }),
        types::pool::FamilyParams::StableSwap { amplification } => Ok(PoolSnapshot::StableSwap {
            reserves: field_u128_vec(raw, address, "reserves")?,
            amplification: *amplification,
            observed_at_ms: now_ms,
            source,
        }),
        types::pool::FamilyParams::Weighted { weights } => Ok(PoolSnapshot::Weighted {
            balances: field_u128_vec(raw, address, "balances")?,
            weights: weights.clone(),
            observed_at_ms: now_ms,
            source,
        }),
    }
}

fn missing(pool: &str, field: &str) -> ErrorKind {
    ErrorKind::InsufficientPoolData {
        pool: pool.to_string(),
        reason: format!("multicall response missing field `{field}`"),
    }
}

fn field_u128(raw: &serde_json::Value, address: &str, field: &str) -> Result<u128, ErrorKind> {
    raw.get(field)
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<u128>().ok())
        .ok_or_else(|| missing(address, field))
}

fn field_u128_vec(raw: &serde_json::Value, address: &str, field: &str) -> Result<Vec<u128>, ErrorKind> {
    raw.get(field)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().and_then(|s| s.parse::<u128>().ok()))
                .collect()
        })
        .ok_or_else(|| missing(address, field))
}

fn field_u64(raw: &serde_json::Value, field: &str) -> Option<u64> {
    raw.get(field).and_then(|v| v.as_u64())
}

fn field_i32(raw: &serde_json::Value, address: &str, field: &str) -> Result<i32, ErrorKind> {
    raw.get(field)
        .and_then(|v| v.as_i64())
        .map(|v| v as i32)
        .ok_or_else(|| missing(address, field))
}

async fn fetch_snapshot(
    transport: &Transport,
    descriptor: &PoolDescriptor,
    address: &str,
    now_ms: u64,
) -> Result<PoolSnapshot, ErrorKind> {
    let result = transport
        .call(descriptor.chain_id, "eth_call", multicall_params(descriptor))
        .await?;
    decode_snapshot(descriptor, address, &result, now_ms)
}
