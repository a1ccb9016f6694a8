//! The `(chainId, dexId, address) → PoolDescriptor` side of the registry.
//!
//! Descriptors change rarely (a pool's family/fee/token pair is immutable
//! once deployed) so this is a plain `DashMap` with no TTL — only
//! `PoolSnapshot`s expire.

use dashmap::DashMap;
use types::pool::PoolDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorKey {
    pub chain_id: u64,
    pub dex_id: String,
    pub address: String,
}

impl DescriptorKey {
    pub fn new(chain_id: u64, dex_id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            chain_id,
            dex_id: dex_id.into(),
            address: address.into(),
        }
    }

    pub fn from_descriptor(descriptor: &PoolDescriptor) -> Self {
        Self::new(descriptor.chain_id, descriptor.dex_id.clone(), descriptor.address.clone())
    }
}

#[derive(Default)]
pub struct DescriptorTable {
    pools: DashMap<DescriptorKey, PoolDescriptor>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, descriptor: PoolDescriptor) -> DescriptorKey {
        let key = DescriptorKey::from_descriptor(&descriptor);
        self.pools.insert(key.clone(), descriptor);
        key
    }

    pub fn get(&self, key: &DescriptorKey) -> Option<PoolDescriptor> {
        self.pools.get(key).map(|e| e.clone())
    }

    pub fn pools_for_chain(&self, chain_id: u64) -> Vec<(DescriptorKey, PoolDescriptor)> {
        self.pools
            .iter()
            .filter(|e| e.key().chain_id == chain_id)
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::pool::{FamilyParams, PoolFamily};

    fn sample_descriptor() -> PoolDescriptor {
        PoolDescriptor {
            chain_id: 137,
            dex_id: "quickswap-v2".into(),
            address: "0x1111111111111111111111111111111111111111".into(),
            base: "0xaaaa".into(),
            quote: "0xbbbb".into(),
            fee_bps: 30,
            family: PoolFamily::ConstantProduct,
            params: FamilyParams::ConstantProduct,
            flash_loan_compatible: true,
        }
    }

    #[test]
    fn upsert_then_get_round_trips() {
        let table = DescriptorTable::new();
        let key = table.upsert(sample_descriptor());
        assert_eq!(table.get(&key).unwrap().fee_bps, 30);
    }

    #[test]
    fn pools_for_chain_filters_by_chain_id() {
        let table = DescriptorTable::new();
        table.upsert(sample_descriptor());
        let mut other = sample_descriptor();
        other.chain_id = 1;
        other.address = "0x2222222222222222222222222222222222222222".into();
        table.upsert(other);
        assert_eq!(table.pools_for_chain(137).len(), 1);
    }
}
