//! Pool descriptors and the family-tagged snapshot variants (spec §3, §9
//! "dynamic typing at boundaries → tagged variants").

use serde::{Deserialize, Serialize};

/// AMM family a pool belongs to; determines which adapter in the `amm` crate
/// quotes it and which `PoolSnapshot` variant it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PoolFamily {
    ConstantProduct,
    Concentrated,
    StableSwap,
    Weighted,
}

/// Family-specific static parameters that don't change with every swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FamilyParams {
    ConstantProduct,
    Concentrated { tick_spacing: i32 },
    StableSwap { amplification: u32 },
    Weighted { weights: Vec<u32> },
}

/// `(chainId, dexId, address)` uniquely identifies a pool.
///
/// Uniqueness invariant (spec §3): `(dexId, address)` is globally unique
/// within a chain — enforced by `config::validate`, not by this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDescriptor {
    pub chain_id: u64,
    pub dex_id: String,
    /// Lowercase hex pool contract address.
    pub address: String,
    /// Lowercase hex base token address.
    pub base: String,
    /// Lowercase hex quote token address.
    pub quote: String,
    pub fee_bps: u32,
    pub family: PoolFamily,
    pub params: FamilyParams,
    /// True iff the pool can be entered/exited within a single flash-loan
    /// transaction per this chain's config (spec §4.6 atomicity check).
    pub flash_loan_compatible: bool,
}

impl PoolDescriptor {
    pub fn is_valid(&self) -> bool {
        self.fee_bps <= 10_000
            && self.address.starts_with("0x")
            && self.base.starts_with("0x")
            && self.quote.starts_with("0x")
    }

    /// Unique key within a chain.
    pub fn pool_key(&self) -> (String, String) {
        (self.dex_id.clone(), self.address.clone())
    }

    /// Unordered token-pair key used to group pools for the 2-leg scan.
    pub fn token_pair_key(&self) -> (String, String) {
        if self.base <= self.quote {
            (self.base.clone(), self.quote.clone())
        } else {
            (self.quote.clone(), self.base.clone())
        }
    }
}

/// Point-in-time, family-tagged pool state (spec §3 PoolSnapshot).
///
/// Invariant (C2): never torn — always constructed atomically from a single
/// RPC response, never partially updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "camelCase")]
pub enum PoolSnapshot {
    ConstantProduct {
        reserve_base: u128,
        reserve_quote: u128,
        block_number: u64,
        observed_at_ms: u64,
        source: String,
    },
    Concentrated {
        sqrt_price_x96: u128,
        liquidity: u128,
        tick: i32,
        observed_at_ms: u64,
        source: String,
    },
    StableSwap {
        reserves: Vec<u128>,
        amplification: u32,
        observed_at_ms: u64,
        source: String,
    },
    Weighted {
        balances: Vec<u128>,
        weights: Vec<u32>,
        observed_at_ms: u64,
        source: String,
    },
}

impl PoolSnapshot {
    pub fn observed_at_ms(&self) -> u64 {
        match self {
            PoolSnapshot::ConstantProduct { observed_at_ms, .. }
            | PoolSnapshot::Concentrated { observed_at_ms, .. }
            | PoolSnapshot::StableSwap { observed_at_ms, .. }
            | PoolSnapshot::Weighted { observed_at_ms, .. } => *observed_at_ms,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            PoolSnapshot::ConstantProduct { source, .. }
            | PoolSnapshot::Concentrated { source, .. }
            | PoolSnapshot::StableSwap { source, .. }
            | PoolSnapshot::Weighted { source, .. } => source,
        }
    }

    /// Is this snapshot older than `2 * ttl_ms` relative to `now_ms`? (spec
    /// §4.5 edge-case policy: stale snapshots are skipped during search.)
    pub fn is_stale(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.observed_at_ms()) > 2 * ttl_ms
    }

    pub fn family(&self) -> PoolFamily {
        match self {
            PoolSnapshot::ConstantProduct { .. } => PoolFamily::ConstantProduct,
            PoolSnapshot::Concentrated { .. } => PoolFamily::Concentrated,
            PoolSnapshot::StableSwap { .. } => PoolFamily::StableSwap,
            PoolSnapshot::Weighted { .. } => PoolFamily::Weighted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(observed_at_ms: u64) -> PoolSnapshot {
        PoolSnapshot::ConstantProduct {
            reserve_base: 1,
            reserve_quote: 1,
            block_number: 1,
            observed_at_ms,
            source: "rpc-1".into(),
        }
    }

    #[test]
    fn staleness_uses_2x_ttl() {
        let s = snap(1_000);
        assert!(!s.is_stale(1_000 + 3_999, 2_000)); // < 2*ttl
        assert!(s.is_stale(1_000 + 4_001, 2_000)); // > 2*ttl
    }

    #[test]
    fn token_pair_key_is_order_independent() {
        let mut a = PoolDescriptor {
            chain_id: 1,
            dex_id: "x".into(),
            address: "0x1".into(),
            base: "0xaaa".into(),
            quote: "0xbbb".into(),
            fee_bps: 30,
            family: PoolFamily::ConstantProduct,
            params: FamilyParams::ConstantProduct,
            flash_loan_compatible: true,
        };
        let mut b = a.clone();
        b.base = "0xbbb".into();
        b.quote = "0xaaa".into();
        assert_eq!(a.token_pair_key(), b.token_pair_key());
        a.base = "0xccc".into();
        assert_ne!(a.token_pair_key(), b.token_pair_key());
    }
}
