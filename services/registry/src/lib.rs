//! Pool Registry & State Cache (spec §4.2 / C2).
//!
//! ## Purpose
//! Owns `(chainId, dexId, address) → PoolDescriptor` and `address →
//! PoolSnapshot` with TTL + event-driven invalidation, so every other
//! component reads pool state through one coalescing cache instead of
//! hammering RPC directly.
//!
//! ## Integration Points
//! Hydrated by the config plane's chain/pool lists; reads flow through
//! `transport::Transport`; `search` and the size optimizer call
//! `get_snapshot`/`bulk_refresh`; `invalidation` topics drive `invalidate`
//! from `transport::Transport::subscribe` log streams.
//!
//! ## Architecture Role
//! Adapted from the teacher's `services/strategies/state/src/pool_cache.rs`
//! coalescing-fetch pattern, narrowed from one-time RPC discovery to
//! TTL-refreshed snapshot state, and stripped of its TLV cold-storage
//! persistence layer — this cache is in-memory only, rebuilt from chain
//! state on restart.

pub mod descriptors;
pub mod invalidation;
pub mod registry;
pub mod snapshots;

pub use descriptors::{DescriptorKey, DescriptorTable};
pub use invalidation::{invalidating_topics, is_invalidating_topic};
pub use registry::PoolRegistry;
pub use snapshots::SnapshotCache;
