//! Shared data model for the opportunity engine
//!
//! ## Purpose
//!
//! Defines the types every other crate in the workspace quotes, scans, and
//! publishes against: chain/pool/asset descriptors, the family-tagged pool
//! snapshot, the pair/plan/opportunity records produced by the search and
//! orchestrator stages, and the closed-set error taxonomy propagated out of
//! adapters, transport, and the config plane.
//!
//! ## Integration Points
//!
//! - **Config Plane** (`config` crate) builds and owns `ConfigSnapshot`.
//! - **Pool Registry** (`registry` crate) stores `PoolDescriptor`/`PoolSnapshot`.
//! - **DEX Adapters** (`amm` crate) consume `PoolSnapshot` and produce quotes.
//! - **Arbitrage Search** / **Orchestrator** produce `PairCandidate`, `PairPlan`,
//!   `Opportunity`.
//!
//! ## Architecture Role
//!
//! This crate has no runtime behavior of its own — it is the vocabulary shared
//! across the workspace, kept dependency-light so every other crate can depend
//! on it without pulling in RPC or async machinery.

pub mod asset;
pub mod chain;
pub mod config_snapshot;
pub mod error;
pub mod fixed_point;
pub mod opportunity;
pub mod pair;
pub mod pool;

pub use asset::AssetDescriptor;
pub use chain::{ChainDescriptor, SizeGrid};
pub use config_snapshot::{
    ChainConfig, ConfigSnapshot, ConfigSummary, DexConfig, PolicyConfig, RiskConfig, RpcPoolConfig,
};
pub use error::ErrorKind;
pub use fixed_point::{PercentageFixedPoint4, UsdFixedPoint8};
pub use opportunity::Opportunity;
pub use pair::{PairCandidate, PairPlan, PoolRef};
pub use pool::{PoolDescriptor, PoolFamily, PoolSnapshot};
