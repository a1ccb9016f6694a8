//! RPC transport (spec §4.1 / C1): per-chain endpoint pools with circuit
//! breakers, retrying JSON-RPC calls, batching, quorum reads, and
//! reconnecting log subscriptions.
//!
//! ## Purpose
//! Gives every other component (`registry`, `search`, `orchestrator`) one
//! place to reach the chain through, so endpoint health and failover are
//! handled once instead of per-caller.
//!
//! ## Integration Points
//! `registry` drives `call`/`batch` for state refresh; `search` and
//! `orchestrator` never call out directly. `subscribe` feeds `registry`'s
//! event-topic invalidation.
//!
//! ## Architecture Role
//! Adapted from the teacher's `services/adapters/src/circuit_breaker.rs` and
//! `error.rs` classifier style, generalized from a single-exchange WS
//! adapter to a multi-chain, multi-endpoint JSON-RPC pool.

pub mod circuit_breaker;
pub mod client;
pub mod endpoint;
pub mod pool;

pub use circuit_breaker::{CircuitBreaker, EndpointState};
pub use client::Transport;
pub use endpoint::{Endpoint, EndpointKind};
pub use pool::EndpointPool;
