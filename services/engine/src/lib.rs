//! The opportunity engine: wires the config plane, pool registry,
//! search, size optimizer, orchestrator, and publisher into the
//! per-chain scan loop the `engine` binary drives.
//!
//! ## Purpose
//! Everything in this crate is orchestration glue — no component here
//! re-implements math or policy that already lives in `amm`, `search`,
//! `orchestrator`, or `publisher`. That split keeps every rule testable
//! in its owning crate and leaves this one to answer "what order do we
//! call things in, and what do we do with the result."
//!
//! ## Architecture Role
//! Grounded in the teacher's `trace_collector` binary shape: a tracing
//! init, a config/bootstrap step, then a set of `tokio::spawn`ed loops
//! sharing `Arc`-wrapped state, reporting through the same `tracing`
//! macros the teacher's services use throughout.

pub mod bootstrap;
pub mod round;
pub mod scan;

pub use bootstrap::{build_runtime, has_healthy_rpc, ChainRuntime, SNAPSHOT_TTL_MS};
