//! # Config Plane
//!
//! ## Purpose
//!
//! Owns the engine's single versioned `ConfigSnapshot`: validates deltas
//! before they become visible, swaps them in atomically, and broadcasts
//! `config.applied` once the swap is complete so every other component can
//! trust the version it observes is already live.
//!
//! ## Integration Points
//!
//! - **Input Sources**: operator-supplied config deltas via the HTTP control
//!   API (`services/engine`), TOML/JSON documents loaded at startup.
//! - **Output Destinations**: Pool Registry (hydrates from `chains[].pools`),
//!   Orchestrator (reads `policies`/`risk`/`quote_set`), Publisher
//!   (`config.applied` event).
//! - **Validation**: `libs/types`' `ConfigSnapshot`/`ChainDescriptor`/
//!   `PoolDescriptor` shapes; this crate owns the policy on top of that shape.
//!
//! ## Architecture Role
//!
//! Single-writer: exactly one `ConfigPlane` instance per engine process,
//! shared read-only (`Arc<ConfigSnapshot>`) with every scan task.

pub mod loader;
pub mod plane;
pub mod validate;

pub use loader::{load_from_file, LoadError};
pub use plane::{ConfigApplied, ConfigDelta, ConfigError, ConfigPlane};
pub use validate::{validate, ValidationReport};
