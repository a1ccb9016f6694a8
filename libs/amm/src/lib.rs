//! # AMM Math Library
//!
//! ## Purpose
//!
//! Exact-arithmetic AMM quoting and trade-size optimization: constant-product,
//! concentrated-liquidity, stable-swap, and weighted-pool formulas behind one
//! `adapter::quote` entry point, plus the grid/ternary size optimizer that
//! picks a trade amount from a route's quotes.
//!
//! ## Integration Points
//!
//! - **Input Sources**: `PoolDescriptor`/`PoolSnapshot` pairs from `registry`
//! - **Output Destinations**: `search` (price-at-margin, route pricing),
//!   `orchestrator` (sized routes feeding `PairPlan`)
//! - **Protocol Support**: Uniswap V2/V3-style constant-product and
//!   concentrated-liquidity pools, Curve-style stable-swap, Balancer-style
//!   weighted pools
//! - **Precision**: `Decimal` throughout, no floating-point in the quoting
//!   path (ternary search internals use `f64` only for comparison, never for
//!   the final quoted amounts)
//!
//! ## Architecture Role
//!
//! Mathematical foundation for every DEX-family-specific calculation in the
//! workspace; holds no state and makes no RPC calls of its own.

pub mod adapter;
pub mod optimal_size;
pub mod pool_traits;
pub mod stable_math;
pub mod v2_math;
pub mod v3_math;
pub mod weighted_math;

pub use adapter::{quote, Quote};
pub use optimal_size::{optimize, RouteLeg, SizedRoute, SizingInput};
pub use pool_traits::{AmmPool, PoolType};
pub use stable_math::{StableMath, StablePoolState, StableSwapError};
pub use v2_math::{V2Math, V2PoolState};
pub use v3_math::{V3Math, V3PoolState};
pub use weighted_math::{WeightedMath, WeightedPoolState};

/// Common types for AMM calculations
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
