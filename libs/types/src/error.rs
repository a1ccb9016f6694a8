//! Closed-set error taxonomy shared across transport, adapters, the config
//! plane, and the orchestrator.
//!
//! Grounded in the teacher's `services/adapters/src/error.rs` classifier-method
//! style (`is_recoverable`/`is_permanent`) and `FixedPointError` above it: one
//! flat enum per concern, no nested trait objects, `thiserror` for `Display`.

use thiserror::Error;

/// Errors from fixed-point construction (re-exported at crate root via
/// `fixed_point`).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FixedPointError {
    #[error("Overflow: value {value} exceeds maximum representable value")]
    Overflow { value: f64 },

    #[error("Underflow: value {value} is below minimum representable value")]
    Underflow { value: f64 },

    #[error("Invalid decimal string: '{input}' - expected numeric format")]
    InvalidDecimal { input: String },

    #[error("Division by zero in fixed-point arithmetic")]
    DivisionByZero,

    #[error("Value is not finite: {value}")]
    NotFinite { value: f64 },
}

/// The engine's closed-set error taxonomy (spec §7).
///
/// Adapter- and RPC-level variants are recovered locally by the caller
/// (failover, retry, skip-this-pool) and only ever surface as counters;
/// config and orchestrator variants propagate to the caller as structured
/// results. Nothing in this enum is meant to `panic!` — see
/// [`ErrorKind::is_recoverable`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ErrorKind {
    /// RPC call exceeded its hard timeout.
    #[error("rpc timeout after {elapsed_ms}ms calling {method}")]
    Timeout { method: String, elapsed_ms: u64 },

    /// Network/connection-level failure reaching an endpoint.
    #[error("transport error on {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// The endpoint answered but with a JSON-RPC error object.
    #[error("rpc error {code} from {endpoint}: {msg}")]
    RpcError {
        endpoint: String,
        code: i64,
        msg: String,
    },

    /// Response did not deserialize into the expected shape.
    #[error("decode error from {endpoint}: {message}")]
    Decoded { endpoint: String, message: String },

    /// A `quorumCall` failed to reach `k` agreeing responses.
    #[error("no quorum: {agreed}/{required} endpoints agreed within {window_ms}ms")]
    NoQuorum {
        agreed: usize,
        required: usize,
        window_ms: u64,
    },

    /// An adapter could not quote because required state is missing (e.g. a
    /// v3 swap would cross into a tick range with no liquidity data).
    #[error("insufficient pool data for {pool}: {reason}")]
    InsufficientPoolData { pool: String, reason: String },

    /// Stable-swap Newton iteration did not converge within the iteration cap.
    #[error("stable-swap invariant did not converge for {pool} after {iterations} iterations")]
    NoConvergence { pool: String, iterations: u32 },

    /// A config delta failed validation; the previous snapshot stays active.
    #[error("config invalid: field {field}: {msg}")]
    ConfigInvalid { field: String, msg: String },

    /// `addToTrading` was attempted on an asset that is not `valid`.
    #[error("asset {asset} is not validated (status: {status})")]
    NotValidated { asset: String, status: String },

    /// The publish channel is saturated.
    #[error("publisher backpressure: channel at capacity {capacity}")]
    Backpressure { capacity: usize },
}

impl ErrorKind {
    /// Adapter/RPC errors are always recovered by the caller (failover,
    /// retry, skip); nothing in the taxonomy should cause a panic in the
    /// steady-state scan loop.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ErrorKind::ConfigInvalid { .. })
    }

    /// Errors that should cause the offending RPC endpoint to be quarantined
    /// immediately rather than waiting for the failure-count threshold.
    pub fn is_endpoint_fatal(&self) -> bool {
        matches!(self, ErrorKind::Decoded { .. })
    }

    /// True for conditions that mean "skip this pool for the round", as
    /// opposed to conditions that fail a whole chain or request.
    pub fn is_pool_local(&self) -> bool {
        matches!(
            self,
            ErrorKind::InsufficientPoolData { .. } | ErrorKind::NoConvergence { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_invalid_is_not_recoverable() {
        let e = ErrorKind::ConfigInvalid {
            field: "sizeGrid.steps".into(),
            msg: "must be >= 3".into(),
        };
        assert!(!e.is_recoverable());
    }

    #[test]
    fn pool_local_errors_classified() {
        assert!(ErrorKind::InsufficientPoolData {
            pool: "0xabc".into(),
            reason: "tick crossing".into()
        }
        .is_pool_local());
        assert!(ErrorKind::NoConvergence {
            pool: "0xabc".into(),
            iterations: 32
        }
        .is_pool_local());
        assert!(!ErrorKind::Timeout {
            method: "eth_call".into(),
            elapsed_ms: 3000
        }
        .is_pool_local());
    }
}
