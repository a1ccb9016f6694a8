//! A single RPC endpoint and its rolling health stats (spec §4.1).

use crate::circuit_breaker::{CircuitBreaker, EndpointState};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Https,
    Ws,
}

pub struct Endpoint {
    pub url: String,
    pub kind: EndpointKind,
    breaker: CircuitBreaker,
    /// Exponential-moving-average latency in milliseconds, smoothing factor
    /// 0.2 — recent calls dominate without single-sample noise flapping
    /// endpoint selection.
    latency_ewma_ms: RwLock<f64>,
    total_calls: AtomicU64,
    total_failures: AtomicU64,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, kind: EndpointKind) -> Self {
        Self {
            url: url.into(),
            kind,
            breaker: CircuitBreaker::new(),
            latency_ewma_ms: RwLock::new(0.0),
            total_calls: AtomicU64::new(0),
            total_failures: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> EndpointState {
        self.breaker.state()
    }

    pub fn may_select(&self) -> bool {
        self.breaker.may_select()
    }

    pub fn latency_p50_ms(&self) -> f64 {
        *self.latency_ewma_ms.read()
    }

    pub fn error_rate(&self) -> f64 {
        self.breaker.error_rate()
    }

    pub fn record_success(&self, latency_ms: f64) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        self.breaker.record_success();
        let mut ewma = self.latency_ewma_ms.write();
        *ewma = if *ewma == 0.0 {
            latency_ms
        } else {
            0.8 * *ewma + 0.2 * latency_ms
        };
    }

    pub fn record_failure(&self) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        self.total_failures.fetch_add(1, Ordering::Relaxed);
        self.breaker.record_failure();
    }

    /// Lower is better: a composite of latency and error history used to
    /// rank candidate endpoints for selection.
    pub fn health_cost(&self) -> f64 {
        self.latency_p50_ms() * (1.0 + self.error_rate() * 10.0)
    }
}
