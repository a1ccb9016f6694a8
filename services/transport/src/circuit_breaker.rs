//! Per-endpoint circuit breaker (spec §4.1 health model).
//!
//! Adapted from the teacher's `services/adapters/src/circuit_breaker.rs`
//! three-state machine, but driven by `parking_lot::Mutex` instead of
//! `tokio::sync::RwLock` — the breaker only guards plain counters and an
//! enum, never holds across an `.await`, so an async lock buys nothing here.
//! Also swaps the threshold model to the spec's: quarantine after 5
//! consecutive failures *or* an error rate above 10% in the trailing 60s
//! window, half-open probe after 30s.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    Healthy,
    Degraded,
    Quarantined,
}

const CONSECUTIVE_FAILURE_THRESHOLD: u32 = 5;
const ERROR_RATE_WINDOW: Duration = Duration::from_secs(60);
const ERROR_RATE_THRESHOLD: f64 = 0.10;
const QUARANTINE_DURATION: Duration = Duration::from_secs(30);

struct Inner {
    state: EndpointState,
    consecutive_failures: u32,
    quarantined_at: Option<Instant>,
    /// `(timestamp, was_failure)` pairs within the error-rate window.
    window: VecDeque<(Instant, bool)>,
}

/// Tracks one endpoint's health and decides whether it may currently be
/// selected for a call.
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: EndpointState::Healthy,
                consecutive_failures: 0,
                quarantined_at: None,
                window: VecDeque::new(),
            }),
        }
    }

    /// Whether this endpoint may be selected right now. A quarantined
    /// endpoint becomes selectable again for exactly one half-open probe
    /// once `QUARANTINE_DURATION` has elapsed.
    pub fn may_select(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            EndpointState::Healthy | EndpointState::Degraded => true,
            EndpointState::Quarantined => {
                let elapsed = inner
                    .quarantined_at
                    .map(|t| t.elapsed())
                    .unwrap_or(Duration::ZERO);
                elapsed >= QUARANTINE_DURATION
            }
        }
    }

    pub fn state(&self) -> EndpointState {
        self.inner.lock().state
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures = 0;
        push_window(&mut inner.window, false);
        if inner.state == EndpointState::Quarantined {
            tracing::info!("endpoint restored to healthy after successful half-open probe");
        }
        inner.state = EndpointState::Healthy;
        inner.quarantined_at = None;
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures += 1;
        push_window(&mut inner.window, true);

        let error_rate = window_error_rate(&inner.window);
        if inner.consecutive_failures >= CONSECUTIVE_FAILURE_THRESHOLD
            || error_rate > ERROR_RATE_THRESHOLD
        {
            if inner.state != EndpointState::Quarantined {
                tracing::warn!(
                    consecutive_failures = inner.consecutive_failures,
                    error_rate,
                    "quarantining endpoint"
                );
            }
            inner.state = EndpointState::Quarantined;
            inner.quarantined_at = Some(Instant::now());
        } else if inner.consecutive_failures > 0 {
            inner.state = EndpointState::Degraded;
        }
    }

    pub fn error_rate(&self) -> f64 {
        window_error_rate(&self.inner.lock().window)
    }
}

fn push_window(window: &mut VecDeque<(Instant, bool)>, failure: bool) {
    let now = Instant::now();
    window.push_back((now, failure));
    while let Some((t, _)) = window.front() {
        if now.duration_since(*t) > ERROR_RATE_WINDOW {
            window.pop_front();
        } else {
            break;
        }
    }
}

fn window_error_rate(window: &VecDeque<(Instant, bool)>) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let failures = window.iter().filter(|(_, f)| *f).count();
    failures as f64 / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarantines_after_five_consecutive_failures() {
        let cb = CircuitBreaker::new();
        for _ in 0..4 {
            cb.record_failure();
            assert!(cb.may_select());
        }
        cb.record_failure();
        assert_eq!(cb.state(), EndpointState::Quarantined);
        assert!(!cb.may_select());
    }

    #[test]
    fn success_resets_failure_streak() {
        let cb = CircuitBreaker::new();
        cb.record_failure();
        cb.record_failure();
        cb.record_success();
        assert_eq!(cb.state(), EndpointState::Healthy);
    }
}
