//! Publisher (spec §4.9 / C9): the engine's only write-only port to the
//! outside world.
//!
//! ## Purpose
//! `publish(opportunity)` dedups within a 30s window and enqueues;
//! `emit(event)` pushes any of the four outbound event kinds straight
//! through. Both funnel into one bounded queue so subscribers drain a
//! single ordered stream.
//!
//! ## Integration Points
//! The orchestrator hands `PairPlan`s it admitted (wrapped into
//! `Opportunity` by the engine) to `publish`; the config plane and
//! orchestrator emit `config.applied`/`asset.validated`/`asset.rejected`
//! via `emit`. Subscribers drain with `recv`.
//!
//! ## Architecture Role
//! Not a `tokio::sync::mpsc` — that channel type blocks or errors on a
//! full queue, not drop-oldest. A mutex-guarded ring buffer plus
//! `Notify` gives the spec's required drop-oldest backpressure policy
//! without hand-rolling a lock-free queue for a one-consumer-typical
//! workload.

pub mod dedup;
pub mod event;

pub use dedup::DedupWindow;
pub use event::Event;

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;
use types::opportunity::Opportunity;

/// Default bound on the outbound queue (spec §5).
pub const DEFAULT_CAPACITY: usize = 1024;

pub struct Publisher {
    capacity: usize,
    queue: Mutex<VecDeque<Event>>,
    notify: Notify,
    dedup: DedupWindow,
    backpressure_drops: AtomicU64,
}

impl Publisher {
    pub fn new(capacity: usize, dedup_window_ms: u64) -> Self {
        Self {
            capacity,
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            notify: Notify::new(),
            dedup: DedupWindow::new(dedup_window_ms),
            backpressure_drops: AtomicU64::new(0),
        }
    }

    /// Enqueues `opportunity` as an `opportunity.new` event unless its id
    /// was already published within the dedup window. Returns whether it
    /// was enqueued.
    pub fn publish(&self, opportunity: Opportunity, now_ms: u64) -> bool {
        if !self.dedup.admit(&opportunity.id, now_ms) {
            tracing::debug!(id = %opportunity.id, "publisher dropping duplicate opportunity");
            return false;
        }
        self.emit(Event::OpportunityNew(opportunity));
        true
    }

    /// Enqueues any event, dropping the oldest queued event and bumping
    /// `publisher.backpressure` if the queue is already at capacity.
    pub fn emit(&self, event: Event) {
        let mut queue = self.queue.lock();
        if queue.len() >= self.capacity {
            queue.pop_front();
            self.backpressure_drops.fetch_add(1, Ordering::Relaxed);
            metrics::counter!("publisher.backpressure").increment(1);
            tracing::warn!(capacity = self.capacity, "publisher queue saturated, dropped oldest event");
        }
        queue.push_back(event);
        drop(queue);
        self.notify.notify_one();
    }

    /// Waits for and pops the next queued event, oldest first.
    pub async fn recv(&self) -> Event {
        loop {
            if let Some(event) = self.queue.lock().pop_front() {
                return event;
            }
            self.notify.notified().await;
        }
    }

    /// Non-blocking drain for tests and synchronous callers.
    pub fn try_recv(&self) -> Option<Event> {
        self.queue.lock().pop_front()
    }

    pub fn backpressure_drops(&self) -> u64 {
        self.backpressure_drops.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, dedup::DEFAULT_WINDOW_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opportunity(id: &str) -> Opportunity {
        Opportunity {
            id: id.into(),
            chain_id: 56,
            dex_in: "pancakeswap".into(),
            dex_out: "sushiswap".into(),
            base_token: "0xweth".into(),
            quote_token: "0xusdc".into(),
            amount_in: 1.0,
            est_profit_usd: 12.5,
            gas_usd: 0.3,
            ts: 1_000,
        }
    }

    #[test]
    fn publishing_twice_within_window_dedups() {
        let publisher = Publisher::new(10, 30_000);
        assert!(publisher.publish(opportunity("abc"), 1_000));
        assert!(!publisher.publish(opportunity("abc"), 5_000));
        assert_eq!(publisher.len(), 1);
    }

    #[test]
    fn saturated_queue_drops_oldest_and_counts_backpressure() {
        let publisher = Publisher::new(2, 30_000);
        publisher.emit(Event::OpportunityNew(opportunity("a")));
        publisher.emit(Event::OpportunityNew(opportunity("b")));
        publisher.emit(Event::OpportunityNew(opportunity("c")));

        assert_eq!(publisher.backpressure_drops(), 1);
        let first = publisher.try_recv().unwrap();
        match first {
            Event::OpportunityNew(o) => assert_eq!(o.id, "b"),
            _ => panic!("expected opportunity event"),
        }
    }

    #[tokio::test]
    async fn recv_waits_for_an_event() {
        let publisher = std::sync::Arc::new(Publisher::new(10, 30_000));
        let p2 = publisher.clone();
        let handle = tokio::spawn(async move { p2.recv().await });

        tokio::task::yield_now().await;
        publisher.emit(Event::AssetValidated { trace_id: "t1".into(), asset: "0xweth".into() });

        let event = handle.await.unwrap();
        assert!(matches!(event, Event::AssetValidated { .. }));
    }
}
