//! The `address → PoolSnapshot` side of the registry: TTL'd cache with
//! at-most-one-inflight coalescing per pool.
//!
//! Adapted from the teacher's `services/strategies/state/src/pool_cache.rs`
//! `get_or_discover_pool`/`wait_for_discovery_efficient` pair — same
//! `DashMap` of in-flight markers plus `tokio::sync::Notify` to wake waiters
//! the instant the one real fetch completes, just generalized from pool
//! *discovery* (RPC address → token metadata, once ever) to pool *snapshot*
//! refresh (reserves/price, every TTL window).

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use types::pool::PoolSnapshot;
use types::ErrorKind;

const DEFAULT_TTL_MS: u64 = 2_000;
const INFLIGHT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

struct Entry {
    snapshot: PoolSnapshot,
    fetched_at_ms: u64,
}

enum Slot {
    Ready(Entry),
    InFlight(Arc<Notify>),
}

/// TTL'd, coalescing snapshot cache for one chain's pools.
pub struct SnapshotCache {
    ttl_ms: u64,
    slots: DashMap<String, Slot>,
}

impl SnapshotCache {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            ttl_ms,
            slots: DashMap::new(),
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL_MS)
    }

    /// Returns the cached snapshot if still within TTL; otherwise calls
    /// `fetch` to refresh it. Concurrent callers for the same `address`
    /// coalesce onto the single in-flight fetch.
    pub async fn get_snapshot<F, Fut>(
        &self,
        address: &str,
        now_ms: u64,
        fetch: F,
    ) -> Result<PoolSnapshot, ErrorKind>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<PoolSnapshot, ErrorKind>>,
    {
        if let Some(snapshot) = self.fresh_cached(address, now_ms) {
            return Ok(snapshot);
        }

        // Either nothing cached, or stale — try to become the single fetcher.
        let notify = Arc::new(Notify::new());
        let mut became_fetcher = false;
        self.slots
            .entry(address.to_string())
            .and_modify(|slot| {
                if let Slot::Ready(entry) = slot {
                    if now_ms.saturating_sub(entry.fetched_at_ms) >= self.ttl_ms {
                        *slot = Slot::InFlight(notify.clone());
                        became_fetcher = true;
                    }
                }
                // Slot::InFlight already held by someone else: join as a waiter.
            })
            .or_insert_with(|| {
                became_fetcher = true;
                Slot::InFlight(notify.clone())
            });

        if !became_fetcher {
            return self.wait_for_inflight(address, now_ms).await;
        }

        let result = fetch().await;
        match &result {
            Ok(snapshot) => {
                self.slots.insert(
                    address.to_string(),
                    Slot::Ready(Entry {
                        snapshot: snapshot.clone(),
                        fetched_at_ms: now_ms,
                    }),
                );
            }
            Err(_) => {
                self.slots.remove(address);
            }
        }
        notify.notify_waiters();
        result
    }

    async fn wait_for_inflight(&self, address: &str, now_ms: u64) -> Result<PoolSnapshot, ErrorKind> {
        let notify = match self.slots.get(address) {
            Some(entry) => match entry.value() {
                Slot::InFlight(n) => n.clone(),
                Slot::Ready(e) => return Ok(e.snapshot.clone()),
            },
            None => {
                return Err(ErrorKind::InsufficientPoolData {
                    pool: address.to_string(),
                    reason: "in-flight fetch vanished before this waiter could join".into(),
                })
            }
        };

        match tokio::time::timeout(INFLIGHT_WAIT_TIMEOUT, notify.notified()).await {
            Ok(_) => self.fresh_cached(address, now_ms).ok_or_else(|| ErrorKind::Transport {
                endpoint: address.to_string(),
                message: "in-flight fetch completed with an error".into(),
            }),
            // `notify_waiters` drops the wakeup for anyone not yet parked in
            // `notified()` at the moment it fires: a waiter that cloned the
            // `Notify` above but got scheduled after the fetcher finished
            // would otherwise time out here even though a fresh snapshot is
            // already sitting in the slot. Re-check before surfacing
            // `Timeout` so every waiter still observes the same result
            // (§4.2 "all waiters receive the same result").
            Err(_) => self.fresh_cached(address, now_ms).ok_or_else(|| ErrorKind::Timeout {
                method: "getSnapshot".into(),
                elapsed_ms: INFLIGHT_WAIT_TIMEOUT.as_millis() as u64,
            }),
        }
    }

    fn fresh_cached(&self, address: &str, now_ms: u64) -> Option<PoolSnapshot> {
        match self.slots.get(address)?.value() {
            Slot::Ready(entry) if now_ms.saturating_sub(entry.fetched_at_ms) < self.ttl_ms => {
                Some(entry.snapshot.clone())
            }
            _ => None,
        }
    }

    /// Drops the cached snapshot for `address`; the next `getSnapshot` call
    /// refetches unconditionally.
    pub fn invalidate(&self, address: &str) {
        self.slots.remove(address);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn snap(observed_at_ms: u64) -> PoolSnapshot {
        PoolSnapshot::ConstantProduct {
            reserve_base: 1_000,
            reserve_quote: 2_000,
            block_number: 1,
            observed_at_ms,
            source: "rpc-1".into(),
        }
    }

    #[tokio::test]
    async fn fresh_snapshot_is_served_without_refetch() {
        let cache = SnapshotCache::new(2_000);
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        cache
            .get_snapshot("0xabc", 1_000, || {
                c.fetch_add(1, Ordering::SeqCst);
                async move { Ok(snap(1_000)) }
            })
            .await
            .unwrap();

        let c2 = calls.clone();
        cache
            .get_snapshot("0xabc", 1_500, || {
                c2.fetch_add(1, Ordering::SeqCst);
                async move { Ok(snap(1_500)) }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_snapshot_triggers_refetch() {
        let cache = SnapshotCache::new(2_000);
        cache.get_snapshot("0xabc", 0, || async { Ok(snap(0)) }).await.unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        cache
            .get_snapshot("0xabc", 5_000, || {
                c.fetch_add(1, Ordering::SeqCst);
                async move { Ok(snap(5_000)) }
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_next_call_to_refetch() {
        let cache = SnapshotCache::new(2_000);
        cache.get_snapshot("0xabc", 0, || async { Ok(snap(0)) }).await.unwrap();
        cache.invalidate("0xabc");
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        cache
            .get_snapshot("0xabc", 100, || {
                c.fetch_add(1, Ordering::SeqCst);
                async move { Ok(snap(100)) }
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_misses_coalesce_to_one_fetch() {
        let cache = Arc::new(SnapshotCache::new(2_000));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_snapshot("0xabc", 0, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(snap(0))
                    })
                    .await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
