// ── Single-flight poll cache ──
//
// One rate-limited view of the remote room list, shared by every accessory.
// The published state is swapped atomically; readers never see a partial
// snapshot. At most one upstream fetch is in flight: late callers clone the
// pending `Shared` future and await the same result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::config::PollInterval;
use crate::error::CoreError;
use crate::model::RoomSnapshot;
use crate::remote::RemoteClient;

type FetchResult = Result<Arc<RoomSnapshot>, CoreError>;
type InFlight = Shared<BoxFuture<'static, FetchResult>>;

/// The most recent successful poll.
#[derive(Debug, Clone)]
pub struct PollState {
    pub snapshot: Arc<RoomSnapshot>,
    /// When the fetch that produced `snapshot` started (monotonic).
    pub fetched_at: Instant,
}

impl PollState {
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    fn is_fresh(&self, max_age: Duration) -> bool {
        self.age() <= max_age
    }
}

/// Shared, cheaply clonable handle to the poll cache.
pub struct PollCache<R> {
    inner: Arc<PollInner<R>>,
}

struct PollInner<R> {
    remote: Arc<R>,
    interval: PollInterval,
    state: ArcSwapOption<PollState>,
    in_flight: Mutex<Option<InFlight>>,
    fetches: AtomicU64,
}

impl<R> Clone for PollCache<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: RemoteClient> PollCache<R> {
    pub fn new(remote: R, interval: PollInterval) -> Self {
        Self::with_shared(Arc::new(remote), interval)
    }

    pub fn with_shared(remote: Arc<R>, interval: PollInterval) -> Self {
        Self {
            inner: Arc::new(PollInner {
                remote,
                interval,
                state: ArcSwapOption::empty(),
                in_flight: Mutex::new(None),
                fetches: AtomicU64::new(0),
            }),
        }
    }

    pub fn remote(&self) -> &R {
        &self.inner.remote
    }

    pub fn interval(&self) -> PollInterval {
        self.inner.interval
    }

    /// Last successful poll, without touching the network.
    pub fn latest(&self) -> Option<Arc<PollState>> {
        self.inner.state.load_full()
    }

    /// Number of upstream fetches started so far.
    pub fn fetch_count(&self) -> u64 {
        self.inner.fetches.load(Ordering::Relaxed)
    }

    /// Snapshot no older than the configured poll interval.
    pub async fn poll(&self) -> Result<Arc<RoomSnapshot>, CoreError> {
        self.snapshot(self.inner.interval).await
    }

    /// Snapshot no older than `max_age`, fetching if needed.
    ///
    /// A failed fetch falls back to the previous snapshot. The error only
    /// reaches the caller when no fetch has ever succeeded.
    pub async fn snapshot(&self, max_age: PollInterval) -> Result<Arc<RoomSnapshot>, CoreError> {
        if let Some(snapshot) = self.fresh(max_age.get()) {
            return Ok(snapshot);
        }

        let pending = {
            let mut slot = self.inner.in_flight.lock().await;
            if let Some(pending) = slot.as_ref() {
                debug!("joining in-flight poll");
                pending.clone()
            } else {
                // The previous fetch may have published while we waited.
                if let Some(snapshot) = self.fresh(max_age.get()) {
                    return Ok(snapshot);
                }
                let fetch = Self::fetch(Arc::clone(&self.inner)).boxed().shared();
                // Only the fetch clears this slot. If every waiter is dropped
                // first, the next caller resumes the stored future.
                *slot = Some(fetch.clone());
                fetch
            }
        };

        pending.await
    }

    fn fresh(&self, max_age: Duration) -> Option<Arc<RoomSnapshot>> {
        match &*self.inner.state.load() {
            Some(state) if state.is_fresh(max_age) => Some(Arc::clone(&state.snapshot)),
            _ => None,
        }
    }

    async fn fetch(inner: Arc<PollInner<R>>) -> FetchResult {
        let started = Instant::now();
        inner.fetches.fetch_add(1, Ordering::Relaxed);

        let outcome = match inner.remote.list_rooms_with_energy().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                inner.state.store(Some(Arc::new(PollState {
                    snapshot: Arc::clone(&snapshot),
                    fetched_at: started,
                })));
                debug!(
                    rooms = snapshot.len(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "poll complete"
                );
                Ok(snapshot)
            }
            Err(err) => {
                if let Some(stale) = inner.state.load_full() {
                    warn!(
                        error = %err,
                        age_secs = stale.age().as_secs(),
                        "poll failed, serving previous snapshot"
                    );
                    Ok(Arc::clone(&stale.snapshot))
                } else {
                    error!(error = %err, "poll failed and no snapshot is available");
                    Err(err)
                }
            }
        };

        *inner.in_flight.lock().await = None;
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedRemote, room, snapshot};
    use tokio::time;

    fn cache(remote: ScriptedRemote) -> PollCache<ScriptedRemote> {
        PollCache::new(remote, PollInterval::from_secs(60))
    }

    fn stue() -> RoomSnapshot {
        snapshot(vec![room(1, "Stue", 2150, 2200)])
    }

    #[tokio::test(start_paused = true)]
    async fn refetches_only_after_the_window() {
        let cache = cache(ScriptedRemote::new(stue()));

        let first = cache.poll().await.unwrap();
        assert_eq!(cache.remote().fetch_count(), 1);

        time::advance(Duration::from_secs(30)).await;
        let second = cache.poll().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.remote().fetch_count(), 1);

        time::advance(Duration::from_secs(31)).await;
        let third = cache.poll().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(cache.remote().fetch_count(), 2);
        assert_eq!(cache.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_fetch() {
        let cache = cache(ScriptedRemote::new(stue()).with_latency(Duration::from_secs(2)));

        let (a, b) = tokio::join!(cache.poll(), cache.poll());
        let (a, b) = (a.unwrap(), b.unwrap());

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.remote().fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_fetch_is_resumed_by_next_caller() {
        let cache = cache(ScriptedRemote::new(stue()).with_latency(Duration::from_secs(2)));

        let abandoned = tokio::spawn({
            let cache = cache.clone();
            async move { cache.poll().await }
        });
        tokio::task::yield_now().await;
        assert_eq!(cache.remote().fetch_count(), 1);
        abandoned.abort();
        assert!(abandoned.await.unwrap_err().is_cancelled());

        let snapshot = cache.poll().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(cache.remote().fetch_count(), 1);
        assert_eq!(cache.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_after_success_serves_stale_snapshot() {
        let cache = cache(ScriptedRemote::new(stue()));
        let first = cache.poll().await.unwrap();

        cache.remote().fail_fetches(CoreError::Upstream {
            message: "maintenance".into(),
            status: Some(503),
        });
        time::advance(Duration::from_secs(61)).await;

        let stale = cache.poll().await.unwrap();
        assert!(Arc::ptr_eq(&first, &stale));
        assert_eq!(cache.remote().fetch_count(), 2);

        // Failures are not cached; the next call tries upstream again.
        cache.poll().await.unwrap();
        assert_eq!(cache.remote().fetch_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_without_snapshot_propagates() {
        let remote = ScriptedRemote::new(stue());
        remote.fail_fetches(CoreError::AuthenticationFailed {
            message: "invalid_grant".into(),
        });
        let cache = cache(remote);

        let err = cache.poll().await.unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
        assert!(cache.latest().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_max_age_overrides_interval() {
        let cache = cache(ScriptedRemote::new(stue()));
        cache.poll().await.unwrap();

        time::advance(Duration::from_secs(10)).await;
        cache.snapshot(PollInterval::from_secs(5)).await.unwrap();
        assert_eq!(cache.remote().fetch_count(), 2);

        cache.poll().await.unwrap();
        assert_eq!(cache.remote().fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn latest_exposes_fetch_time() {
        let cache = cache(ScriptedRemote::new(stue()));
        assert!(cache.latest().is_none());

        cache.poll().await.unwrap();
        time::advance(Duration::from_secs(5)).await;

        let state = cache.latest().unwrap();
        assert_eq!(state.snapshot.len(), 1);
        assert_eq!(state.age(), Duration::from_secs(5));
    }
}
