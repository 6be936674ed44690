// ── Bridge facade ──
//
// Wires the poll cache, reconciler and accessories together behind one
// handle that the host drives: restore persisted accessories, fire the
// ready signal, route characteristic reads and writes.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::accessory::{SetpointAck, SharedAccessory};
use crate::config::{BridgeConfig, PollInterval, RemovalPolicy};
use crate::error::CoreError;
use crate::host::AccessoryHost;
use crate::model::{
    AccessoryBinding, AccessoryId, EnergyLogEntry, RoomId, RoomSnapshot, TargetMode,
};
use crate::poll::PollCache;
use crate::reconcile::{DeviceReconciler, ReconcileReport};
use crate::remote::{Remote, RemoteClient};

/// The main entry point for hosts.
///
/// Cheaply cloneable via `Arc<BridgeInner>`.
pub struct Bridge<R, H> {
    inner: Arc<BridgeInner<R, H>>,
}

struct BridgeInner<R, H> {
    cache: PollCache<R>,
    reconciler: Mutex<DeviceReconciler<R, H>>,
}

impl<R, H> Clone for Bridge<R, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Outcome of refreshing every accessory once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: usize,
    /// Accessories whose room was absent from the snapshot.
    pub missing: usize,
    pub failed: usize,
}

impl<H: AccessoryHost> Bridge<Remote, H> {
    /// Build the remote selected by `config` and a bridge around it.
    pub fn from_config(config: &BridgeConfig, host: Arc<H>) -> Result<Self, CoreError> {
        let remote = Remote::from_settings(&config.remote)?;
        info!(
            remote = remote.kind(),
            poll_interval = %config.poll_interval,
            "bridge configured"
        );
        Ok(Self::new(remote, host, config.poll_interval, config.removal))
    }
}

impl<R: RemoteClient, H: AccessoryHost> Bridge<R, H> {
    pub fn new(remote: R, host: Arc<H>, poll_interval: PollInterval, removal: RemovalPolicy) -> Self {
        let cache = PollCache::new(remote, poll_interval);
        let reconciler = DeviceReconciler::new(cache.clone(), host, removal);
        Self {
            inner: Arc::new(BridgeInner {
                cache,
                reconciler: Mutex::new(reconciler),
            }),
        }
    }

    pub fn cache(&self) -> &PollCache<R> {
        &self.inner.cache
    }

    pub fn remote(&self) -> &R {
        self.inner.cache.remote()
    }

    /// Hand back an accessory the host persisted across restarts.
    pub async fn restore_accessory(&self, binding: AccessoryBinding) -> SharedAccessory<R> {
        self.inner.reconciler.lock().await.restore(binding)
    }

    /// Host "ready" handler: discover rooms, then refresh every accessory.
    pub async fn on_ready(&self) -> ReconcileReport {
        let report = self.discover().await;
        info!(
            added = report.added.len(),
            removed = report.removed.len(),
            kept = report.kept,
            "discovery complete"
        );
        self.refresh_all().await;
        report
    }

    /// Poll, then reconcile. The reconciler lock is only taken once the
    /// poll has settled, so lookups and setpoint writes never wait on it.
    pub async fn discover(&self) -> ReconcileReport {
        let polled = self.inner.cache.poll().await;
        self.inner.reconciler.lock().await.discover(polled)
    }

    /// Refresh every accessory from the cached poll. Failures are logged
    /// and counted; none of them abort the pass.
    pub async fn refresh_all(&self) -> RefreshSummary {
        let accessories = self.accessories().await;
        let mut summary = RefreshSummary::default();
        for acc in accessories {
            match acc.refresh().await {
                Ok(_) => summary.refreshed += 1,
                Err(CoreError::RoomNotFound { .. }) => summary.missing += 1,
                Err(err) => {
                    debug!(room_id = %acc.room_id(), error = %err, "refresh failed");
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    /// Current snapshot, fetched if the cached one is older than the poll
    /// interval.
    pub async fn rooms(&self) -> Result<Arc<RoomSnapshot>, CoreError> {
        self.inner.cache.poll().await
    }

    /// Accessories in registration order.
    pub async fn accessories(&self) -> Vec<SharedAccessory<R>> {
        self.inner.reconciler.lock().await.accessories()
    }

    pub async fn accessory(&self, identity: &AccessoryId) -> Result<SharedAccessory<R>, CoreError> {
        self.inner
            .reconciler
            .lock()
            .await
            .get(identity)
            .ok_or_else(|| CoreError::AccessoryNotFound {
                identity: identity.to_string(),
            })
    }

    pub async fn accessory_for_room(&self, room_id: RoomId) -> Result<SharedAccessory<R>, CoreError> {
        self.inner
            .reconciler
            .lock()
            .await
            .find_room(room_id)
            .ok_or_else(|| CoreError::RoomNotFound { room_id })
    }

    pub async fn set_target(
        &self,
        identity: &AccessoryId,
        celsius: f64,
    ) -> Result<SetpointAck, CoreError> {
        self.accessory(identity).await?.set_target(celsius).await
    }

    pub async fn set_mode(&self, identity: &AccessoryId, mode: TargetMode) -> Result<(), CoreError> {
        self.accessory(identity).await?.set_mode(mode);
        Ok(())
    }

    pub async fn energy_log(&self, room_id: RoomId) -> Result<Vec<EnergyLogEntry>, CoreError> {
        self.inner.cache.remote().energy_log(room_id).await
    }

    /// Refresh all accessories every poll interval until `cancel` fires.
    pub fn spawn_refresh_task(&self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(refresh_task(self.clone(), cancel))
    }
}

async fn refresh_task<R: RemoteClient, H: AccessoryHost>(
    bridge: Bridge<R, H>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(bridge.cache().interval().get());
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let summary = bridge.refresh_all().await;
                if summary.failed > 0 {
                    warn!(failed = summary.failed, "periodic refresh incomplete");
                }
            }
        }
    }
    debug!("refresh task stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::time::Duration;

    use tokio::time;

    use super::*;
    use crate::model::{Centidegrees, HeatingState, accessory_identity};
    use crate::test_support::{RecordingHost, ScriptedRemote, room, snapshot};

    fn bridge(remote: ScriptedRemote) -> (Bridge<ScriptedRemote, RecordingHost>, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::default());
        let bridge = Bridge::new(
            remote,
            Arc::clone(&host),
            PollInterval::from_secs(60),
            RemovalPolicy::Remove,
        );
        (bridge, host)
    }

    fn stue() -> RoomSnapshot {
        snapshot(vec![room(1, "Stue", 2150, 2200)])
    }

    #[tokio::test]
    async fn ready_discovers_and_refreshes() {
        let (bridge, host) = bridge(ScriptedRemote::new(stue()));

        let report = bridge.on_ready().await;
        assert_eq!(report.added.len(), 1);
        assert_eq!(host.registered(), 1);

        let acc = bridge.accessory(&accessory_identity(RoomId::new(1))).await.unwrap();
        let state = acc.state();
        assert_eq!(state.current_celsius, 21.5);
        assert_eq!(state.target_celsius, 22.0);
        assert_eq!(state.heating, HeatingState::Heat);

        // Discovery and the refresh that follows share one poll.
        assert_eq!(bridge.remote().fetch_count(), 1);
    }

    #[tokio::test]
    async fn unknown_accessory_is_reported() {
        let (bridge, _) = bridge(ScriptedRemote::new(stue()));
        bridge.on_ready().await;

        let err = bridge
            .set_target(&accessory_identity(RoomId::new(42)), 21.0)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::AccessoryNotFound { .. }));
    }

    #[tokio::test]
    async fn commands_route_to_the_room() {
        let (bridge, _) = bridge(ScriptedRemote::new(stue()));
        bridge.on_ready().await;
        let identity = accessory_identity(RoomId::new(1));

        let ack = bridge.set_target(&identity, 23.5).await.unwrap();
        assert!(ack.is_delivered());
        let written = ack.target;
        assert_eq!(written, Centidegrees::new(2350));
        assert_eq!(bridge.remote().writes(), vec![(RoomId::new(1), written)]);

        bridge.set_mode(&identity, TargetMode::Off).await.unwrap();
        let acc = bridge.accessory_for_room(RoomId::new(1)).await.unwrap();
        assert_eq!(acc.state().target_mode, TargetMode::Off);
    }

    #[tokio::test]
    async fn restored_accessories_refresh_without_registration() {
        let (bridge, host) = bridge(ScriptedRemote::new(stue()));
        let binding = AccessoryBinding::for_room(&room(1, "Stue", 0, 0));
        bridge.restore_accessory(binding).await;

        let report = bridge.on_ready().await;
        assert!(report.is_noop());
        assert_eq!(host.registered(), 0);
        assert_eq!(bridge.accessories().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_task_follows_poll_interval() {
        let (bridge, _) = bridge(ScriptedRemote::new(stue()));
        bridge.on_ready().await;
        assert_eq!(bridge.remote().fetch_count(), 1);

        let cancel = CancellationToken::new();
        let handle = bridge.spawn_refresh_task(cancel.clone());
        tokio::task::yield_now().await;

        time::advance(Duration::from_secs(61)).await;
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(bridge.remote().fetch_count(), 2);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn setpoint_writes_do_not_wait_for_discovery() {
        let remote = ScriptedRemote::new(stue()).with_latency(Duration::from_secs(30));
        let (bridge, _) = bridge(remote);
        bridge
            .restore_accessory(AccessoryBinding::for_room(&room(1, "Stue", 0, 0)))
            .await;

        let discovering = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.discover().await }
        });
        tokio::task::yield_now().await;
        assert_eq!(bridge.remote().fetch_count(), 1);

        let started = time::Instant::now();
        let ack = bridge
            .set_target(&accessory_identity(RoomId::new(1)), 21.0)
            .await
            .unwrap();
        assert!(ack.is_delivered());
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(bridge.accessories().await.len(), 1);
        assert!(!discovering.is_finished());

        let report = discovering.await.unwrap();
        assert!(report.is_noop());
        assert_eq!(bridge.remote().writes(), vec![(RoomId::new(1), Centidegrees::new(2100))]);
    }

    #[tokio::test]
    async fn failed_first_poll_leaves_bridge_empty() {
        let remote = ScriptedRemote::new(stue());
        remote.fail_fetches(CoreError::Timeout);
        let (bridge, host) = bridge(remote);

        let report = bridge.on_ready().await;
        assert!(report.is_noop());
        assert!(bridge.accessories().await.is_empty());
        assert!(host.events().is_empty());
        assert_eq!(bridge.refresh_all().await, RefreshSummary::default());
    }
}
