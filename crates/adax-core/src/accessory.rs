// ── Room accessory ──
//
// One thermostat per room. Display state is derived from the shared poll
// cache and published through a watch channel; setpoints go straight to
// the remote and only show up once a later poll confirms them.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{
    AccessoryBinding, AccessoryId, AccessoryInfo, Centidegrees, RoomId, RoomSnapshot,
    TARGET_MAX_CELSIUS, TARGET_MIN_CELSIUS, TARGET_STEP_CELSIUS, TargetMode, ThermostatState,
};
use crate::poll::PollCache;
use crate::remote::RemoteClient;

/// Clamp a requested target to the characteristic bounds, snap it to the
/// half-degree step, and convert to centidegrees.
pub fn setpoint_centidegrees(celsius: f64) -> Result<Centidegrees, CoreError> {
    if !celsius.is_finite() {
        return Err(CoreError::ValidationFailed {
            message: format!("target temperature must be a finite number, got {celsius}"),
        });
    }
    let clamped = celsius.clamp(TARGET_MIN_CELSIUS, TARGET_MAX_CELSIUS);
    let stepped = (clamped / TARGET_STEP_CELSIUS).round() * TARGET_STEP_CELSIUS;
    if (stepped - celsius).abs() > f64::EPSILON {
        debug!(
            requested = celsius,
            applied = stepped,
            "adjusted target to thermostat bounds"
        );
    }
    Centidegrees::from_celsius(stepped).ok_or_else(|| CoreError::ValidationFailed {
        message: format!("target temperature {celsius} is out of range"),
    })
}

/// Acknowledged setpoint write.
#[derive(Debug, Clone)]
pub struct SetpointAck {
    /// Target after clamping and stepping, in the unit sent upstream.
    pub target: Centidegrees,
    /// Outcome of the upstream write. Not retried.
    pub delivery: Result<(), CoreError>,
}

impl SetpointAck {
    pub fn is_delivered(&self) -> bool {
        self.delivery.is_ok()
    }

    /// The applied target, or the upstream failure.
    pub fn into_result(self) -> Result<Centidegrees, CoreError> {
        let target = self.target;
        self.delivery.map(|()| target)
    }
}

/// A room exposed to the host as a thermostat.
pub struct RoomAccessory<R> {
    binding: AccessoryBinding,
    cache: PollCache<R>,
    state: watch::Sender<ThermostatState>,
}

impl<R: RemoteClient> RoomAccessory<R> {
    pub fn new(binding: AccessoryBinding, cache: PollCache<R>) -> Self {
        let (state, _) = watch::channel(ThermostatState::default());
        Self {
            binding,
            cache,
            state,
        }
    }

    pub fn binding(&self) -> &AccessoryBinding {
        &self.binding
    }

    pub fn identity(&self) -> AccessoryId {
        self.binding.identity
    }

    pub fn room_id(&self) -> RoomId {
        self.binding.room_id
    }

    pub fn info(&self) -> AccessoryInfo {
        self.binding.info()
    }

    /// Currently displayed state.
    pub fn state(&self) -> ThermostatState {
        self.state.borrow().clone()
    }

    /// Watch displayed state changes.
    pub fn subscribe(&self) -> watch::Receiver<ThermostatState> {
        self.state.subscribe()
    }

    /// Re-derive displayed state from the cached poll.
    ///
    /// A room missing from the snapshot leaves the previous state in place
    /// and yields `RoomNotFound`.
    pub async fn refresh(&self) -> Result<ThermostatState, CoreError> {
        let snapshot = self.cache.poll().await?;
        self.apply(&snapshot)
    }

    pub(crate) fn apply(&self, snapshot: &RoomSnapshot) -> Result<ThermostatState, CoreError> {
        let room_id = self.room_id();
        let Some(room) = snapshot.room(room_id) else {
            debug!(%room_id, "room absent from snapshot, keeping previous state");
            return Err(CoreError::RoomNotFound { room_id });
        };

        let next = ThermostatState::derive(room, self.state.borrow().target_mode);
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
        if changed {
            debug!(
                %room_id,
                current = next.current_celsius,
                target = next.target_celsius,
                heating = %next.heating,
                "accessory state updated"
            );
        }
        Ok(next)
    }

    /// Forward a new target upstream. Local state is not touched; the next
    /// refresh shows the value once upstream reports it.
    ///
    /// Only a target that cannot be interpreted is an `Err`. An upstream
    /// failure is logged and reported through [`SetpointAck::delivery`]
    /// while the write itself is still acknowledged.
    pub async fn set_target(&self, celsius: f64) -> Result<SetpointAck, CoreError> {
        let room_id = self.room_id();
        let target = setpoint_centidegrees(celsius)?;
        info!(%room_id, name = %self.binding.display_name, %target, "setting target temperature");

        let delivery = self
            .cache
            .remote()
            .set_target_temperature(room_id, target)
            .await;
        if let Err(ref err) = delivery {
            warn!(%room_id, error = %err, "could not set target temperature");
        }
        Ok(SetpointAck { target, delivery })
    }

    /// Record the requested mode. Nothing is sent upstream.
    pub fn set_mode(&self, mode: TargetMode) {
        info!(room_id = %self.room_id(), %mode, "target mode changed locally");
        self.state.send_if_modified(|current| {
            if current.target_mode == mode {
                false
            } else {
                current.target_mode = mode;
                true
            }
        });
    }
}

impl<R> std::fmt::Debug for RoomAccessory<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomAccessory")
            .field("binding", &self.binding)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

/// Shared handle the reconciler and bridge pass around.
pub type SharedAccessory<R> = Arc<RoomAccessory<R>>;
