//! Bridge logic between the Adax cloud and a smart-home accessory host.
//!
//! - **[`Bridge`]**: facade the host drives. [`on_ready()`](Bridge::on_ready)
//!   discovers rooms and refreshes every accessory;
//!   [`spawn_refresh_task()`](Bridge::spawn_refresh_task) keeps them current.
//!
//! - **[`PollCache`]**: single-flight, time-boxed cache in front of
//!   [`RemoteClient::list_rooms_with_energy`]. Concurrent callers share one
//!   fetch; a failed fetch serves the previous snapshot.
//!
//! - **[`DeviceReconciler`]**: adds an accessory for every new room and,
//!   under [`RemovalPolicy::Remove`], drops those whose room vanished.
//!
//! - **[`RoomAccessory`]**: thermostat state derived from the cached poll,
//!   plus the setpoint and mode commands.
//!
//! - **[`RemoteClient`]**: the cloud contract, with a live
//!   ([`CloudRemote`]) and an in-memory ([`DummyRemote`]) implementation
//!   selected through [`Remote`].

pub mod accessory;
pub mod bridge;
pub mod config;
pub mod convert;
pub mod error;
pub mod host;
pub mod model;
pub mod poll;
pub mod reconcile;
pub mod remote;

#[cfg(test)]
pub(crate) mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use accessory::{RoomAccessory, SetpointAck, SharedAccessory, setpoint_centidegrees};
pub use bridge::{Bridge, RefreshSummary};
pub use config::{BridgeConfig, CloudSettings, PollInterval, RemovalPolicy, RemoteSettings};
pub use error::CoreError;
pub use host::AccessoryHost;
pub use poll::{PollCache, PollState};
pub use reconcile::{DeviceReconciler, ReconcileReport};
pub use remote::{CloudRemote, DummyRemote, Remote, RemoteClient};

pub use model::{
    AccessoryBinding, AccessoryId, AccessoryInfo, Centidegrees, EnergyLogEntry, Heater,
    HeatingState, Room, RoomId, RoomSnapshot, TargetMode, ThermostatState, accessory_identity,
};
