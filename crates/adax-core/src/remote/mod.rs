// ── RemoteClient contract ──
//
// The three operations the bridge needs from the heater cloud. Token
// handling and the wire protocol stay behind this seam; the core only
// sees domain types and `CoreError`.

mod cloud;
mod dummy;

use std::future::Future;

pub use cloud::CloudRemote;
pub use dummy::DummyRemote;

use crate::config::RemoteSettings;
use crate::error::CoreError;
use crate::model::{Centidegrees, EnergyLogEntry, RoomId, RoomSnapshot};

/// Capability to read rooms and write setpoints upstream.
pub trait RemoteClient: Send + Sync + 'static {
    /// Every room with its temperatures and energy reading.
    fn list_rooms_with_energy(
        &self,
    ) -> impl Future<Output = Result<RoomSnapshot, CoreError>> + Send;

    /// Ordered energy consumption buckets for one room.
    fn energy_log(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Vec<EnergyLogEntry>, CoreError>> + Send;

    fn set_target_temperature(
        &self,
        room_id: RoomId,
        target: Centidegrees,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// The remote selected by configuration.
#[derive(Debug)]
pub enum Remote {
    Cloud(CloudRemote),
    Dummy(DummyRemote),
}

impl Remote {
    pub fn from_settings(settings: &RemoteSettings) -> Result<Self, CoreError> {
        match settings {
            RemoteSettings::Cloud(cloud) => Ok(Self::Cloud(CloudRemote::new(cloud)?)),
            RemoteSettings::Dummy { room_names } => {
                Ok(Self::Dummy(DummyRemote::new(room_names.clone())))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cloud(_) => "cloud",
            Self::Dummy(_) => "dummy",
        }
    }
}

impl RemoteClient for Remote {
    async fn list_rooms_with_energy(&self) -> Result<RoomSnapshot, CoreError> {
        match self {
            Self::Cloud(r) => r.list_rooms_with_energy().await,
            Self::Dummy(r) => r.list_rooms_with_energy().await,
        }
    }

    async fn energy_log(&self, room_id: RoomId) -> Result<Vec<EnergyLogEntry>, CoreError> {
        match self {
            Self::Cloud(r) => r.energy_log(room_id).await,
            Self::Dummy(r) => r.energy_log(room_id).await,
        }
    }

    async fn set_target_temperature(
        &self,
        room_id: RoomId,
        target: Centidegrees,
    ) -> Result<(), CoreError> {
        match self {
            Self::Cloud(r) => r.set_target_temperature(room_id, target).await,
            Self::Dummy(r) => r.set_target_temperature(room_id, target).await,
        }
    }
}
