// Scripted doubles shared by the unit tests in this crate.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::CoreError;
use crate::host::AccessoryHost;
use crate::model::{AccessoryBinding, Centidegrees, EnergyLogEntry, Room, RoomId, RoomSnapshot};
use crate::remote::RemoteClient;

pub(crate) fn room(id: i64, name: &str, current: i32, target: i32) -> Room {
    Room {
        id: RoomId::new(id),
        name: name.into(),
        current_temperature: Some(Centidegrees::new(current)),
        target_temperature: Some(Centidegrees::new(target)),
        energy_watts: None,
        heating_enabled: Some(true),
    }
}

pub(crate) fn snapshot(rooms: Vec<Room>) -> RoomSnapshot {
    RoomSnapshot::new(rooms)
}

/// Remote whose listing is set by the test and whose writes are recorded.
pub(crate) struct ScriptedRemote {
    listing: Mutex<Result<RoomSnapshot, CoreError>>,
    latency: Duration,
    fetches: AtomicUsize,
    writes: Mutex<Vec<(RoomId, Centidegrees)>>,
    reject_writes: AtomicBool,
}

impl ScriptedRemote {
    pub(crate) fn new(snapshot: RoomSnapshot) -> Self {
        Self {
            listing: Mutex::new(Ok(snapshot)),
            latency: Duration::ZERO,
            fetches: AtomicUsize::new(0),
            writes: Mutex::new(Vec::new()),
            reject_writes: AtomicBool::new(false),
        }
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn set_snapshot(&self, snapshot: RoomSnapshot) {
        *self.listing.lock().unwrap() = Ok(snapshot);
    }

    pub(crate) fn fail_fetches(&self, err: CoreError) {
        *self.listing.lock().unwrap() = Err(err);
    }

    pub(crate) fn reject_writes(&self) {
        self.reject_writes.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn writes(&self) -> Vec<(RoomId, Centidegrees)> {
        self.writes.lock().unwrap().clone()
    }
}

impl RemoteClient for ScriptedRemote {
    async fn list_rooms_with_energy(&self) -> Result<RoomSnapshot, CoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.listing.lock().unwrap().clone()
    }

    async fn energy_log(&self, _room_id: RoomId) -> Result<Vec<EnergyLogEntry>, CoreError> {
        Ok(Vec::new())
    }

    async fn set_target_temperature(
        &self,
        room_id: RoomId,
        target: Centidegrees,
    ) -> Result<(), CoreError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Upstream {
                message: "control rejected".into(),
                status: Some(500),
            });
        }
        self.writes.lock().unwrap().push((room_id, target));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostEvent {
    Registered(RoomId),
    Unregistered(RoomId),
}

/// Host that records lifecycle callbacks in order.
#[derive(Default)]
pub(crate) struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub(crate) fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn registered(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, HostEvent::Registered(_)))
            .count()
    }

    pub(crate) fn unregistered(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, HostEvent::Unregistered(_)))
            .count()
    }
}

impl AccessoryHost for RecordingHost {
    fn register_accessory(&self, binding: &AccessoryBinding) {
        self.events
            .lock()
            .unwrap()
            .push(HostEvent::Registered(binding.room_id));
    }

    fn unregister_accessory(&self, binding: &AccessoryBinding) {
        self.events
            .lock()
            .unwrap()
            .push(HostEvent::Unregistered(binding.room_id));
    }
}
