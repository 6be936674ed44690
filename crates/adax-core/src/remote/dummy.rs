// In-memory stand-in for the cloud. Two fixed rooms, deterministic values,
// no network. Setpoints written through it show up on the next listing.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use tracing::info;

use super::RemoteClient;
use crate::error::CoreError;
use crate::model::{Centidegrees, EnergyLogEntry, Room, RoomId, RoomSnapshot};

/// `(id, name, current, target, watts)` of the built-in rooms.
const DEFAULT_ROOMS: [(i64, &str, i32, i32, f64); 2] = [
    (1, "Stue", 2150, 2200, 500.0),
    (2, "Soveværelse", 1900, 2000, 250.0),
];

const ENERGY_LOG_WH: [f64; 2] = [100.0, 150.0];

#[derive(Debug)]
pub struct DummyRemote {
    rooms: Vec<Room>,
    targets: DashMap<RoomId, Centidegrees>,
}

impl DummyRemote {
    /// Build the dummy rooms, renaming any whose id appears in `room_names`.
    pub fn new(room_names: HashMap<RoomId, String>) -> Self {
        let rooms = DEFAULT_ROOMS
            .iter()
            .map(|&(id, name, current, target, watts)| {
                let id = RoomId::new(id);
                Room {
                    id,
                    name: room_names
                        .get(&id)
                        .cloned()
                        .unwrap_or_else(|| name.to_owned()),
                    current_temperature: Some(Centidegrees::new(current)),
                    target_temperature: Some(Centidegrees::new(target)),
                    energy_watts: Some(watts),
                    heating_enabled: Some(true),
                }
            })
            .collect();
        Self {
            rooms,
            targets: DashMap::new(),
        }
    }

    fn knows(&self, room_id: RoomId) -> bool {
        self.rooms.iter().any(|r| r.id == room_id)
    }
}

impl Default for DummyRemote {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl RemoteClient for DummyRemote {
    async fn list_rooms_with_energy(&self) -> Result<RoomSnapshot, CoreError> {
        let rooms = self
            .rooms
            .iter()
            .map(|room| {
                let mut room = room.clone();
                if let Some(target) = self.targets.get(&room.id) {
                    room.target_temperature = Some(*target);
                }
                room
            })
            .collect();
        Ok(RoomSnapshot::new(rooms))
    }

    async fn energy_log(&self, room_id: RoomId) -> Result<Vec<EnergyLogEntry>, CoreError> {
        if !self.knows(room_id) {
            return Err(CoreError::RoomNotFound { room_id });
        }
        let hour = TimeDelta::hours(1);
        let now = Utc::now().timestamp();
        let top_of_hour =
            DateTime::from_timestamp(now - now.rem_euclid(3600), 0).unwrap_or_else(Utc::now);
        let mut from = top_of_hour - hour * 2;
        Ok(ENERGY_LOG_WH
            .iter()
            .map(|&energy_wh| {
                let entry = EnergyLogEntry {
                    from,
                    to: from + hour,
                    energy_wh,
                };
                from += hour;
                entry
            })
            .collect())
    }

    async fn set_target_temperature(
        &self,
        room_id: RoomId,
        target: Centidegrees,
    ) -> Result<(), CoreError> {
        if !self.knows(room_id) {
            return Err(CoreError::RoomNotFound { room_id });
        }
        info!(%room_id, %target, "dummy remote accepted target temperature");
        self.targets.insert(room_id, target);
        Ok(())
    }
}
