// ── Room domain types ──

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identity::RoomId;
use super::temperature::Centidegrees;

/// A heated room as reported by the cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Measured temperature. Absent when no heater in the room reports one.
    pub current_temperature: Option<Centidegrees>,
    pub target_temperature: Option<Centidegrees>,
    /// Instantaneous power draw in watts, when energy data was requested.
    pub energy_watts: Option<f64>,
    pub heating_enabled: Option<bool>,
}

impl Room {
    /// Name shown on the accessory. Falls back to the room id when the
    /// cloud reports a blank name.
    pub fn display_name(&self) -> String {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            format!("Room {}", self.id)
        } else {
            trimmed.to_owned()
        }
    }
}

/// A single heater unit. Informational only; rooms are what get bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heater {
    pub id: i64,
    pub room_id: Option<RoomId>,
    pub name: Option<String>,
    pub model: Option<String>,
    pub energy_wh: Option<f64>,
    pub energy_time: Option<DateTime<Utc>>,
}

/// One complete answer from the cloud: every room, plus the heaters when
/// the upstream listed them. Shared by `Arc` and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub heaters: Vec<Heater>,
}

impl RoomSnapshot {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self {
            rooms,
            heaters: Vec::new(),
        }
    }

    pub fn with_heaters(mut self, heaters: Vec<Heater>) -> Self {
        self.heaters = heaters;
        self
    }

    /// First room with the given id.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn room_ids(&self) -> HashSet<RoomId> {
        self.rooms.iter().map(|r| r.id).collect()
    }

    pub fn heaters_in(&self, id: RoomId) -> impl Iterator<Item = &Heater> {
        self.heaters.iter().filter(move |h| h.room_id == Some(id))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: i64, name: &str) -> Room {
        Room {
            id: RoomId::new(id),
            name: name.into(),
            current_temperature: None,
            target_temperature: None,
            energy_watts: None,
            heating_enabled: None,
        }
    }

    #[test]
    fn blank_name_falls_back_to_id() {
        assert_eq!(room(3, "  ").display_name(), "Room 3");
        assert_eq!(room(3, " Kjøkken ").display_name(), "Kjøkken");
    }

    #[test]
    fn lookup_returns_first_match() {
        let snapshot = RoomSnapshot::new(vec![room(1, "Stue"), room(1, "Duplicate")]);
        assert_eq!(snapshot.room(RoomId::new(1)).map(|r| r.name.as_str()), Some("Stue"));
        assert!(snapshot.room(RoomId::new(2)).is_none());
        assert_eq!(snapshot.room_ids().len(), 1);
    }
}
