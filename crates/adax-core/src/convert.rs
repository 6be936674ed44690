// ── API-to-domain type conversions ──
//
// Bridges raw `adax_api` response types into `adax_core::model` types.
// Schema validation already happened during deserialization; what remains
// is unit wrapping and timestamp parsing.

use chrono::{DateTime, Utc};

use adax_api::{ApiDevice, ApiRoom, ContentResponse, EnergyLogResponse};

use crate::error::CoreError;
use crate::model::{Centidegrees, EnergyLogEntry, Heater, Room, RoomId, RoomSnapshot};

impl From<ApiRoom> for Room {
    fn from(r: ApiRoom) -> Self {
        Self {
            id: RoomId::new(r.id),
            name: r.name.unwrap_or_default(),
            current_temperature: r.temperature.map(Centidegrees::new),
            target_temperature: r.target_temperature.map(Centidegrees::new),
            energy_watts: r.energy_wh,
            heating_enabled: r.heating_enabled,
        }
    }
}

impl From<ApiDevice> for Heater {
    fn from(d: ApiDevice) -> Self {
        Self {
            id: d.id,
            room_id: d.room_id.map(RoomId::new),
            name: d.name,
            model: d.device_type,
            energy_wh: d.energy_wh,
            energy_time: d.energy_time.and_then(DateTime::<Utc>::from_timestamp_millis),
        }
    }
}

impl From<ContentResponse> for RoomSnapshot {
    fn from(c: ContentResponse) -> Self {
        RoomSnapshot::new(c.rooms.into_iter().map(Room::from).collect())
            .with_heaters(c.devices.into_iter().map(Heater::from).collect())
    }
}

/// Convert an energy log, rejecting points whose timestamps are out of
/// range for a calendar date.
pub fn energy_log_entries(log: EnergyLogResponse) -> Result<Vec<EnergyLogEntry>, CoreError> {
    log.points
        .into_iter()
        .map(|p| {
            let from = millis(p.from_time)?;
            let to = millis(p.to_time)?;
            Ok(EnergyLogEntry {
                from,
                to,
                energy_wh: p.energy_wh,
            })
        })
        .collect()
}

fn millis(ts: i64) -> Result<DateTime<Utc>, CoreError> {
    DateTime::from_timestamp_millis(ts).ok_or_else(|| CoreError::InvalidResponse {
        message: format!("energy log timestamp {ts} is out of range"),
    })
}
