// ── Accessory-side domain types ──
//
// What the host sees of a room: a binding (identity + display name) and a
// thermostat state expressed in floating degrees Celsius.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::identity::{AccessoryId, RoomId, accessory_identity};
use super::room::Room;
use super::temperature::Centidegrees;

pub const MANUFACTURER: &str = "ADAX";
pub const MODEL: &str = "WiFi Heater";

/// Lowest target the thermostat characteristic accepts.
pub const TARGET_MIN_CELSIUS: f64 = 5.0;
/// Highest target the thermostat characteristic accepts.
pub const TARGET_MAX_CELSIUS: f64 = 30.0;
pub const TARGET_STEP_CELSIUS: f64 = 0.5;

// ── AccessoryBinding ────────────────────────────────────────────────

/// One locally registered accessory. Lives from the first discovery of a
/// room until that room disappears from a later snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessoryBinding {
    pub identity: AccessoryId,
    pub room_id: RoomId,
    pub display_name: String,
}

impl AccessoryBinding {
    pub fn for_room(room: &Room) -> Self {
        Self {
            identity: accessory_identity(room.id),
            room_id: room.id,
            display_name: room.display_name(),
        }
    }

    pub fn info(&self) -> AccessoryInfo {
        AccessoryInfo {
            manufacturer: MANUFACTURER,
            model: MODEL,
            serial_number: self.room_id.to_string(),
        }
    }
}

/// Static accessory information service contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessoryInfo {
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub serial_number: String,
}

// ── Thermostat state ────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HeatingState {
    #[default]
    Idle,
    Heat,
}

/// Operating mode the user asked for. Only heat and off are modelled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TargetMode {
    Off,
    #[default]
    Heat,
}

/// Displayed state of one room accessory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThermostatState {
    pub current_celsius: f64,
    pub target_celsius: f64,
    pub heating: HeatingState,
    pub target_mode: TargetMode,
}

impl ThermostatState {
    /// Derive display state from a polled room. Absent temperatures read
    /// as zero; heating compares centidegrees, never floats.
    pub fn derive(room: &Room, target_mode: TargetMode) -> Self {
        let current = room.current_temperature.unwrap_or_default();
        let target = room.target_temperature.unwrap_or_default();
        Self {
            current_celsius: current.to_celsius(),
            target_celsius: target.to_celsius(),
            heating: heating_state(current, target),
            target_mode,
        }
    }
}

pub fn heating_state(current: Centidegrees, target: Centidegrees) -> HeatingState {
    if target > current {
        HeatingState::Heat
    } else {
        HeatingState::Idle
    }
}
