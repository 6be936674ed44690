// ── Domain model ──

pub mod accessory;
pub mod energy;
pub mod identity;
pub mod room;
pub mod temperature;

pub use accessory::{
    AccessoryBinding, AccessoryInfo, HeatingState, TARGET_MAX_CELSIUS, TARGET_MIN_CELSIUS,
    TARGET_STEP_CELSIUS, TargetMode, ThermostatState,
};
pub use energy::EnergyLogEntry;
pub use identity::{AccessoryId, RoomId, accessory_identity};
pub use room::{Heater, Room, RoomSnapshot};
pub use temperature::Centidegrees;
