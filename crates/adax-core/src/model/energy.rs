use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Energy consumed by a room over one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyLogEntry {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub energy_wh: f64,
}
