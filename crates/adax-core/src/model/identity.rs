// ── Core identity types ──
//
// RoomId is the cloud's numeric room key. AccessoryId is the stable host
// identity derived from it; both sides of the bridge agree on the mapping
// because it is a pure function of the room id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ── RoomId ──────────────────────────────────────────────────────────

/// Numeric identifier the Adax cloud assigns to a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(i64);

impl RoomId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for RoomId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

// ── AccessoryId ─────────────────────────────────────────────────────

/// Namespace for name-based (v5) accessory UUIDs.
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x3c1f_8a52_9d04_4e7b_a6f1_0b2d_5e88_c4a7);

/// Stable host-side identity of a room accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessoryId(Uuid);

impl AccessoryId {
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccessoryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Derive the accessory identity for a room.
///
/// Deterministic across runs and processes: the same room id always maps
/// to the same identity, and distinct ids map to distinct identities.
pub fn accessory_identity(room_id: RoomId) -> AccessoryId {
    AccessoryId(Uuid::new_v5(
        &ACCESSORY_NAMESPACE,
        room_id.to_string().as_bytes(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn room_id_parses_with_whitespace() {
        let id: RoomId = " 42 ".parse().unwrap();
        assert_eq!(id, RoomId::new(42));
        assert!("kitchen".parse::<RoomId>().is_err());
    }

    #[test]
    fn identity_is_deterministic() {
        let first = accessory_identity(RoomId::new(1));
        let second = accessory_identity(RoomId::new(1));
        assert_eq!(first, second);
        assert_eq!(first.as_uuid().get_version_num(), 5);
    }

    #[test]
    fn identity_is_injective_over_sample() {
        let ids: HashSet<AccessoryId> = (-50..500).map(|n| accessory_identity(RoomId::new(n))).collect();
        assert_eq!(ids.len(), 550);
    }

    #[test]
    fn accessory_id_round_trips_through_display() {
        let id = accessory_identity(RoomId::new(2));
        let parsed: AccessoryId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
