// Wire schema for the Adax REST API.
//
// Every response is decoded into these records at the client boundary;
// a shape deviation surfaces as `Error::Deserialization` rather than as
// an untyped value further down the stack.

use serde::{Deserialize, Serialize};

/// `GET rest/v1/content/` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub rooms: Vec<ApiRoom>,
    #[serde(default)]
    pub devices: Vec<ApiDevice>,
}

/// A heating zone. Temperatures are integer centidegrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoom {
    pub id: i64,
    #[serde(default)]
    pub home_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub heating_enabled: Option<bool>,
    #[serde(default)]
    pub temperature: Option<i32>,
    #[serde(default)]
    pub target_temperature: Option<i32>,
    #[serde(default, alias = "energyUsage")]
    pub energy_wh: Option<f64>,
}

/// A physical heater, reported alongside rooms when `withEnergy=1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDevice {
    pub id: i64,
    #[serde(default)]
    pub home_id: Option<i64>,
    #[serde(default)]
    pub room_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub energy_wh: Option<f64>,
    /// Epoch milliseconds of the `energy_wh` reading.
    #[serde(default)]
    pub energy_time: Option<i64>,
}

/// `GET rest/v1/energy_log/{roomId}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyLogResponse {
    #[serde(default)]
    pub points: Vec<EnergyPoint>,
}

/// One bucket of the energy log. Times are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyPoint {
    pub from_time: i64,
    pub to_time: i64,
    pub energy_wh: f64,
}

/// `POST rest/v1/control/` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    pub rooms: Vec<RoomTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTarget {
    pub id: i64,
    pub target_temperature: i32,
}

/// `POST auth/token` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}
