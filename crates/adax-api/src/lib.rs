// adax-api: Async Rust client for the Adax cloud heater API

pub mod auth;
pub mod error;
pub mod rest;
pub mod transport;

pub use auth::Credentials;
pub use error::Error;
pub use rest::CloudClient;
pub use rest::models::{
    ApiDevice, ApiRoom, ContentResponse, ControlRequest, EnergyLogResponse, EnergyPoint,
    RoomTarget,
};
pub use transport::{DEFAULT_BASE_URL, TransportConfig};
