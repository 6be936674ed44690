// Energy log endpoint

use tracing::debug;

use super::client::CloudClient;
use super::models::EnergyLogResponse;
use crate::error::Error;

impl CloudClient {
    /// Fetch the energy log for a single room.
    ///
    /// `GET rest/v1/energy_log/{roomId}`
    pub async fn energy_log(&self, room_id: i64) -> Result<EnergyLogResponse, Error> {
        let url = self.rest_url(&format!("energy_log/{room_id}"))?;
        debug!(room_id, "fetching energy log");
        self.get(url).await
    }
}
