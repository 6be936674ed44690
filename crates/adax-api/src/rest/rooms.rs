// Room endpoints
//
// Room listing (with energy detail) and setpoint control.

use tracing::debug;

use super::client::CloudClient;
use super::models::{ContentResponse, ControlRequest, RoomTarget};
use crate::error::Error;

impl CloudClient {
    /// List all rooms and heaters with energy readings.
    ///
    /// `GET rest/v1/content/?withEnergy=1`
    pub async fn list_rooms_with_energy(&self) -> Result<ContentResponse, Error> {
        let mut url = self.rest_url("content/")?;
        url.query_pairs_mut().append_pair("withEnergy", "1");
        debug!("listing rooms");
        self.get(url).await
    }

    /// Set a room's target temperature in centidegrees.
    ///
    /// `POST rest/v1/control/` with `{"rooms": [{"id": .., "targetTemperature": ..}]}`
    pub async fn set_room_temperature(&self, room_id: i64, centidegrees: i32) -> Result<(), Error> {
        let url = self.rest_url("control/")?;
        debug!(room_id, centidegrees, "setting room target temperature");
        let body = ControlRequest {
            rooms: vec![RoomTarget {
                id: room_id,
                target_temperature: centidegrees,
            }],
        };
        self.post_json(url, &body).await
    }
}
