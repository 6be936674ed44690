use adax_api::{CloudClient, Credentials, TransportConfig};
use tracing::debug;

use super::RemoteClient;
use crate::config::CloudSettings;
use crate::convert::energy_log_entries;
use crate::error::CoreError;
use crate::model::{Centidegrees, EnergyLogEntry, RoomId, RoomSnapshot};

/// RemoteClient backed by the Adax cloud REST API.
#[derive(Debug)]
pub struct CloudRemote {
    client: CloudClient,
}

impl CloudRemote {
    pub fn new(settings: &CloudSettings) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: settings.timeout,
            ..TransportConfig::default()
        }
        .with_base_url(settings.api_url.as_str())?;
        let credentials = Credentials {
            client_id: settings.client_id.clone(),
            secret: settings.secret.clone(),
        };
        let client = CloudClient::new(credentials, &transport)?;
        Ok(Self { client })
    }
}

impl RemoteClient for CloudRemote {
    async fn list_rooms_with_energy(&self) -> Result<RoomSnapshot, CoreError> {
        let content = self.client.list_rooms_with_energy().await?;
        debug!(
            rooms = content.rooms.len(),
            devices = content.devices.len(),
            "fetched room content"
        );
        Ok(RoomSnapshot::from(content))
    }

    async fn energy_log(&self, room_id: RoomId) -> Result<Vec<EnergyLogEntry>, CoreError> {
        let log = self.client.energy_log(room_id.get()).await?;
        energy_log_entries(log)
    }

    async fn set_target_temperature(
        &self,
        room_id: RoomId,
        target: Centidegrees,
    ) -> Result<(), CoreError> {
        self.client
            .set_room_temperature(room_id.get(), target.get())
            .await?;
        Ok(())
    }
}
