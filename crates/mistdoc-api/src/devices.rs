// Device endpoints

use tracing::debug;

use crate::client::MistClient;
use crate::error::Error;
use crate::models::DeviceStats;

impl MistClient {
    /// Fetch runtime statistics for a device (access point).
    ///
    /// `GET /api/v1/orgs/{org}/devices/{mac}/stats`
    pub async fn device_stats(&self, mac: &str) -> Result<DeviceStats, Error> {
        let url = self.org_url(&["devices", mac, "stats"])?;
        debug!(mac, "fetching device stats");
        self.get(url).await
    }
}
