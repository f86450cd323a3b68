// ── Mist-backed telemetry source ──
//
// Implements `TelemetrySource` over `mistdoc_api::MistClient`. MACs go over
// the wire in compact form; responses are converted into the telemetry
// model via `convert`.

use tracing::debug;

use mistdoc_api::MistClient;

use crate::config::ServiceConfig;
use crate::convert::ap_stats_from_wire;
use crate::error::CoreError;
use crate::model::{AccessPointStats, ClientSession, EventRecord, MacAddress, Organization};
use crate::source::{LookbackWindow, TelemetrySource};

/// Telemetry from the Mist cloud API.
#[derive(Debug, Clone)]
pub struct MistTelemetrySource {
    client: MistClient,
    event_limit: u32,
}

impl MistTelemetrySource {
    /// Build an authenticated source from service configuration.
    ///
    /// Fails when no token is configured.
    pub fn new(config: &ServiceConfig) -> Result<Self, CoreError> {
        let token = config.token.as_ref().ok_or_else(|| CoreError::Config {
            message: "no API token configured".into(),
        })?;
        let mut client = MistClient::new(config.api_host.clone(), token, &config.transport())?;
        if let Some(org) = &config.org_id {
            client = client.with_org(org.clone());
        }
        Ok(Self {
            client,
            event_limit: config.event_limit,
        })
    }

    /// Scope org-level lookups to `org_id`.
    #[must_use]
    pub fn with_org(mut self, org_id: impl Into<String>) -> Self {
        self.client = self.client.with_org(org_id);
        self
    }
}

impl TelemetrySource for MistTelemetrySource {
    async fn resolve_client(&self, mac: &MacAddress) -> Result<ClientSession, CoreError> {
        self.client
            .search_client(&mac.compact())
            .await?
            .map(ClientSession::from)
            .ok_or_else(|| CoreError::ClientNotFound {
                identifier: mac.to_string(),
            })
    }

    async fn fetch_events(
        &self,
        mac: &MacAddress,
        window: &LookbackWindow,
    ) -> Result<Vec<EventRecord>, CoreError> {
        let raw = self
            .client
            .client_events(
                &mac.compact(),
                window.start_epoch(),
                window.end_epoch(),
                self.event_limit,
            )
            .await?;
        let mut events: Vec<EventRecord> = raw.into_iter().map(EventRecord::from).collect();
        // The API returns newest first.
        events.sort_by_key(|e| e.timestamp);
        debug!(client = %mac, count = events.len(), "events converted");
        Ok(events)
    }

    async fn fetch_access_point_stats(
        &self,
        ap: &MacAddress,
    ) -> Result<Option<AccessPointStats>, CoreError> {
        match self.client.device_stats(&ap.compact()).await {
            Ok(stats) => Ok(Some(ap_stats_from_wire(ap, stats))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, CoreError> {
        let orgs = self.client.list_orgs().await?;
        Ok(orgs.into_iter().map(Organization::from).collect())
    }
}
