// ── Telemetry source seam ──
//
// The pipeline pulls everything it knows about a client through this trait.
// `MistTelemetrySource` is the production implementation; tests substitute
// in-memory fakes.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{AccessPointStats, ClientSession, EventRecord, MacAddress, Organization};

/// The historical range events are fetched over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl LookbackWindow {
    /// The `hours` leading up to `end`, clamped at the earliest
    /// representable instant.
    pub fn ending_at(end: DateTime<Utc>, hours: u32) -> Self {
        Self {
            start: end
                .checked_sub_signed(Duration::hours(i64::from(hours)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            end,
        }
    }

    /// The `hours` leading up to now.
    pub fn last_hours(hours: u32) -> Self {
        Self::ending_at(Utc::now(), hours)
    }

    pub fn start_epoch(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_epoch(&self) -> i64 {
        self.end.timestamp()
    }
}

/// Supplier of client, event, and access-point telemetry.
///
/// Each call is independent; implementations own their transport, timeouts,
/// and any retry policy. The pipeline decides which failures are fatal.
pub trait TelemetrySource {
    /// Look up the client's current session. Missing clients are
    /// `CoreError::ClientNotFound`.
    fn resolve_client(
        &self,
        mac: &MacAddress,
    ) -> impl Future<Output = Result<ClientSession, CoreError>> + Send;

    /// Events for the client within `window`, oldest first.
    fn fetch_events(
        &self,
        mac: &MacAddress,
        window: &LookbackWindow,
    ) -> impl Future<Output = Result<Vec<EventRecord>, CoreError>> + Send;

    /// Statistics for an access point; `Ok(None)` when the AP is unknown.
    fn fetch_access_point_stats(
        &self,
        ap: &MacAddress,
    ) -> impl Future<Output = Result<Option<AccessPointStats>, CoreError>> + Send;

    /// Organizations visible to the configured credentials.
    fn list_organizations(
        &self,
    ) -> impl Future<Output = Result<Vec<Organization>, CoreError>> + Send;
}

impl<T: TelemetrySource + Sync> TelemetrySource for &T {
    fn resolve_client(
        &self,
        mac: &MacAddress,
    ) -> impl Future<Output = Result<ClientSession, CoreError>> + Send {
        (**self).resolve_client(mac)
    }

    fn fetch_events(
        &self,
        mac: &MacAddress,
        window: &LookbackWindow,
    ) -> impl Future<Output = Result<Vec<EventRecord>, CoreError>> + Send {
        (**self).fetch_events(mac, window)
    }

    fn fetch_access_point_stats(
        &self,
        ap: &MacAddress,
    ) -> impl Future<Output = Result<Option<AccessPointStats>, CoreError>> + Send {
        (**self).fetch_access_point_stats(ap)
    }

    fn list_organizations(
        &self,
    ) -> impl Future<Output = Result<Vec<Organization>, CoreError>> + Send {
        (**self).list_organizations()
    }
}
