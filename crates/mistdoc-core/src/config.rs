// ── Runtime service configuration ──
//
// Describes how to reach the Mist API and how far back to look. Carries the
// token but never touches disk: the CLI builds a `ServiceConfig` from its
// profile and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::diagnose::DEFAULT_LOOKBACK_HOURS;

/// Default timeout for data calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default timeout for liveness probes.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Configuration for talking to one Mist cloud.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Cloud host root (e.g., `https://api.mist.com`).
    pub api_host: Url,
    /// API token. `None` is allowed for preflight, which reports it.
    pub token: Option<SecretString>,
    /// Organization to scope client and device lookups to.
    pub org_id: Option<String>,
    /// Data-call timeout.
    pub timeout: Duration,
    /// Liveness-probe timeout.
    pub probe_timeout: Duration,
    /// Page size for event history.
    pub event_limit: u32,
    /// Event lookback in hours.
    pub lookback_hours: u32,
}

impl ServiceConfig {
    pub fn new(api_host: Url) -> Self {
        Self {
            api_host,
            token: None,
            org_id: None,
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            event_limit: mistdoc_api::DEFAULT_EVENT_LIMIT,
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    #[must_use]
    pub fn with_org(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// Host name of the API endpoint, for DNS checks and display.
    pub fn host(&self) -> Option<&str> {
        self.api_host.host_str()
    }

    pub fn transport(&self) -> mistdoc_api::TransportConfig {
        mistdoc_api::TransportConfig {
            timeout: self.timeout,
            probe_timeout: self.probe_timeout,
        }
    }
}
