// Mist cloud API HTTP client
//
// Wraps `reqwest::Client` with Mist-specific URL construction, token auth,
// and status-code mapping. Endpoint groups (clients, devices, orgs) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Mist error bodies look like `{"detail": "..."}`.
#[derive(serde::Deserialize)]
struct MistErrorBody {
    detail: Option<String>,
}

/// Raw HTTP client for the Mist v1 REST API.
///
/// All paths are built as `{base}/api/v1/...`. Organization-scoped
/// endpoints require an org id, set via [`with_org`](Self::with_org).
#[derive(Debug, Clone)]
pub struct MistClient {
    http: reqwest::Client,
    base_url: Url,
    org_id: Option<String>,
    timeout: Duration,
    pub(crate) probe_timeout: Duration,
}

impl MistClient {
    /// Create a client that authenticates every request with `token`.
    ///
    /// `base_url` is the cloud host root, e.g. `https://api.mist.com`
    /// or a regional host such as `https://api.eu.mist.com`.
    pub fn new(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_token_client(token)?;
        Ok(Self {
            http,
            base_url,
            org_id: None,
            timeout: transport.timeout,
            probe_timeout: transport.probe_timeout,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// No auth header is added; the caller's client must carry it.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        let transport = TransportConfig::default();
        Self {
            http,
            base_url,
            org_id: None,
            timeout: transport.timeout,
            probe_timeout: transport.probe_timeout,
        }
    }

    /// Scope subsequent org-level calls to `org_id`.
    #[must_use]
    pub fn with_org(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/v1/{segments...}` with each segment percent-encoded.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    /// Build `{base}/api/v1/orgs/{org}/{segments...}`.
    pub(crate) fn org_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let org = self.org_id.as_deref().ok_or(Error::MissingOrganization)?;
        let mut full = vec!["orgs", org];
        full.extend_from_slice(segments);
        self.api_url(&full)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request with the data-call timeout and decode the body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        self.get_with_timeout(url, self.timeout).await
    }

    /// Send a GET request with an explicit timeout and decode the body.
    pub(crate) async fn get_with_timeout<T: DeserializeOwned>(
        &self,
        url: Url,
        timeout: Duration,
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| timeout_or_transport(e, timeout))?;

        parse_response(resp).await
    }

    /// Check that the API host answers at all.
    ///
    /// Any HTTP response counts as reachable, including 4xx, since the host
    /// root is not an API endpoint. Returns the status code received.
    pub async fn probe(&self) -> Result<u16, Error> {
        self.probe_within(self.probe_timeout).await
    }

    /// [`probe`](Self::probe) with an explicit timeout.
    pub async fn probe_within(&self, timeout: Duration) -> Result<u16, Error> {
        debug!(url = %self.base_url, ?timeout, "probing API host");
        let resp = self
            .http
            .get(self.base_url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| timeout_or_transport(e, timeout))?;
        Ok(resp.status().as_u16())
    }
}

fn timeout_or_transport(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            timeout_secs: timeout.as_secs().max(1),
        }
    } else {
        Error::Transport(err)
    }
}

/// Map the HTTP status to a typed error, or decode the success body.
async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let path = resp.url().path().to_owned();

    match status {
        StatusCode::UNAUTHORIZED => return Err(Error::InvalidToken),
        StatusCode::NOT_FOUND => return Err(Error::NotFound { path }),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Err(Error::RateLimited { retry_after_secs });
        }
        _ => {}
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = error_detail(&body);
        return Err(if status == StatusCode::FORBIDDEN {
            Error::Forbidden { message }
        } else {
            Error::Api {
                status: status.as_u16(),
                message,
            }
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    trace!(bytes = body.len(), "response body received");

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

/// Prefer the `detail` field of a Mist error body, else a body preview.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<MistErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| preview(body))
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
