// Shared transport configuration for building reqwest::Client instances.
//
// Data calls and liveness probes share one client; probes override the
// per-request timeout with the shorter `probe_timeout`.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

const USER_AGENT: &str = concat!("mistdoc/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Timeout applied to data calls (client search, events, device stats).
    pub timeout: Duration,
    /// Timeout applied to liveness probes and the `self` check.
    pub probe_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(2),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        self.build_client_with_headers(HeaderMap::new())
    }

    /// Build a `reqwest::Client` with additional default headers.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Build a client that sends `Authorization: Token <token>` on every request.
    pub fn build_token_client(&self, token: &SecretString) -> Result<reqwest::Client, Error> {
        self.build_client_with_headers(token_headers(token)?)
    }
}

/// Default headers for token auth. The token header is marked sensitive so it
/// never shows up in debug output.
fn token_headers(token: &SecretString) -> Result<HeaderMap, Error> {
    let mut value = HeaderValue::from_str(&format!("Token {}", token.expose_secret()))
        .map_err(|_| Error::InvalidToken)?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn token_header_is_sensitive() {
        let headers = token_headers(&SecretString::from("abc123")).unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap();
        assert!(auth.is_sensitive());
        assert_eq!(auth.to_str().unwrap(), "Token abc123");
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let result = token_headers(&SecretString::from("bad\ntoken"));
        assert!(matches!(result, Err(Error::InvalidToken)));
    }
}
