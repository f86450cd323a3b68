// ── Core error types ──
//
// Domain errors from mistdoc-core. Consumers never see HTTP status codes or
// JSON parse failures directly: the `From<mistdoc_api::Error>` impl folds
// transport-layer errors into the diagnostic taxonomy (transport, not found,
// malformed response) plus the auth/config errors the CLI reports.

use thiserror::Error;

use crate::model::Organization;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Telemetry fetch errors ───────────────────────────────────────
    #[error("Telemetry source unreachable: {reason}")]
    Transport { reason: String },

    #[error("Telemetry request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Client not found: {identifier}")]
    ClientNotFound { identifier: String },

    #[error("Entity not found: {entity_type} {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Malformed response from telemetry source: {message}")]
    MalformedResponse { message: String },

    #[error("Telemetry API error: {message}")]
    Api { message: String, status: Option<u16> },

    // ── Credentials ──────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Organization selection ───────────────────────────────────────
    #[error("No organizations are visible to this API token")]
    NoOrganizations,

    #[error("{} organizations available; one must be selected", .candidates.len())]
    AmbiguousOrganization { candidates: Vec<Organization> },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Errors that the pipeline may degrade to "no evidence".
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::Timeout { .. }
                | Self::NotFound { .. }
                | Self::MalformedResponse { .. }
                | Self::Api { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mistdoc_api::Error> for CoreError {
    fn from(err: mistdoc_api::Error) -> Self {
        match err {
            mistdoc_api::Error::InvalidToken => CoreError::AuthenticationFailed {
                message: "API token was rejected".into(),
            },
            mistdoc_api::Error::Forbidden { message } => {
                CoreError::AuthenticationFailed { message }
            }
            mistdoc_api::Error::MissingOrganization => CoreError::Config {
                message: "no organization selected".into(),
            },
            mistdoc_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::Transport {
                        reason: e.to_string(),
                    }
                }
            }
            mistdoc_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            mistdoc_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            mistdoc_api::Error::Tls(reason) => CoreError::Transport { reason },
            mistdoc_api::Error::RateLimited { retry_after_secs } => CoreError::Api {
                message: format!("Rate limited -- retry after {retry_after_secs}s"),
                status: Some(429),
            },
            mistdoc_api::Error::NotFound { path } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: path,
            },
            mistdoc_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            mistdoc_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialization_maps_to_malformed_response() {
        let err = CoreError::from(mistdoc_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });
        assert!(matches!(err, CoreError::MalformedResponse { .. }));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn invalid_token_is_not_a_fetch_failure() {
        let err = CoreError::from(mistdoc_api::Error::InvalidToken);
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
        assert!(!err.is_fetch_failure());
    }

    #[test]
    fn ambiguous_org_message_counts_candidates() {
        let err = CoreError::AmbiguousOrganization {
            candidates: vec![
                Organization::new("a", "Alpha"),
                Organization::new("b", "Beta"),
            ],
        };
        assert_eq!(err.to_string(), "2 organizations available; one must be selected");
    }
}
