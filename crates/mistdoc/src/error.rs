//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use mistdoc_config::ConfigError;
use mistdoc_core::{CoreError, Organization};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PREFLIGHT: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Mist API: {reason}")]
    #[diagnostic(
        code(mistdoc::connection_failed),
        help(
            "Check network access to the Mist cloud host (--api-host / MIST_API_HOST).\n\
             Run: mistdoc check-env"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(mistdoc::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(mistdoc::auth_failed),
        help(
            "Verify the API token and that it has access to the organization.\n\
             Run: mistdoc config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(mistdoc::no_credentials),
        help(
            "Set the MIST_TOKEN environment variable, pass --token,\n\
             or store one with: mistdoc config set-token"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Client {mac} not found: {reason}")]
    #[diagnostic(
        code(mistdoc::client_not_found),
        help(
            "Check the MAC address and that the client is currently connected.\n\
             If the token sees several organizations, pass --org-id."
        )
    )]
    ClientNotFound { mac: String, reason: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(mistdoc::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("No organizations are visible to this API token")]
    #[diagnostic(
        code(mistdoc::no_organizations),
        help("Check that the token belongs to a user with organization access.")
    )]
    NoOrganizations,

    #[error("Several organizations are available; one must be selected")]
    #[diagnostic(
        code(mistdoc::ambiguous_organization),
        help(
            "Pass --org-id <ID> or set MIST_ORG_ID, or run interactively without --yes.\n\
             Available: {available}"
        )
    )]
    AmbiguousOrganization { available: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(mistdoc::api_error))]
    ApiError { code: String, message: String },

    // ── Preflight ────────────────────────────────────────────────────
    #[error("Environment check failed ({passed}/{total} passed)")]
    #[diagnostic(
        code(mistdoc::preflight_failed),
        help("Fix the failing checks above, then run: mistdoc check-env")
    )]
    PreflightFailed { passed: usize, total: usize },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mistdoc::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mistdoc::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mistdoc config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(mistdoc::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(mistdoc::keyring),
        help("Store the token in the config file or MIST_TOKEN instead.")
    )]
    Keyring(String),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to write configuration: {0}")]
    #[diagnostic(code(mistdoc::config_write))]
    ConfigWrite(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ClientNotFound { .. } | Self::NotFound { .. } | Self::NoOrganizations => {
                exit_code::NOT_FOUND
            }
            Self::PreflightFailed { .. } => exit_code::PREFLIGHT,
            Self::Validation { .. } | Self::AmbiguousOrganization { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

/// `id (name), id (name)` for help text.
pub fn describe_orgs(orgs: &[Organization]) -> String {
    if orgs.is_empty() {
        return "(none)".into();
    }
    orgs.iter()
        .map(|o| format!("{} ({})", o.id, o.name))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { reason } => CliError::ConnectionFailed { reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::ClientNotFound { identifier } => CliError::ClientNotFound {
                mac: identifier,
                reason: "no active session".into(),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type,
                identifier,
            },

            CoreError::MalformedResponse { message } => CliError::ApiError {
                code: "malformed_response".into(),
                message,
            },

            CoreError::Api { message, status } => CliError::ApiError {
                code: status.map_or_else(|| "unknown".into(), |s| s.to_string()),
                message,
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::NoOrganizations => CliError::NoOrganizations,

            CoreError::AmbiguousOrganization { candidates } => CliError::AmbiguousOrganization {
                available: describe_orgs(&candidates),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Keyring(e) => CliError::Keyring(e.to_string()),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Serialization(e) => CliError::ConfigWrite(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::Transport {
                    reason: "dns".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::Timeout { timeout_secs: 30 }, exit_code::TIMEOUT),
            (
                CoreError::AuthenticationFailed {
                    message: "rejected".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::ClientNotFound {
                    identifier: "aa:bb:cc:dd:ee:ff".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::AmbiguousOrganization {
                    candidates: vec![Organization::new("a", "A"), Organization::new("b", "B")],
                },
                exit_code::USAGE,
            ),
        ];
        for (core, expected) in cases {
            assert_eq!(CliError::from(core).exit_code(), expected);
        }
    }

    #[test]
    fn ambiguous_org_lists_candidates() {
        let err = CliError::from(CoreError::AmbiguousOrganization {
            candidates: vec![
                Organization::new("org-a", "Alpha"),
                Organization::new("org-b", "Beta"),
            ],
        });
        let CliError::AmbiguousOrganization { available } = err else {
            panic!("unexpected variant");
        };
        assert_eq!(available, "org-a (Alpha), org-b (Beta)");
    }

    #[test]
    fn preflight_failure_has_its_own_code() {
        let err = CliError::PreflightFailed {
            passed: 2,
            total: 4,
        };
        assert_eq!(err.exit_code(), exit_code::PREFLIGHT);
        assert_eq!(err.to_string(), "Environment check failed (2/4 passed)");
    }
}
