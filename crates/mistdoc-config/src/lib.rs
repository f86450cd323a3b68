//! Configuration for mistdoc.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `mistdoc_core::ServiceConfig`. The CLI layers its
//! `GlobalOpts` flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use mistdoc_core::{DEFAULT_LOOKBACK_HOURS, ServiceConfig};

/// Default Mist cloud host.
pub const DEFAULT_API_HOST: &str = "https://api.mist.com";

/// Environment variable consulted for the API token.
pub const TOKEN_ENV: &str = "MIST_TOKEN";

/// Keyring service name for stored tokens.
pub const KEYRING_SERVICE: &str = "mistdoc";

/// Longest event lookback a profile may request (30 days).
pub const MAX_LOOKBACK_HOURS: u32 = 720;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named cloud profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Profile names, sorted.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            lookback_hours: default_lookback_hours(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_lookback_hours() -> u32 {
    DEFAULT_LOOKBACK_HOURS
}

/// A named Mist cloud profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Cloud host root (e.g., "https://api.eu.mist.com").
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Organization id; auto-selected when the token sees only one.
    pub org_id: Option<String>,

    /// API token (plaintext; prefer keyring or env var).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override event lookback.
    pub lookback_hours: Option<u32>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_host: default_api_host(),
            org_id: None,
            api_token: None,
            api_token_env: None,
            timeout: None,
            lookback_hours: None,
        }
    }
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "mistdoc", "mistdoc").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("mistdoc");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Environment keys use `__` for nesting, e.g. `MISTDOC_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MISTDOC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/api-token")
}

/// Store a token for `profile_name` in the system keyring.
pub fn store_api_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(token)?;
    Ok(())
}

/// Resolve an API token from the credential chain (no CLI flag step).
///
/// Order: the profile's `api_token_env`, `MIST_TOKEN`, the system keyring,
/// then plaintext in the config file.
pub fn resolve_api_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_token_env → env var lookup
    if let Some(ref env_name) = profile.api_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(TOKEN_ENV) {
        if !val.is_empty() {
            return Ok(SecretString::from(val));
        }
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref token) = profile.api_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Parse and validate an API host URL.
pub fn parse_api_host(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_host".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::Validation {
            field: "api_host".into(),
            reason: format!("expected an http(s) URL with a host, got {raw}"),
        });
    }
    Ok(url)
}

/// Check a lookback against `1..=MAX_LOOKBACK_HOURS`.
pub fn validate_lookback_hours(hours: u32) -> Result<u32, ConfigError> {
    if (1..=MAX_LOOKBACK_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(ConfigError::Validation {
            field: "lookback_hours".into(),
            reason: format!("must be between 1 and {MAX_LOOKBACK_HOURS}, got {hours}"),
        })
    }
}

/// Build a `ServiceConfig` from a profile and the global defaults.
///
/// The token is left unset; callers attach one from
/// [`resolve_api_token`] or their own overrides.
pub fn profile_to_service_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ServiceConfig, ConfigError> {
    let mut service = ServiceConfig::new(parse_api_host(&profile.api_host)?);
    service.org_id.clone_from(&profile.org_id);
    service.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    service.lookback_hours =
        validate_lookback_hours(profile.lookback_hours.unwrap_or(defaults.lookback_hours))?;
    Ok(service)
}
