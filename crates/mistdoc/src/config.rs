//! CLI configuration: a thin layer over `mistdoc_config`.
//!
//! Applies `GlobalOpts` flag overrides (--api-host, --token, --org-id,
//! --timeout) on top of the active profile.

use std::time::Duration;

use secrecy::SecretString;

use mistdoc_core::ServiceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use mistdoc_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// "a, b" or "(none)" for help text.
pub fn available_profiles(config: &Config) -> String {
    let names = config.profile_names();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Service configuration resolved from the profile plus flag overrides.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub service: ServiceConfig,
}

impl Resolved {
    /// Fail unless a token was found somewhere in the chain.
    pub fn require_token(&self) -> Result<(), CliError> {
        if self.service.token.is_some() {
            Ok(())
        } else {
            Err(CliError::NoCredentials {
                profile: self.profile_name.clone(),
            })
        }
    }
}

/// Build a `ServiceConfig` from the config file, profile, and CLI overrides.
///
/// A missing token is not an error here; commands that need one call
/// [`Resolved::require_token`].
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // Only an explicitly requested profile has to exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => Profile::default(),
    };

    let mut service = mistdoc_config::profile_to_service_config(&profile, &cfg.defaults)?;
    apply_overrides(&mut service, global)?;

    // Token: flag / MIST_TOKEN first, then the profile's credential chain.
    service.token = match &global.token {
        Some(token) if !token.is_empty() => Some(SecretString::from(token.clone())),
        _ => mistdoc_config::resolve_api_token(&profile, &profile_name).ok(),
    };

    Ok(Resolved {
        profile_name,
        service,
    })
}

fn apply_overrides(service: &mut ServiceConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref host) = global.api_host {
        service.api_host = mistdoc_config::parse_api_host(host)?;
    }
    if let Some(ref org) = global.org_id {
        service.org_id = Some(org.clone());
    }
    if let Some(secs) = global.timeout {
        service.timeout = Duration::from_secs(secs);
    }
    Ok(())
}
