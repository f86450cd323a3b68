//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

/// Mist cloud regions offered by `config init`.
const CLOUD_HOSTS: [(&str, &str); 5] = [
    ("Global 01", "https://api.mist.com"),
    ("Global 02", "https://api.gc1.mist.com"),
    ("Global 03", "https://api.ac2.mist.com"),
    ("Global 04", "https://api.gc2.mist.com"),
    ("Europe 01", "https://api.eu.mist.com"),
];

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking secrets.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "lookback_hours = {}", cfg.defaults.lookback_hours);

    for name in cfg.profile_names() {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_host = \"{}\"", p.api_host);
        if let Some(ref org) = p.org_id {
            let _ = writeln!(out, "org_id = \"{org}\"");
        }
        if p.api_token.is_some() {
            let _ = writeln!(out, "api_token = \"****\"");
        }
        if let Some(ref env) = p.api_token_env {
            let _ = writeln!(out, "api_token_env = \"{env}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(hours) = p.lookback_hours {
            let _ = writeln!(out, "lookback_hours = {hours}");
        }
    }

    out.trim_end().to_owned()
}

/// Redacted copy for structured output.
fn redacted(cfg: &Config) -> Config {
    let mut copy = cfg.clone();
    for profile in copy.profiles.values_mut() {
        if profile.api_token.is_some() {
            profile.api_token = Some("****".into());
        }
    }
    copy
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    CliError::ProfileNotFound {
        name,
        available: config::available_profiles(cfg),
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be a positive number, got '{value}'"),
    })
}

fn read_token() -> Result<String, CliError> {
    let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
    let token = token.trim().to_owned();
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "api_token".into(),
            reason: "API token cannot be empty".into(),
        });
    }
    Ok(token)
}

/// Offer to store the token in the system keyring or return it for plaintext config.
///
/// Returns `Some(token)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_token_storage(token: String, profile_name: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the API token?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        mistdoc_config::store_api_token(profile_name, &token)?;
        eprintln!("   ✓ API token stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(token))
    }
}

// ── Init wizard ─────────────────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("mistdoc configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let mut host_choices: Vec<String> = CLOUD_HOSTS
        .iter()
        .map(|(region, host)| format!("{region} ({host})"))
        .collect();
    host_choices.push("Other (enter URL)".into());
    let host_selection = Select::new()
        .with_prompt("Mist cloud")
        .items(host_choices.as_slice())
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    let api_host = match CLOUD_HOSTS.get(host_selection) {
        Some((_, host)) => (*host).to_owned(),
        None => Input::new()
            .with_prompt("API host URL")
            .interact_text()
            .map_err(prompt_err)?,
    };
    mistdoc_config::parse_api_host(&api_host)?;

    let token = read_token()?;
    let api_token = prompt_token_storage(token, &profile_name)?;

    let org_id: String = Input::new()
        .with_prompt("Organization ID (blank to auto-select)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            api_host,
            org_id: Some(org_id.trim().to_owned()).filter(|s| !s.is_empty()),
            api_token,
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(profile_name.clone());

    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: mistdoc check-env");
    Ok(())
}

// ── Set <key> <value> ───────────────────────────────────────────────

fn set(key: &str, value: String, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let profile = cfg.profiles.entry(profile_name.clone()).or_default();

    match key {
        "api_host" | "api-host" => {
            mistdoc_config::parse_api_host(&value)?;
            profile.api_host = value;
        }
        "org_id" | "org-id" => profile.org_id = Some(value),
        "api_token" | "api-token" => profile.api_token = Some(value),
        "api_token_env" | "api-token-env" => profile.api_token_env = Some(value),
        "timeout" => profile.timeout = Some(parse_number("timeout", &value)?),
        "lookback_hours" | "lookback-hours" => {
            let hours = parse_number("lookback_hours", &value)?;
            profile.lookback_hours = Some(mistdoc_config::validate_lookback_hours(hours)?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: api_host, org_id, \
                     api_token, api_token_env, timeout, lookback_hours"
                ),
            });
        }
    }

    config::save_config(&cfg)?;
    eprintln!("✓ Set {key} on profile '{profile_name}'");
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, format_config_redacted, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => set(&key, value, global),

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            let names = cfg.profile_names();
            if names.is_empty() {
                eprintln!("No profiles configured. Run: mistdoc config init");
            }
            for name in names {
                let marker = if name == default { " *" } else { "" };
                println!("{name}{marker}");
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(profile_name, &cfg));
            }
            let token = read_token()?;
            mistdoc_config::store_api_token(&profile_name, &token)?;
            eprintln!("✓ API token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
