//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use mistdoc_core::{CoreError, MistTelemetrySource, Organization, SelectedOrg};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::{CliError, describe_orgs};

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompts are allowed only on a terminal and without `--yes`.
pub fn can_prompt(global: &GlobalOpts) -> bool {
    !global.yes && std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// A stderr spinner for table output on a terminal; `None` otherwise.
pub fn spinner(global: &GlobalOpts, message: &str) -> Option<ProgressBar> {
    if global.quiet
        || global.output != OutputFormat::Table
        || !std::io::stderr().is_terminal()
    {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Let the user pick one organization from `candidates`.
pub fn choose_organization(
    candidates: Vec<Organization>,
    global: &GlobalOpts,
) -> Result<SelectedOrg, CliError> {
    if !can_prompt(global) {
        return Err(CliError::AmbiguousOrganization {
            available: describe_orgs(&candidates),
        });
    }
    let items: Vec<String> = candidates
        .iter()
        .map(|o| format!("{} ({})", o.name, o.id))
        .collect();
    let index = dialoguer::Select::new()
        .with_prompt("Multiple organizations found; select one")
        .items(items.as_slice())
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    candidates
        .into_iter()
        .nth(index)
        .map(SelectedOrg::from)
        .ok_or_else(|| prompt_err("selection out of range"))
}

/// Scope `source` to an organization: the requested one, the only one, or
/// one the user picks.
pub async fn scope_to_org(
    source: MistTelemetrySource,
    requested: Option<&str>,
    global: &GlobalOpts,
) -> Result<(MistTelemetrySource, SelectedOrg), CliError> {
    let selected = match mistdoc_core::resolve_organization(&source, requested).await {
        Ok(selected) => selected,
        Err(CoreError::AmbiguousOrganization { candidates }) => {
            choose_organization(candidates, global)?
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(org = %selected.id, "organization selected");
    Ok((source.with_org(selected.id.clone()), selected))
}
