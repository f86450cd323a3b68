//! Organization command handlers.

use tabled::Tabled;

use mistdoc_core::{MistTelemetrySource, Organization, TelemetrySource};

use crate::cli::{GlobalOpts, OrgsArgs, OrgsCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OrgRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Sites")]
    sites: String,
}

fn org_row(o: &Organization) -> OrgRow {
    OrgRow {
        id: o.id.clone(),
        name: o.name.clone(),
        sites: o.site_count.map(|n| n.to_string()).unwrap_or_default(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: OrgsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        OrgsCommand::List => {
            let resolved = config::resolve(global)?;
            resolved.require_token()?;
            let source = MistTelemetrySource::new(&resolved.service)?;

            let mut orgs = source.list_organizations().await?;
            orgs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

            let out = output::render_list(global.output, &orgs, org_row, |o| o.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
