// ── Organization selection ──
//
// Client and device lookups are org-scoped. An explicitly requested org id
// always wins; otherwise the token's visible orgs decide: one is picked
// automatically, several are handed back to the caller to choose from.

use tracing::debug;

use crate::error::CoreError;
use crate::model::Organization;
use crate::source::TelemetrySource;

/// The organization a run is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedOrg {
    pub id: String,
    /// Known only when the org came from a listing.
    pub name: Option<String>,
}

impl From<Organization> for SelectedOrg {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: Some(org.name),
        }
    }
}

/// Pick an organization from `orgs`, honoring an explicit request.
pub fn select_organization(
    orgs: Vec<Organization>,
    requested: Option<&str>,
) -> Result<SelectedOrg, CoreError> {
    if let Some(id) = requested {
        let name = orgs.into_iter().find(|o| o.id == id).map(|o| o.name);
        return Ok(SelectedOrg {
            id: id.to_owned(),
            name,
        });
    }

    let mut orgs = orgs;
    match orgs.len() {
        0 => Err(CoreError::NoOrganizations),
        1 => Ok(orgs.remove(0).into()),
        _ => Err(CoreError::AmbiguousOrganization { candidates: orgs }),
    }
}

/// Resolve the org for a run, listing organizations only when none was requested.
pub async fn resolve_organization<S: TelemetrySource + Sync>(
    source: &S,
    requested: Option<&str>,
) -> Result<SelectedOrg, CoreError> {
    if let Some(id) = requested {
        return select_organization(Vec::new(), Some(id));
    }
    let orgs = source.list_organizations().await?;
    debug!(count = orgs.len(), "organizations visible to token");
    select_organization(orgs, None)
}
