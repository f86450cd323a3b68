// Account-level endpoints
//
// These are not org-scoped: they work before an organization is chosen,
// which is what org auto-selection and the environment check rely on.

use tracing::debug;

use crate::client::MistClient;
use crate::error::Error;
use crate::models::{Org, SelfInfo};

impl MistClient {
    /// List all organizations visible to the token.
    ///
    /// `GET /api/v1/orgs`
    pub async fn list_orgs(&self) -> Result<Vec<Org>, Error> {
        let url = self.api_url(&["orgs"])?;
        debug!("listing organizations");
        self.get(url).await
    }

    /// Who am I: the user that owns the token.
    ///
    /// `GET /api/v1/self`, sent with the short probe timeout.
    pub async fn get_self(&self) -> Result<SelfInfo, Error> {
        let url = self.api_url(&["self"])?;
        debug!("fetching self");
        self.get_with_timeout(url, self.probe_timeout).await
    }
}
