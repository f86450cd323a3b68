// Wireless client endpoints
//
// Client search (current session snapshot) and per-client event history.

use tracing::debug;

use crate::client::MistClient;
use crate::error::Error;
use crate::models::{ClientEvent, SearchPage, WirelessClient};

/// Default page size for event history requests.
pub const DEFAULT_EVENT_LIMIT: u32 = 100;

impl MistClient {
    /// Find the current session for a client MAC.
    ///
    /// `GET /api/v1/orgs/{org}/clients/search?mac={mac}&limit=1`
    ///
    /// Returns `None` when the search yields no results.
    pub async fn search_client(&self, mac: &str) -> Result<Option<WirelessClient>, Error> {
        let mut url = self.org_url(&["clients", "search"])?;
        url.query_pairs_mut()
            .append_pair("mac", mac)
            .append_pair("limit", "1");
        debug!(mac, "searching client");
        let page: SearchPage<WirelessClient> = self.get(url).await?;
        Ok(page.results.into_iter().next())
    }

    /// List a client's events between two epoch-second bounds.
    ///
    /// `GET /api/v1/orgs/{org}/clients/{mac}/events?start=..&end=..&limit=..`
    pub async fn client_events(
        &self,
        mac: &str,
        start: i64,
        end: i64,
        limit: u32,
    ) -> Result<Vec<ClientEvent>, Error> {
        let mut url = self.org_url(&["clients", mac, "events"])?;
        url.query_pairs_mut()
            .append_pair("start", &start.to_string())
            .append_pair("end", &end.to_string())
            .append_pair("limit", &limit.to_string());
        debug!(mac, start, end, limit, "listing client events");
        let page: SearchPage<ClientEvent> = self.get(url).await?;
        Ok(page.results)
    }
}
