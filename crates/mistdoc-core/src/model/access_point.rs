// ── Access point statistics ──

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::mac::MacAddress;

/// Runtime statistics of the AP a client is associated with.
///
/// Only fetched when a signal-related health issue needs a second opinion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPointStats {
    pub id: MacAddress,
    pub name: Option<String>,
    pub uptime: Duration,
}
