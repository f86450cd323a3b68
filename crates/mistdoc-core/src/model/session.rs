// ── Client session snapshot ──

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::mac::MacAddress;

/// A wireless client's current association and radio metrics.
///
/// Fetched once per diagnostic run and never updated in place. Every radio
/// metric is optional: the API omits what the AP did not report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSession {
    pub mac: MacAddress,
    pub hostname: Option<String>,
    pub ip: Option<IpAddr>,

    // Association
    pub ap_mac: Option<MacAddress>,
    pub ssid: Option<String>,
    pub band: Option<String>,
    pub channel: Option<u32>,

    // Radio health
    pub rssi_dbm: Option<f64>,
    pub snr_db: Option<f64>,
    pub tx_retry_pct: Option<f64>,
    pub rx_retry_pct: Option<f64>,
    pub latency_ms: Option<f64>,
}

impl ClientSession {
    /// A session with only the MAC known.
    pub fn new(mac: MacAddress) -> Self {
        Self {
            mac,
            hostname: None,
            ip: None,
            ap_mac: None,
            ssid: None,
            band: None,
            channel: None,
            rssi_dbm: None,
            snr_db: None,
            tx_retry_pct: None,
            rx_retry_pct: None,
            latency_ms: None,
        }
    }
}
