// ── API-to-domain type conversions ──
//
// Bridges raw `mistdoc_api` response types into the telemetry model. Wire
// strings become strong types; unparseable optional values are dropped
// rather than failing the whole record.

use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};

use mistdoc_api::{ClientEvent, DeviceStats, Org, WirelessClient};

use crate::model::{AccessPointStats, ClientSession, EventRecord, MacAddress, Organization};

// ── Helpers ────────────────────────────────────────────────────────

fn parse_ip(raw: Option<&str>) -> Option<IpAddr> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Epoch seconds (possibly fractional) to `DateTime<Utc>`.
#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn epoch_to_datetime(epoch: Option<f64>) -> Option<DateTime<Utc>> {
    let epoch = epoch.filter(|e| e.is_finite())?;
    let whole = epoch.floor();
    let nanos = ((epoch - whole) * 1e9) as u32;
    let secs = whole as i64;
    DateTime::from_timestamp(secs, nanos)
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ── Client session ─────────────────────────────────────────────────

impl From<WirelessClient> for ClientSession {
    fn from(c: WirelessClient) -> Self {
        Self {
            mac: MacAddress::new(&c.mac),
            hostname: non_empty(c.hostname),
            ip: parse_ip(c.ip.as_deref()),
            ap_mac: non_empty(c.ap_mac).map(MacAddress::new),
            ssid: non_empty(c.ssid),
            band: non_empty(c.band),
            channel: c.channel,
            rssi_dbm: c.rssi,
            snr_db: c.snr,
            tx_retry_pct: c.tx_retries,
            rx_retry_pct: c.rx_retries,
            latency_ms: c.latency_ms,
        }
    }
}

// ── Events ─────────────────────────────────────────────────────────

impl From<ClientEvent> for EventRecord {
    fn from(e: ClientEvent) -> Self {
        Self {
            timestamp: epoch_to_datetime(e.timestamp),
            event_type: e.event_type.unwrap_or_default(),
            reason: non_empty(e.reason),
            detail: non_empty(e.text),
        }
    }
}

// ── Access points ──────────────────────────────────────────────────

/// Build AP stats from a device stats payload.
///
/// A payload without a usable uptime reads as zero seconds, which the
/// uptime policy treats as a recent restart.
pub fn ap_stats_from_wire(ap: &MacAddress, stats: DeviceStats) -> AccessPointStats {
    let uptime = stats
        .uptime
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(Duration::ZERO);
    AccessPointStats {
        id: stats.mac.as_deref().map_or_else(|| ap.clone(), MacAddress::new),
        name: non_empty(stats.name),
        uptime,
    }
}

// ── Organizations ──────────────────────────────────────────────────

impl From<Org> for Organization {
    fn from(o: Org) -> Self {
        Self {
            id: o.id,
            name: o.name,
            site_count: o.num_sites,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn wire_client() -> WirelessClient {
        serde_json::from_value(serde_json::json!({
            "mac": "5c5b35ae2a4f",
            "hostname": "laptop-42",
            "ip": "10.1.2.3",
            "ap_mac": "d420b0001122",
            "ssid": "corp",
            "band": "5",
            "channel": 36,
            "rssi": -72.0,
            "snr": 18.0,
            "tx_retries": 4.5,
            "rx_retries": 2.0
        }))
        .unwrap()
    }

    #[test]
    fn client_session_from_wire() {
        let session = ClientSession::from(wire_client());
        assert_eq!(session.mac.as_str(), "5c:5b:35:ae:2a:4f");
        assert_eq!(session.ap_mac.unwrap().as_str(), "d4:20:b0:00:11:22");
        assert_eq!(session.ip, Some("10.1.2.3".parse().unwrap()));
        assert_eq!(session.rssi_dbm, Some(-72.0));
        assert_eq!(session.latency_ms, None);
    }

    #[test]
    fn bad_ip_and_blank_ap_are_dropped() {
        let mut wire = wire_client();
        wire.ip = Some("not-an-ip".into());
        wire.ap_mac = Some(String::new());
        let session = ClientSession::from(wire);
        assert!(session.ip.is_none());
        assert!(session.ap_mac.is_none());
    }

    #[test]
    fn event_from_wire_keeps_fractional_timestamp() {
        let event = EventRecord::from(ClientEvent {
            timestamp: Some(1_700_000_000.5),
            event_type: Some("CLIENT_AUTH_FAILED".into()),
            reason: None,
            text: Some("802.1X timeout".into()),
            ap: None,
            ssid: None,
        });
        let ts = event.timestamp.unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
        assert_eq!(event.event_type, "CLIENT_AUTH_FAILED");
        assert_eq!(event.detail.as_deref(), Some("802.1X timeout"));
    }

    #[test]
    fn event_without_type_is_empty_string() {
        let event = EventRecord::from(ClientEvent {
            timestamp: None,
            event_type: None,
            reason: None,
            text: None,
            ap: None,
            ssid: None,
        });
        assert_eq!(event.event_type, "");
        assert!(event.timestamp.is_none());
    }

    #[test]
    fn missing_uptime_reads_as_zero() {
        let ap = MacAddress::new("d420b0001122");
        let stats = DeviceStats {
            mac: None,
            name: Some("AP-Lobby".into()),
            model: None,
            status: None,
            uptime: None,
        };
        assert_eq!(ap_stats_from_wire(&ap, stats.clone()).uptime, Duration::ZERO);

        let stats = DeviceStats {
            uptime: Some(7200.0),
            ..stats
        };
        let ap_stats = ap_stats_from_wire(&ap, stats);
        assert_eq!(ap_stats.id, ap);
        assert_eq!(ap_stats.uptime, Duration::from_secs(7200));
        assert_eq!(ap_stats.name.as_deref(), Some("AP-Lobby"));
    }

    #[test]
    fn negative_uptime_reads_as_zero() {
        let ap = MacAddress::new("d420b0001122");
        let stats = DeviceStats {
            mac: None,
            name: None,
            model: None,
            status: None,
            uptime: Some(-5.0),
        };
        assert_eq!(ap_stats_from_wire(&ap, stats).uptime, Duration::ZERO);
    }
}
