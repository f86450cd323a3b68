// ── Client health thresholds ──
//
// Fixed numeric thresholds over the session's radio metrics. One issue per
// violated metric, always in RSSI, SNR, Retries, Latency order. A metric the
// session did not report is skipped, never treated as a violation.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::model::ClientSession;

/// RSSI below this (dBm) is a violation.
pub const RSSI_WARN_DBM: f64 = -70.0;
/// RSSI below this (dBm) is HIGH severity.
pub const RSSI_HIGH_DBM: f64 = -80.0;
/// SNR below this (dB) is a violation.
pub const SNR_WARN_DB: f64 = 15.0;
/// SNR below this (dB) is HIGH severity.
pub const SNR_HIGH_DB: f64 = 10.0;
/// TX or RX retry rate above this (%) is a violation.
pub const RETRY_WARN_PCT: f64 = 20.0;
/// Latency above this (ms) is a violation.
pub const LATENCY_WARN_MS: f64 = 100.0;
/// Latency at or above this (ms) is HIGH severity.
pub const LATENCY_HIGH_MS: f64 = 200.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Metric {
    #[strum(serialize = "RSSI")]
    #[serde(rename = "RSSI")]
    Rssi,
    #[strum(serialize = "SNR")]
    #[serde(rename = "SNR")]
    Snr,
    Retries,
    Latency,
}

impl Metric {
    /// RSSI and SNR describe the radio link itself.
    pub fn is_signal(self) -> bool {
        matches!(self, Self::Rssi | Self::Snr)
    }
}

/// The raw value(s) behind an issue, with units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reading {
    Dbm(f64),
    Db(f64),
    RetryPct { tx: Option<f64>, rx: Option<f64> },
    Millis(f64),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dbm(v) => write!(f, "{v} dBm"),
            Self::Db(v) => write!(f, "{v} dB"),
            Self::RetryPct { tx, rx } => write!(f, "TX: {}, RX: {}", pct(*tx), pct(*rx)),
            Self::Millis(v) => write!(f, "{v} ms"),
        }
    }
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v}%"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthIssue {
    pub metric: Metric,
    pub reading: Reading,
    pub description: String,
    pub severity: Severity,
}

impl HealthIssue {
    pub fn is_signal(&self) -> bool {
        self.metric.is_signal()
    }
}

// ── Per-metric checks ───────────────────────────────────────────────

fn check_rssi(rssi: f64) -> Option<HealthIssue> {
    (rssi < RSSI_WARN_DBM).then(|| HealthIssue {
        metric: Metric::Rssi,
        reading: Reading::Dbm(rssi),
        description: format!("Poor signal strength: {rssi} dBm (should be > -67 dBm)"),
        severity: if rssi < RSSI_HIGH_DBM {
            Severity::High
        } else {
            Severity::Medium
        },
    })
}

fn check_snr(snr: f64) -> Option<HealthIssue> {
    (snr < SNR_WARN_DB).then(|| HealthIssue {
        metric: Metric::Snr,
        reading: Reading::Db(snr),
        description: format!("Poor signal quality: {snr} dB SNR (should be > 20 dB)"),
        severity: if snr < SNR_HIGH_DB {
            Severity::High
        } else {
            Severity::Medium
        },
    })
}

fn check_retries(tx: Option<f64>, rx: Option<f64>) -> Option<HealthIssue> {
    let over = |v: Option<f64>| v.is_some_and(|v| v > RETRY_WARN_PCT);
    (over(tx) || over(rx)).then(|| HealthIssue {
        metric: Metric::Retries,
        reading: Reading::RetryPct { tx, rx },
        description: format!(
            "High retry rates detected (TX: {}, RX: {})",
            pct(tx),
            pct(rx)
        ),
        severity: Severity::Medium,
    })
}

fn check_latency(latency: f64) -> Option<HealthIssue> {
    (latency > LATENCY_WARN_MS).then(|| HealthIssue {
        metric: Metric::Latency,
        reading: Reading::Millis(latency),
        description: format!("High latency detected: {latency} ms"),
        severity: if latency >= LATENCY_HIGH_MS {
            Severity::High
        } else {
            Severity::Medium
        },
    })
}

/// Evaluate every reported metric of `session` against the thresholds.
pub fn analyze(session: &ClientSession) -> Vec<HealthIssue> {
    [
        session.rssi_dbm.and_then(check_rssi),
        session.snr_db.and_then(check_snr),
        check_retries(session.tx_retry_pct, session.rx_retry_pct),
        session.latency_ms.and_then(check_latency),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::MacAddress;

    fn session() -> ClientSession {
        ClientSession::new(MacAddress::new("5c:5b:35:ae:2a:4f"))
    }

    fn only_issue(s: &ClientSession) -> Option<HealthIssue> {
        let mut issues = analyze(s);
        assert!(issues.len() <= 1, "expected at most one issue: {issues:?}");
        issues.pop()
    }

    #[test]
    fn healthy_session_has_no_issues() {
        let s = ClientSession {
            rssi_dbm: Some(-55.0),
            snr_db: Some(35.0),
            tx_retry_pct: Some(3.0),
            rx_retry_pct: Some(1.0),
            latency_ms: Some(20.0),
            ..session()
        };
        assert!(analyze(&s).is_empty());
    }

    #[test]
    fn unreported_metrics_are_skipped() {
        assert!(analyze(&session()).is_empty());
    }

    #[test]
    fn rssi_boundaries() {
        let at = |v| only_issue(&ClientSession { rssi_dbm: Some(v), ..session() });
        assert!(at(-70.0).is_none());
        assert_eq!(at(-71.0).unwrap().severity, Severity::Medium);
        assert_eq!(at(-80.0).unwrap().severity, Severity::Medium);
        assert_eq!(at(-81.0).unwrap().severity, Severity::High);
    }

    #[test]
    fn snr_boundaries() {
        let at = |v| only_issue(&ClientSession { snr_db: Some(v), ..session() });
        assert!(at(15.0).is_none());
        assert_eq!(at(14.0).unwrap().severity, Severity::Medium);
        assert_eq!(at(10.0).unwrap().severity, Severity::Medium);
        assert_eq!(at(9.0).unwrap().severity, Severity::High);
    }

    #[test]
    fn retry_boundaries() {
        let at = |tx, rx| {
            only_issue(&ClientSession {
                tx_retry_pct: tx,
                rx_retry_pct: rx,
                ..session()
            })
        };
        assert!(at(Some(20.0), Some(20.0)).is_none());
        assert_eq!(at(Some(21.0), None).unwrap().severity, Severity::Medium);
        assert_eq!(at(None, Some(21.0)).unwrap().severity, Severity::Medium);
        assert_eq!(at(Some(95.0), Some(90.0)).unwrap().severity, Severity::Medium);
    }

    #[test]
    fn latency_boundaries() {
        let at = |v| only_issue(&ClientSession { latency_ms: Some(v), ..session() });
        assert!(at(100.0).is_none());
        assert_eq!(at(101.0).unwrap().severity, Severity::Medium);
        assert_eq!(at(199.0).unwrap().severity, Severity::Medium);
        assert_eq!(at(200.0).unwrap().severity, Severity::High);
    }

    #[test]
    fn issues_come_out_in_fixed_order() {
        let s = ClientSession {
            rssi_dbm: Some(-85.0),
            snr_db: Some(8.0),
            tx_retry_pct: Some(30.0),
            latency_ms: Some(250.0),
            ..session()
        };
        let metrics: Vec<Metric> = analyze(&s).iter().map(|i| i.metric).collect();
        assert_eq!(
            metrics,
            [Metric::Rssi, Metric::Snr, Metric::Retries, Metric::Latency]
        );
    }

    #[test]
    fn descriptions_carry_raw_values() {
        let s = ClientSession {
            rssi_dbm: Some(-85.0),
            tx_retry_pct: Some(25.5),
            ..session()
        };
        let issues = analyze(&s);
        assert_eq!(
            issues[0].description,
            "Poor signal strength: -85 dBm (should be > -67 dBm)"
        );
        assert_eq!(issues[1].reading.to_string(), "TX: 25.5%, RX: -");
        assert_eq!(issues[0].severity.to_string(), "HIGH");
        assert_eq!(issues[0].metric.to_string(), "RSSI");
    }

    #[test]
    fn only_rssi_and_snr_are_signal_issues() {
        assert!(Metric::Rssi.is_signal());
        assert!(Metric::Snr.is_signal());
        assert!(!Metric::Retries.is_signal());
        assert!(!Metric::Latency.is_signal());
    }
}
