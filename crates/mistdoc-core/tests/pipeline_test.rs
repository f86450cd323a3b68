#![allow(clippy::unwrap_used)]
// End-to-end pipeline runs over an in-memory telemetry source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use mistdoc_core::{
    AccessPointStats, ClientSession, CoreError, DiagnosticPipeline, EventRecord, Finding,
    LookbackWindow, MacAddress, Metric, Organization, Severity, Stage, TelemetrySource,
    UptimeState, Verdict,
};

// ── Fake source ─────────────────────────────────────────────────────

const CLIENT: &str = "5c:5b:35:ae:2a:4f";
const AP: &str = "d4:20:b0:c0:ff:ee";

#[derive(Default)]
struct FakeSource {
    session: Option<ClientSession>,
    reject_token: bool,
    events: Vec<EventRecord>,
    events_fail: bool,
    ap_uptime_hours: Option<u64>,
    ap_fail: bool,
    resolve_calls: AtomicUsize,
    event_calls: AtomicUsize,
    ap_calls: AtomicUsize,
    last_window: std::sync::Mutex<Option<LookbackWindow>>,
}

impl FakeSource {
    fn with_session(session: ClientSession) -> Self {
        Self {
            session: Some(session),
            ..Self::default()
        }
    }

    fn events(mut self, events: Vec<EventRecord>) -> Self {
        self.events = events;
        self
    }

    fn ap_uptime_hours(mut self, hours: u64) -> Self {
        self.ap_uptime_hours = Some(hours);
        self
    }

    fn ap_calls(&self) -> usize {
        self.ap_calls.load(Ordering::SeqCst)
    }
}

impl TelemetrySource for FakeSource {
    async fn resolve_client(&self, mac: &MacAddress) -> Result<ClientSession, CoreError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_token {
            return Err(CoreError::AuthenticationFailed {
                message: "API token was rejected".into(),
            });
        }
        self.session
            .clone()
            .filter(|s| &s.mac == mac)
            .ok_or_else(|| CoreError::ClientNotFound {
                identifier: mac.to_string(),
            })
    }

    async fn fetch_events(
        &self,
        _mac: &MacAddress,
        window: &LookbackWindow,
    ) -> Result<Vec<EventRecord>, CoreError> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_window.lock().unwrap() = Some(*window);
        if self.events_fail {
            return Err(CoreError::Timeout { timeout_secs: 30 });
        }
        Ok(self.events.clone())
    }

    async fn fetch_access_point_stats(
        &self,
        ap: &MacAddress,
    ) -> Result<Option<AccessPointStats>, CoreError> {
        self.ap_calls.fetch_add(1, Ordering::SeqCst);
        if self.ap_fail {
            return Err(CoreError::Transport {
                reason: "connection refused".into(),
            });
        }
        Ok(self.ap_uptime_hours.map(|hours| AccessPointStats {
            id: ap.clone(),
            name: Some("AP-Lobby".into()),
            uptime: Duration::from_secs(hours * 3600),
        }))
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, CoreError> {
        Ok(vec![Organization::new("org-1", "Acme")])
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn mac() -> MacAddress {
    MacAddress::new(CLIENT)
}

fn healthy() -> ClientSession {
    ClientSession {
        ap_mac: Some(MacAddress::new(AP)),
        rssi_dbm: Some(-55.0),
        snr_db: Some(35.0),
        tx_retry_pct: Some(3.0),
        rx_retry_pct: Some(2.0),
        latency_ms: Some(12.0),
        ..ClientSession::new(mac())
    }
}

fn weak_signal() -> ClientSession {
    ClientSession {
        rssi_dbm: Some(-85.0),
        ..healthy()
    }
}

async fn run(source: &FakeSource) -> mistdoc_core::Diagnosis {
    let pipeline = DiagnosticPipeline::new(source);
    pipeline.run(&mac()).await
}

// ── Scenarios ───────────────────────────────────────────────────────

#[tokio::test]
async fn scenario_a_auth_failure_short_circuits() {
    let source = FakeSource::with_session(weak_signal())
        .events(vec![EventRecord::new("eap_failure")])
        .ap_uptime_hours(800);

    let diagnosis = run(&source).await;

    match diagnosis.verdict.finding() {
        Some(Finding::AuthFailure(evidence)) => assert_eq!(evidence.total, 1),
        other => panic!("expected auth failure, got {other:?}"),
    }
    assert!(diagnosis.recommendation.as_deref().unwrap().contains("identity"));
    assert!(!diagnosis.reached(Stage::CheckHealth));
    assert!(!diagnosis.reached(Stage::CheckUptime));
    assert_eq!(source.ap_calls(), 0);
}

#[tokio::test]
async fn scenario_b_weak_signal_on_long_running_ap() {
    let source = FakeSource::with_session(weak_signal()).ap_uptime_hours(800);

    let diagnosis = run(&source).await;

    match &diagnosis.verdict {
        Verdict::Finding(Finding::UptimeAdvisory { issues, uptime }) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].metric, Metric::Rssi);
            assert_eq!(issues[0].severity, Severity::High);
            assert_eq!(uptime.state, UptimeState::RebootAdvisable);
            assert!(uptime.needs_reboot);
        }
        other => panic!("expected uptime advisory, got {other:?}"),
    }
    assert!(diagnosis.recommendation.as_deref().unwrap().contains("AP-Lobby"));
    assert_eq!(
        diagnosis.stages,
        [
            Stage::FetchClient,
            Stage::FetchEvents,
            Stage::CheckAuth,
            Stage::CheckNetwork,
            Stage::CheckHealth,
            Stage::CheckUptime,
        ]
    );
    assert_eq!(source.ap_calls(), 1);
}

#[tokio::test]
async fn scenario_c_weak_signal_on_normal_ap() {
    let source = FakeSource::with_session(weak_signal()).ap_uptime_hours(400);

    let diagnosis = run(&source).await;

    match &diagnosis.verdict {
        Verdict::Finding(Finding::HealthIssue { issues, uptime }) => {
            assert_eq!(issues[0].metric, Metric::Rssi);
            assert_eq!(uptime.as_ref().unwrap().state, UptimeState::Normal);
        }
        other => panic!("expected health issue, got {other:?}"),
    }
    assert_eq!(source.ap_calls(), 1);
}

#[tokio::test]
async fn scenario_d_clean() {
    let source = FakeSource::with_session(healthy());

    let diagnosis = run(&source).await;

    assert_eq!(diagnosis.verdict, Verdict::Clean);
    assert!(diagnosis.recommendation.as_deref().unwrap().contains("manual"));
    assert_eq!(source.ap_calls(), 0);
}

#[tokio::test]
async fn unknown_client_is_not_found() {
    let source = FakeSource::default();

    let diagnosis = run(&source).await;

    assert!(diagnosis.verdict.is_not_found());
    assert!(diagnosis.recommendation.is_none());
    assert!(diagnosis.session.is_none());
    assert_eq!(diagnosis.stages, [Stage::FetchClient]);
    assert_eq!(source.event_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejected_token_is_an_error_not_a_verdict() {
    let source = FakeSource {
        reject_token: true,
        ..FakeSource::with_session(healthy())
    };

    let err = DiagnosticPipeline::new(&source)
        .try_run(&mac())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert_eq!(source.event_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn infallible_run_still_reports_rejected_token_as_not_found() {
    let source = FakeSource {
        reject_token: true,
        ..FakeSource::with_session(healthy())
    };

    let diagnosis = run(&source).await;

    assert!(diagnosis.verdict.is_not_found());
    assert_eq!(diagnosis.stages, [Stage::FetchClient]);
}

#[tokio::test]
async fn try_run_keeps_missing_client_as_verdict() {
    let source = FakeSource::default();

    let diagnosis = DiagnosticPipeline::new(&source).try_run(&mac()).await.unwrap();

    assert!(diagnosis.verdict.is_not_found());
}

// ── Priority and escalation ─────────────────────────────────────────

#[tokio::test]
async fn auth_beats_network() {
    let source = FakeSource::with_session(healthy()).events(vec![
        EventRecord::new("CLIENT_DHCP_TIMEOUT"),
        EventRecord::new("CLIENT_RADIUS_FAILURE"),
    ]);

    let diagnosis = run(&source).await;

    assert_eq!(diagnosis.verdict.kind(), "auth_failure");
    assert!(!diagnosis.reached(Stage::CheckNetwork));
}

#[tokio::test]
async fn network_failure_from_event_detail() {
    let source = FakeSource::with_session(weak_signal())
        .events(vec![EventRecord::new("CLIENT_INFO").with_detail("DNS_TIMEOUT resolving portal")]);

    let diagnosis = run(&source).await;

    assert_eq!(diagnosis.verdict.kind(), "network_failure");
    assert_eq!(source.ap_calls(), 0);
}

#[tokio::test]
async fn evidence_keeps_last_three_matches() {
    let events = (0..5)
        .map(|i| EventRecord::new(format!("auth_failed #{i}")))
        .collect();
    let source = FakeSource::with_session(healthy()).events(events);

    let diagnosis = run(&source).await;

    let Some(Finding::AuthFailure(evidence)) = diagnosis.verdict.finding() else {
        panic!("expected auth failure");
    };
    assert_eq!(evidence.total, 5);
    let kinds: Vec<_> = evidence.recent.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(kinds, ["auth_failed #2", "auth_failed #3", "auth_failed #4"]);
}

#[tokio::test]
async fn retry_only_issue_never_fetches_ap() {
    let session = ClientSession {
        tx_retry_pct: Some(25.0),
        ..healthy()
    };
    let source = FakeSource::with_session(session).ap_uptime_hours(800);

    let diagnosis = run(&source).await;

    assert_eq!(diagnosis.verdict.kind(), "health_issue");
    assert!(!diagnosis.reached(Stage::CheckUptime));
    assert_eq!(source.ap_calls(), 0);
}

#[tokio::test]
async fn latency_only_issue_never_fetches_ap() {
    let session = ClientSession {
        latency_ms: Some(250.0),
        ..healthy()
    };
    let source = FakeSource::with_session(session).ap_uptime_hours(800);

    let diagnosis = run(&source).await;

    assert_eq!(diagnosis.verdict.kind(), "health_issue");
    assert_eq!(source.ap_calls(), 0);
}

#[tokio::test]
async fn signal_issue_without_ap_skips_uptime() {
    let session = ClientSession {
        ap_mac: None,
        ..weak_signal()
    };
    let source = FakeSource::with_session(session).ap_uptime_hours(800);

    let diagnosis = run(&source).await;

    assert_eq!(diagnosis.verdict.kind(), "health_issue");
    assert_eq!(source.ap_calls(), 0);
}

#[tokio::test]
async fn ap_fetch_failure_falls_back_to_health_issue() {
    let source = FakeSource {
        ap_fail: true,
        ..FakeSource::with_session(weak_signal())
    };

    let diagnosis = run(&source).await;

    assert!(matches!(
        diagnosis.verdict,
        Verdict::Finding(Finding::HealthIssue { uptime: None, .. })
    ));
    assert!(diagnosis.reached(Stage::CheckUptime));
    assert_eq!(source.ap_calls(), 1);
}

#[tokio::test]
async fn unknown_ap_falls_back_to_health_issue() {
    let source = FakeSource::with_session(weak_signal());

    let diagnosis = run(&source).await;

    assert_eq!(diagnosis.verdict.kind(), "health_issue");
    assert_eq!(source.ap_calls(), 1);
}

#[tokio::test]
async fn recently_restarted_ap_is_advisory() {
    let source = FakeSource::with_session(ClientSession {
        rssi_dbm: None,
        snr_db: Some(8.0),
        ..healthy()
    });
    // Zero hours: under the recent-restart window.
    let source = FakeSource {
        ap_uptime_hours: Some(0),
        ..source
    };

    let diagnosis = run(&source).await;

    match &diagnosis.verdict {
        Verdict::Finding(Finding::UptimeAdvisory { uptime, .. }) => {
            assert_eq!(uptime.state, UptimeState::RecentRestart);
        }
        other => panic!("expected uptime advisory, got {other:?}"),
    }
}

#[tokio::test]
async fn event_fetch_failure_degrades_to_no_events() {
    let source = FakeSource {
        events_fail: true,
        ..FakeSource::with_session(healthy())
    };

    let diagnosis = run(&source).await;

    assert_eq!(diagnosis.verdict, Verdict::Clean);
    assert!(diagnosis.reached(Stage::CheckAuth));
}

#[tokio::test]
async fn lookback_window_ends_at_now() {
    let source = FakeSource::with_session(healthy());
    let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();

    let diagnosis = DiagnosticPipeline::new(&source)
        .with_lookback_hours(6)
        .run_at(&mac(), now)
        .await;

    let window = source.last_window.lock().unwrap().unwrap();
    assert_eq!(window, diagnosis.window);
    assert_eq!(window.end, now);
    assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 3, 14, 6, 0, 0).unwrap());
}

#[tokio::test]
async fn oversized_lookback_clamps_window() {
    let source = FakeSource::with_session(healthy());
    let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();

    let diagnosis = DiagnosticPipeline::new(&source)
        .with_lookback_hours(u32::MAX)
        .run_at(&mac(), now)
        .await;

    assert_eq!(diagnosis.verdict, Verdict::Clean);
    assert_eq!(diagnosis.window.start, chrono::DateTime::<Utc>::MIN_UTC);
    assert_eq!(diagnosis.window.end, now);
}

#[tokio::test]
async fn diagnosis_serializes_with_tagged_verdict() {
    let source = FakeSource::with_session(weak_signal()).ap_uptime_hours(800);

    let diagnosis = run(&source).await;
    let json = serde_json::to_value(&diagnosis).unwrap();

    assert_eq!(json["verdict"]["outcome"], "finding");
    assert_eq!(json["verdict"]["kind"], "uptime_advisory");
    assert_eq!(json["stages"][5], "check_uptime");
}
