// ── Diagnostic pipeline ──
//
// Strict-priority evaluation: auth failures, then DHCP/DNS failures, then
// client health. The first rule with evidence ends the run. A signal-related
// health issue earns one extra lookup (AP uptime) before the verdict.
//
// Only client resolution is fatal. Event and AP lookups that fail degrade to
// "no evidence" and the run carries on. Rejected credentials during
// resolution are an error, not a verdict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info, warn};

use super::classifier;
use super::finding::{EventEvidence, Finding, Verdict};
use super::health::{self, HealthIssue};
use super::uptime::{self, UptimeAssessment};
use crate::error::CoreError;
use crate::model::{ClientSession, EventRecord, MacAddress};
use crate::source::{LookbackWindow, TelemetrySource};

/// Default event lookback.
pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;

/// Pipeline states, in the order a run can reach them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[strum(serialize = "Gathering client information")]
    FetchClient,
    #[strum(serialize = "Analyzing client events and logs")]
    FetchEvents,
    #[strum(serialize = "Checking authentication and authorization")]
    CheckAuth,
    #[strum(serialize = "Checking DHCP and DNS")]
    CheckNetwork,
    #[strum(serialize = "Analyzing client health metrics")]
    CheckHealth,
    #[strum(serialize = "Checking access point uptime")]
    CheckUptime,
}

/// Report of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub client_mac: MacAddress,
    pub session: Option<ClientSession>,
    pub window: LookbackWindow,
    pub stages: Vec<Stage>,
    pub verdict: Verdict,
    pub recommendation: Option<String>,
}

impl Diagnosis {
    fn new(
        client_mac: MacAddress,
        session: Option<ClientSession>,
        window: LookbackWindow,
        stages: Vec<Stage>,
        verdict: Verdict,
    ) -> Self {
        let recommendation = verdict.recommendation();
        Self {
            client_mac,
            session,
            window,
            stages,
            verdict,
            recommendation,
        }
    }

    pub fn reached(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }
}

// ── Rules ───────────────────────────────────────────────────────────

/// The synchronous rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Auth,
    Network,
    Health,
}

const RULES: [Rule; 3] = [Rule::Auth, Rule::Network, Rule::Health];

impl Rule {
    fn stage(self) -> Stage {
        match self {
            Self::Auth => Stage::CheckAuth,
            Self::Network => Stage::CheckNetwork,
            Self::Health => Stage::CheckHealth,
        }
    }

    fn evaluate(self, session: &ClientSession, events: &[EventRecord]) -> Option<Finding> {
        match self {
            Self::Auth => EventEvidence::from_matches(&classifier::auth_failures(events))
                .map(Finding::AuthFailure),
            Self::Network => EventEvidence::from_matches(&classifier::network_failures(events))
                .map(Finding::NetworkFailure),
            Self::Health => {
                let issues = health::analyze(session);
                (!issues.is_empty()).then_some(Finding::HealthIssue {
                    issues,
                    uptime: None,
                })
            }
        }
    }
}

/// Resolution failures that mean "no session to diagnose".
fn is_lookup_failure(err: &CoreError) -> bool {
    err.is_fetch_failure() || matches!(err, CoreError::ClientNotFound { .. })
}

/// Evaluate the rules in order, stopping at the first finding.
///
/// Every rule evaluated is appended to `stages`.
fn first_finding(
    session: &ClientSession,
    events: &[EventRecord],
    stages: &mut Vec<Stage>,
) -> Option<Finding> {
    RULES.iter().find_map(|rule| {
        stages.push(rule.stage());
        rule.evaluate(session, events)
    })
}

// ── Pipeline ────────────────────────────────────────────────────────

/// Runs the diagnostic rules for one client at a time.
///
/// Holds only its telemetry source and lookback setting; each run is
/// independent.
#[derive(Debug)]
pub struct DiagnosticPipeline<S> {
    source: S,
    lookback_hours: u32,
}

impl<S: TelemetrySource + Sync> DiagnosticPipeline<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
        }
    }

    #[must_use]
    pub fn with_lookback_hours(mut self, hours: u32) -> Self {
        self.lookback_hours = hours;
        self
    }

    pub fn lookback_hours(&self) -> u32 {
        self.lookback_hours
    }

    /// Diagnose `mac` with the lookback window ending now.
    pub async fn run(&self, mac: &MacAddress) -> Diagnosis {
        self.run_at(mac, Utc::now()).await
    }

    /// Diagnose `mac` with the lookback window ending at `now`.
    ///
    /// Every client resolution failure becomes a `NotFound` verdict.
    pub async fn run_at(&self, mac: &MacAddress, now: DateTime<Utc>) -> Diagnosis {
        match self.try_run_at(mac, now).await {
            Ok(diagnosis) => diagnosis,
            Err(err) => Diagnosis::new(
                mac.clone(),
                None,
                LookbackWindow::ending_at(now, self.lookback_hours),
                vec![Stage::FetchClient],
                Verdict::NotFound {
                    reason: err.to_string(),
                },
            ),
        }
    }

    /// Diagnose `mac` with the lookback window ending now, surfacing
    /// rejected credentials and configuration errors.
    pub async fn try_run(&self, mac: &MacAddress) -> Result<Diagnosis, CoreError> {
        self.try_run_at(mac, Utc::now()).await
    }

    /// Diagnose `mac` with the lookback window ending at `now`.
    ///
    /// A missing client or a failed lookup is a `NotFound` verdict. Any other
    /// resolution error (rejected token, missing organization) is returned.
    pub async fn try_run_at(
        &self,
        mac: &MacAddress,
        now: DateTime<Utc>,
    ) -> Result<Diagnosis, CoreError> {
        let window = LookbackWindow::ending_at(now, self.lookback_hours);
        let mut stages = vec![Stage::FetchClient];

        info!(client = %mac, "resolving client session");
        let session = match self.source.resolve_client(mac).await {
            Ok(session) => session,
            Err(err) if is_lookup_failure(&err) => {
                warn!(client = %mac, error = %err, "client resolution failed");
                let verdict = Verdict::NotFound {
                    reason: err.to_string(),
                };
                return Ok(Diagnosis::new(mac.clone(), None, window, stages, verdict));
            }
            Err(err) => {
                warn!(client = %mac, error = %err, "client resolution rejected");
                return Err(err);
            }
        };

        stages.push(Stage::FetchEvents);
        info!(client = %mac, hours = self.lookback_hours, "fetching client events");
        let events = match self.source.fetch_events(mac, &window).await {
            Ok(events) => events,
            Err(err) => {
                warn!(client = %mac, error = %err, "event fetch failed; continuing without events");
                Vec::new()
            }
        };
        debug!(count = events.len(), "events in window");

        let verdict = match first_finding(&session, &events, &mut stages) {
            None => Verdict::Clean,
            Some(Finding::HealthIssue { issues, .. }) => {
                self.escalate_health(&session, issues, &mut stages).await
            }
            Some(finding) => Verdict::Finding(finding),
        };

        info!(client = %mac, verdict = verdict.kind(), "diagnosis complete");
        Ok(Diagnosis::new(mac.clone(), Some(session), window, stages, verdict))
    }

    /// Consult AP uptime when the health issues include a signal problem.
    async fn escalate_health(
        &self,
        session: &ClientSession,
        issues: Vec<HealthIssue>,
        stages: &mut Vec<Stage>,
    ) -> Verdict {
        let health_only = |issues: Vec<HealthIssue>, uptime: Option<UptimeAssessment>| {
            Verdict::Finding(Finding::HealthIssue { issues, uptime })
        };

        if !issues.iter().any(HealthIssue::is_signal) {
            return health_only(issues, None);
        }
        let Some(ap) = session.ap_mac.as_ref() else {
            debug!("signal issue but no associated AP; skipping uptime check");
            return health_only(issues, None);
        };

        stages.push(Stage::CheckUptime);
        info!(ap = %ap, "checking access point uptime");
        let stats = match self.source.fetch_access_point_stats(ap).await {
            Ok(Some(stats)) => stats,
            Ok(None) => {
                debug!(ap = %ap, "no stats for access point");
                return health_only(issues, None);
            }
            Err(err) => {
                warn!(ap = %ap, error = %err, "AP stats fetch failed; skipping uptime check");
                return health_only(issues, None);
            }
        };

        let assessment = uptime::assess(&stats);
        debug!(
            ap = %ap,
            hours = assessment.uptime_hours,
            state = %assessment.state,
            "uptime assessed"
        );
        if assessment.needs_reboot {
            Verdict::Finding(Finding::UptimeAdvisory {
                issues,
                uptime: assessment,
            })
        } else {
            health_only(issues, Some(assessment))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ClientSession {
        ClientSession::new(MacAddress::new("5c:5b:35:ae:2a:4f"))
    }

    #[test]
    fn rules_stop_at_first_finding() {
        let events = [
            EventRecord::new("CLIENT_DHCP_TIMEOUT"),
            EventRecord::new("CLIENT_AUTH_FAILED"),
        ];
        let mut stages = Vec::new();
        let finding = first_finding(&session(), &events, &mut stages);

        assert!(matches!(finding, Some(Finding::AuthFailure(_))));
        assert_eq!(stages, [Stage::CheckAuth]);
    }

    #[test]
    fn clean_run_visits_every_rule() {
        let mut stages = Vec::new();
        assert!(first_finding(&session(), &[], &mut stages).is_none());
        assert_eq!(
            stages,
            [Stage::CheckAuth, Stage::CheckNetwork, Stage::CheckHealth]
        );
    }

    #[test]
    fn network_beats_health() {
        let s = ClientSession {
            rssi_dbm: Some(-90.0),
            ..session()
        };
        let events = [EventRecord::new("CLIENT_INFO").with_detail("ip_conflict on vlan 20")];
        let mut stages = Vec::new();
        let finding = first_finding(&s, &events, &mut stages);

        assert!(matches!(finding, Some(Finding::NetworkFailure(_))));
        assert!(!stages.contains(&Stage::CheckHealth));
    }

    #[test]
    fn rejected_token_is_not_a_lookup_failure() {
        let rejected = CoreError::AuthenticationFailed {
            message: "API token was rejected".into(),
        };
        let missing = CoreError::ClientNotFound {
            identifier: "5c:5b:35:ae:2a:4f".into(),
        };
        assert!(!is_lookup_failure(&rejected));
        assert!(is_lookup_failure(&missing));
    }

    #[test]
    fn stage_labels() {
        assert_eq!(Stage::CheckAuth.to_string(), "Checking authentication and authorization");
    }
}
