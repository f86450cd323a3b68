// ── Findings and verdicts ──
//
// A `Finding` is what a single rule concludes; a `Verdict` is the one
// outcome of a whole pipeline run. Recommendations hang off the verdict.

use serde::{Deserialize, Serialize};

use super::health::HealthIssue;
use super::uptime::UptimeAssessment;
use crate::model::EventRecord;

/// How many matching events are surfaced as evidence.
pub const EVIDENCE_LIMIT: usize = 3;

/// Matching events for an event-based finding.
///
/// `total` counts every match; `recent` keeps only the last
/// [`EVIDENCE_LIMIT`] of them, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEvidence {
    pub total: usize,
    pub recent: Vec<EventRecord>,
}

impl EventEvidence {
    /// Build evidence from classifier matches. `None` when nothing matched.
    pub fn from_matches(matches: &[&EventRecord]) -> Option<Self> {
        if matches.is_empty() {
            return None;
        }
        let skip = matches.len().saturating_sub(EVIDENCE_LIMIT);
        Some(Self {
            total: matches.len(),
            recent: matches.iter().skip(skip).map(|e| (*e).clone()).collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    AuthFailure(EventEvidence),
    NetworkFailure(EventEvidence),
    HealthIssue {
        issues: Vec<HealthIssue>,
        /// Present when the AP was checked and its uptime was unremarkable.
        uptime: Option<UptimeAssessment>,
    },
    UptimeAdvisory {
        issues: Vec<HealthIssue>,
        uptime: UptimeAssessment,
    },
}

impl Finding {
    /// Short label for the finding kind.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AuthFailure(_) => "Authentication/authorization failure",
            Self::NetworkFailure(_) => "DHCP/DNS failure",
            Self::HealthIssue { .. } => "Client health issue",
            Self::UptimeAdvisory { .. } => "Access point uptime advisory",
        }
    }
}

/// The single outcome of a diagnostic run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    /// Client resolution failed; nothing else was evaluated.
    NotFound { reason: String },
    Finding(Finding),
    /// No rule fired.
    Clean,
}

impl Verdict {
    pub fn finding(&self) -> Option<&Finding> {
        match self {
            Self::Finding(f) => Some(f),
            Self::NotFound { .. } | Self::Clean => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Short label for display and plain output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Client not found",
            Self::Finding(f) => f.label(),
            Self::Clean => "No issues detected",
        }
    }

    /// Machine-friendly kind, e.g. `auth_failure`, `clean`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Finding(Finding::AuthFailure(_)) => "auth_failure",
            Self::Finding(Finding::NetworkFailure(_)) => "network_failure",
            Self::Finding(Finding::HealthIssue { .. }) => "health_issue",
            Self::Finding(Finding::UptimeAdvisory { .. }) => "uptime_advisory",
            Self::Clean => "clean",
        }
    }

    /// What the operator should do next. `None` when the client was not found.
    pub fn recommendation(&self) -> Option<String> {
        let text = match self {
            Self::NotFound { .. } => return None,
            Self::Finding(Finding::AuthFailure(_)) => {
                "Authentication/authorization failures detected; troubleshoot the identity \
                 infrastructure (RADIUS / ISE) and the client's credentials."
                    .to_string()
            }
            Self::Finding(Finding::NetworkFailure(_)) => {
                "DHCP/DNS lease or resolution errors detected; check the network infrastructure \
                 (LAN, WAN, DHCP, DNS)."
                    .to_string()
            }
            Self::Finding(Finding::HealthIssue { .. }) => {
                "Client health metric issues detected; refer to the manual health-troubleshooting \
                 workflow for detailed analysis."
                    .to_string()
            }
            Self::Finding(Finding::UptimeAdvisory { uptime, .. }) => format!(
                "Signal-related issues detected with AP uptime concerns; consider rebooting AP {} \
                 during a maintenance window.",
                uptime.ap_label()
            ),
            Self::Clean => "All automated checks look good; proceed with the manual \
                            troubleshooting workflow as needed."
                .to_string(),
        };
        Some(text)
    }
}

impl From<Finding> for Verdict {
    fn from(finding: Finding) -> Self {
        Self::Finding(finding)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn evidence_keeps_last_three_and_counts_all() {
        let events: Vec<EventRecord> = (0..5)
            .map(|i| EventRecord::new(format!("AUTH_FAILED_{i}")))
            .collect();
        let matches: Vec<&EventRecord> = events.iter().collect();

        let evidence = EventEvidence::from_matches(&matches).unwrap();
        assert_eq!(evidence.total, 5);
        let kinds: Vec<&str> = evidence.recent.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(kinds, ["AUTH_FAILED_2", "AUTH_FAILED_3", "AUTH_FAILED_4"]);
    }

    #[test]
    fn evidence_from_no_matches_is_none() {
        assert!(EventEvidence::from_matches(&[]).is_none());
    }

    #[test]
    fn not_found_has_no_recommendation() {
        let verdict = Verdict::NotFound {
            reason: "Client not found: aa:bb:cc:dd:ee:ff".into(),
        };
        assert!(verdict.recommendation().is_none());
        assert_eq!(verdict.kind(), "not_found");
    }

    #[test]
    fn auth_recommendation_mentions_identity_infrastructure() {
        let evidence = EventEvidence {
            total: 1,
            recent: vec![EventRecord::new("eap_failure")],
        };
        let rec = Verdict::from(Finding::AuthFailure(evidence))
            .recommendation()
            .unwrap();
        assert!(rec.contains("identity infrastructure"), "{rec}");
    }

    #[test]
    fn verdict_serializes_with_outcome_and_kind() {
        let verdict = Verdict::from(Finding::NetworkFailure(EventEvidence {
            total: 1,
            recent: vec![EventRecord::new("CLIENT_DNS_TIMEOUT")],
        }));
        insta::assert_json_snapshot!(verdict, @r#"
        {
          "outcome": "finding",
          "kind": "network_failure",
          "total": 1,
          "recent": [
            {
              "timestamp": null,
              "event_type": "CLIENT_DNS_TIMEOUT",
              "reason": null,
              "detail": null
            }
          ]
        }
        "#);
    }

    #[test]
    fn clean_serializes_as_bare_outcome() {
        let json = serde_json::to_value(Verdict::Clean).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "clean" }));
    }
}
