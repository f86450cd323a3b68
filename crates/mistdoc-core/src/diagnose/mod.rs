// ── Diagnostic rules ──
//
// Leaves first: the event classifier, the health thresholds, and the uptime
// policy are pure functions. `pipeline` sequences them over a
// `TelemetrySource` and produces one `Verdict` per run.

pub mod classifier;
pub mod finding;
pub mod health;
pub mod pipeline;
pub mod uptime;

pub use classifier::{Classification, classify};
pub use finding::{EVIDENCE_LIMIT, EventEvidence, Finding, Verdict};
pub use health::{HealthIssue, Metric, Reading, Severity};
pub use pipeline::{DEFAULT_LOOKBACK_HOURS, Diagnosis, DiagnosticPipeline, Stage};
pub use uptime::{UptimeAssessment, UptimeState};
