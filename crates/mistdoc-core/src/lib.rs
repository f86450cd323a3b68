// mistdoc-core: wireless client diagnostics
//
// The telemetry model, the prioritized diagnostic rules, and the pipeline
// that runs them over a `TelemetrySource`. `MistTelemetrySource` supplies
// telemetry from the Mist cloud; tests substitute in-memory sources.

pub mod config;
pub mod convert;
pub mod diagnose;
pub mod error;
pub mod mist;
pub mod model;
pub mod org;
pub mod preflight;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────
pub use config::ServiceConfig;
pub use diagnose::{
    DEFAULT_LOOKBACK_HOURS, Diagnosis, DiagnosticPipeline, EventEvidence, Finding, HealthIssue,
    Metric, Reading, Severity, Stage, UptimeAssessment, UptimeState, Verdict,
};
pub use error::CoreError;
pub use mist::MistTelemetrySource;
pub use model::{AccessPointStats, ClientSession, EventRecord, MacAddress, Organization};
pub use org::{SelectedOrg, resolve_organization, select_organization};
pub use preflight::{Check, CheckResult, PreflightReport, run_preflight};
pub use source::{LookbackWindow, TelemetrySource};
