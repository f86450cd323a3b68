//! `diagnose` command: run the diagnostic pipeline for one client.

use std::fmt::Write as _;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use mistdoc_core::{
    ClientSession, Diagnosis, DiagnosticPipeline, EventEvidence, EventRecord, Finding,
    HealthIssue, MacAddress, MistTelemetrySource, UptimeAssessment, Verdict,
};

use crate::cli::{DiagnoseArgs, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output::{self, Painter};

use super::util;

const RULE_WIDTH: usize = 60;

// ── Report ──────────────────────────────────────────────────────────

/// A diagnosis plus the invocation context shown in the report.
#[derive(Debug, Serialize)]
struct Report {
    #[serde(flatten)]
    diagnosis: Diagnosis,
    client_ip: Option<IpAddr>,
    org_id: String,
    org_name: Option<String>,
    generated_at: DateTime<Utc>,
}

// ── Detail rendering ────────────────────────────────────────────────

fn rule(out: &mut String, painter: Painter, title: &str) {
    let bar = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out, "{bar}");
    let _ = writeln!(out, "{}", painter.heading(title));
    let _ = writeln!(out, "{bar}");
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

fn event_line(event: &EventRecord) -> String {
    let mut line = format!("   • {}", event.event_type);
    if let Some(reason) = &event.reason {
        let _ = write!(line, ": {reason}");
    }
    if let Some(detail) = &event.detail {
        let _ = write!(line, " ({detail})");
    }
    if let Some(ts) = event.timestamp {
        let _ = write!(line, " @ {}", ts.format("%Y-%m-%d %H:%M:%S"));
    }
    line
}

fn write_evidence(out: &mut String, painter: Painter, evidence: &EventEvidence) {
    for event in &evidence.recent {
        let _ = writeln!(out, "{}", event_line(event));
    }
    if evidence.total > evidence.recent.len() {
        let _ = writeln!(
            out,
            "{}",
            painter.dim(&format!(
                "   (showing last {} of {} matching events)",
                evidence.recent.len(),
                evidence.total
            ))
        );
    }
}

fn write_issues(out: &mut String, painter: Painter, issues: &[HealthIssue]) {
    for issue in issues {
        let _ = writeln!(
            out,
            "   • {}: {} {}",
            issue.metric,
            issue.description,
            painter.severity(issue.severity)
        );
    }
}

fn write_uptime(out: &mut String, uptime: &UptimeAssessment) {
    let _ = writeln!(
        out,
        "   AP {} uptime: {:.1} days, {} ({})",
        uptime.ap_label(),
        uptime.uptime_days(),
        uptime.humanized(),
        uptime.state
    );
}

fn write_verdict(out: &mut String, painter: Painter, verdict: &Verdict) {
    match verdict {
        Verdict::NotFound { reason } => {
            let _ = writeln!(out, "{} {reason}", painter.bad("Client not found:"));
        }
        Verdict::Clean => {
            let _ = writeln!(out, "{}", painter.ok("All automated checks passed."));
        }
        Verdict::Finding(finding) => {
            let heading = format!("{} detected:", finding.label());
            let heading = match finding {
                Finding::AuthFailure(_) | Finding::NetworkFailure(_) => painter.bad(&heading),
                Finding::HealthIssue { .. } | Finding::UptimeAdvisory { .. } => {
                    painter.warn(&heading)
                }
            };
            let _ = writeln!(out, "{heading}");
            match finding {
                Finding::AuthFailure(evidence) | Finding::NetworkFailure(evidence) => {
                    write_evidence(out, painter, evidence);
                }
                Finding::HealthIssue { issues, uptime } => {
                    write_issues(out, painter, issues);
                    if let Some(uptime) = uptime {
                        write_uptime(out, uptime);
                    }
                }
                Finding::UptimeAdvisory { issues, uptime } => {
                    write_issues(out, painter, issues);
                    write_uptime(out, uptime);
                }
            }
        }
    }
}

fn write_session(out: &mut String, session: &ClientSession) {
    let rows = [
        ("Hostname", or_dash(session.hostname.as_deref())),
        ("IP", or_dash(session.ip)),
        ("AP MAC", or_dash(session.ap_mac.as_ref())),
        ("SSID", or_dash(session.ssid.as_deref())),
        ("RSSI", or_dash(session.rssi_dbm.map(|v| format!("{v} dBm")))),
        ("SNR", or_dash(session.snr_db.map(|v| format!("{v} dB")))),
        ("Band", or_dash(session.band.as_deref())),
        ("Channel", or_dash(session.channel)),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{:<10}{value}", format!("{label}:"));
    }
}

fn detail(report: &Report, painter: Painter) -> String {
    let d = &report.diagnosis;
    let mut out = String::new();

    rule(&mut out, painter, "MIST CLIENT DIAGNOSIS");
    let _ = writeln!(out, "Client MAC:    {}", d.client_mac);
    let _ = writeln!(out, "Client IP:     {}", or_dash(report.client_ip));
    let _ = writeln!(
        out,
        "Organization:  {}",
        report.org_name.as_ref().map_or_else(
            || report.org_id.clone(),
            |name| format!("{name} ({})", report.org_id)
        )
    );
    let _ = writeln!(
        out,
        "Window:        {} .. {}",
        d.window.start.format("%Y-%m-%d %H:%M"),
        d.window.end.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out);

    for (i, stage) in d.stages.iter().enumerate() {
        let _ = writeln!(out, "[{}] {stage}", i + 1);
    }
    let _ = writeln!(out);

    write_verdict(&mut out, painter, &d.verdict);

    if let Some(rec) = &d.recommendation {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", painter.heading("Recommendation:"));
        let _ = writeln!(out, "   {rec}");
    }

    if let Some(session) = &d.session {
        let _ = writeln!(out);
        rule(&mut out, painter, "CLIENT SUMMARY");
        write_session(&mut out, session);
    }

    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: DiagnoseArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mac = MacAddress::new(&args.client_mac);
    if !mac.is_valid() {
        return Err(CliError::Validation {
            field: "client-mac".into(),
            reason: format!("'{}' is not a MAC address", args.client_mac),
        });
    }

    let resolved = config::resolve(global)?;
    resolved.require_token()?;
    let lookback = args.lookback_hours.unwrap_or(resolved.service.lookback_hours);

    let source = MistTelemetrySource::new(&resolved.service)?;
    let (source, org) =
        util::scope_to_org(source, resolved.service.org_id.as_deref(), global).await?;

    let spinner = util::spinner(global, &format!("Diagnosing {mac}..."));
    let diagnosis = DiagnosticPipeline::new(source)
        .with_lookback_hours(lookback)
        .try_run(&mac)
        .await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let diagnosis = diagnosis?;

    let not_found = match &diagnosis.verdict {
        Verdict::NotFound { reason } => Some(reason.clone()),
        _ => None,
    };

    let report = Report {
        diagnosis,
        client_ip: args.client_ip,
        org_id: org.id,
        org_name: org.name,
        generated_at: Utc::now(),
    };

    // The table view of a missing client is the error itself.
    if not_found.is_none() || global.output != OutputFormat::Table {
        let painter = Painter::new(global.color);
        let out = output::render_single(
            global.output,
            &report,
            |r| detail(r, painter),
            |r| r.diagnosis.verdict.kind().to_owned(),
        );
        output::print_output(&out, global.quiet);
    }

    match not_found {
        Some(reason) => Err(CliError::ClientNotFound {
            mac: mac.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
