//! `check-env` command: environment preflight.

use std::fmt::Write as _;

use mistdoc_core::{CheckResult, PreflightReport, run_preflight};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output::{self, Painter};

fn check_line(index: usize, check: &CheckResult, painter: Painter) -> String {
    let status = if check.passed {
        painter.ok("OK")
    } else {
        painter.bad("FAIL")
    };
    let name = check.check.to_string();
    format!("{}. {name:<18}{status}  {}", index + 1, check.detail)
}

fn detail(report: &PreflightReport, painter: Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        painter.heading(&format!("Checking the environment for Mist API access ({})", report.host))
    );
    let _ = writeln!(out);
    for (i, check) in report.checks.iter().enumerate() {
        let _ = writeln!(out, "{}", check_line(i, check, painter));
    }
    let _ = writeln!(out);
    let _ = write!(out, "-- Checks complete ({}) --", report.summary());
    out
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = config::resolve(global)?;
    // Probe timeout follows --timeout only when it is shorter.
    let mut service = resolved.service;
    service.probe_timeout = service.probe_timeout.min(service.timeout);

    let report = run_preflight(&service).await;

    let painter = Painter::new(global.color);
    let out = output::render_single(
        global.output,
        &report,
        |r| detail(r, painter),
        PreflightReport::summary,
    );
    output::print_output(&out, global.quiet);

    if report.all_passed() {
        Ok(())
    } else {
        Err(CliError::PreflightFailed {
            passed: report.passed_count(),
            total: report.total(),
        })
    }
}
