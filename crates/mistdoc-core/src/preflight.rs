// ── Environment preflight ──
//
// Four independent readiness checks run before any diagnosis: the API host
// resolves, answers, a token is configured, and the token works. A failed
// check never stops the others.

use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Serialize;
use strum::Display;
use tracing::{debug, info};

use mistdoc_api::{MistClient, SelfInfo};

use crate::config::ServiceConfig;
use crate::error::CoreError;

/// Timeout for the bare reachability probe.
pub const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    #[strum(serialize = "DNS lookup")]
    Dns,
    #[strum(serialize = "API reachability")]
    Reachability,
    #[strum(serialize = "API token")]
    Token,
    #[strum(serialize = "Who am I")]
    Identity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub check: Check,
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    fn pass(check: Check, detail: impl Into<String>) -> Self {
        Self {
            check,
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(check: Check, detail: impl Into<String>) -> Self {
        Self {
            check,
            passed: false,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreflightReport {
    pub host: String,
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn total(&self) -> usize {
        self.checks.len()
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// `passed 3/4`
    pub fn summary(&self) -> String {
        format!("passed {}/{}", self.passed_count(), self.total())
    }
}

/// Run every check against `config`.
pub async fn run_preflight(config: &ServiceConfig) -> PreflightReport {
    let host = config.host().unwrap_or_default().to_owned();
    let checks = vec![
        check_dns(config).await,
        check_reachability(config).await,
        check_token(config),
        check_identity(config).await,
    ];
    let report = PreflightReport { host, checks };
    info!(passed = report.passed_count(), total = report.total(), "preflight complete");
    report
}

async fn check_dns(config: &ServiceConfig) -> CheckResult {
    let Some(host) = config.host() else {
        return CheckResult::fail(Check::Dns, format!("no host in {}", config.api_host));
    };
    let port = config.api_host.port_or_known_default().unwrap_or(443);

    let lookup = tokio::time::timeout(config.probe_timeout, tokio::net::lookup_host((host, port)));
    match lookup.await {
        Ok(Ok(addrs)) => {
            let addrs: Vec<_> = addrs.collect();
            debug!(host, count = addrs.len(), "resolved");
            match addrs.first() {
                Some(first) => CheckResult::pass(Check::Dns, format!("{host} -> {}", first.ip())),
                None => CheckResult::fail(Check::Dns, format!("{host} has no addresses")),
            }
        }
        Ok(Err(e)) => CheckResult::fail(Check::Dns, format!("lookup of {host} failed: {e}")),
        Err(_) => CheckResult::fail(
            Check::Dns,
            format!("lookup of {host} timed out after {}s", config.probe_timeout.as_secs()),
        ),
    }
}

async fn check_reachability(config: &ServiceConfig) -> CheckResult {
    let client = match config.transport().build_client() {
        Ok(http) => MistClient::with_client(http, config.api_host.clone()),
        Err(e) => return CheckResult::fail(Check::Reachability, e.to_string()),
    };
    match client.probe_within(REACHABILITY_TIMEOUT).await {
        Ok(status) => CheckResult::pass(
            Check::Reachability,
            format!("{} answered (HTTP {status})", config.api_host),
        ),
        Err(e) => CheckResult::fail(Check::Reachability, CoreError::from(e).to_string()),
    }
}

fn check_token(config: &ServiceConfig) -> CheckResult {
    match &config.token {
        Some(token) if !token.expose_secret().trim().is_empty() => {
            CheckResult::pass(Check::Token, "configured")
        }
        _ => CheckResult::fail(Check::Token, "no API token configured"),
    }
}

async fn check_identity(config: &ServiceConfig) -> CheckResult {
    let Some(token) = config.token.as_ref() else {
        return CheckResult::fail(Check::Identity, "skipped: no API token");
    };
    let result = match MistClient::new(config.api_host.clone(), token, &config.transport()) {
        Ok(client) => client.get_self().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(me) => CheckResult::pass(Check::Identity, describe_user(&me)),
        Err(e) => CheckResult::fail(Check::Identity, CoreError::from(e).to_string()),
    }
}

fn describe_user(me: &SelfInfo) -> String {
    let name = [me.first_name.as_deref(), me.last_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    match (name.is_empty(), me.email.as_deref()) {
        (false, Some(email)) => format!("{name} <{email}>"),
        (false, None) => name,
        (true, Some(email)) => email.to_owned(),
        (true, None) => "authenticated".into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ServiceConfig {
        ServiceConfig::new(server.uri().parse().unwrap())
    }

    #[test]
    fn user_description_variants() {
        let me = SelfInfo {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: Some("ada@example.com".into()),
        };
        assert_eq!(describe_user(&me), "Ada Lovelace <ada@example.com>");

        let me = SelfInfo {
            first_name: None,
            last_name: None,
            email: Some("ada@example.com".into()),
        };
        assert_eq!(describe_user(&me), "ada@example.com");
    }

    #[test]
    fn blank_token_fails_token_check() {
        let config = ServiceConfig::new("https://api.mist.com".parse().unwrap())
            .with_token(SecretString::from("   ".to_owned()));
        assert!(!check_token(&config).passed);
    }

    #[tokio::test]
    async fn all_checks_pass_against_live_host() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/self"))
            .and(header("Authorization", "Token secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com"
            })))
            .mount(&server)
            .await;

        let config = config_for(&server).with_token(SecretString::from("secret".to_owned()));
        let report = run_preflight(&config).await;

        assert!(report.all_passed(), "{report:?}");
        assert_eq!(report.summary(), "passed 4/4");
        assert_eq!(report.checks[3].detail, "Ada Lovelace <ada@example.com>");
    }

    #[tokio::test]
    async fn missing_token_fails_two_checks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let report = run_preflight(&config_for(&server)).await;

        assert_eq!(report.passed_count(), 2);
        assert!(!report.checks[2].passed);
        assert!(!report.checks[3].passed);
    }

    #[tokio::test]
    async fn rejected_token_fails_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/self"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let config = config_for(&server).with_token(SecretString::from("bad".to_owned()));
        let report = run_preflight(&config).await;

        let identity = &report.checks[3];
        assert_eq!(identity.check, Check::Identity);
        assert!(!identity.passed);
        assert!(identity.detail.contains("Authentication failed"), "{}", identity.detail);
    }
}
