//! Clap derive structures for the `mistdoc` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept free
//! of workspace crates so `build.rs` can include it for man page generation.

use std::net::IpAddr;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mistdoc -- wireless client troubleshooting for Mist networks
#[derive(Debug, Parser)]
#[command(
    name = "mistdoc",
    version,
    about = "Troubleshoot wireless clients on Mist networks",
    long_about = "Automated first-line troubleshooting for wireless clients managed by the\n\
        Mist cloud.\n\n\
        Checks authentication failures, then DHCP/DNS failures, then client health\n\
        metrics (RSSI, SNR, retries, latency), and the serving AP's uptime when the\n\
        signal is poor. Reports the first problem found with a recommendation.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "MISTDOC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Mist cloud host (overrides profile), e.g. https://api.eu.mist.com
    #[arg(long, env = "MIST_API_HOST", global = true)]
    pub api_host: Option<String>,

    /// Mist API token
    #[arg(long, env = "MIST_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Organization ID (skips organization selection)
    #[arg(long, env = "MIST_ORG_ID", global = true)]
    pub org_id: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MISTDOC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Never prompt; fail instead when a choice is required
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "MISTDOC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report and tables (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Diagnose a wireless client
    #[command(alias = "troubleshoot", alias = "diag")]
    Diagnose(DiagnoseArgs),

    /// List organizations visible to the API token
    Orgs(OrgsArgs),

    /// Check that the environment can reach and use the Mist API
    #[command(alias = "doctor")]
    CheckEnv,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DIAGNOSE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DiagnoseArgs {
    /// Client MAC address (aa:bb:cc:dd:ee:ff, aa-bb-..., aabb.ccdd.eeff or bare hex)
    #[arg(long, short = 'm')]
    pub client_mac: String,

    /// Client IP address (shown in the report)
    #[arg(long, short = 'i')]
    pub client_ip: Option<IpAddr>,

    /// Hours of event history to analyze [default: 24]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=720))]
    pub lookback_hours: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ORGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OrgsArgs {
    #[command(subcommand)]
    pub command: OrgsCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrgsCommand {
    /// List organizations
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Key: api_host, org_id, api_token, api_token_env, timeout, lookback_hours
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
