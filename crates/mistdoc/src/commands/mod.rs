//! Command handlers, one module per top-level subcommand.

pub mod check_env;
pub mod config_cmd;
pub mod diagnose;
pub mod orgs;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Diagnose(args) => diagnose::handle(args, global).await,
        Command::Orgs(args) => orgs::handle(args, global).await,
        Command::CheckEnv => check_env::handle(global).await,
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = crate::cli::Cli::command();
            generate(args.shell, &mut cmd, "mistdoc", &mut std::io::stdout());
            Ok(())
        }
    }
}
