//! Agent configuration resolver
//!
//! Resolves a subcommand's configuration from flags, environment variables
//! and an optional config file, and prints the result as JSON.

use agent_cliconfig::cli::{self, GlobalArgs, annotate, start};
use agent_cliconfig::logging::{self, LogTarget};
use agent_cliconfig::source::{ClapContext, CommandContext};
use anyhow::{Result, bail};
use clap::FromArgMatches;
use tracing::debug;

fn main() -> Result<()> {
    let root = cli::command();
    let matches = root.clone().get_matches();
    let globals = GlobalArgs::from_arg_matches(&matches)?;

    let target: LogTarget = globals.log.parse()?;
    logging::init(&target, globals.verbose)?;

    let Some(context) = ClapContext::from_subcommand(&root, &matches) else {
        bail!("No subcommand given. See: `{} --help`", cli::APP_NAME);
    };

    debug!(command = %context.command_name(), "Resolving configuration");

    match context.command_name() {
        "start" => start::run(&context),
        "annotate" => annotate::run(&context),
        other => bail!("Unknown command `{}`", other),
    }
}
