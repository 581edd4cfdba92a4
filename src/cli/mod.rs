//! CLI command definitions for the agent
//!
//! Global options use clap's derive macros. Subcommands are built with the
//! builder API so their flags can be looked up by name at load time; each
//! subcommand module pairs its `Command` with the config struct it fills.

pub mod annotate;
pub mod start;

use clap::{Args, Command};

/// Application name shown in help hints.
pub const APP_NAME: &str = "agent";

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,
}

/// The root command with all subcommands attached.
pub fn command() -> Command {
    let root = Command::new(APP_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Agent configuration resolver")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(start::command())
        .subcommand(annotate::command());
    GlobalArgs::augment_args(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::FromArgMatches;

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_global_args_parse_after_subcommand() {
        let matches = command()
            .try_get_matches_from(["agent", "start", "--verbose", "--log", "stdout"])
            .unwrap();
        let globals = GlobalArgs::from_arg_matches(&matches).unwrap();

        assert!(globals.verbose);
        assert_eq!(globals.log, "stdout");
    }
}
