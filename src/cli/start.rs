//! Start subcommand for the agent CLI
//!
//! Resolves the agent's start configuration from flags, `AGENT_*`
//! environment variables and `agent.cfg`, then prints it as JSON.

use crate::config::{CONFIG_FLAG, load_with_defaults};
use crate::config_target;
use crate::source::CommandContext;
use anyhow::Result;
use clap::{Arg, ArgAction, Command, value_parser};
use serde::Serialize;
use std::path::PathBuf;

/// Resolved configuration for `agent start`.
#[derive(Debug, Default, Clone, Serialize)]
pub struct StartConfig {
    pub config: String,
    pub token: String,
    pub name: String,
    pub priority: String,
    pub tags: Vec<String>,
    pub meta_data: Vec<String>,
    pub tags_from_host: bool,
    pub build_path: String,
    pub hooks_path: String,
    pub bootstrap_script: String,
    pub spawn: i64,
    pub endpoint: String,
    pub no_ssh_fingerprint_verification: bool,
    pub debug: bool,
}

config_target! {
    StartConfig {
        config.cli("config").normalize("filepath"),
        token.cli("token").label("an agent registration token").validate("required"),
        name.cli("name"),
        priority.cli("priority"),
        tags.cli("tags").normalize("list"),
        meta_data.cli("meta-data").normalize("list").renamed_to("tags"),
        tags_from_host.cli("tags-from-host"),
        build_path.cli("build-path").label("a build path").normalize("filepath").validate("required"),
        hooks_path.cli("hooks-path").normalize("filepath"),
        bootstrap_script.cli("bootstrap-script").label("a bootstrap script").normalize("commandpath").validate("required"),
        spawn.cli("spawn"),
        endpoint.cli("endpoint").validate("required"),
        no_ssh_fingerprint_verification
            .cli("no-automatic-ssh-fingerprint-verification")
            .deprecated("SSH host keys are no longer verified automatically; remove this option"),
        debug.cli("debug"),
    }
}

/// Config files tried, in order, when `--config` is not given.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".agent").join("agent.cfg"));
    }
    paths.push(PathBuf::from("/etc/agent/agent.cfg"));
    paths
}

/// The `start` subcommand's flags.
pub fn command() -> Command {
    Command::new("start")
        .about("Resolve the agent start configuration and print it")
        .arg(
            Arg::new(CONFIG_FLAG)
                .long(CONFIG_FLAG)
                .value_name("PATH")
                .env("AGENT_CONFIG")
                .help("Path to a configuration file"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .env("AGENT_TOKEN")
                .help("Your account agent token"),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .env("AGENT_NAME")
                .default_value("%hostname-%n")
                .help("The name of the agent"),
        )
        .arg(
            Arg::new("priority")
                .long("priority")
                .env("AGENT_PRIORITY")
                .help("The priority of the agent (higher priorities are assigned work first)"),
        )
        .arg(
            Arg::new("tags")
                .long("tags")
                .env("AGENT_TAGS")
                .action(ArgAction::Append)
                .help("A list of tags for the agent (e.g. \"queue=default\")"),
        )
        .arg(
            Arg::new("meta-data")
                .long("meta-data")
                .env("AGENT_META_DATA")
                .action(ArgAction::Append)
                .hide(true),
        )
        .arg(
            Arg::new("tags-from-host")
                .long("tags-from-host")
                .env("AGENT_TAGS_FROM_HOST")
                .action(ArgAction::SetTrue)
                .help("Include tags describing the host"),
        )
        .arg(
            Arg::new("build-path")
                .long("build-path")
                .value_name("PATH")
                .env("AGENT_BUILD_PATH")
                .help("Path to where the builds will run from"),
        )
        .arg(
            Arg::new("hooks-path")
                .long("hooks-path")
                .value_name("PATH")
                .env("AGENT_HOOKS_PATH")
                .help("Directory where the hook scripts are found"),
        )
        .arg(
            Arg::new("bootstrap-script")
                .long("bootstrap-script")
                .value_name("COMMAND")
                .env("AGENT_BOOTSTRAP_SCRIPT")
                .default_value("agent bootstrap")
                .help("The command that is executed for bootstrapping a job"),
        )
        .arg(
            Arg::new("spawn")
                .long("spawn")
                .env("AGENT_SPAWN")
                .value_parser(value_parser!(i64))
                .default_value("1")
                .help("The number of agents to spawn in parallel"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .env("AGENT_ENDPOINT")
                .default_value("https://agent.example.com/v3")
                .help("The agent API endpoint"),
        )
        .arg(
            Arg::new("no-automatic-ssh-fingerprint-verification")
                .long("no-automatic-ssh-fingerprint-verification")
                .env("AGENT_NO_AUTOMATIC_SSH_FINGERPRINT_VERIFICATION")
                .action(ArgAction::SetTrue)
                .hide(true),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .env("AGENT_DEBUG")
                .action(ArgAction::SetTrue)
                .help("Enable debug mode"),
        )
}

/// Resolve the start configuration.
pub fn resolve(context: &dyn CommandContext) -> Result<StartConfig> {
    let mut config = StartConfig::default();
    load_with_defaults(context, &mut config, default_config_paths())?;
    Ok(config)
}

/// Run the start subcommand.
pub fn run(context: &dyn CommandContext) -> Result<()> {
    let config = resolve(context)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
