//! Command context backed by clap.

use super::{CommandContext, FlagInfo};
use clap::parser::ValueSource;
use clap::{ArgMatches, Command};

/// Adapts a clap [`Command`] and the [`ArgMatches`] it produced.
///
/// Arguments are looked up by id, so flags should use their long name as id
/// (`Arg::new("build-path").long("build-path")`). A flag only counts as set
/// when its value came from the command line; values clap read from the
/// flag's `env` are detected by the loader through [`CommandContext::flags`].
#[derive(Debug, Clone)]
pub struct ClapContext<'a> {
    app_name: String,
    command: &'a Command,
    matches: &'a ArgMatches,
}

impl<'a> ClapContext<'a> {
    pub fn new(app_name: impl Into<String>, command: &'a Command, matches: &'a ArgMatches) -> Self {
        Self {
            app_name: app_name.into(),
            command,
            matches,
        }
    }

    /// Context for the subcommand selected in `matches`, if any.
    pub fn from_subcommand(root: &'a Command, matches: &'a ArgMatches) -> Option<Self> {
        let (name, sub_matches) = matches.subcommand()?;
        let command = root.find_subcommand(name)?;
        Some(Self::new(root.get_name(), command, sub_matches))
    }

    fn has_arg(&self, name: &str) -> bool {
        self.command
            .get_arguments()
            .any(|arg| arg.get_id().as_str() == name)
    }

    fn one<T>(&self, name: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        if !self.has_arg(name) {
            return None;
        }
        self.matches.try_get_one::<T>(name).ok().flatten().cloned()
    }

    fn many(&self, name: &str) -> Vec<String> {
        if !self.has_arg(name) {
            return Vec::new();
        }
        match self.matches.try_get_many::<String>(name) {
            Ok(Some(values)) => values.cloned().collect(),
            _ => Vec::new(),
        }
    }
}

impl CommandContext for ClapContext<'_> {
    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn command_name(&self) -> &str {
        self.command.get_name()
    }

    fn string(&self, name: &str) -> String {
        self.one::<String>(name).unwrap_or_default()
    }

    fn bool(&self, name: &str) -> bool {
        self.one::<bool>(name).unwrap_or(false)
    }

    fn int(&self, name: &str) -> i64 {
        self.one::<i64>(name).unwrap_or(0)
    }

    fn string_list(&self, name: &str) -> Vec<String> {
        self.many(name)
    }

    fn args(&self) -> Vec<String> {
        self.command
            .get_positionals()
            .flat_map(|arg| self.many(arg.get_id().as_str()))
            .collect()
    }

    fn is_set(&self, name: &str) -> bool {
        self.has_arg(name) && self.matches.value_source(name) == Some(ValueSource::CommandLine)
    }

    fn flags(&self) -> Vec<FlagInfo> {
        self.command
            .get_arguments()
            .filter(|arg| !arg.is_positional())
            .map(|arg| FlagInfo {
                name: arg.get_id().to_string(),
                env_var: arg.get_env().map(|var| var.to_string_lossy().into_owned()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ArgAction};

    fn root() -> Command {
        Command::new("agent").subcommand(
            Command::new("start")
                .arg(Arg::new("name").long("name").default_value("default-name"))
                .arg(
                    Arg::new("token")
                        .long("token")
                        .env("AGENT_CLICONFIG_TEST_UNSET_TOKEN"),
                )
                .arg(
                    Arg::new("spawn")
                        .long("spawn")
                        .value_parser(clap::value_parser!(i64))
                        .default_value("1"),
                )
                .arg(Arg::new("debug").long("debug").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("tags")
                        .long("tags")
                        .action(ArgAction::Append),
                )
                .arg(Arg::new("args").num_args(0..)),
        )
    }

    #[test]
    fn test_reads_values_and_defaults() {
        let root = root();
        let matches = root
            .clone()
            .try_get_matches_from([
                "agent", "start", "--debug", "--tags", "a,b", "--tags", "c", "first", "second",
            ])
            .unwrap();
        let ctx = ClapContext::from_subcommand(&root, &matches).unwrap();

        assert_eq!(ctx.app_name(), "agent");
        assert_eq!(ctx.command_name(), "start");
        assert_eq!(ctx.string("name"), "default-name");
        assert_eq!(ctx.int("spawn"), 1);
        assert!(ctx.bool("debug"));
        assert_eq!(ctx.string_list("tags"), vec!["a,b", "c"]);
        assert_eq!(ctx.args(), vec!["first", "second"]);
    }

    #[test]
    fn test_is_set_only_for_command_line_values() {
        let root = root();
        let matches = root
            .clone()
            .try_get_matches_from(["agent", "start", "--spawn", "4"])
            .unwrap();
        let ctx = ClapContext::from_subcommand(&root, &matches).unwrap();

        assert!(ctx.is_set("spawn"));
        assert!(!ctx.is_set("name"));
        assert!(!ctx.is_set("no-such-flag"));
        assert_eq!(ctx.string("no-such-flag"), "");
    }

    #[test]
    fn test_flags_report_env_vars() {
        let root = root();
        let matches = root
            .clone()
            .try_get_matches_from(["agent", "start"])
            .unwrap();
        let ctx = ClapContext::from_subcommand(&root, &matches).unwrap();

        assert_eq!(
            ctx.flag_env_var("token").as_deref(),
            Some("AGENT_CLICONFIG_TEST_UNSET_TOKEN")
        );
        assert_eq!(ctx.flag_env_var("name"), None);
        assert!(ctx.flags().iter().all(|flag| flag.name != "args"));
    }
}
