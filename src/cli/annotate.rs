//! Annotate subcommand for the agent CLI
//!
//! The annotation body may be given as the first positional argument or
//! through `AGENT_ANNOTATION_BODY`.

use crate::config::load;
use crate::config_target;
use crate::source::CommandContext;
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use serde::Serialize;

#[derive(Debug, Default, Clone, Serialize)]
pub struct AnnotateConfig {
    pub body: String,
    pub style: String,
    pub context: String,
    pub append: bool,
    pub job: String,
}

config_target! {
    AnnotateConfig {
        body.cli("arg:0").env("AGENT_ANNOTATION_BODY"),
        style.cli("style"),
        context.cli("context"),
        append.cli("append"),
        job.cli("job").label("a job id").validate("required"),
    }
}

pub fn command() -> Command {
    Command::new("annotate")
        .about("Resolve an annotation request and print it")
        .arg(
            Arg::new("body")
                .value_name("BODY")
                .help("The annotation body (read from AGENT_ANNOTATION_BODY if omitted)"),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .env("AGENT_ANNOTATION_STYLE")
                .default_value("default")
                .help("The style of the annotation (success, info, warning or error)"),
        )
        .arg(
            Arg::new("context")
                .long("context")
                .env("AGENT_ANNOTATION_CONTEXT")
                .help("The context of the annotation used to differentiate it from others"),
        )
        .arg(
            Arg::new("append")
                .long("append")
                .env("AGENT_ANNOTATION_APPEND")
                .action(ArgAction::SetTrue)
                .help("Append to the body of an existing annotation"),
        )
        .arg(
            Arg::new("job")
                .long("job")
                .env("AGENT_JOB_ID")
                .help("Which job should the annotation come from"),
        )
}

/// Resolve the annotation config.
pub fn resolve(context: &dyn CommandContext) -> Result<AnnotateConfig> {
    let mut config = AnnotateConfig::default();
    load(context, &mut config)?;
    Ok(config)
}

pub fn run(context: &dyn CommandContext) -> Result<()> {
    let config = resolve(context)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticContext;

    #[test]
    fn test_positional_body() {
        let ctx = StaticContext::new("agent", "annotate")
            .flag("style", "default")
            .set("job", "job-1")
            .args(["All tests passed"]);

        let config = resolve(&ctx).unwrap();
        assert_eq!(config.body, "All tests passed");
        assert_eq!(config.style, "default");
        assert_eq!(config.job, "job-1");
    }

    #[test]
    fn test_missing_job_is_reported_with_label() {
        let ctx = StaticContext::new("agent", "annotate").args(["body"]);

        let err = resolve(&ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing a job id. See: `agent annotate --help`"
        );
    }
}
