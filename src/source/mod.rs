//! Read access to the value sources a config load draws from.
//!
//! - [`CommandContext`]: parsed flags, positional arguments and
//!   explicit-set detection. [`ClapContext`] adapts clap; [`StaticContext`]
//!   is an in-memory context for embedding and tests.
//! - [`Environment`]: environment variable lookup. [`ProcessEnv`] reads the
//!   real process environment; [`MapEnv`] is a fixed map.
//!
//! The config file, the third source, lives in [`crate::config::ConfigFile`].

mod clap_context;
mod static_context;

pub use clap_context::ClapContext;
pub use static_context::StaticContext;

use std::collections::HashMap;

/// A flag the command declares, with the environment variable it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagInfo {
    pub name: String,
    pub env_var: Option<String>,
}

/// Parsed command-line state for one command invocation.
///
/// Typed accessors return the flag's value (explicit or its own default),
/// or the zero value when the flag is unknown.
pub trait CommandContext {
    /// Application name, used in `--help` hints.
    fn app_name(&self) -> &str;

    /// Name of the command being run, used in `--help` hints.
    fn command_name(&self) -> &str;

    fn string(&self, name: &str) -> String;

    fn bool(&self, name: &str) -> bool;

    fn int(&self, name: &str) -> i64;

    fn string_list(&self, name: &str) -> Vec<String>;

    /// Positional arguments, in order.
    fn args(&self) -> Vec<String>;

    /// Whether the flag was given on the command line.
    fn is_set(&self, name: &str) -> bool;

    /// All flags the command declares.
    fn flags(&self) -> Vec<FlagInfo>;

    /// The environment variable a flag reads, if it declares one.
    fn flag_env_var(&self, name: &str) -> Option<String> {
        self.flags()
            .into_iter()
            .find(|flag| flag.name == name)
            .and_then(|flag| flag.env_var)
    }
}

/// Environment variable lookup.
pub trait Environment {
    /// Value of `key`, or `None` if it is not defined.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

/// A fixed set of environment variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
