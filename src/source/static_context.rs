//! In-memory command context.

use super::{CommandContext, FlagInfo};
use crate::value::Value;

#[derive(Debug, Clone)]
struct Flag {
    name: String,
    value: Value,
    explicit: bool,
    env_var: Option<String>,
}

/// A command context assembled by hand rather than parsed from argv.
///
/// ```
/// use agent_cliconfig::source::{CommandContext, StaticContext};
///
/// let ctx = StaticContext::new("agent", "start")
///     .flag("name", "default-name")
///     .set("spawn", 2_i64)
///     .args(["extra"]);
///
/// assert_eq!(ctx.string("name"), "default-name");
/// assert!(!ctx.is_set("name"));
/// assert!(ctx.is_set("spawn"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    app_name: String,
    command_name: String,
    flags: Vec<Flag>,
    args: Vec<String>,
}

impl StaticContext {
    pub fn new(app_name: impl Into<String>, command_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            command_name: command_name.into(),
            ..Default::default()
        }
    }

    /// Declare a flag carrying its own default value.
    pub fn flag(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.upsert(name.into(), default.into(), false)
    }

    /// Give a flag a value as if the user passed it on the command line.
    pub fn set(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.upsert(name.into(), value.into(), true)
    }

    /// Declare the environment variable a flag reads.
    pub fn flag_env(mut self, name: impl Into<String>, env_var: impl Into<String>) -> Self {
        let name = name.into();
        let env_var = Some(env_var.into());
        match self.flags.iter_mut().find(|f| f.name == name) {
            Some(flag) => flag.env_var = env_var,
            None => self.flags.push(Flag {
                name,
                value: Value::String(String::new()),
                explicit: false,
                env_var,
            }),
        }
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn upsert(mut self, name: String, value: Value, explicit: bool) -> Self {
        match self.flags.iter_mut().find(|f| f.name == name) {
            Some(flag) => {
                flag.value = value;
                flag.explicit = explicit;
            }
            None => self.flags.push(Flag {
                name,
                value,
                explicit,
                env_var: None,
            }),
        }
        self
    }

    fn value(&self, name: &str) -> Option<&Value> {
        self.flags.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

impl CommandContext for StaticContext {
    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn command_name(&self) -> &str {
        &self.command_name
    }

    fn string(&self, name: &str) -> String {
        match self.value(name) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    fn bool(&self, name: &str) -> bool {
        matches!(self.value(name), Some(Value::Bool(true)))
    }

    fn int(&self, name: &str) -> i64 {
        match self.value(name) {
            Some(Value::Int(i)) => *i,
            _ => 0,
        }
    }

    fn string_list(&self, name: &str) -> Vec<String> {
        match self.value(name) {
            Some(Value::List(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    fn args(&self) -> Vec<String> {
        self.args.clone()
    }

    fn is_set(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.name == name && f.explicit)
    }

    fn flags(&self) -> Vec<FlagInfo> {
        self.flags
            .iter()
            .map(|f| FlagInfo {
                name: f.name.clone(),
                env_var: f.env_var.clone(),
            })
            .collect()
    }
}
