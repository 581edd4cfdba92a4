//! Per-field value resolution.
//!
//! Precedence for named bindings, highest first:
//! 1. flag given on the command line
//! 2. flag's environment variable, when non-empty
//! 3. config file value
//! 4. flag's own default
//!
//! Put differently: a config file value is only replaced when the flag was
//! explicitly set (directly or through its env var), or when the file has no
//! value for the key at all.

use super::file::ConfigFile;
use crate::error::{ConfigError, Result};
use crate::schema::{Binding, FieldDescriptor};
use crate::source::{CommandContext, Environment};
use crate::value::{Value, ValueKind};
use std::fmt;
use tracing::debug;

/// Which source produced a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    Argument,
    Environment,
    ConfigFile,
    Command,
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueOrigin::Argument => write!(f, "argument"),
            ValueOrigin::Environment => write!(f, "environment"),
            ValueOrigin::ConfigFile => write!(f, "config file"),
            ValueOrigin::Command => write!(f, "command"),
        }
    }
}

/// Sources consulted while resolving fields.
pub struct Sources<'a> {
    pub context: &'a dyn CommandContext,
    pub env: &'a dyn Environment,
    pub file: Option<&'a ConfigFile>,
}

impl Sources<'_> {
    /// Resolve the value for `field`, whose current value has kind `kind`.
    ///
    /// Returns `None` when no source supplies a value; the field then keeps
    /// whatever it already holds.
    pub fn resolve(&self, field: &FieldDescriptor, kind: ValueKind) -> Result<Option<Value>> {
        let resolved = match &field.binding {
            None => return Ok(None),
            Some(Binding::Positional(index)) => self.positional(field, *index),
            Some(Binding::Named(name)) => self.named(field, name, kind)?,
        };

        if let Some((value, origin)) = &resolved {
            debug!(
                field = %field.field,
                binding = %field.display_name(),
                origin = %origin,
                value = %value,
                "Resolved config field"
            );
        }

        Ok(resolved.map(|(value, _)| value))
    }

    fn positional(&self, field: &FieldDescriptor, index: usize) -> Option<(Value, ValueOrigin)> {
        if let Some(arg) = self.context.args().into_iter().nth(index) {
            return Some((Value::String(arg), ValueOrigin::Argument));
        }

        field
            .env_var
            .as_deref()
            .and_then(|var| self.env.var(var))
            .map(|value| (Value::String(value), ValueOrigin::Environment))
    }

    fn named(
        &self,
        field: &FieldDescriptor,
        name: &str,
        kind: ValueKind,
    ) -> Result<Option<(Value, ValueOrigin)>> {
        let mut resolved = None;

        if let Some(raw) = self.file.and_then(|file| file.get(name)) {
            let value = Value::parse(kind, raw).map_err(|source| ConfigError::Assign {
                field: field.field.clone(),
                value: raw.to_string(),
                source,
            })?;
            resolved = Some((value, ValueOrigin::ConfigFile));
        }

        if resolved.is_none() || self.is_explicitly_set(name) {
            let value = match kind {
                ValueKind::String => Value::String(self.context.string(name)),
                ValueKind::Bool => Value::Bool(self.context.bool(name)),
                ValueKind::Int => Value::Int(self.context.int(name)),
                ValueKind::List => Value::List(self.context.string_list(name)),
            };
            resolved = Some((value, ValueOrigin::Command));
        }

        Ok(resolved)
    }

    /// Whether the user supplied `name` on the command line or through the
    /// flag's environment variable.
    pub fn is_explicitly_set(&self, name: &str) -> bool {
        if self.context.is_set(name) {
            return true;
        }

        self.context
            .flag_env_var(name)
            .map(|var| var.trim().to_string())
            .filter(|var| !var.is_empty())
            .and_then(|var| self.env.var(&var))
            .is_some_and(|value| !value.is_empty())
    }
}
