//! Structured error types for configuration loading.

use crate::value::ValueKind;
use std::path::PathBuf;

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that abort a configuration load.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("A configuration file could not be found at: {path:?}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read config file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", .path.display())]
    FileParse { path: PathBuf, message: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Could not set value `{value}` to field `{field}` ({source})")]
    Assign {
        field: String,
        value: String,
        #[source]
        source: AssignError,
    },

    #[error(
        "Can't set config option `{deprecated}={deprecated_value}` because `{replacement}={replacement_value}` has already been set"
    )]
    RenameConflict {
        deprecated: String,
        deprecated_value: String,
        replacement: String,
        replacement_value: String,
    },

    #[error("Missing {label}. See: `{help}`")]
    Missing { label: String, help: String },

    #[error("Could not find {label} located at {path}")]
    NotFound { label: String, path: String },

    #[error("Failed to normalize `{field}`: {source}")]
    Normalize {
        field: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// True when the error points at a bug in field metadata rather than
    /// at user input.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, ConfigError::Schema(_))
    }
}

/// Misconfigured field metadata. Always a programmer error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Unknown normalization `{0}`")]
    UnknownNormalization(String),

    #[error("Unknown config validation rule `{0}`")]
    UnknownRule(String),

    #[error("Invalid binding `{0}`: positional bindings look like `arg:<index>`")]
    InvalidBinding(String),

    #[error("Config target has no field named `{0}`")]
    UnknownField(String),

    #[error("`{field}` is renamed to `{replacement}`, which must be declared before it")]
    RenameOrder { field: String, replacement: String },

    #[error("{directive} only works on {expected} fields (field `{field}` has kind {found})")]
    KindMismatch {
        directive: String,
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Failure to store a value into a config field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    #[error("no such field `{0}`")]
    UnknownField(String),

    #[error("expected a {expected} value, got a {found} value")]
    KindMismatch { expected: ValueKind, found: ValueKind },

    #[error("`{0}` is not a valid boolean")]
    InvalidBool(String),

    #[error("`{0}` is not a valid integer")]
    InvalidInt(String),
}
