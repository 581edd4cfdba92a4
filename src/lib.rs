//! Agent CLI configuration library
//!
//! Resolves a typed configuration struct from command-line flags, environment
//! variables and an optional config file, then applies declared deprecation,
//! normalization and validation rules.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod schema;
pub mod source;
pub mod target;
pub mod value;

pub use config::{ConfigFile, ConfigLoader, load};
pub use error::{AssignError, ConfigError, Result, SchemaError};
pub use schema::{Binding, FieldDescriptor, FieldSpec, Normalization, Rule};
pub use target::ConfigTarget;
pub use value::{FieldValue, Value, ValueKind};
