//! Field resolution pipeline.
//!
//! Merges three sources into a [`ConfigTarget`](crate::ConfigTarget):
//! 1. **Command context** - flags, positional arguments, explicit-set detection
//! 2. **Environment** - flag env vars and positional fallbacks
//! 3. **Config file** - `--config <path>` or the first existing default path
//!
//! Every field then goes through the same steps, in order:
//! resolve → migrate (deprecations/renames) → normalize → validate.
//!
//! ## Precedence
//! - Positional fields: argument at the index, else the field's env var
//! - Named fields: explicit flag or non-empty flag env var, else config file
//!   value, else the flag's own default

mod file;
mod loader;
mod migrate;
mod normalize;
mod resolve;
mod validate;

pub use file::{ConfigFile, parse as parse_config_file};
pub use loader::{CONFIG_FLAG, ConfigLoader, load, load_with_defaults};
pub use normalize::{command_path, expand_home, file_path, list as normalize_list};
pub use resolve::{Sources, ValueOrigin};
