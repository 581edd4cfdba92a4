//! Configuration loader.
//!
//! Picks at most one config file, then makes a single pass over the target's
//! fields in declaration order. Each field is resolved, migrated if
//! deprecated, normalized, and validated before the next field is touched.
//! The first error stops the pass; fields already processed keep their new
//! values.

use super::file::ConfigFile;
use super::resolve::Sources;
use super::{migrate, normalize, validate};
use crate::error::{ConfigError, Result, SchemaError};
use crate::source::{CommandContext, Environment, ProcessEnv};
use crate::target::ConfigTarget;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Flag naming an explicit config file.
pub const CONFIG_FLAG: &str = "config";

/// Loads a [`ConfigTarget`] from a command context, the environment and an
/// optional config file.
pub struct ConfigLoader<'a> {
    context: &'a dyn CommandContext,
    env: &'a dyn Environment,
    /// Candidate config files, tried in order when `--config` is not given
    default_config_file_paths: Vec<PathBuf>,
    /// The config file used by the last load (if any)
    file: Option<ConfigFile>,
}

impl<'a> ConfigLoader<'a> {
    /// Create a loader reading the real process environment.
    pub fn new(context: &'a dyn CommandContext) -> Self {
        Self {
            context,
            env: &ProcessEnv,
            default_config_file_paths: Vec::new(),
            file: None,
        }
    }

    /// Use a different environment.
    pub fn with_env(mut self, env: &'a dyn Environment) -> Self {
        self.env = env;
        self
    }

    /// Config files to fall back on when no explicit path is given.
    pub fn with_default_config_file_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.default_config_file_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Get the config file that was used.
    pub fn config_file(&self) -> Option<&ConfigFile> {
        self.file.as_ref()
    }

    /// Choose the config file to read, without loading it.
    ///
    /// An explicit `--config` path must exist. Default candidates are tried
    /// in order and skipped silently when absent.
    pub fn select_config_file(&self) -> Result<Option<ConfigFile>> {
        let explicit = self.context.string(CONFIG_FLAG);
        if !explicit.is_empty() {
            let file = ConfigFile::new(&explicit);
            if file.exists() {
                return Ok(Some(file));
            }
            let path = file
                .absolute_path()
                .unwrap_or_else(|_| PathBuf::from(&explicit));
            return Err(ConfigError::FileNotFound { path });
        }

        let found = self
            .default_config_file_paths
            .iter()
            .map(ConfigFile::new)
            .find(ConfigFile::exists);

        if found.is_none() && !self.default_config_file_paths.is_empty() {
            debug!(
                candidates = self.default_config_file_paths.len(),
                "No default config file found"
            );
        }

        Ok(found)
    }

    /// Populate `target` and return the warnings collected on the way.
    pub fn load<T: ConfigTarget>(&mut self, target: &mut T) -> Result<Vec<String>> {
        self.file = match self.select_config_file()? {
            Some(mut file) => {
                file.load()?;
                Some(file)
            }
            None => None,
        };

        let sources = Sources {
            context: self.context,
            env: self.env,
            file: self.file.as_ref(),
        };

        let specs = T::fields();
        let mut warnings = Vec::new();

        for spec in &specs {
            let field = spec.describe()?;
            let current = target
                .get_field(&field.field)
                .ok_or_else(|| SchemaError::UnknownField(field.field.clone()))?;

            if let Some(value) = sources.resolve(&field, current.kind())? {
                let shown = value.to_string();
                target
                    .set_field(&field.field, value)
                    .map_err(|source| ConfigError::Assign {
                        field: field.field.clone(),
                        value: shown,
                        source,
                    })?;
            }

            migrate::migrate(&mut *target, &field, &specs, self.env, &mut warnings)?;

            if let Some(normalization) = field.normalization {
                let value = current_value(target, &field.field)?;
                let normalized = normalize::apply(normalization, &field, value, self.env)?;
                let shown = normalized.to_string();
                target
                    .set_field(&field.field, normalized)
                    .map_err(|source| ConfigError::Assign {
                        field: field.field.clone(),
                        value: shown,
                        source,
                    })?;
            }

            if !field.rules.is_empty() {
                let value = current_value(target, &field.field)?;
                validate::validate(&field, &value, self.context)?;
            }
        }

        Ok(warnings)
    }
}

fn current_value<T: ConfigTarget>(target: &T, name: &str) -> Result<crate::value::Value> {
    target
        .get_field(name)
        .ok_or_else(|| SchemaError::UnknownField(name.to_string()).into())
}

/// Load `target` from `context`, logging any warnings.
pub fn load<T: ConfigTarget>(context: &dyn CommandContext, target: &mut T) -> Result<()> {
    load_with_defaults(context, target, Vec::<PathBuf>::new())
}

/// Like [`load`], falling back on `default_config_file_paths` when no
/// explicit config file is given.
pub fn load_with_defaults<T, I, P>(
    context: &dyn CommandContext,
    target: &mut T,
    default_config_file_paths: I,
) -> Result<()>
where
    T: ConfigTarget,
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut loader =
        ConfigLoader::new(context).with_default_config_file_paths(default_config_file_paths);
    let warnings = loader.load(target)?;

    if let Some(file) = loader.config_file() {
        debug!(path = %file.path.display(), "Configuration loaded from file");
    }
    for warning in &warnings {
        warn!("{}", warning);
    }

    Ok(())
}
