//! Post-resolution value normalization.

use crate::error::{ConfigError, Result, SchemaError};
use crate::schema::{FieldDescriptor, Normalization};
use crate::source::Environment;
use crate::value::{Value, ValueKind};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Apply `normalization` to a field's value.
///
/// A normalization declared on a field of the wrong kind is a schema error.
pub fn apply(
    normalization: Normalization,
    field: &FieldDescriptor,
    value: Value,
    env: &dyn Environment,
) -> Result<Value> {
    let expected = match normalization {
        Normalization::FilePath | Normalization::CommandPath => ValueKind::String,
        Normalization::List => ValueKind::List,
    };

    let io_err = |source: std::io::Error| ConfigError::Normalize {
        field: field.field.clone(),
        source,
    };

    match (normalization, value) {
        (Normalization::FilePath, Value::String(path)) => {
            file_path(&path).map(Value::String).map_err(io_err)
        }
        (Normalization::CommandPath, Value::String(command)) => {
            command_path(&command, env).map(Value::String).map_err(io_err)
        }
        (Normalization::List, Value::List(items)) => Ok(Value::List(list(items))),
        (_, other) => Err(SchemaError::KindMismatch {
            directive: format!("{} normalization", normalization),
            field: field.field.clone(),
            expected,
            found: other.kind(),
        }
        .into()),
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Make a path absolute, resolving symlinks when it exists.
///
/// Empty input stays empty.
pub fn file_path(value: &str) -> std::io::Result<String> {
    if value.is_empty() {
        return Ok(String::new());
    }

    let expanded = expand_home(Path::new(value));
    let normalized = if expanded.exists() {
        dunce::canonicalize(&expanded)?
    } else {
        std::path::absolute(&expanded)?
    };
    Ok(normalized.to_string_lossy().into_owned())
}

/// Resolve a command to the path it would be invoked from.
///
/// A value naming an existing file is normalized as a file path. Otherwise
/// the first word is looked up on `PATH` and any trailing arguments are
/// kept. Commands that cannot be found are returned unchanged.
pub fn command_path(value: &str, env: &dyn Environment) -> std::io::Result<String> {
    if value.is_empty() {
        return Ok(String::new());
    }

    if Path::new(value).is_file() {
        return file_path(value);
    }

    let (program, rest) = match value.split_once(char::is_whitespace) {
        Some((program, rest)) => (program, Some(rest)),
        None => (value, None),
    };

    let resolved = if Path::new(program).components().count() > 1 || Path::new(program).is_file()
    {
        Path::new(program)
            .is_file()
            .then(|| file_path(program))
            .transpose()?
    } else {
        find_executable(program, env)
            .map(|path| dunce::canonicalize(&path))
            .transpose()?
            .map(|path| path.to_string_lossy().into_owned())
    };

    let Some(resolved) = resolved else {
        debug!(command = %program, "Command not found; leaving as given");
        return Ok(value.to_string());
    };

    Ok(match rest {
        Some(rest) => format!("{} {}", resolved, rest),
        None => resolved,
    })
}

fn find_executable(program: &str, env: &dyn Environment) -> Option<PathBuf> {
    let path_var = env.var("PATH")?;
    let extensions = executable_extensions(env);

    std::env::split_paths(&OsString::from(path_var))
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| {
            extensions
                .iter()
                .map(move |ext| dir.join(format!("{}{}", program, ext)))
        })
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn executable_extensions(env: &dyn Environment) -> Vec<String> {
    let mut extensions = vec![String::new()];
    let pathext = env
        .var("PATHEXT")
        .unwrap_or_else(|| ".COM;.EXE;.BAT;.CMD".to_string());
    extensions.extend(
        pathext
            .split(';')
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_ascii_lowercase()),
    );
    extensions
}

#[cfg(not(windows))]
fn executable_extensions(_env: &dyn Environment) -> Vec<String> {
    vec![String::new()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Split every item on commas, dropping empty pieces.
pub fn list(items: Vec<String>) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.split(','))
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
