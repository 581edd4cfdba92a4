//! Config file access and parsing.
//!
//! A config file is reduced to a flat `key → string` map before any field is
//! resolved. Two syntaxes are understood, picked by extension:
//!
//! - `.yml` / `.yaml`: a YAML mapping of scalars (sequences are joined with `,`)
//! - anything else: dotenv-style `KEY=value` lines, read with `dotenvy`

use super::normalize::expand_home;
use crate::error::{ConfigError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A config file on disk and, once loaded, its parsed contents.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    /// Path as given (may be relative or start with `~`).
    pub path: PathBuf,
    /// Raw file contents, empty until loaded.
    pub contents: String,
    /// Parsed key/value pairs, empty until loaded.
    pub config: BTreeMap<String, String>,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Absolute form of the path, with a leading `~` expanded.
    pub fn absolute_path(&self) -> std::io::Result<PathBuf> {
        let expanded = expand_home(&self.path);
        std::path::absolute(expanded)
    }

    pub fn exists(&self) -> bool {
        self.absolute_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Read the file fully and parse it.
    pub fn load(&mut self) -> Result<()> {
        let path = self.absolute_path().map_err(|source| ConfigError::FileRead {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %path.display(), "Loading config file");

        self.contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::FileRead {
            path: path.clone(),
            source,
        })?;
        self.config = parse(&path, &self.contents)?;

        debug!(path = %path.display(), keys = self.config.len(), "Loaded config file");
        Ok(())
    }

    /// Value for a binding name. Dotenv keys cannot contain `-`, so
    /// `build-path` is also looked up as `build_path`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config
            .get(key)
            .or_else(|| self.config.get(&key.replace('-', "_")))
            .map(String::as_str)
    }
}

/// Parse config file contents according to the file's extension.
pub fn parse(path: &Path, contents: &str) -> Result<BTreeMap<String, String>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "yml" | "yaml" => parse_yaml(contents).map_err(|message| ConfigError::FileParse {
            path: path.to_path_buf(),
            message,
        }),
        _ => parse_key_values(contents).map_err(|message| ConfigError::FileParse {
            path: path.to_path_buf(),
            message,
        }),
    }
}

/// Parse dotenv-style `KEY=value` lines.
///
/// Syntax is whatever `dotenvy` accepts: `#` comments, an optional `export`
/// prefix, single or double quotes, and `$NAME` substitution outside single
/// quotes. Nothing is written to the process environment.
pub fn parse_key_values(contents: &str) -> std::result::Result<BTreeMap<String, String>, String> {
    dotenvy::from_read_iter(contents.as_bytes())
        .map(|item| item.map_err(|e| e.to_string()))
        .collect()
}

/// Parse a flat YAML mapping.
pub fn parse_yaml(contents: &str) -> std::result::Result<BTreeMap<String, String>, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(contents).map_err(|e| e.to_string())?;

    let mapping = match value {
        serde_yaml::Value::Mapping(mapping) => mapping,
        serde_yaml::Value::Null => return Ok(BTreeMap::new()),
        _ => return Err("expected a mapping at the top level".to_string()),
    };

    let mut config = BTreeMap::new();
    for (key, value) in mapping {
        let key = scalar_to_string(&key).ok_or_else(|| "keys must be scalars".to_string())?;
        let value = match &value {
            serde_yaml::Value::Sequence(items) => items
                .iter()
                .map(|item| {
                    scalar_to_string(item)
                        .ok_or_else(|| format!("`{}` must be a list of scalars", key))
                })
                .collect::<std::result::Result<Vec<_>, _>>()?
                .join(","),
            other => scalar_to_string(other)
                .ok_or_else(|| format!("`{}` must be a scalar or a list", key))?,
        };
        config.insert(key, value);
    }

    Ok(config)
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_key_values() {
        let contents = r#"
# agent settings
token="abc123"
name=my-agent
export tags=queue=default,os=linux
build_path='/var/lib/agent/builds'
message="line\none"
"#;
        let config = parse_key_values(contents).unwrap();

        assert_eq!(config["token"], "abc123");
        assert_eq!(config["name"], "my-agent");
        assert_eq!(config["tags"], "queue=default,os=linux");
        assert_eq!(config["build_path"], "/var/lib/agent/builds");
        assert_eq!(config["message"], "line\none");
    }

    #[test]
    fn test_parse_key_values_later_keys_win() {
        let config = parse_key_values("spawn=1\nspawn=2\n").unwrap();
        assert_eq!(config["spawn"], "2");
    }

    #[test]
    fn test_parse_key_values_errors() {
        let err = parse_key_values("a=1\nnot a pair\n").unwrap_err();
        assert!(err.contains("not a pair"), "got: {}", err);

        assert!(parse_key_values("=value").is_err());
        assert!(parse_key_values("token=\"abc").is_err());
    }

    #[test]
    fn test_get_matches_underscored_key() {
        let mut file = ConfigFile::new("agent.cfg");
        file.config = parse_key_values("build_path=/tmp/builds\n").unwrap();

        assert_eq!(file.get("build-path"), Some("/tmp/builds"));
        assert_eq!(file.get("build_path"), Some("/tmp/builds"));
        assert_eq!(file.get("hooks-path"), None);
    }

    #[test]
    fn test_parse_yaml_flattens_scalars_and_lists() {
        let contents = r#"
token: abc123
spawn: 3
debug: true
tags:
  - queue=default
  - os=linux
"#;
        let config = parse_yaml(contents).unwrap();

        assert_eq!(config["token"], "abc123");
        assert_eq!(config["spawn"], "3");
        assert_eq!(config["debug"], "true");
        assert_eq!(config["tags"], "queue=default,os=linux");
    }

    #[test]
    fn test_parse_yaml_rejects_nested_mappings() {
        let err = parse_yaml("server:\n  port: 1\n").unwrap_err();
        assert!(err.contains("server"));
    }

    #[test]
    fn test_load_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("agent.cfg");
        fs::write(&path, "name=from-file\n").unwrap();

        let mut file = ConfigFile::new(&path);
        assert!(file.exists());
        file.load().unwrap();

        assert_eq!(file.get("name"), Some("from-file"));
        assert_eq!(file.contents, "name=from-file\n");
    }

    #[test]
    fn test_load_parse_error_aborts() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("agent.yml");
        fs::write(&path, "- just\n- a list\n").unwrap();

        let mut file = ConfigFile::new(&path);
        let err = file.load().unwrap_err();
        assert!(matches!(err, ConfigError::FileParse { .. }));
    }

    #[test]
    fn test_missing_file_does_not_exist() {
        let temp = TempDir::new().unwrap();
        let file = ConfigFile::new(temp.path().join("nope.cfg"));
        assert!(!file.exists());
        assert!(file.absolute_path().unwrap().is_absolute());
    }
}
