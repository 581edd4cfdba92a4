//! Deprecated and renamed field handling.

use super::normalize;
use crate::error::{ConfigError, Result, SchemaError};
use crate::schema::{FieldDescriptor, FieldSpec};
use crate::source::Environment;
use crate::target::ConfigTarget;

/// Carry a deprecated field's value over to its replacement and collect
/// deprecation warnings.
///
/// Only fields whose value is non-empty after their own normalization are
/// considered. Setting both a renamed field and its replacement is an error.
/// The replacement must be declared before the renamed field, so that its
/// own resolution has already run when the value is copied.
pub fn migrate(
    target: &mut dyn ConfigTarget,
    field: &FieldDescriptor,
    specs: &[FieldSpec],
    env: &dyn Environment,
    warnings: &mut Vec<String>,
) -> Result<()> {
    if field.renamed_to.is_none() && field.deprecated.is_none() {
        return Ok(());
    }

    let replacement = match &field.renamed_to {
        Some(renamed_to) => Some(replacement_for(field, renamed_to, specs)?),
        None => None,
    };

    let mut value = target
        .get_field(&field.field)
        .ok_or_else(|| SchemaError::UnknownField(field.field.clone()))?;
    if let Some(normalization) = field.normalization {
        value = normalize::apply(normalization, field, value, env)?;
    }
    if value.is_empty() {
        return Ok(());
    }

    if let Some(replacement) = replacement {
        let current = target
            .get_field(&replacement.field)
            .ok_or_else(|| SchemaError::UnknownField(replacement.field.clone()))?;

        if !current.is_empty() {
            return Err(ConfigError::RenameConflict {
                deprecated: field.display_name().to_string(),
                deprecated_value: value.to_string(),
                replacement: replacement.display_name().to_string(),
                replacement_value: current.to_string(),
            });
        }

        let copied = match replacement.normalization {
            Some(normalization) => normalize::apply(normalization, &replacement, value.clone(), env)?,
            None => value.clone(),
        };
        target
            .set_field(&replacement.field, copied)
            .map_err(|source| ConfigError::Assign {
                field: replacement.field.clone(),
                value: value.to_string(),
                source,
            })?;

        warnings.push(format!(
            "The config option `{}` has been renamed to `{}`. Please update your configuration.",
            field.display_name(),
            replacement.display_name()
        ));
    }

    if let Some(message) = &field.deprecated {
        warnings.push(format!(
            "The config option `{}` has been deprecated: {}",
            field.display_name(),
            message
        ));
    }

    Ok(())
}

fn replacement_for(
    field: &FieldDescriptor,
    renamed_to: &str,
    specs: &[FieldSpec],
) -> Result<FieldDescriptor> {
    let position = |name: &str| specs.iter().position(|spec| spec.name() == name);

    let replacement_at =
        position(renamed_to).ok_or_else(|| SchemaError::UnknownField(renamed_to.to_string()))?;
    let field_at =
        position(&field.field).ok_or_else(|| SchemaError::UnknownField(field.field.clone()))?;
    if replacement_at > field_at {
        return Err(SchemaError::RenameOrder {
            field: field.field.clone(),
            replacement: renamed_to.to_string(),
        }
        .into());
    }

    Ok(specs[replacement_at].describe()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_target;
    use crate::source::MapEnv;

    #[derive(Debug, Default)]
    struct Legacy {
        spawn: i64,
        workers: i64,
        tags: Vec<String>,
        meta_data: Vec<String>,
        no_pty: bool,
    }

    config_target! {
        Legacy {
            spawn.cli("spawn"),
            workers.cli("workers").renamed_to("spawn"),
            tags.cli("tags").normalize("list"),
            meta_data.cli("meta-data").renamed_to("tags"),
            no_pty.cli("no-pty").deprecated("PTY mode is always used now"),
        }
    }

    fn descriptor(name: &str) -> FieldDescriptor {
        Legacy::fields()
            .into_iter()
            .find(|spec| spec.name() == name)
            .unwrap()
            .describe()
            .unwrap()
    }

    #[test]
    fn test_renamed_value_moves_to_replacement() {
        let mut cfg = Legacy {
            workers: 5,
            ..Default::default()
        };
        let mut warnings = Vec::new();

        migrate(
            &mut cfg,
            &descriptor("workers"),
            &Legacy::fields(),
            &MapEnv::new(),
            &mut warnings,
        )
        .unwrap();

        assert_eq!(cfg.spawn, 5);
        assert_eq!(
            warnings,
            vec![
                "The config option `workers` has been renamed to `spawn`. Please update your configuration."
            ]
        );
    }

    #[test]
    fn test_renamed_and_replacement_both_set_conflict() {
        let mut cfg = Legacy {
            workers: 5,
            spawn: 6,
            ..Default::default()
        };
        let mut warnings = Vec::new();

        let err = migrate(
            &mut cfg,
            &descriptor("workers"),
            &Legacy::fields(),
            &MapEnv::new(),
            &mut warnings,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Can't set config option `workers=5` because `spawn=6` has already been set"
        );
        assert_eq!(cfg.spawn, 6);
    }

    #[test]
    fn test_empty_renamed_value_is_ignored() {
        let mut cfg = Legacy {
            spawn: 2,
            ..Default::default()
        };
        let mut warnings = Vec::new();

        migrate(
            &mut cfg,
            &descriptor("workers"),
            &Legacy::fields(),
            &MapEnv::new(),
            &mut warnings,
        )
        .unwrap();

        assert_eq!(cfg.spawn, 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_copied_value_uses_replacement_normalization() {
        let mut cfg = Legacy {
            meta_data: vec!["queue=a,os=linux".into()],
            ..Default::default()
        };
        let mut warnings = Vec::new();

        migrate(
            &mut cfg,
            &descriptor("meta_data"),
            &Legacy::fields(),
            &MapEnv::new(),
            &mut warnings,
        )
        .unwrap();

        assert_eq!(cfg.tags, vec!["queue=a", "os=linux"]);
    }

    #[test]
    fn test_deprecated_field_only_warns() {
        let mut cfg = Legacy {
            no_pty: true,
            ..Default::default()
        };
        let mut warnings = Vec::new();

        migrate(
            &mut cfg,
            &descriptor("no_pty"),
            &Legacy::fields(),
            &MapEnv::new(),
            &mut warnings,
        )
        .unwrap();

        assert!(cfg.no_pty);
        assert_eq!(
            warnings,
            vec!["The config option `no-pty` has been deprecated: PTY mode is always used now"]
        );
    }

    #[test]
    fn test_rename_to_unknown_field_is_schema_error() {
        let mut cfg = Legacy {
            workers: 1,
            ..Default::default()
        };
        let field = FieldSpec::new("workers")
            .cli("workers")
            .renamed_to("nonexistent")
            .describe()
            .unwrap();

        let err = migrate(
            &mut cfg,
            &field,
            &Legacy::fields(),
            &MapEnv::new(),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(err.is_schema_error());
    }

    #[derive(Debug, Default)]
    struct Misordered {
        workers: i64,
        spawn: i64,
    }

    config_target! {
        Misordered {
            workers.cli("workers").renamed_to("spawn"),
            spawn.cli("spawn"),
        }
    }

    #[test]
    fn test_replacement_declared_after_renamed_field_is_schema_error() {
        let mut cfg = Misordered {
            workers: 5,
            ..Default::default()
        };
        let field = Misordered::fields()[0].describe().unwrap();

        let err = migrate(
            &mut cfg,
            &field,
            &Misordered::fields(),
            &MapEnv::new(),
            &mut Vec::new(),
        )
        .unwrap_err();

        assert!(err.is_schema_error());
        assert_eq!(
            err.to_string(),
            "`workers` is renamed to `spawn`, which must be declared before it"
        );
        assert_eq!(cfg.spawn, 0);
    }

    #[test]
    fn test_renamed_value_empty_after_normalization_is_ignored() {
        let mut cfg = Legacy {
            tags: vec!["queue=a".into()],
            meta_data: vec![String::new()],
            ..Default::default()
        };
        let field = FieldSpec::new("meta_data")
            .cli("meta-data")
            .normalize("list")
            .renamed_to("tags")
            .describe()
            .unwrap();
        let mut warnings = Vec::new();

        migrate(&mut cfg, &field, &Legacy::fields(), &MapEnv::new(), &mut warnings).unwrap();

        assert_eq!(cfg.tags, vec!["queue=a"]);
        assert!(warnings.is_empty());
    }
}
