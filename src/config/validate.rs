//! Field validation rules.

use crate::error::{ConfigError, Result, SchemaError};
use crate::schema::{FieldDescriptor, Rule};
use crate::source::CommandContext;
use crate::value::{Value, ValueKind};
use std::path::Path;

/// Check every rule declared on `field` against its final value, stopping at
/// the first failure.
pub fn validate(field: &FieldDescriptor, value: &Value, context: &dyn CommandContext) -> Result<()> {
    for rule in &field.rules {
        match rule {
            Rule::Required => {
                if value.is_empty() {
                    return Err(ConfigError::Missing {
                        label: field.label().to_string(),
                        help: format!("{} {} --help", context.app_name(), context.command_name()),
                    });
                }
            }
            Rule::FileExists => {
                let Some(path) = value.as_str() else {
                    return Err(SchemaError::KindMismatch {
                        directive: format!("{} validation", rule),
                        field: field.field.clone(),
                        expected: ValueKind::String,
                        found: value.kind(),
                    }
                    .into());
                };
                if std::fs::metadata(Path::new(path)).is_err() {
                    return Err(ConfigError::NotFound {
                        label: field.label().to_string(),
                        path: path.to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use crate::source::StaticContext;
    use std::fs;
    use tempfile::TempDir;

    fn ctx() -> StaticContext {
        StaticContext::new("agent", "start")
    }

    #[test]
    fn test_required_rejects_empty_value() {
        let field = FieldSpec::new("token")
            .cli("token")
            .label("agent token")
            .validate("required")
            .describe()
            .unwrap();

        let err = validate(&field, &Value::String(String::new()), &ctx()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing agent token. See: `agent start --help`"
        );

        validate(&field, &Value::String("abc".into()), &ctx()).unwrap();
    }

    #[test]
    fn test_required_uses_zero_value_per_kind() {
        let field = FieldSpec::new("spawn").validate("required").describe().unwrap();

        let err = validate(&field, &Value::Int(0), &ctx()).unwrap_err();
        assert!(err.to_string().starts_with("Missing spawn."));
        validate(&field, &Value::Int(2), &ctx()).unwrap();
    }

    #[test]
    fn test_file_exists() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("hook.sh");
        fs::write(&present, "").unwrap();
        let missing = temp.path().join("missing.sh");

        let field = FieldSpec::new("hook")
            .cli("hook-path")
            .validate("file-exists")
            .describe()
            .unwrap();

        validate(&field, &Value::String(present.display().to_string()), &ctx()).unwrap();

        let err = validate(&field, &Value::String(missing.display().to_string()), &ctx())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Could not find hook-path located at {}", missing.display())
        );
    }

    #[test]
    fn test_file_exists_on_non_string_is_schema_error() {
        let field = FieldSpec::new("tags")
            .cli("tags")
            .validate("file-exists")
            .describe()
            .unwrap();

        let err = validate(&field, &Value::List(vec![]), &ctx()).unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn test_rules_stop_at_first_failure() {
        let field = FieldSpec::new("bootstrap")
            .cli("bootstrap-script")
            .validate("required,file-exists")
            .describe()
            .unwrap();

        let err = validate(&field, &Value::String(String::new()), &ctx()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }
}
