//! Declarative field metadata.
//!
//! Each configurable field is declared with a [`FieldSpec`] holding its
//! directives as written (`cli("arg:0")`, `normalize("filepath")`,
//! `validate("required,file-exists")`). The loader turns a `FieldSpec` into a typed
//! [`FieldDescriptor`] before touching the field, so a bad directive surfaces
//! as a [`SchemaError`] instead of silently doing nothing.

use crate::error::SchemaError;
use std::fmt;
use std::str::FromStr;

const POSITIONAL_PREFIX: &str = "arg:";

/// Where a field's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Positional command-line argument by index (`arg:<index>`).
    Positional(usize),
    /// Named flag, also used as the config file key.
    Named(String),
}

impl FromStr for Binding {
    type Err = SchemaError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.strip_prefix(POSITIONAL_PREFIX) {
            Some(index) => index
                .parse::<usize>()
                .map(Binding::Positional)
                .map_err(|_| SchemaError::InvalidBinding(raw.to_string())),
            None if raw.is_empty() => Err(SchemaError::InvalidBinding(raw.to_string())),
            None => Ok(Binding::Named(raw.to_string())),
        }
    }
}

/// Post-resolution transform applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    FilePath,
    CommandPath,
    List,
}

impl FromStr for Normalization {
    type Err = SchemaError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "filepath" => Ok(Normalization::FilePath),
            "commandpath" => Ok(Normalization::CommandPath),
            "list" => Ok(Normalization::List),
            other => Err(SchemaError::UnknownNormalization(other.to_string())),
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Normalization::FilePath => write!(f, "filepath"),
            Normalization::CommandPath => write!(f, "commandpath"),
            Normalization::List => write!(f, "list"),
        }
    }
}

/// Validation rule checked against the final value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    FileExists,
}

impl FromStr for Rule {
    type Err = SchemaError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "required" => Ok(Rule::Required),
            "file-exists" => Ok(Rule::FileExists),
            other => Err(SchemaError::UnknownRule(other.to_string())),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "required"),
            Rule::FileExists => write!(f, "file-exists"),
        }
    }
}

/// Directives for one config field, as declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    cli: Option<String>,
    env: Option<String>,
    label: Option<String>,
    normalize: Option<String>,
    validate: Option<String>,
    deprecated: Option<String>,
    renamed_to: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Flag / config-file key, or `arg:<index>` for a positional argument.
    pub fn cli(mut self, binding: impl Into<String>) -> Self {
        self.cli = Some(binding.into());
        self
    }

    /// Environment variable consulted when a positional argument is absent.
    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env = Some(var.into());
        self
    }

    /// Human-readable name used in validation errors.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn normalize(mut self, normalization: impl Into<String>) -> Self {
        self.normalize = Some(normalization.into());
        self
    }

    /// Comma-separated validation rules, checked in order.
    pub fn validate(mut self, rules: impl Into<String>) -> Self {
        self.validate = Some(rules.into());
        self
    }

    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecated = Some(message.into());
        self
    }

    /// Mark this field as superseded by another field of the same target.
    pub fn renamed_to(mut self, field: impl Into<String>) -> Self {
        self.renamed_to = Some(field.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw binding name, if the field has one.
    pub fn binding_name(&self) -> Option<&str> {
        self.cli.as_deref()
    }

    /// Parse the declared directives into a typed descriptor.
    pub fn describe(&self) -> Result<FieldDescriptor, SchemaError> {
        let binding: Option<Binding> = self.cli.as_deref().map(str::parse).transpose()?;
        let normalization: Option<Normalization> =
            self.normalize.as_deref().map(str::parse).transpose()?;

        let rules = match self.validate.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|rule| !rule.is_empty())
                .map(str::parse)
                .collect::<Result<Vec<Rule>, _>>()?,
            None => Vec::new(),
        };

        Ok(FieldDescriptor {
            field: self.name.clone(),
            binding_name: self.cli.clone(),
            binding,
            env_var: self.env.clone(),
            label: self.label.clone(),
            normalization,
            rules,
            deprecated: self.deprecated.clone(),
            renamed_to: self.renamed_to.clone(),
        })
    }
}

/// Typed view of a [`FieldSpec`], recomputed on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field: String,
    pub binding_name: Option<String>,
    pub binding: Option<Binding>,
    pub env_var: Option<String>,
    pub label: Option<String>,
    pub normalization: Option<Normalization>,
    pub rules: Vec<Rule>,
    pub deprecated: Option<String>,
    pub renamed_to: Option<String>,
}

impl FieldDescriptor {
    /// Label for error messages: declared label, else binding name, else
    /// the raw field name.
    pub fn label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.binding_name.as_deref())
            .unwrap_or(&self.field)
    }

    /// Name to show the user when talking about this option.
    pub fn display_name(&self) -> &str {
        self.binding_name.as_deref().unwrap_or(&self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_parse() {
        assert_eq!("arg:0".parse::<Binding>().unwrap(), Binding::Positional(0));
        assert_eq!("arg:12".parse::<Binding>().unwrap(), Binding::Positional(12));
        assert_eq!(
            "build-path".parse::<Binding>().unwrap(),
            Binding::Named("build-path".into())
        );
        assert!(matches!(
            "arg:x".parse::<Binding>(),
            Err(SchemaError::InvalidBinding(_))
        ));
        assert!("".parse::<Binding>().is_err());
    }

    #[test]
    fn test_describe_parses_directives() {
        let spec = FieldSpec::new("bootstrap_script")
            .cli("bootstrap-script")
            .normalize("commandpath")
            .validate("required, file-exists");
        let desc = spec.describe().unwrap();

        assert_eq!(desc.binding, Some(Binding::Named("bootstrap-script".into())));
        assert_eq!(desc.normalization, Some(Normalization::CommandPath));
        assert_eq!(desc.rules, vec![Rule::Required, Rule::FileExists]);
    }

    #[test]
    fn test_describe_rejects_unknown_directives() {
        let err = FieldSpec::new("x").normalize("uppercase").describe().unwrap_err();
        assert_eq!(err, SchemaError::UnknownNormalization("uppercase".into()));

        let err = FieldSpec::new("x").validate("required,shiny").describe().unwrap_err();
        assert_eq!(err, SchemaError::UnknownRule("shiny".into()));
    }

    #[test]
    fn test_label_preference() {
        let labelled = FieldSpec::new("token").cli("token").label("agent token");
        assert_eq!(labelled.describe().unwrap().label(), "agent token");

        let bound = FieldSpec::new("token").cli("token");
        assert_eq!(bound.describe().unwrap().label(), "token");

        let bare = FieldSpec::new("Token");
        assert_eq!(bare.describe().unwrap().label(), "Token");
    }
}
