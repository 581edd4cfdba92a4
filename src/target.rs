//! Config targets: structs whose fields the loader fills in.
//!
//! Implement [`ConfigTarget`] with the [`config_target!`] macro, which pairs
//! each struct field with its [`FieldSpec`](crate::FieldSpec) directives and
//! generates field access by name:
//!
//! ```
//! use agent_cliconfig::{config_target, ConfigTarget, Value};
//!
//! #[derive(Default)]
//! struct AnnotateConfig {
//!     body: String,
//!     style: String,
//!     append: bool,
//! }
//!
//! config_target! {
//!     AnnotateConfig {
//!         body.cli("arg:0").env("AGENT_ANNOTATION_BODY"),
//!         style.cli("style").validate("required"),
//!         append.cli("append"),
//!     }
//! }
//!
//! let mut cfg = AnnotateConfig::default();
//! cfg.set_field("style", Value::String("info".into())).unwrap();
//! assert_eq!(cfg.style, "info");
//! assert_eq!(AnnotateConfig::fields().len(), 3);
//! ```

use crate::error::AssignError;
use crate::schema::FieldSpec;
use crate::value::Value;

/// A struct that can be populated by the config loader.
pub trait ConfigTarget {
    /// Field declarations, in declaration order.
    fn fields() -> Vec<FieldSpec>
    where
        Self: Sized;

    /// Current value of a field, or `None` if the field does not exist.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Store a value into a field.
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), AssignError>;
}

/// Implement [`ConfigTarget`] for a struct from a list of field declarations.
///
/// Each entry is a field name optionally followed by a chain of
/// [`FieldSpec`](crate::FieldSpec) builder calls. Field types must implement
/// [`FieldValue`](crate::FieldValue).
#[macro_export]
macro_rules! config_target {
    ($ty:ty { $( $field:ident $( . $directive:ident ( $( $arg:expr ),* ) )* ),* $(,)? }) => {
        impl $crate::ConfigTarget for $ty {
            fn fields() -> ::std::vec::Vec<$crate::FieldSpec> {
                ::std::vec![
                    $( $crate::FieldSpec::new(stringify!($field)) $( . $directive ( $( $arg ),* ) )* ),*
                ]
            }

            fn get_field(&self, name: &str) -> ::std::option::Option<$crate::Value> {
                match name {
                    $( stringify!($field) => ::std::option::Option::Some(
                        $crate::FieldValue::to_value(&self.$field),
                    ), )*
                    _ => ::std::option::Option::None,
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::Value,
            ) -> ::std::result::Result<(), $crate::AssignError> {
                match name {
                    $( stringify!($field) => {
                        self.$field = $crate::FieldValue::from_value(value)?;
                        ::std::result::Result::Ok(())
                    } )*
                    _ => ::std::result::Result::Err($crate::AssignError::UnknownField(
                        name.to_string(),
                    )),
                }
            }
        }
    };
}
