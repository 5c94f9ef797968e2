//! Type constraint provider
//!
//! Argument types are validators: given a value, or its absence, they return the
//! accepted value or a [`ConstraintError`]. The built-in table is [`TypeTag`];
//! any [`Validate`] implementation can stand in for a tag.

mod tag;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use tag::TypeTag;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::value::Value;

/// Raised by a validator when a value does not satisfy its type
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConstraintError {
    /// No value was supplied for a type that requires one
    #[error("value is missing")]
    Missing,

    /// The value has the wrong shape
    #[error("expected {expected}, found {found}")]
    Mismatch {
        /// Name of the expected type
        expected: &'static str,
        /// Kind of the supplied value
        found:    &'static str,
    },

    /// A custom validator refused the value
    #[error("{0}")]
    Rejected(String),
}

/// Validate-and-coerce capability every argument type exposes
pub trait Validate: Send + Sync {
    /// Check `value`, `None` meaning the argument was not supplied
    ///
    /// # Errors
    /// Returns a [`ConstraintError`] when the value is not acceptable.
    fn validate(&self, value: Option<&Value>) -> core::result::Result<Value, ConstraintError>;
}

impl<F> Validate for F
where
    F: Fn(Option<&Value>) -> core::result::Result<Value, ConstraintError> + Send + Sync,
{
    fn validate(&self, value: Option<&Value>) -> core::result::Result<Value, ConstraintError> {
        self(value)
    }
}

/// A resolved argument type as stored in a definition
#[derive(Clone)]
pub enum TypeDescriptor {
    /// One of the built-in tags
    Tag(TypeTag),
    /// A caller supplied validator
    Custom(Arc<dyn Validate>),
}

impl TypeDescriptor {
    /// Run the validator
    ///
    /// # Errors
    /// Returns the validator's [`ConstraintError`].
    pub fn validate(&self, value: Option<&Value>) -> core::result::Result<Value, ConstraintError> {
        match self {
            Self::Tag(tag) => tag.validate(value),
            Self::Custom(validator) => validator.validate(value),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").field(&"<dyn Validate>").finish(),
        }
    }
}

/// What a declaration accepts as an argument type
pub enum TypeSpec {
    /// A built-in tag
    Tag(TypeTag),
    /// A tag name such as `"optional_string"`, resolved when declared
    Named(String),
    /// A custom validator
    Custom(Arc<dyn Validate>),
}

impl TypeSpec {
    /// Wrap a custom validator
    pub fn custom(validator: impl Validate + 'static) -> Self {
        Self::Custom(Arc::new(validator))
    }

    /// Resolve to a descriptor; unknown tag names fail at declaration time
    ///
    /// # Errors
    /// Returns [`Error::InvalidDeclaration`] when a named tag is not in the table.
    pub fn resolve(self, argument: &str) -> Result<TypeDescriptor> {
        match self {
            Self::Tag(tag) => Ok(TypeDescriptor::Tag(tag)),
            Self::Named(name) => TypeTag::from_str(&name)
                .map(TypeDescriptor::Tag)
                .map_err(|_| {
                    error_stack::Report::new(Error::invalid_type(argument))
                        .attach(format!("Unknown type tag: {name}"))
                }),
            Self::Custom(validator) => Ok(TypeDescriptor::Custom(validator)),
        }
    }
}

impl From<TypeTag> for TypeSpec {
    fn from(tag: TypeTag) -> Self {
        Self::Tag(tag)
    }
}

impl From<&str> for TypeSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for TypeSpec {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;

    fn positive(value: Option<&Value>) -> core::result::Result<Value, ConstraintError> {
        match value.and_then(Value::as_i64) {
            Some(n) if n > 0 => Ok(Value::Integer(n)),
            _ => Err(ConstraintError::Rejected("must be a positive integer".into())),
        }
    }

    #[test]
    fn test_resolve_named_tag() {
        let descriptor = TypeSpec::from("integer").resolve("age").unwrap();
        assert!(matches!(descriptor, TypeDescriptor::Tag(TypeTag::Integer)));
    }

    #[test]
    fn test_resolve_unknown_name_fails_fast() {
        let report = TypeSpec::from("integr").resolve("age").unwrap_err();
        assert_eq!(
            report.current_context().to_string(),
            "Invalid type provided for argument \"age\"."
        );
    }

    #[test]
    fn test_custom_validator() {
        let descriptor = TypeSpec::custom(positive).resolve("count").unwrap();

        assert_eq!(
            descriptor.validate(Some(&Value::Integer(3))),
            Ok(Value::Integer(3))
        );
        assert!(descriptor.validate(Some(&Value::Integer(-3))).is_err());
        assert!(descriptor.validate(None).is_err());
    }
}
