//! Success and failure results

use std::collections::BTreeMap;

use error_stack::{Report, ResultExt};
use json_pretty_compact::PrettyCompactFormatter;
use serde::{Serialize, Serializer};
use strum::Display;
use thiserror::Error;

use crate::arguments::FromValue;
use crate::constants::ERROR_ATTRIBUTE;
use crate::error::{self, Error};
use crate::value::Value;

/// Named values carried by a result
pub type Attributes = BTreeMap<String, Value>;

/// Result status types
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResultStatus {
    /// The operation did what it was asked to
    Success,
    /// The operation reported failure
    Failure,
}

/// Raised when reading an attribute that a result does not carry
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// No attribute with this name exists
    #[error("no such field `{field}` on {status} result (available: {available:?})")]
    NoSuchField {
        /// The requested name
        field:     String,
        /// Status of the result that was read
        status:    ResultStatus,
        /// Names the result does carry
        available: Vec<String>,
    },

    /// The attribute exists but has a different type
    #[error("field `{field}` cannot be read as {expected}: {reason}")]
    WrongType {
        /// The requested name
        field:    String,
        /// Rust type that was requested
        expected: &'static str,
        /// Why conversion failed
        reason:   String,
    },
}

/// Immutable outcome of an operation
///
/// Attributes are fixed at construction and read by name; reading a name that
/// is not present is a [`FieldError`], never a silent `Null`.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationResult {
    status:     ResultStatus,
    attributes: Attributes,
}

impl OperationResult {
    /// Create a success result
    pub const fn success(attributes: Attributes) -> Self {
        Self {
            status: ResultStatus::Success,
            attributes,
        }
    }

    /// Create a failure result
    pub const fn failure(attributes: Attributes) -> Self {
        Self {
            status: ResultStatus::Failure,
            attributes,
        }
    }

    /// Success or failure
    pub const fn status(&self) -> ResultStatus {
        self.status
    }

    /// Whether this is a success result
    pub const fn is_success(&self) -> bool {
        matches!(self.status, ResultStatus::Success)
    }

    /// Whether this is a failure result
    pub const fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Read an attribute
    ///
    /// # Errors
    /// Returns [`FieldError::NoSuchField`] when the result does not carry `name`.
    pub fn get(&self, name: &str) -> Result<&Value, FieldError> {
        self.attributes
            .get(name)
            .ok_or_else(|| FieldError::NoSuchField {
                field:     name.to_string(),
                status:    self.status,
                available: self.attributes.keys().cloned().collect(),
            })
    }

    /// Read an attribute as a Rust type
    ///
    /// # Errors
    /// Returns [`FieldError::NoSuchField`] when `name` is absent and
    /// [`FieldError::WrongType`] when it cannot be converted.
    pub fn extract<T: FromValue>(&self, name: &str) -> Result<T, FieldError> {
        let value = self.get(name)?;
        T::from_value(Some(value)).map_err(|constraint| FieldError::WrongType {
            field:    name.to_string(),
            expected: std::any::type_name::<T>(),
            reason:   constraint.to_string(),
        })
    }

    /// Whether the result carries `name`
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// All attributes
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Consume the result, keeping its attributes
    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    /// The error rescued by `perform`, if this failure was built from one
    pub fn error(&self) -> Option<&Report<Error>> {
        self.attributes.get(ERROR_ATTRIBUTE).and_then(Value::as_error)
    }

    /// Render as JSON, arrays kept compact
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> error::Result<String> {
        let mut buf = Vec::new();
        let formatter = PrettyCompactFormatter::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);

        self.serialize(&mut ser).map_err(|e| {
            Report::new(Error::InvalidResult(format!(
                "Failed to serialize result: {e}"
            )))
        })?;

        String::from_utf8(buf).change_context(Error::InvalidResult(
            "Failed to convert JSON bytes to string".to_string(),
        ))
    }
}

impl Serialize for OperationResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("OperationResult", 2)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("attributes", &self.attributes)?;
        state.end()
    }
}
