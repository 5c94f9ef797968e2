//! Supplied arguments and typed extraction

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use error_stack::Report;

use crate::definition::Declaration;
use crate::error::{Error, Result};
use crate::types::ConstraintError;
use crate::value::{Decimal, Value};

/// Build [`Arguments`] from `name => value` pairs
///
/// ```ignore
/// let arguments = arguments! { "name" => "Jane Doe", "age" => 42 };
/// ```
#[macro_export]
macro_rules! arguments {
    () => {
        $crate::Arguments::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::Arguments::new()$(.with($name, $value))+
    };
}

/// Build [`Attributes`](crate::Attributes) from `name => value` pairs
#[macro_export]
macro_rules! attributes {
    () => {
        $crate::Attributes::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut attributes = $crate::Attributes::new();
        $(attributes.insert(::std::string::String::from($name), $crate::Value::from($value));)+
        attributes
    }};
}

/// Named values supplied by the caller of an operation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments(BTreeMap<String, Value>);

impl Arguments {
    /// Empty argument map
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Value supplied for `name`, `None` when the key is absent
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether `name` was supplied
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Supplied names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of supplied values
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was supplied
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extract a typed value for `name`
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] when the value cannot be converted.
    pub fn extract<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.get(name)).map_err(|constraint| {
            Report::new(constraint).change_context(Error::InvalidArgument(format!(
                "Unable to extract argument \"{name}\" as {}",
                std::any::type_name::<T>()
            )))
        })
    }

    /// Build arguments from a JSON object
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] when `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(name, value)| (name, Value::from(value)))
                .collect()),
            serde_json::Value::Null => Ok(Self::new()),
            other => Err(Report::new(Error::InvalidArgument(format!(
                "Arguments must be a JSON object, found {other}"
            )))),
        }
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Arguments {
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;
    type Item = (String, Value);

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Conversion from an optional [`Value`] into a Rust type
pub trait FromValue: Sized {
    /// Convert, `None` meaning the key was absent
    ///
    /// # Errors
    /// Returns a [`ConstraintError`] when the value has the wrong shape.
    fn from_value(value: Option<&Value>) -> core::result::Result<Self, ConstraintError>;
}

/// Implements `FromValue` for a type held by exactly one `Value` variant
macro_rules! from_value_variant {
    ($ty:ty, $variant:ident, $expected:literal) => {
        impl FromValue for $ty {
            fn from_value(value: Option<&Value>) -> core::result::Result<Self, ConstraintError> {
                match value {
                    Some(Value::$variant(inner)) => Ok(inner.clone()),
                    None | Some(Value::Null) => Err(ConstraintError::Missing),
                    Some(other) => Err(ConstraintError::Mismatch {
                        expected: $expected,
                        found:    other.kind(),
                    }),
                }
            }
        }
    };
}

from_value_variant!(bool, Bool, "bool");
from_value_variant!(i64, Integer, "integer");
from_value_variant!(f64, Float, "float");
from_value_variant!(Decimal, Decimal, "decimal");
from_value_variant!(NaiveDate, Date, "date");
from_value_variant!(NaiveDateTime, DateTime, "date_time");
from_value_variant!(DateTime<Utc>, Time, "time");
from_value_variant!(Vec<Value>, Array, "array");
from_value_variant!(BTreeMap<String, Value>, Hash, "hash");

impl FromValue for String {
    fn from_value(value: Option<&Value>) -> core::result::Result<Self, ConstraintError> {
        match value {
            Some(Value::String(inner) | Value::Symbol(inner)) => Ok(inner.clone()),
            None | Some(Value::Null) => Err(ConstraintError::Missing),
            Some(other) => Err(ConstraintError::Mismatch {
                expected: "string",
                found:    other.kind(),
            }),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Option<&Value>) -> core::result::Result<Self, ConstraintError> {
        Ok(value.cloned().unwrap_or(Self::Null))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Option<&Value>) -> core::result::Result<Self, ConstraintError> {
        match value {
            None | Some(Value::Null) => Ok(None),
            present => T::from_value(present).map(Some),
        }
    }
}

/// A typed set of arguments, usually derived with `#[derive(ArgumentSet)]`
///
/// ```ignore
/// #[derive(ArgumentSet)]
/// struct Person {
///     #[argument(string)]
///     name: String,
///     #[argument(optional_integer)]
///     age:  Option<i64>,
/// }
/// ```
pub trait ArgumentSet: Sized {
    /// Add this set's arguments to a declaration
    ///
    /// # Errors
    /// Returns [`Error::InvalidDeclaration`] when a declared type cannot be resolved.
    fn declare(declaration: Declaration) -> Result<Declaration>;

    /// Extract the set from supplied arguments
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] when a value cannot be converted.
    fn from_arguments(arguments: &Arguments) -> Result<Self>;
}
