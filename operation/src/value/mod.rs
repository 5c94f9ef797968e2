//! Dynamic values carried by arguments and result attributes

mod decimal;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
pub use decimal::Decimal;
use error_stack::Report;
use serde::{Serialize, Serializer};
use strum::IntoStaticStr;

use crate::error::Error;

/// Format used when serializing civil date-times
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A value an operation can receive as an argument or attach to a result.
///
/// The variant set mirrors the built-in type tags, so every tag has exactly one
/// variant it accepts (`enumerable` accepts both `Array` and `Hash`).
#[derive(Clone, Debug, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Value {
    /// Explicit absence
    Null,
    /// `true` or `false`
    Bool(bool),
    /// Signed integer
    Integer(i64),
    /// Binary floating point number
    Float(f64),
    /// Exact decimal literal
    Decimal(Decimal),
    /// Text
    String(String),
    /// Interned-style identifier, distinct from free text
    Symbol(String),
    /// Calendar date
    Date(NaiveDate),
    /// Civil date and time without a zone
    DateTime(NaiveDateTime),
    /// Instant in time
    Time(DateTime<Utc>),
    /// Ordered list
    Array(Vec<Self>),
    /// String keyed map
    Hash(BTreeMap<String, Self>),
    /// An error rescued by `perform`
    Error(Arc<Report<Error>>),
}

impl Value {
    /// Create a symbol value
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Snake case name of the variant, e.g. `"date_time"`
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Whether this is `Null`
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text of a `String` or `Symbol`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Payload of an `Integer`
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Payload of a `Float`
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Payload of a `Bool`
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Items of an `Array`
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Entries of a `Hash`
    pub const fn as_hash(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Hash(map) => Some(map),
            _ => None,
        }
    }

    /// The rescued report held by an `Error`
    pub fn as_error(&self) -> Option<&Report<Error>> {
        match self {
            Self::Error(report) => Some(report),
            _ => None,
        }
    }
}

// Structural equality, errors compare by identity
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::String(a), Self::String(b)) | (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Hash(a), Self::Hash(b)) => a == b,
            (Self::Error(a), Self::Error(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Decimal(d) => serializer.serialize_str(d.as_str()),
            Self::String(s) | Self::Symbol(s) => serializer.serialize_str(s),
            Self::Date(date) => serializer.collect_str(date),
            Self::DateTime(date_time) => {
                serializer.collect_str(&date_time.format(DATE_TIME_FORMAT))
            }
            Self::Time(time) => serializer.serialize_str(&time.to_rfc3339()),
            Self::Array(items) => serializer.collect_seq(items),
            Self::Hash(map) => serializer.collect_map(map),
            Self::Error(report) => serializer.collect_str(report.current_context()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Hash(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Report<Error>> for Value {
    fn from(value: Report<Error>) -> Self {
        Self::Error(Arc::new(value))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_i64().map_or_else(
                || Self::Float(n.as_f64().unwrap_or(f64::NAN)),
                Self::Integer,
            ),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Hash(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}
