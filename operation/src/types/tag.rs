//! Built-in type tags

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::{ConstraintError, Validate};
use crate::value::Value;

/// Built-in argument types, addressable by their snake case name
/// Entries come in pairs: a strict tag and its `optional_` counterpart
#[derive(
    Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, IntoStaticStr, PartialEq,
)]
#[strum(serialize_all = "snake_case")]
pub enum TypeTag {
    /// Accepts `Value::Symbol`
    Symbol,
    /// Accepts `Value::Bool`
    Bool,
    /// Accepts `Value::Integer`
    Integer,
    /// Accepts `Value::Float`
    Float,
    /// Accepts `Value::Decimal`
    Decimal,
    /// Accepts `Value::String`
    String,
    /// Accepts `Value::Date`
    Date,
    /// Accepts `Value::DateTime`
    DateTime,
    /// Accepts `Value::Time`
    Time,
    /// Accepts `Value::Array`
    Array,
    /// Accepts `Value::Hash`
    Hash,
    /// Accepts `Value::Array` or `Value::Hash`
    Enumerable,
    /// `symbol` or absent
    OptionalSymbol,
    /// `bool` or absent
    OptionalBool,
    /// `integer` or absent
    OptionalInteger,
    /// `float` or absent
    OptionalFloat,
    /// `decimal` or absent
    OptionalDecimal,
    /// `string` or absent
    OptionalString,
    /// `date` or absent
    OptionalDate,
    /// `date_time` or absent
    OptionalDateTime,
    /// `time` or absent
    OptionalTime,
    /// `array` or absent
    OptionalArray,
    /// `hash` or absent
    OptionalHash,
    /// `enumerable` or absent
    OptionalEnumerable,
}

impl TypeTag {
    /// Whether absent and `Null` values are accepted
    pub const fn is_optional(self) -> bool {
        self.base_pair().1
    }

    /// The strict tag this one is built on; strict tags return themselves
    pub const fn base(self) -> Self {
        self.base_pair().0
    }

    /// Name of the tag as used in declarations
    pub fn name(self) -> &'static str {
        self.into()
    }

    const fn base_pair(self) -> (Self, bool) {
        match self {
            Self::OptionalSymbol => (Self::Symbol, true),
            Self::OptionalBool => (Self::Bool, true),
            Self::OptionalInteger => (Self::Integer, true),
            Self::OptionalFloat => (Self::Float, true),
            Self::OptionalDecimal => (Self::Decimal, true),
            Self::OptionalString => (Self::String, true),
            Self::OptionalDate => (Self::Date, true),
            Self::OptionalDateTime => (Self::DateTime, true),
            Self::OptionalTime => (Self::Time, true),
            Self::OptionalArray => (Self::Array, true),
            Self::OptionalHash => (Self::Hash, true),
            Self::OptionalEnumerable => (Self::Enumerable, true),
            strict => (strict, false),
        }
    }

    /// Whether a present, non-null value has the shape this tag requires
    fn accepts(self, value: &Value) -> bool {
        match (self.base(), value) {
            (Self::Symbol, Value::Symbol(_))
            | (Self::Bool, Value::Bool(_))
            | (Self::Integer, Value::Integer(_))
            | (Self::Float, Value::Float(_))
            | (Self::Decimal, Value::Decimal(_))
            | (Self::String, Value::String(_))
            | (Self::Date, Value::Date(_))
            | (Self::DateTime, Value::DateTime(_))
            | (Self::Time, Value::Time(_))
            | (Self::Array | Self::Enumerable, Value::Array(_))
            | (Self::Hash | Self::Enumerable, Value::Hash(_)) => true,
            _ => false,
        }
    }
}

impl Validate for TypeTag {
    fn validate(&self, value: Option<&Value>) -> Result<Value, ConstraintError> {
        match value {
            None | Some(Value::Null) if self.is_optional() => Ok(Value::Null),
            None | Some(Value::Null) => Err(ConstraintError::Missing),
            Some(value) if self.accepts(value) => Ok(value.clone()),
            Some(value) => Err(ConstraintError::Mismatch {
                expected: self.name(),
                found:    value.kind(),
            }),
        }
    }
}
