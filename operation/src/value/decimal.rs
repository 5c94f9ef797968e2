//! Exact decimal literals

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::ConstraintError;

// Optional sign, integer digits, optional fractional digits
static DECIMAL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?$").ok());

/// An exact decimal number kept as its literal text.
///
/// No arithmetic is offered; the type exists so `decimal` arguments can be
/// told apart from binary floats.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Decimal(String);

impl Decimal {
    /// The literal text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Decimal {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if DECIMAL_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(trimmed))
        {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ConstraintError::Rejected(format!(
                "'{s}' is not a decimal literal"
            )))
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
