//! Rescue policy

use std::any::type_name;
use std::fmt;

use error_stack::Report;

use crate::error::Error;

/// One error kind an operation opted into rescuing
#[derive(Clone, Copy)]
pub struct Rescue {
    kind:    &'static str,
    matches: fn(&Report<Error>) -> bool,
}

impl Rescue {
    /// Rescue any report that carries an `E` frame
    pub fn of<E: Send + Sync + 'static>() -> Self {
        Self {
            kind:    type_name::<E>(),
            matches: contains::<E>,
        }
    }

    /// Type name of the rescued kind
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Whether `report` is of this kind
    pub fn matches(&self, report: &Report<Error>) -> bool {
        (self.matches)(report)
    }
}

fn contains<E: Send + Sync + 'static>(report: &Report<Error>) -> bool {
    report.contains::<E>()
}

impl fmt::Debug for Rescue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rescue").field(&self.kind).finish()
    }
}

/// Error kinds an operation wants converted into failure results, on top of
/// the operation error family which is always rescued
///
/// Append only; membership is all that matters.
#[derive(Clone, Debug, Default)]
pub struct RescuePolicy {
    rescues: Vec<Rescue>,
}

impl RescuePolicy {
    /// Empty policy
    pub const fn new() -> Self {
        Self {
            rescues: Vec::new(),
        }
    }

    /// Add a kind
    pub fn push(&mut self, rescue: Rescue) {
        self.rescues.push(rescue);
    }

    /// Whether any registered kind matches `report`
    pub fn matches(&self, report: &Report<Error>) -> bool {
        self.rescues.iter().any(|rescue| rescue.matches(report))
    }

    /// Registered kinds in declaration order
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rescues.iter().map(Rescue::kind)
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.rescues.len()
    }

    /// Whether no kind was registered
    pub fn is_empty(&self) -> bool {
        self.rescues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use thiserror::Error as ThisError;

    use super::*;
    use crate::error::raise;

    #[derive(Debug, ThisError)]
    #[error("runtime error")]
    struct RuntimeError;

    #[derive(Debug, ThisError)]
    #[error("timeout")]
    struct Timeout;

    #[test]
    fn test_matches_raised_kind() {
        let mut policy = RescuePolicy::default();
        policy.push(Rescue::of::<RuntimeError>());

        assert!(policy.matches(&raise(RuntimeError)));
        assert!(!policy.matches(&raise(Timeout)));
        assert!(!policy.matches(&Report::new(Error::not_implemented("Op"))));
    }

    #[test]
    fn test_kinds_in_order() {
        let mut policy = RescuePolicy::default();
        policy.push(Rescue::of::<RuntimeError>());
        policy.push(Rescue::of::<Timeout>());

        let kinds: Vec<_> = policy.kinds().collect();
        assert_eq!(kinds.len(), 2);
        assert!(kinds[0].ends_with("RuntimeError"));
        assert!(kinds[1].ends_with("Timeout"));
    }
}
