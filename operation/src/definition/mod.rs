//! Declaring and validating an operation's arguments
//!
//! A [`Declaration`] is the builder an operation fills in once: argument types,
//! rescued error kinds and an optional error reporting hook. [`Declaration::build`]
//! freezes it into a [`Definition`], which is what `perform` consults on every
//! call.

mod rescue;

use std::fmt;
use std::sync::Arc;

use error_stack::Report;
use itertools::Itertools;
pub use rescue::{Rescue, RescuePolicy};

use crate::arguments::{ArgumentSet, Arguments};
use crate::attributes;
use crate::constants::ERROR_ATTRIBUTE;
use crate::error::{BoxError, Error, Result};
use crate::result::OperationResult;
use crate::types::{TypeDescriptor, TypeSpec};

/// Hook invoked with every error `perform` rescues
pub type ErrorReporter =
    Arc<dyn Fn(&Report<Error>) -> core::result::Result<(), BoxError> + Send + Sync>;

/// Builder for a [`Definition`]
pub struct Declaration {
    name:          &'static str,
    arguments:     Vec<(String, TypeDescriptor)>,
    rescue_policy: RescuePolicy,
    reporter:      Option<ErrorReporter>,
}

impl Declaration {
    /// Start declaring the operation called `name`
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            arguments: Vec::new(),
            rescue_policy: RescuePolicy::new(),
            reporter: None,
        }
    }

    /// Declare an argument; a later declaration of the same name replaces the earlier one
    ///
    /// # Errors
    /// Returns [`Error::InvalidDeclaration`] when `spec` names an unknown type.
    pub fn argument(mut self, name: impl Into<String>, spec: impl Into<TypeSpec>) -> Result<Self> {
        let name = name.into();
        let descriptor = spec
            .into()
            .resolve(&name)
            .map_err(|report| report.attach(format!("Operation: {}", self.name)))?;

        if let Some(slot) = self
            .arguments
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            slot.1 = descriptor;
        } else {
            self.arguments.push((name, descriptor));
        }
        Ok(self)
    }

    /// Declare every argument of an [`ArgumentSet`]
    ///
    /// # Errors
    /// Returns [`Error::InvalidDeclaration`] when the set declares an unknown type.
    pub fn arguments<A: ArgumentSet>(self) -> Result<Self> {
        A::declare(self)
    }

    /// Convert errors carrying an `E` frame into failure results in `perform`
    #[must_use]
    pub fn rescue<E: Send + Sync + 'static>(mut self) -> Self {
        self.rescue_policy.push(Rescue::of::<E>());
        self
    }

    /// Invoke `reporter` with every error `perform` rescues
    ///
    /// Reporting is best effort: an `Err` from the hook is logged and ignored.
    #[must_use]
    pub fn report_errors_with<F>(mut self, reporter: F) -> Self
    where
        F: Fn(&Report<Error>) -> core::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.reporter = Some(Arc::new(reporter));
        self
    }

    /// Freeze the declaration
    pub fn build(self) -> Definition {
        Definition {
            name:          self.name,
            arguments:     self.arguments,
            rescue_policy: self.rescue_policy,
            reporter:      self.reporter,
        }
    }
}

/// The frozen configuration of one operation type
#[derive(Clone)]
pub struct Definition {
    name:          &'static str,
    arguments:     Vec<(String, TypeDescriptor)>,
    rescue_policy: RescuePolicy,
    reporter:      Option<ErrorReporter>,
}

impl Definition {
    /// Operation name used in error messages
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type for `name`
    pub fn argument_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.arguments
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, descriptor)| descriptor)
    }

    /// Declared names in declaration order
    pub fn argument_names(&self) -> impl Iterator<Item = &str> {
        self.arguments.iter().map(|(name, _)| name.as_str())
    }

    /// Kinds rescued on top of the operation error family
    pub const fn rescue_policy(&self) -> &RescuePolicy {
        &self.rescue_policy
    }

    /// Whether an error reporting hook was declared
    pub const fn reports_errors(&self) -> bool {
        self.reporter.is_some()
    }

    /// Check `arguments` against every declared name and every supplied name.
    ///
    /// A supplied name without a declaration fails the same way a declared name
    /// with no type would, so typos never pass silently.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for the first name that has no type or
    /// whose value is rejected.
    pub fn validate(&self, arguments: &Arguments) -> Result<Arguments> {
        let mut validated = Arguments::new();

        for name in self.argument_names().chain(arguments.names()).unique() {
            let Some(descriptor) = self.argument_type(name) else {
                return Err(Report::new(Error::missing_type(name, self.name)));
            };

            let value = descriptor.validate(arguments.get(name)).map_err(|constraint| {
                Report::new(constraint).change_context(Error::invalid_value(name, self.name))
            })?;

            tracing::trace!(
                operation = self.name,
                argument = name,
                kind = value.kind(),
                "argument accepted"
            );
            validated.insert(name, value);
        }

        Ok(validated)
    }

    /// Whether `perform` catches `report`: the operation error family plus the
    /// rescue policy. `NotImplemented` is never caught.
    pub fn rescues(&self, report: &Report<Error>) -> bool {
        let context = report.current_context();
        if matches!(context, Error::NotImplemented(_)) {
            return false;
        }
        context.is_operation_error() || self.rescue_policy.matches(report)
    }

    /// Normalize an error from `perform_strict` into a failure result.
    ///
    /// A `Failure` yields the result it wraps; any other rescued error yields a
    /// new failure carrying the report under [`ERROR_ATTRIBUTE`].
    ///
    /// # Errors
    /// Returns `report` unchanged when it is not rescued.
    pub fn rescue(&self, report: Report<Error>) -> Result<OperationResult> {
        if !self.rescues(&report) {
            return Err(report);
        }

        self.report_error(&report);

        if let Some(result) = report.current_context().failure_result() {
            tracing::debug!(operation = self.name, "operation returned a failure result");
            return Ok(result.clone());
        }

        tracing::warn!(
            operation = self.name,
            error = %report.current_context(),
            "rescued error converted to failure result"
        );
        Ok(OperationResult::failure(attributes! { ERROR_ATTRIBUTE => report }))
    }

    fn report_error(&self, report: &Report<Error>) {
        let Some(reporter) = &self.reporter else {
            return;
        };
        if let Err(e) = reporter(report) {
            tracing::warn!(operation = self.name, "Error reporter failed: {e}");
        }
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .field("rescue_policy", &self.rescue_policy)
            .field("reporter", &self.reporter.as_ref().map(|_| "<dyn Fn>"))
            .finish()
    }
}
