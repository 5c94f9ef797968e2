//! The `Operation` trait and its two entry points
//!
//! `perform_strict` is the fail-fast surface: every failure, including a failure
//! result, comes back as an `Err`. `perform` wraps it and turns every rescued
//! error into a failure [`OperationResult`]; only `NotImplemented` and kinds
//! outside the rescue policy still come back as `Err`.

mod registry;
#[cfg(test)]
mod tests;

use std::any::type_name;
use std::sync::Arc;

use error_stack::Report;

use crate::arguments::Arguments;
use crate::definition::{Declaration, Definition};
use crate::error::{Error, Result};
use crate::result::{Attributes, OperationResult};
use crate::value::Value;

/// What an execution method hands back
#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    /// A success or failure result, the only valid output
    Result(OperationResult),
    /// Anything else; rejected with `InvalidResult`
    Value(Value),
}

impl From<OperationResult> for Output {
    fn from(result: OperationResult) -> Self {
        Self::Result(result)
    }
}

impl From<Value> for Output {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<()> for Output {
    fn from((): ()) -> Self {
        Self::Value(Value::Null)
    }
}

/// Return type of [`Operation::execute`]
pub type Performed = Result<Output>;

/// A unit of business logic with declared arguments and a success/failure result
///
/// ```ignore
/// #[derive(Default)]
/// struct Greet;
///
/// impl Operation for Greet {
///     fn declare(declaration: Declaration) -> Result<Declaration> {
///         declaration.argument("name", TypeTag::String)
///     }
///
///     fn execute(&self, arguments: &Arguments) -> Performed {
///         let name: String = arguments.extract("name")?;
///         self.success(attributes! { "greeting" => format!("Hello, {name}") })
///     }
/// }
///
/// let result = Greet::perform(arguments! { "name" => "Jane" })?;
/// ```
pub trait Operation: Default + Sized + 'static {
    /// Name used in error messages, the unqualified type name by default
    fn name() -> &'static str {
        short_type_name::<Self>()
    }

    /// Declare argument types, rescued kinds and the error reporting hook
    ///
    /// # Errors
    /// Returns [`Error::InvalidDeclaration`] when an argument type cannot be resolved.
    fn declare(declaration: Declaration) -> Result<Declaration> {
        Ok(declaration)
    }

    /// The operation's logic; must produce a result through
    /// [`success`](Self::success) or [`failure`](Self::failure)
    ///
    /// # Errors
    /// Whatever the logic raises. Without an override, [`Error::NotImplemented`].
    fn execute(&self, _arguments: &Arguments) -> Performed {
        Err(Report::new(Error::not_implemented(Self::name())))
    }

    /// The frozen definition, declared on first use
    ///
    /// # Errors
    /// Returns the error raised by [`declare`](Self::declare).
    fn definition() -> Result<Arc<Definition>> {
        registry::definition_for::<Self>()
    }

    /// Validate `arguments` against the declared types
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for a missing type or a rejected value.
    fn validate_arguments(arguments: &Arguments) -> Result<Arguments> {
        Self::definition()?.validate(arguments)
    }

    /// Validate, execute, and return the success result
    ///
    /// # Errors
    /// - [`Error::InvalidDeclaration`] when the operation's declaration is invalid
    /// - [`Error::InvalidArgument`] when validation fails, before executing
    /// - [`Error::Failure`] wrapping the result when execution reports failure
    /// - [`Error::InvalidResult`] when execution does not return a result
    /// - anything execution itself raises
    fn perform_strict(arguments: Arguments) -> Result<OperationResult> {
        let definition = Self::definition()?;
        perform_with::<Self>(&definition, &arguments)
    }

    /// Like [`perform_strict`](Self::perform_strict), with rescued errors
    /// converted into failure results
    ///
    /// # Errors
    /// Returns [`Error::InvalidDeclaration`], [`Error::NotImplemented`] and errors
    /// outside the rescue policy.
    fn perform(arguments: Arguments) -> Result<OperationResult> {
        let definition = Self::definition()?;
        perform_with::<Self>(&definition, &arguments).or_else(|report| definition.rescue(report))
    }

    /// Build a success output
    ///
    /// # Errors
    /// Never fails; returns `Result` so it can end an execution method.
    fn success(&self, attributes: Attributes) -> Performed {
        Ok(Output::Result(OperationResult::success(attributes)))
    }

    /// Build a failure output
    ///
    /// # Errors
    /// Never fails; returns `Result` so it can end an execution method.
    fn failure(&self, attributes: Attributes) -> Performed {
        Ok(Output::Result(OperationResult::failure(attributes)))
    }

    /// Check an invariant of the operation's own logic
    ///
    /// # Errors
    /// Returns [`Error::AssertionFailed`] with `message` when `condition` is false.
    fn assert(&self, condition: bool, message: impl Into<String>) -> Result<()> {
        if condition {
            Ok(())
        } else {
            Err(Report::new(Error::AssertionFailed(message.into())))
        }
    }
}

fn perform_with<O: Operation>(
    definition: &Definition,
    arguments: &Arguments,
) -> Result<OperationResult> {
    definition.validate(arguments)?;

    tracing::debug!(operation = definition.name(), "Performing operation");

    match O::default().execute(arguments)? {
        Output::Result(result) if result.is_success() => Ok(result),
        Output::Result(result) => Err(Report::new(Error::failure(result))
            .attach(format!("Operation: {}", definition.name()))),
        Output::Value(value) => Err(Report::new(Error::invalid_result()).attach(format!(
            "Operation \"{}\" returned a {} value",
            definition.name(),
            value.kind()
        ))),
    }
}

/// Last path segment of a type name, generics stripped
fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
