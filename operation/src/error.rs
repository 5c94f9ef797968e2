use std::any::type_name;

use error_stack::Report;
use thiserror::Error;

use crate::constants::{
    MSG_INVALID_PREFIX, MSG_INVALID_RESULT, MSG_MISSING_PREFIX, MSG_NOT_IMPLEMENTED,
};
use crate::result::OperationResult;

/// Result type for the `operation` library
pub type Result<T> = core::result::Result<T, Report<Error>>;

/// Boxed error returned by error reporting hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every error an operation can raise.
///
/// `InvalidArgument`, `AssertionFailed`, `InvalidResult` and `Failure` form the
/// operation error family that `perform` always rescues. `InvalidDeclaration`,
/// `NotImplemented` and `Raised` sit outside that family.
#[derive(Debug, Error)]
pub enum Error {
    /// A declaration or a supplied value did not satisfy the argument registry
    #[error("{0}")]
    InvalidArgument(String),

    /// An `assert` inside an execution method did not hold
    #[error("{0}")]
    AssertionFailed(String),

    /// The execution method returned something other than a result
    #[error("{0}")]
    InvalidResult(String),

    /// The execution method completed and reported failure
    #[error("Operation failed")] // the detail lives in the wrapped result
    Failure {
        /// The failure result returned by the execution method
        result: Box<OperationResult>,
    },

    /// An operation declared an argument type that cannot be resolved
    #[error("{0}")]
    InvalidDeclaration(String),

    /// The execution method was never implemented
    #[error("{0}")]
    NotImplemented(String),

    /// A third-party error raised from inside an execution method
    #[error("Error raised: {kind}")]
    Raised {
        /// Type name of the raised error
        kind: &'static str,
    },
}

impl Error {
    // Builder methods for common patterns

    /// Create a "Missing type for argument" error
    pub fn missing_type(argument: &str, operation: &str) -> Self {
        Self::InvalidArgument(format!(
            "{MSG_MISSING_PREFIX} type for argument \"{argument}\" on operation \"{operation}\"."
        ))
    }

    /// Create an "Invalid value provided for argument" error
    pub fn invalid_value(argument: &str, operation: &str) -> Self {
        Self::InvalidArgument(format!(
            "{MSG_INVALID_PREFIX} value provided for argument \"{argument}\" \
             on operation \"{operation}\"."
        ))
    }

    /// Create an "Invalid type provided for argument" error, raised while declaring
    pub fn invalid_type(argument: &str) -> Self {
        Self::InvalidDeclaration(format!(
            "{MSG_INVALID_PREFIX} type provided for argument \"{argument}\"."
        ))
    }

    /// Create an error for an execution method that returned a non-result value
    pub fn invalid_result() -> Self {
        Self::InvalidResult(MSG_INVALID_RESULT.to_string())
    }

    /// Create an error for an operation without an execution method
    pub fn not_implemented(operation: &str) -> Self {
        Self::NotImplemented(format!("{MSG_NOT_IMPLEMENTED} (operation \"{operation}\")"))
    }

    /// Wrap a failure result
    pub fn failure(result: OperationResult) -> Self {
        Self::Failure {
            result: Box::new(result),
        }
    }

    /// Context used when lifting a third-party error of type `E`
    pub fn raised<E>() -> Self {
        Self::Raised {
            kind: type_name::<E>(),
        }
    }

    /// Whether this error belongs to the operation error family.
    pub const fn is_operation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::AssertionFailed(_)
                | Self::InvalidResult(_)
                | Self::Failure { .. }
        )
    }

    /// The wrapped result when this is a `Failure`
    pub fn failure_result(&self) -> Option<&OperationResult> {
        match self {
            Self::Failure { result } => Some(result),
            _ => None,
        }
    }
}

/// Lift a third-party error into a report, keeping the original as the root frame.
///
/// Rescue policies match against that root frame, so an operation that declared
/// `rescue::<E>()` will have this report converted into a failure result.
pub fn raise<E>(error: E) -> Report<Error>
where
    E: std::error::Error + Send + Sync + 'static,
{
    Report::new(error).change_context(Error::raised::<E>())
}

/// Extension trait to lift `Result<T, E>` into the crate's `Result<T>`
pub trait RaiseExt<T> {
    /// Lift the error side with [`raise`]
    ///
    /// # Errors
    /// Returns the original error wrapped as [`Error::Raised`].
    fn raise(self) -> Result<T>;
}

impl<T, E> RaiseExt<T> for core::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn raise(self) -> Result<T> {
        self.map_err(raise)
    }
}
