//! # Operation
//!
//! Command objects for business logic. An operation declares the types of the
//! arguments it accepts, validates them before running, and reports its outcome
//! as a success or failure [`OperationResult`] carrying named attributes.
//!
//! Every operation can be invoked two ways:
//!
//! - [`Operation::perform_strict`] fails fast: invalid arguments, failed
//!   assertions, failure results and raised errors all come back as `Err`.
//! - [`Operation::perform`] converts every rescued error into a failure result,
//!   so callers branch on [`OperationResult::is_success`] instead.
//!
//! ```ignore
//! use operation::{Arguments, Declaration, Operation, Performed, Result, TypeTag, attributes};
//!
//! #[derive(Default)]
//! struct Register;
//!
//! impl Operation for Register {
//!     fn declare(declaration: Declaration) -> Result<Declaration> {
//!         declaration
//!             .argument("name", TypeTag::String)?
//!             .argument("age", TypeTag::Integer)
//!     }
//!
//!     fn execute(&self, arguments: &Arguments) -> Performed {
//!         let age: i64 = arguments.extract("age")?;
//!         self.assert(age >= 0, "age must not be negative")?;
//!         self.success(attributes! { "adult" => age >= 18 })
//!     }
//! }
//! ```

extern crate self as operation;

mod arguments;
pub mod constants;
mod definition;
mod error;
mod perform;
mod result;
mod types;
mod value;

pub use arguments::{ArgumentSet, Arguments, FromValue};
pub use definition::{Declaration, Definition, ErrorReporter, Rescue, RescuePolicy};
pub use error::{BoxError, Error, RaiseExt, Result, raise};
/// Derive [`ArgumentSet`] for a struct whose fields carry `#[argument(<type tag>)]`
pub use operation_macros::ArgumentSet;
pub use perform::{Operation, Output, Performed};
pub use result::{Attributes, FieldError, OperationResult, ResultStatus};
pub use types::{ConstraintError, TypeDescriptor, TypeSpec, TypeTag, Validate};
pub use value::{Decimal, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
