//! Procedural macros for the `operation` crate

mod argument_set;

use proc_macro::TokenStream;

/// Derives `operation::ArgumentSet` for a struct with named fields.
///
/// Each field carries `#[argument(<type tag>)]`, where the tag is one of the
/// snake case names of `operation::TypeTag`. The argument takes the field's
/// name unless `rename = "..."` is given.
///
/// # Example
///
/// ```ignore
/// #[derive(ArgumentSet)]
/// struct Person {
///     #[argument(string)]
///     name: String,
///     #[argument(optional_integer, rename = "years")]
///     age:  Option<i64>,
/// }
/// ```
///
/// This will generate:
///
/// ```ignore
/// impl ::operation::ArgumentSet for Person {
///     fn declare(declaration: Declaration) -> Result<Declaration> {
///         declaration
///             .argument("name", TypeTag::String)?
///             .argument("years", TypeTag::OptionalInteger)
///     }
///
///     fn from_arguments(arguments: &Arguments) -> Result<Self> {
///         Ok(Self {
///             name: arguments.extract("name")?,
///             age:  arguments.extract("years")?,
///         })
///     }
/// }
/// ```
#[proc_macro_derive(ArgumentSet, attributes(argument))]
pub fn derive_argument_set(input: TokenStream) -> TokenStream {
    argument_set::derive_argument_set_impl(input)
}
