#![allow(clippy::unwrap_used, clippy::panic, reason = "tests")]

use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error as ThisError;

use super::*;
use crate::constants::ERROR_ATTRIBUTE;
use crate::error::raise;
use crate::types::{ConstraintError, TypeSpec, TypeTag};
use crate::{ArgumentSet, FieldError, arguments, attributes};

#[derive(Debug, ThisError)]
#[error("{0}")]
struct RuntimeError(&'static str);

#[derive(Debug, ThisError)]
#[error("timed out")]
struct Timeout;

#[derive(Default)]
struct RequiredArguments;

impl Operation for RequiredArguments {
    fn declare(declaration: Declaration) -> Result<Declaration> {
        declaration
            .argument("name", TypeTag::String)?
            .argument("age", TypeTag::Integer)
    }

    fn execute(&self, _arguments: &Arguments) -> Performed {
        self.success(attributes!())
    }
}

#[derive(Default)]
struct OptionalArguments;

impl Operation for OptionalArguments {
    fn declare(declaration: Declaration) -> Result<Declaration> {
        declaration
            .argument("name", "string")?
            .argument("nickname", "optional_string")
    }

    fn execute(&self, arguments: &Arguments) -> Performed {
        let nickname: Option<String> = arguments.extract("nickname")?;
        self.success(attributes! { "nickname" => nickname })
    }
}

#[derive(Default)]
struct Unimplemented;

impl Operation for Unimplemented {}

#[derive(Default)]
struct CatchAllUnimplemented;

impl Operation for CatchAllUnimplemented {
    fn declare(declaration: Declaration) -> Result<Declaration> {
        Ok(declaration.rescue::<Error>())
    }
}

#[derive(Default)]
struct FailingAssertion;

impl Operation for FailingAssertion {
    fn execute(&self, _arguments: &Arguments) -> Performed {
        self.assert(false, "This should always fail.")?;
        self.success(attributes!())
    }
}

#[derive(Default)]
struct PassingAssertion;

impl Operation for PassingAssertion {
    fn execute(&self, _arguments: &Arguments) -> Performed {
        self.assert(true, "This should always pass.")?;
        self.success(attributes!())
    }
}

#[derive(Default)]
struct SuccessResult;

impl Operation for SuccessResult {
    fn execute(&self, _arguments: &Arguments) -> Performed {
        self.success(attributes! { "name" => "Jane Doe", "age" => 42 })
    }
}

#[derive(Default)]
struct FailureResult;

impl Operation for FailureResult {
    fn execute(&self, _arguments: &Arguments) -> Performed {
        self.failure(attributes! { "name" => "Jane Doe", "age" => 42 })
    }
}

#[derive(Default)]
struct ReturnsValue;

impl Operation for ReturnsValue {
    fn execute(&self, _arguments: &Arguments) -> Performed {
        Ok(Output::from(Value::from(42)))
    }
}

#[derive(Default)]
struct RescueFrom;

impl Operation for RescueFrom {
    fn declare(declaration: Declaration) -> Result<Declaration> {
        Ok(declaration.rescue::<RuntimeError>())
    }

    fn execute(&self, _arguments: &Arguments) -> Performed {
        Err(raise(RuntimeError("This should be rescued.")))
    }
}

#[derive(Default)]
struct Unrescued;

impl Operation for Unrescued {
    fn declare(declaration: Declaration) -> Result<Declaration> {
        Ok(declaration.rescue::<RuntimeError>())
    }

    fn execute(&self, _arguments: &Arguments) -> Performed {
        Err(raise(Timeout))
    }
}

static REPORTED: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct ReportError;

impl Operation for ReportError {
    fn declare(declaration: Declaration) -> Result<Declaration> {
        Ok(declaration
            .rescue::<RuntimeError>()
            .report_errors_with(|report| {
                assert!(report.contains::<RuntimeError>());
                REPORTED.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))
    }

    fn execute(&self, _arguments: &Arguments) -> Performed {
        Err(raise(RuntimeError("This should be rescued and reported.")))
    }
}

#[derive(Default)]
struct DelegateFromOperation;

impl Operation for DelegateFromOperation {
    fn execute(&self, _arguments: &Arguments) -> Performed {
        DelegateToOperation::perform_strict(arguments!()).map(Output::from)
    }
}

#[derive(Default)]
struct DelegateToOperation;

impl Operation for DelegateToOperation {
    fn execute(&self, _arguments: &Arguments) -> Performed {
        self.failure(attributes! { "reason" => "inner" })
    }
}

#[derive(Default)]
struct BadDeclaration;

impl Operation for BadDeclaration {
    fn declare(declaration: Declaration) -> Result<Declaration> {
        declaration.argument("age", "integr")
    }

    fn execute(&self, _arguments: &Arguments) -> Performed {
        self.success(attributes!())
    }
}

#[derive(ArgumentSet)]
struct PersonArguments {
    #[argument(string)]
    name:      String,
    #[argument(optional_integer)]
    age:       Option<i64>,
    #[argument(optional_symbol, rename = "role")]
    role_name: Option<String>,
}

#[derive(Default)]
struct Greet;

impl Operation for Greet {
    fn declare(declaration: Declaration) -> Result<Declaration> {
        declaration.arguments::<PersonArguments>()
    }

    fn execute(&self, arguments: &Arguments) -> Performed {
        let PersonArguments {
            name,
            age,
            role_name,
        } = PersonArguments::from_arguments(arguments)?;

        self.success(attributes! {
            "greeting" => format!("Hello, {name}"),
            "age" => age,
            "role" => role_name.unwrap_or_else(|| "guest".to_string()),
        })
    }
}

fn positive_quantity(value: Option<&Value>) -> core::result::Result<Value, ConstraintError> {
    match value.and_then(Value::as_i64) {
        Some(n) if n > 0 => Ok(Value::Integer(n)),
        _ => Err(ConstraintError::Rejected("quantity must be positive".into())),
    }
}

#[derive(Default)]
struct CustomValidator;

impl Operation for CustomValidator {
    fn declare(declaration: Declaration) -> Result<Declaration> {
        declaration.argument("quantity", TypeSpec::custom(positive_quantity))
    }

    fn execute(&self, _arguments: &Arguments) -> Performed {
        self.success(attributes!())
    }
}

fn context<T: std::fmt::Debug>(result: Result<T>) -> Error {
    match result {
        Ok(value) => panic!("expected an error, got {value:?}"),
        Err(report) => match report.current_context() {
            Error::InvalidArgument(message) => Error::InvalidArgument(message.clone()),
            Error::AssertionFailed(message) => Error::AssertionFailed(message.clone()),
            Error::InvalidResult(message) => Error::InvalidResult(message.clone()),
            Error::Failure { result } => Error::Failure {
                result: result.clone(),
            },
            Error::InvalidDeclaration(message) => Error::InvalidDeclaration(message.clone()),
            Error::NotImplemented(message) => Error::NotImplemented(message.clone()),
            Error::Raised { kind } => Error::Raised { kind: *kind },
        },
    }
}

#[test]
fn test_has_a_version_number() {
    assert!(!crate::VERSION.is_empty());
}

#[test]
fn test_requires_execute_to_be_implemented() {
    assert!(matches!(
        context(Unimplemented::perform(arguments!())),
        Error::NotImplemented(message) if message.contains("Unimplemented")
    ));
    assert!(matches!(
        context(Unimplemented::perform_strict(arguments!())),
        Error::NotImplemented(_)
    ));
}

#[test]
fn test_not_implemented_escapes_a_catch_all_rescue() {
    let definition = CatchAllUnimplemented::definition().unwrap();
    assert_eq!(definition.rescue_policy().len(), 1);

    let report = CatchAllUnimplemented::perform(arguments!()).unwrap_err();
    assert!(report.contains::<Error>());
    assert!(matches!(
        report.current_context(),
        Error::NotImplemented(message) if message.contains("CatchAllUnimplemented")
    ));
}

#[test]
fn test_validates_arguments() {
    assert!(
        RequiredArguments::perform_strict(arguments! { "name" => "Jane Doe", "age" => 42 })
            .unwrap()
            .is_success()
    );
    assert!(
        RequiredArguments::perform(arguments! { "name" => "Jane Doe", "age" => 42 })
            .unwrap()
            .is_success()
    );

    for arguments in [
        arguments! { "name" => true, "age" => 42 },
        arguments! { "name" => "Jane Doe" },
        arguments!(),
    ] {
        assert!(matches!(
            context(RequiredArguments::perform_strict(arguments.clone())),
            Error::InvalidArgument(_)
        ));
        assert!(RequiredArguments::perform(arguments).unwrap().is_failure());
    }
}

#[test]
fn test_invalid_argument_failure_carries_the_error() {
    let result = RequiredArguments::perform(arguments! { "name" => true, "age" => 42 }).unwrap();

    assert!(matches!(
        result.error().map(Report::current_context),
        Some(Error::InvalidArgument(message))
            if *message == Error::invalid_value("name", "RequiredArguments").to_string()
    ));
    assert!(result.contains(ERROR_ATTRIBUTE));
}

#[test]
fn test_undeclared_argument_is_rejected() {
    assert!(matches!(
        context(PassingAssertion::perform_strict(arguments! { "extra" => 1 })),
        Error::InvalidArgument(message)
            if message == "Missing type for argument \"extra\" on operation \"PassingAssertion\"."
    ));
    assert!(
        RequiredArguments::perform(arguments! { "name" => "Jane Doe", "age" => 42, "nme" => "x" })
            .unwrap()
            .is_failure()
    );
}

#[test]
fn test_optional_arguments_accept_absence() {
    let absent = OptionalArguments::perform_strict(arguments! { "name" => "Jane Doe" }).unwrap();
    assert_eq!(absent.get("nickname"), Ok(&Value::Null));

    let null = OptionalArguments::perform_strict(arguments! {
        "name" => "Jane Doe",
        "nickname" => Value::Null,
    })
    .unwrap();
    assert!(null.is_success());

    let present =
        OptionalArguments::perform_strict(arguments! { "name" => "Jane Doe", "nickname" => "JD" })
            .unwrap();
    assert_eq!(present.extract::<String>("nickname"), Ok("JD".to_string()));

    assert!(matches!(
        context(OptionalArguments::perform_strict(
            arguments! { "name" => Value::Null }
        )),
        Error::InvalidArgument(_)
    ));
}

#[test]
fn test_validate_arguments_returns_validated_map() {
    let validated =
        OptionalArguments::validate_arguments(&arguments! { "name" => "Jane Doe" }).unwrap();

    assert_eq!(validated.get("name"), Some(&Value::from("Jane Doe")));
    assert_eq!(validated.get("nickname"), Some(&Value::Null));
}

#[test]
fn test_runs_assertions() {
    assert!(matches!(
        context(FailingAssertion::perform_strict(arguments!())),
        Error::AssertionFailed(message) if message == "This should always fail."
    ));
    assert!(FailingAssertion::perform(arguments!()).unwrap().is_failure());
    assert!(PassingAssertion::perform(arguments!()).unwrap().is_success());
}

#[test]
fn test_returns_a_success_result() {
    let result = SuccessResult::perform(arguments!()).unwrap();

    assert!(result.is_success());
    assert_eq!(result.get("name"), Ok(&Value::from("Jane Doe")));
    assert_eq!(result.extract::<i64>("age"), Ok(42));
    assert!(matches!(
        result.get("not_a_method"),
        Err(FieldError::NoSuchField { .. })
    ));
}

#[test]
fn test_returns_a_failure_result() {
    let result = FailureResult::perform(arguments!()).unwrap();

    assert!(result.is_failure());
    assert_eq!(result.get("name"), Ok(&Value::from("Jane Doe")));
    assert_eq!(result.extract::<i64>("age"), Ok(42));
    assert!(matches!(
        result.get("not_a_method"),
        Err(FieldError::NoSuchField { .. })
    ));
    assert!(result.error().is_none());
}

#[test]
fn test_strict_failure_wraps_the_exact_result() {
    match context(FailureResult::perform_strict(arguments!())) {
        Error::Failure { result } => {
            assert_eq!(
                *result,
                OperationResult::failure(attributes! { "name" => "Jane Doe", "age" => 42 })
            );
        }
        other => panic!("expected Failure, got {other:?}"),
    }
}

#[test]
fn test_non_result_output_is_invalid() {
    assert!(matches!(
        context(ReturnsValue::perform_strict(arguments!())),
        Error::InvalidResult(_)
    ));
    assert!(ReturnsValue::perform(arguments!()).unwrap().is_failure());
}

#[test]
fn test_rescues_from_errors_when_calling_perform() {
    let result = RescueFrom::perform(arguments!()).unwrap();
    assert!(result.is_failure());
    assert!(result.error().unwrap().contains::<RuntimeError>());

    let report = RescueFrom::perform_strict(arguments!()).unwrap_err();
    assert!(report.contains::<RuntimeError>());
}

#[test]
fn test_unrescued_errors_propagate_through_perform() {
    let report = Unrescued::perform(arguments!()).unwrap_err();

    assert!(report.contains::<Timeout>());
    assert!(matches!(report.current_context(), Error::Raised { .. }));
}

#[test]
fn test_reports_rescued_errors_when_calling_perform() {
    assert!(ReportError::definition().unwrap().reports_errors());
    assert!(!RescueFrom::definition().unwrap().reports_errors());

    assert!(ReportError::perform(arguments!()).unwrap().is_failure());
    assert_eq!(REPORTED.load(Ordering::SeqCst), 1);
}

#[test]
fn test_delegates_to_other_operations() {
    let result = DelegateFromOperation::perform(arguments!()).unwrap();
    assert!(result.is_failure());
    assert_eq!(result.get("reason"), Ok(&Value::from("inner")));

    match context(DelegateFromOperation::perform_strict(arguments!())) {
        Error::Failure { result } => assert!(result.is_failure()),
        other => panic!("expected Failure, got {other:?}"),
    }
}

#[test]
fn test_declaration_errors_are_not_rescued() {
    assert!(matches!(
        context(BadDeclaration::perform(arguments!())),
        Error::InvalidDeclaration(message)
            if message == "Invalid type provided for argument \"age\"."
    ));
    assert!(matches!(
        context(BadDeclaration::perform_strict(arguments!())),
        Error::InvalidDeclaration(_)
    ));

    let report = BadDeclaration::definition().unwrap_err();
    assert!(!report.current_context().is_operation_error());
}

#[test]
fn test_definition_is_shared() {
    let first = RequiredArguments::definition().unwrap();
    let second = RequiredArguments::definition().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.name(), "RequiredArguments");
    assert_eq!(first.argument_names().collect::<Vec<_>>(), vec!["name", "age"]);
}

#[test]
fn test_argument_set_derive() {
    let definition = Greet::definition().unwrap();
    assert_eq!(
        definition.argument_names().collect::<Vec<_>>(),
        vec!["name", "age", "role"]
    );

    let result = Greet::perform(arguments! {
        "name" => "Jane",
        "role" => Value::symbol("admin"),
    })
    .unwrap();
    assert_eq!(result.extract::<String>("greeting"), Ok("Hello, Jane".to_string()));
    assert_eq!(result.get("age"), Ok(&Value::Null));
    assert_eq!(result.extract::<String>("role"), Ok("admin".to_string()));

    assert!(Greet::perform(arguments! { "name" => "Jane", "role" => "admin" })
        .unwrap()
        .is_failure());
}

#[test]
fn test_custom_validator() {
    assert!(CustomValidator::perform(arguments! { "quantity" => 3 }).unwrap().is_success());

    let report = CustomValidator::perform_strict(arguments! { "quantity" => 0 }).unwrap_err();
    assert!(matches!(report.current_context(), Error::InvalidArgument(_)));
    assert!(report.contains::<ConstraintError>());
}
