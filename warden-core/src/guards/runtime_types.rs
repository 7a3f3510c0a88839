//! Runtime type guards.

use serde_json::Value;

use super::{Candidate, describe, string_arg};
use crate::error::{Result, WardenError};
use crate::group::GuardGroup;
use crate::guard::ensure;

/// Type names accepted by `is_runtime_type`.
pub const RUNTIME_TYPES: [&str; 7] = [
    "undefined", "null", "boolean", "number", "string", "array", "object",
];

/// The `runtime_types` group.
pub fn group() -> GuardGroup<Candidate> {
    GuardGroup::new("runtime_types")
        .guard("is_string", is_string)
        .guard("is_number", is_number)
        .guard("is_integer", is_integer)
        .guard("is_boolean", is_boolean)
        .guard("is_array", is_array)
        .guard("is_object", is_object)
        .guard("is_runtime_type", is_runtime_type)
}

/// The runtime type name of a candidate.
pub fn type_name(candidate: &Candidate) -> &'static str {
    match candidate {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

fn ensure_type(candidate: &Candidate, expected: &str, failure_message: Option<&str>) -> Result<()> {
    ensure(type_name(candidate) == expected, failure_message, || {
        format!(
            "{} is of type '{}', not '{expected}'.",
            describe(candidate),
            type_name(candidate)
        )
    })
}

/// Passes for strings.
pub fn is_string(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure_type(candidate, "string", failure_message)
}

/// Passes for numbers.
pub fn is_number(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure_type(candidate, "number", failure_message)
}

/// Passes for numbers without a fractional part.
pub fn is_integer(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let integral = match candidate {
        Some(Value::Number(number)) => {
            number.is_i64() || number.is_u64() || number.as_f64().is_some_and(|n| n.fract() == 0.0)
        }
        _ => false,
    };
    ensure(integral, failure_message, || {
        format!("{} is not an integer.", describe(candidate))
    })
}

/// Passes for booleans.
pub fn is_boolean(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure_type(candidate, "boolean", failure_message)
}

/// Passes for arrays.
pub fn is_array(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure_type(candidate, "array", failure_message)
}

/// Passes for objects; arrays and null are not objects.
pub fn is_object(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure_type(candidate, "object", failure_message)
}

/// Passes when the candidate's type is the name given as the first extra argument.
pub fn is_runtime_type(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let expected = string_arg("is_runtime_type", args, 0, "a type name")?;
    if !RUNTIME_TYPES.contains(&expected) {
        return Err(WardenError::Usage(format!(
            "unknown runtime type '{expected}', expected one of {}",
            RUNTIME_TYPES.join(", ")
        )));
    }
    ensure_type(candidate, expected, failure_message)
}

#[cfg(test)]
mod tests {
    use super::{is_integer, is_object, is_runtime_type, is_string, type_name};
    use crate::error::WardenError;
    use serde_json::json;

    #[test]
    fn type_names_distinguish_null_and_arrays() {
        assert_eq!(type_name(&None), "undefined");
        assert_eq!(type_name(&Some(json!(null))), "null");
        assert_eq!(type_name(&Some(json!([]))), "array");
        assert!(is_object(&Some(json!([])), &[], None).is_err());
        assert!(is_object(&Some(json!({})), &[], None).is_ok());
    }

    #[test]
    fn integers_include_whole_floats() {
        assert!(is_integer(&Some(json!(3)), &[], None).is_ok());
        assert!(is_integer(&Some(json!(3.0)), &[], None).is_ok());
        assert!(is_integer(&Some(json!(3.5)), &[], None).is_err());
    }

    #[test]
    fn runtime_type_by_name() {
        match is_string(&Some(json!(5)), &[], None) {
            Err(WardenError::Assertion(err)) => {
                assert_eq!(err.message(), "5 is of type 'number', not 'string'.");
            }
            other => panic!("expected assertion error, got {other:?}"),
        }
        assert!(is_runtime_type(&Some(json!(true)), &[Some(json!("boolean"))], None).is_ok());
        assert!(matches!(
            is_runtime_type(&Some(json!(true)), &[Some(json!("bigint"))], None),
            Err(WardenError::Usage(_))
        ));
    }
}
