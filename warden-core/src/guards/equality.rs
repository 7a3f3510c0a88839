//! Strict, deep and JSON equality guards.

use std::sync::Arc;

use serde_json::Value;

use super::{Candidate, describe, stringify};
use crate::error::{Result, WardenError};
use crate::group::{CheckFn, GuardGroup, Override};
use crate::guard::ensure;

/// The `equality` group.
pub fn group() -> GuardGroup<Candidate> {
    GuardGroup::new("equality")
        .guard("strict_equals", strict_equals)
        .guard("not_strict_equals", not_strict_equals)
        .guard("deep_equals", deep_equals)
        .guard("not_deep_equals", not_deep_equals)
        .guard("json_equals", json_equals)
        .check(
            "deep_equals",
            Override::Replace(Arc::new(check_deep_equals) as CheckFn<Candidate>),
        )
}

/// Identity comparison: primitives compare by value, arrays and objects never match.
pub fn strict_equal(left: &Candidate, right: &Candidate) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(Value::Null), Some(Value::Null)) => true,
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a == b,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a.as_f64() == b.as_f64(),
        (Some(Value::String(a)), Some(Value::String(b))) => a == b,
        _ => false,
    }
}

/// Structural comparison; numbers compare by numeric value.
pub fn deep_equal(left: &Candidate, right: &Candidate) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(a), Some(b)) => deep_equal_values(a, b),
        _ => false,
    }
}

fn deep_equal_values(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| deep_equal_values(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| deep_equal_values(x, y)))
        }
        _ => left == right,
    }
}

fn expected<'a>(guard: &str, args: &'a [Candidate]) -> Result<&'a Candidate> {
    args.first()
        .ok_or_else(|| WardenError::Usage(format!("{guard} requires an expected value")))
}

/// Passes when the candidate is strictly equal to the expected value.
pub fn strict_equals(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let expected = expected("strict_equals", args)?;
    ensure(strict_equal(candidate, expected), failure_message, || {
        format!("{} does not strictly equal {}.", stringify(candidate), stringify(expected))
    })
}

/// Passes when the candidate is not strictly equal to the expected value.
pub fn not_strict_equals(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let expected = expected("not_strict_equals", args)?;
    ensure(!strict_equal(candidate, expected), failure_message, || {
        format!("{} strictly equals {}.", stringify(candidate), stringify(expected))
    })
}

/// Passes when the candidate is structurally equal to the expected value.
pub fn deep_equals(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let expected = expected("deep_equals", args)?;
    ensure(deep_equal(candidate, expected), failure_message, || {
        format!("{} does not deep equal {}.", stringify(candidate), stringify(expected))
    })
}

fn check_deep_equals(candidate: &Candidate, args: &[Candidate]) -> Result<bool> {
    Ok(deep_equal(candidate, expected("deep_equals", args)?))
}

/// Passes when the candidate is not structurally equal to the expected value.
pub fn not_deep_equals(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let expected = expected("not_deep_equals", args)?;
    ensure(!deep_equal(candidate, expected), failure_message, || {
        format!("{} deep equals {}.", stringify(candidate), stringify(expected))
    })
}

/// Passes when both values serialize to the same JSON text.
pub fn json_equals(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let expected = expected("json_equals", args)?;
    let (left, right) = (json_text(candidate)?, json_text(expected)?);
    ensure(left == right, failure_message, || {
        format!("{} does not equal {} as JSON.", describe(candidate), describe(expected))
    })
}

fn json_text(value: &Candidate) -> Result<Option<String>> {
    value.as_ref().map(serde_json::to_string).transpose().map_err(WardenError::from)
}
