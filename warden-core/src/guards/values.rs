//! Value membership and emptiness guards.

use serde_json::Value;

use super::equality::deep_equal;
use super::{Candidate, array_arg, describe, stringify};
use crate::error::{Result, WardenError};
use crate::group::GuardGroup;
use crate::guard::ensure;

/// The `values` group.
pub fn group() -> GuardGroup<Candidate> {
    GuardGroup::new("values")
        .guard("is_in", is_in)
        .guard("is_not_in", is_not_in)
        .guard("has_value", has_value)
        .guard("lacks_value", lacks_value)
        .guard("is_empty", is_empty)
        .guard("is_not_empty", is_not_empty)
}

fn listed(candidate: &Candidate, list: &[Value]) -> bool {
    list.iter()
        .any(|item| deep_equal(candidate, &Some(item.clone())))
}

/// Values held by an array or an object.
fn held_values(candidate: &Candidate) -> Option<Vec<&Value>> {
    match candidate {
        Some(Value::Array(items)) => Some(items.iter().collect()),
        Some(Value::Object(map)) => Some(map.values().collect()),
        _ => None,
    }
}

fn holds(candidate: &Candidate, needle: &Candidate) -> bool {
    held_values(candidate).is_some_and(|values| {
        values
            .into_iter()
            .any(|value| deep_equal(&Some(value.clone()), needle))
    })
}

fn needle<'a>(guard: &str, args: &'a [Candidate]) -> Result<&'a Candidate> {
    args.first()
        .ok_or_else(|| WardenError::Usage(format!("{guard} requires a value to look for")))
}

/// Passes when the candidate deep-equals an entry of the array given as the first extra argument.
pub fn is_in(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let list = array_arg("is_in", args, 0, "a list of values")?;
    ensure(listed(candidate, list), failure_message, || {
        format!("{} is not in {}.", describe(candidate), stringify(&args[0]))
    })
}

/// Passes when the candidate deep-equals no entry of the given array.
pub fn is_not_in(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let list = array_arg("is_not_in", args, 0, "a list of values")?;
    ensure(!listed(candidate, list), failure_message, || {
        format!("{} is in {}.", describe(candidate), stringify(&args[0]))
    })
}

/// Passes when the candidate array or object holds the first extra argument.
pub fn has_value(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let needle = needle("has_value", args)?;
    ensure(holds(candidate, needle), failure_message, || {
        format!("{} does not have value {}.", describe(candidate), stringify(needle))
    })
}

/// Passes when the candidate does not hold the first extra argument.
pub fn lacks_value(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let needle = needle("lacks_value", args)?;
    ensure(!holds(candidate, needle), failure_message, || {
        format!("{} has value {}.", describe(candidate), stringify(needle))
    })
}

fn empty(candidate: &Candidate) -> Option<bool> {
    match candidate {
        Some(Value::String(text)) => Some(text.is_empty()),
        Some(Value::Array(items)) => Some(items.is_empty()),
        Some(Value::Object(map)) => Some(map.is_empty()),
        _ => None,
    }
}

/// Passes for an empty string, array or object.
pub fn is_empty(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(empty(candidate) == Some(true), failure_message, || {
        format!("{} is not empty.", stringify(candidate))
    })
}

/// Passes for a non-empty string, array or object.
pub fn is_not_empty(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(empty(candidate) == Some(false), failure_message, || {
        format!("{} is empty or has no length.", stringify(candidate))
    })
}
