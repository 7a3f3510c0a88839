//! Object key and length guards.

use serde_json::Value;

use super::{Candidate, array_arg, describe, number_arg, string_arg};
use crate::error::{Result, WardenError};
use crate::group::GuardGroup;
use crate::guard::ensure;

/// The `keys` group.
pub fn group() -> GuardGroup<Candidate> {
    GuardGroup::new("keys")
        .guard("has_key", has_key)
        .guard("lacks_key", lacks_key)
        .guard("has_keys", has_keys)
        .guard("is_length_at_least", is_length_at_least)
        .guard("is_length_exactly", is_length_exactly)
}

fn contains_key(candidate: &Candidate, key: &str) -> bool {
    match candidate {
        Some(Value::Object(map)) => map.contains_key(key),
        _ => false,
    }
}

/// Length of a string (in characters), array or object.
fn length_of(candidate: &Candidate) -> Option<usize> {
    match candidate {
        Some(Value::String(text)) => Some(text.chars().count()),
        Some(Value::Array(items)) => Some(items.len()),
        Some(Value::Object(map)) => Some(map.len()),
        _ => None,
    }
}

fn length_arg(guard: &str, args: &[Candidate]) -> Result<usize> {
    let length = number_arg(guard, args, 0, "a length")?;
    if length < 0.0 || length.fract() != 0.0 || !length.is_finite() {
        return Err(WardenError::Usage(format!(
            "{guard} requires a non-negative integer length, got {length}"
        )));
    }
    Ok(length as usize)
}

/// Passes when the candidate is an object with the key given as the first extra argument.
pub fn has_key(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let key = string_arg("has_key", args, 0, "a key")?;
    ensure(contains_key(candidate, key), failure_message, || {
        format!("{} does not have key '{key}'.", describe(candidate))
    })
}

/// Passes when the candidate is not an object with the given key.
pub fn lacks_key(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let key = string_arg("lacks_key", args, 0, "a key")?;
    ensure(!contains_key(candidate, key), failure_message, || {
        format!("{} has key '{key}'.", describe(candidate))
    })
}

/// Passes when the candidate is an object with every key in the array given
/// as the first extra argument.
pub fn has_keys(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let keys = array_arg("has_keys", args, 0, "a list of keys")?
        .iter()
        .map(|key| {
            key.as_str().ok_or_else(|| {
                WardenError::Usage(format!("has_keys requires string keys, got {key}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let missing: Vec<&str> = keys
        .into_iter()
        .filter(|key| !contains_key(candidate, key))
        .collect();
    ensure(missing.is_empty(), failure_message, || {
        format!(
            "{} is missing keys '{}'.",
            describe(candidate),
            missing.join(",")
        )
    })
}

/// Passes when the candidate's length is at least the first extra argument.
pub fn is_length_at_least(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let minimum = length_arg("is_length_at_least", args)?;
    ensure(
        length_of(candidate).is_some_and(|length| length >= minimum),
        failure_message,
        || format!("{} does not have a length of at least {minimum}.", describe(candidate)),
    )
}

/// Passes when the candidate's length equals the first extra argument.
pub fn is_length_exactly(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let expected = length_arg("is_length_exactly", args)?;
    ensure(
        length_of(candidate) == Some(expected),
        failure_message,
        || format!("{} does not have a length of exactly {expected}.", describe(candidate)),
    )
}
