//! Guards for undefined and null values.

use serde_json::Value;

use super::{Candidate, describe};
use crate::error::Result;
use crate::group::{CheckWrapFn, GuardGroup, Override};
use crate::guard::ensure;

/// The `nullish` group.
///
/// `check_wrap` cannot tell a passing `undefined` from a failure, so it is
/// absent for `is_undefined` and `is_nullish`.
pub fn group() -> GuardGroup<Candidate> {
    GuardGroup::new("nullish")
        .guard("is_defined", is_defined)
        .guard("is_nullish", is_nullish)
        .guard("is_undefined", is_undefined)
        .guard("is_not_undefined", is_not_undefined)
        .guard("is_null", is_null)
        .guard("is_not_null", is_not_null)
        .check_wrap("is_undefined", Override::<CheckWrapFn<Candidate>>::Absent)
        .check_wrap("is_nullish", Override::Absent)
}

fn nullish(candidate: &Candidate) -> bool {
    matches!(candidate, None | Some(Value::Null))
}

/// Passes for anything but `undefined` and `null`.
pub fn is_defined(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(!nullish(candidate), failure_message, || {
        format!("{} is not defined.", describe(candidate))
    })
}

/// Passes for `undefined` and `null`.
pub fn is_nullish(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(nullish(candidate), failure_message, || {
        format!("{} is not nullish.", describe(candidate))
    })
}

/// Passes only for `undefined`.
pub fn is_undefined(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(candidate.is_none(), failure_message, || {
        format!("{} is not undefined.", describe(candidate))
    })
}

/// Passes for anything but `undefined`.
pub fn is_not_undefined(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(candidate.is_some(), failure_message, || {
        "value is undefined.".to_string()
    })
}

/// Passes only for `null`.
pub fn is_null(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(
        matches!(candidate, Some(Value::Null)),
        failure_message,
        || format!("{} is not null.", describe(candidate)),
    )
}

/// Passes for anything but `null`.
pub fn is_not_null(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(
        !matches!(candidate, Some(Value::Null)),
        failure_message,
        || "value is null.".to_string(),
    )
}
