//! Boolean and truthiness guards.

use serde_json::Value;

use super::{Candidate, describe, is_truthy};
use crate::error::Result;
use crate::group::{CheckWrapFn, GuardGroup, Override};
use crate::guard::ensure;

/// The `booleans` group.
///
/// `check_wrap.is_falsy` is absent: every value it would hand back is
/// indistinguishable from a failure.
pub fn group() -> GuardGroup<Candidate> {
    GuardGroup::new("booleans")
        .guard("is_true", is_true)
        .guard("is_false", is_false)
        .guard("is_truthy", is_truthy_guard)
        .guard("is_falsy", is_falsy)
        .check_wrap("is_falsy", Override::<CheckWrapFn<Candidate>>::Absent)
}

/// Passes for exactly `true`.
pub fn is_true(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(
        matches!(candidate, Some(Value::Bool(true))),
        failure_message,
        || format!("{} is not true.", describe(candidate)),
    )
}

/// Passes for exactly `false`.
pub fn is_false(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(
        matches!(candidate, Some(Value::Bool(false))),
        failure_message,
        || format!("{} is not false.", describe(candidate)),
    )
}

/// Passes for any truthy value.
pub fn is_truthy_guard(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(is_truthy(candidate), failure_message, || {
        format!("{} is not truthy.", describe(candidate))
    })
}

/// Passes for any falsy value.
pub fn is_falsy(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(!is_truthy(candidate), failure_message, || {
        format!("{} is not falsy.", describe(candidate))
    })
}
