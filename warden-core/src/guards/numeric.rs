//! Numeric comparison guards.

use super::{Candidate, describe, number_arg};
use crate::error::{Result, WardenError};
use crate::group::GuardGroup;
use crate::guard::ensure;

/// Tolerance used by `is_approximately` when none is given.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// The `numeric` group.
pub fn group() -> GuardGroup<Candidate> {
    GuardGroup::new("numeric")
        .guard("is_above", is_above)
        .guard("is_at_least", is_at_least)
        .guard("is_below", is_below)
        .guard("is_at_most", is_at_most)
        .guard("is_approximately", is_approximately)
}

fn number(candidate: &Candidate) -> Option<f64> {
    candidate.as_ref().and_then(|value| value.as_f64())
}

fn compare(
    guard: &str,
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
    holds: fn(f64, f64) -> bool,
    relation: &str,
) -> Result<()> {
    let bound = number_arg(guard, args, 0, "a bound")?;
    ensure(
        number(candidate).is_some_and(|value| holds(value, bound)),
        failure_message,
        || format!("{} is not {relation} {bound}.", describe(candidate)),
    )
}

/// Passes when the candidate is greater than the first extra argument.
pub fn is_above(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    compare("is_above", candidate, args, failure_message, |a, b| a > b, "above")
}

/// Passes when the candidate is greater than or equal to the first extra argument.
pub fn is_at_least(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    compare("is_at_least", candidate, args, failure_message, |a, b| a >= b, "at least")
}

/// Passes when the candidate is less than the first extra argument.
pub fn is_below(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    compare("is_below", candidate, args, failure_message, |a, b| a < b, "below")
}

/// Passes when the candidate is less than or equal to the first extra argument.
pub fn is_at_most(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    compare("is_at_most", candidate, args, failure_message, |a, b| a <= b, "at most")
}

/// Passes when the candidate is within a tolerance (second extra argument) of the first.
pub fn is_approximately(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let expected = number_arg("is_approximately", args, 0, "an expected number")?;
    let tolerance = match args.get(1).and_then(Option::as_ref) {
        Some(_) => number_arg("is_approximately", args, 1, "a tolerance")?,
        None => DEFAULT_TOLERANCE,
    };
    if tolerance < 0.0 {
        return Err(WardenError::Usage(format!(
            "is_approximately requires a non-negative tolerance, got {tolerance}"
        )));
    }
    ensure(
        number(candidate).is_some_and(|value| (value - expected).abs() <= tolerance),
        failure_message,
        || {
            format!(
                "{} is not within {tolerance} of {expected}.",
                describe(candidate)
            )
        },
    )
}
