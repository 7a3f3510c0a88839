//! HTTP status code guards.

use std::ops::RangeInclusive;

use super::{Candidate, describe, string_arg};
use crate::error::{Result, WardenError};
use crate::group::GuardGroup;
use crate::guard::ensure;

/// The `http` group.
pub fn group() -> GuardGroup<Candidate> {
    GuardGroup::new("http")
        .guard("is_http_status", is_http_status)
        .guard("is_http_status_category", is_http_status_category)
}

fn status_code(candidate: &Candidate) -> Option<u64> {
    candidate
        .as_ref()
        .and_then(|value| value.as_u64())
        .filter(|code| (100..=599).contains(code))
}

fn category_range(category: &str) -> Option<RangeInclusive<u64>> {
    match category {
        "information" => Some(100..=199),
        "success" => Some(200..=299),
        "redirect" => Some(300..=399),
        "client-error" => Some(400..=499),
        "server-error" => Some(500..=599),
        "error" => Some(400..=599),
        _ => None,
    }
}

/// Passes for a valid status code, or for exactly the status given as the first extra argument.
pub fn is_http_status(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let expected = match args.first().and_then(Option::as_ref) {
        Some(value) => Some(value.as_u64().ok_or_else(|| {
            WardenError::Usage(format!("is_http_status expects a status code, got {value}"))
        })?),
        None => None,
    };
    let code = status_code(candidate);
    match expected {
        Some(expected) => ensure(code == Some(expected), failure_message, || {
            format!("{} is not HTTP status {expected}.", describe(candidate))
        }),
        None => ensure(code.is_some(), failure_message, || {
            format!("{} is not an HTTP status code.", describe(candidate))
        }),
    }
}

/// Passes when the status falls in the category named by the first extra argument.
pub fn is_http_status_category(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let category = string_arg("is_http_status_category", args, 0, "a status category")?;
    let range = category_range(category).ok_or_else(|| {
        WardenError::Usage(format!("unknown HTTP status category: {category}"))
    })?;
    ensure(
        status_code(candidate).is_some_and(|code| range.contains(&code)),
        failure_message,
        || format!("{} is not a {category} HTTP status.", describe(candidate)),
    )
}
