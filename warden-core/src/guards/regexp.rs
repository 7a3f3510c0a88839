//! Regular expression guards.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use regex::Regex;

use super::{Candidate, describe, string_arg};
use crate::error::{Result, WardenError};
use crate::group::GuardGroup;
use crate::guard::ensure;

/// The `regexp` group.
pub fn group() -> GuardGroup<Candidate> {
    GuardGroup::new("regexp")
        .guard("matches", matches)
        .guard("mismatches", mismatches)
}

/// Compiled patterns kept across calls; cleared once it grows past this many entries.
const PATTERN_CACHE_LIMIT: usize = 256;

fn pattern_cache() -> &'static Mutex<HashMap<String, Regex>> {
    static PATTERNS: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();
    PATTERNS.get_or_init(|| Mutex::new(HashMap::new()))
}

fn compiled(guard: &str, source: &str) -> Result<Regex> {
    let mut cache = pattern_cache()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(regex) = cache.get(source) {
        return Ok(regex.clone());
    }
    let regex = Regex::new(source)
        .map_err(|err| WardenError::Usage(format!("{guard} got an invalid pattern: {err}")))?;
    if cache.len() >= PATTERN_CACHE_LIMIT {
        log::debug!("regexp pattern cache full, clearing {} entries", cache.len());
        cache.clear();
    }
    cache.insert(source.to_string(), regex.clone());
    Ok(regex)
}

fn pattern(guard: &str, args: &[Candidate]) -> Result<Regex> {
    compiled(guard, string_arg(guard, args, 0, "a pattern")?)
}

fn is_match(candidate: &Candidate, pattern: &Regex) -> bool {
    candidate
        .as_ref()
        .and_then(|value| value.as_str())
        .is_some_and(|text| pattern.is_match(text))
}

/// Passes when the candidate is a string matching the pattern given as the first extra argument.
pub fn matches(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let pattern = pattern("matches", args)?;
    ensure(is_match(candidate, &pattern), failure_message, || {
        format!("{} does not match /{pattern}/.", describe(candidate))
    })
}

/// Passes when the candidate is not a string matching the pattern.
pub fn mismatches(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let pattern = pattern("mismatches", args)?;
    ensure(!is_match(candidate, &pattern), failure_message, || {
        format!("{} matches /{pattern}/.", describe(candidate))
    })
}
