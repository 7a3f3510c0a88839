//! Enum membership guards.
//!
//! An enum is passed as its first extra argument, either as an object
//! whose values are the members or as an array of members.

use serde_json::Value;

use super::{Candidate, describe, required_arg};
use crate::error::{Result, WardenError};
use crate::group::{CheckFn, GuardGroup, auto_guard};
use crate::guard::ensure;

use super::equality::strict_equal;

/// The `enums` group.
pub fn group() -> GuardGroup<Candidate> {
    GuardGroup::new("enums")
        .guard("is_enum_value", is_enum_value)
        .guard("is_not_enum_value", is_not_enum_value)
        .check("is_enum_value", auto_guard::<CheckFn<Candidate>>())
}

fn members<'a>(guard: &str, args: &'a [Candidate]) -> Result<Vec<&'a Value>> {
    match required_arg(guard, args, 0, "an enum")? {
        Value::Object(map) => Ok(map.values().collect()),
        Value::Array(items) => Ok(items.iter().collect()),
        other => Err(WardenError::Usage(format!(
            "{guard} requires an enum object or array, got {other}"
        ))),
    }
}

fn is_member(candidate: &Candidate, members: &[&Value]) -> bool {
    members
        .iter()
        .any(|member| strict_equal(candidate, &Some((*member).clone())))
}

fn render_members(members: &[&Value]) -> String {
    members
        .iter()
        .map(|member| describe(&Some((*member).clone())))
        .collect::<Vec<_>>()
        .join(",")
}

/// Passes when the candidate is one of the enum's values.
pub fn is_enum_value(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let members = members("is_enum_value", args)?;
    ensure(is_member(candidate, &members), failure_message, || {
        format!(
            "{} is not an enum value in '{}'.",
            describe(candidate),
            render_members(&members)
        )
    })
}

/// Passes when the candidate is none of the enum's values.
pub fn is_not_enum_value(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let members = members("is_not_enum_value", args)?;
    ensure(!is_member(candidate, &members), failure_message, || {
        format!(
            "{} is an enum value in '{}'.",
            describe(candidate),
            render_members(&members)
        )
    })
}
