//! UUID guards.

use ::uuid::Uuid;

use super::{Candidate, describe, number_arg};
use crate::error::{Result, WardenError};
use crate::group::GuardGroup;
use crate::guard::ensure;

/// The `uuid` group.
pub fn group() -> GuardGroup<Candidate> {
    GuardGroup::new("uuid")
        .guard("is_uuid", is_uuid)
        .guard("is_uuid_version", is_uuid_version)
}

/// Parse a hyphenated UUID string.
fn parse(candidate: &Candidate) -> Option<Uuid> {
    let text = candidate.as_ref()?.as_str()?;
    if text.len() != 36 {
        return None;
    }
    Uuid::try_parse(text).ok()
}

/// Passes for hyphenated UUID strings.
pub fn is_uuid(
    candidate: &Candidate,
    _args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    ensure(parse(candidate).is_some(), failure_message, || {
        format!("{} is not a UUID.", describe(candidate))
    })
}

/// Passes for UUIDs of the version given as the first extra argument.
pub fn is_uuid_version(
    candidate: &Candidate,
    args: &[Candidate],
    failure_message: Option<&str>,
) -> Result<()> {
    let version = number_arg("is_uuid_version", args, 0, "a version")?;
    if !(1.0..=8.0).contains(&version) || version.fract() != 0.0 {
        return Err(WardenError::Usage(format!(
            "is_uuid_version requires a version between 1 and 8, got {version}"
        )));
    }
    let version = version as usize;
    ensure(
        parse(candidate).is_some_and(|uuid| uuid.get_version_num() == version),
        failure_message,
        || format!("{} is not a v{version} UUID.", describe(candidate)),
    )
}

#[cfg(test)]
mod tests {
    use super::{is_uuid, is_uuid_version};
    use crate::error::WardenError;
    use serde_json::json;

    const V4: &str = "9b2c1b58-4f7e-4c2a-9d1e-2f0b6f1c8a3e";

    #[test]
    fn hyphenated_uuids_pass() {
        assert!(is_uuid(&Some(json!(V4)), &[], None).is_ok());
        assert!(is_uuid(&Some(json!("9b2c1b584f7e4c2a9d1e2f0b6f1c8a3e")), &[], None).is_err());
        assert!(is_uuid(&Some(json!("not-a-uuid")), &[], None).is_err());
        assert!(is_uuid(&None, &[], None).is_err());
    }

    #[test]
    fn versions_are_compared() {
        assert!(is_uuid_version(&Some(json!(V4)), &[Some(json!(4))], None).is_ok());
        assert!(is_uuid_version(&Some(json!(V4)), &[Some(json!(1))], None).is_err());
        assert!(matches!(
            is_uuid_version(&Some(json!(V4)), &[Some(json!(12))], None),
            Err(WardenError::Usage(_))
        ));
    }
}
