//! Generic derivations of the synchronous guard forms.
//!
//! Each constructor wraps an assert function and nothing else: the derived
//! form fails exactly when the assert function fails, and succeeds exactly
//! when it succeeds. Only `WardenError::Assertion` is converted into
//! `false`/`None`; every other error is passed through.

use crate::error::{Result, WardenError};

/// Derive a boolean check from an assert function.
pub fn create_check<T, A, F>(assert_fn: F) -> impl Fn(&T, &A) -> Result<bool>
where
    T: ?Sized,
    A: ?Sized,
    F: Fn(&T, &A, Option<&str>) -> Result<()>,
{
    move |candidate: &T, args: &A| match assert_fn(candidate, args, None) {
        Ok(()) => Ok(true),
        Err(WardenError::Assertion(_)) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Derive a form that asserts and then hands the candidate back.
pub fn create_assert_wrap<T, A, F>(assert_fn: F) -> impl Fn(T, &A, Option<&str>) -> Result<T>
where
    A: ?Sized,
    F: Fn(&T, &A, Option<&str>) -> Result<()>,
{
    move |candidate: T, args: &A, failure_message: Option<&str>| {
        assert_fn(&candidate, args, failure_message)?;
        Ok(candidate)
    }
}

/// Derive a form that hands the candidate back, or `None` when the guard fails.
pub fn create_check_wrap<T, A, F>(assert_fn: F) -> impl Fn(T, &A) -> Result<Option<T>>
where
    A: ?Sized,
    F: Fn(&T, &A, Option<&str>) -> Result<()>,
{
    move |candidate: T, args: &A| match assert_fn(&candidate, args, None) {
        Ok(()) => Ok(Some(candidate)),
        Err(WardenError::Assertion(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::{create_assert_wrap, create_check, create_check_wrap};
    use crate::error::{Result, WardenError};
    use crate::guard::ensure;

    fn has_prefix(candidate: &String, prefix: &str, failure_message: Option<&str>) -> Result<()> {
        ensure(candidate.starts_with(prefix), failure_message, || {
            format!("'{candidate}' does not start with '{prefix}'.")
        })
    }

    fn strict_positive(candidate: &i64, _args: &(), failure_message: Option<&str>) -> Result<()> {
        if *candidate == i64::MIN {
            return Err(WardenError::Usage("candidate out of range".to_string()));
        }
        ensure(*candidate > 0, failure_message, || {
            format!("{candidate} is not positive.")
        })
    }

    #[test]
    fn check_agrees_with_assert() {
        let check = create_check(has_prefix);
        for (candidate, prefix) in [("warden", "war"), ("warden", "den"), ("", ""), ("a", "ab")] {
            let candidate = candidate.to_string();
            let asserted = has_prefix(&candidate, prefix, None).is_ok();
            assert_eq!(check(&candidate, prefix).expect("check"), asserted);
        }
    }

    #[test]
    fn check_propagates_usage_errors() {
        let check = create_check(strict_positive);
        assert!(check(&5, &()).expect("check"));
        assert!(!check(&-5, &()).expect("check"));
        assert!(matches!(check(&i64::MIN, &()), Err(WardenError::Usage(_))));
    }

    #[test]
    fn assert_wrap_returns_candidate_or_fails() {
        let assert_wrap = create_assert_wrap(has_prefix);
        let wrapped: String = assert_wrap("warden".to_string(), "war", None).expect("wrap");
        assert_eq!(wrapped, "warden");

        match assert_wrap("warden".to_string(), "den", Some("bad prefix")) {
            Err(WardenError::Assertion(err)) => assert_eq!(err.message(), "bad prefix"),
            other => panic!("expected assertion error, got {other:?}"),
        }
    }

    #[test]
    fn check_wrap_returns_none_on_failure() {
        let check_wrap = create_check_wrap(strict_positive);
        assert_eq!(check_wrap(7, &()).expect("check wrap"), Some(7));
        assert_eq!(check_wrap(0, &()).expect("check wrap"), None);
        assert!(check_wrap(i64::MIN, &()).is_err());
    }
}
