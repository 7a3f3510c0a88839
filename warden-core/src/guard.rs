//! The assert function contract every guard is written against.
//!
//! An assert function receives the candidate, any extra arguments and an
//! optional caller failure message. It returns `Ok(())` when the condition
//! holds and `Err(WardenError::Assertion(..))` when it does not. Arguments
//! it cannot interpret are reported as `WardenError::Usage`, which the
//! derived forms never absorb.

use std::sync::Arc;

use crate::error::{AssertionError, Result};

/// A type-erased assert function over candidates of type `V`.
pub type AssertFn<V> = Arc<dyn Fn(&V, &[V], Option<&str>) -> Result<()> + Send + Sync>;

/// Erase a concrete assert function into an [`AssertFn`].
pub fn assert_fn<V, F>(assertion: F) -> AssertFn<V>
where
    F: Fn(&V, &[V], Option<&str>) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(assertion)
}

/// Fail with an [`AssertionError`] unless `condition` holds.
///
/// The description is only rendered on failure, and is replaced by
/// `failure_message` when the caller supplied one.
pub fn ensure(
    condition: bool,
    failure_message: Option<&str>,
    describe: impl FnOnce() -> String,
) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(AssertionError::new(describe(), failure_message).into())
    }
}
