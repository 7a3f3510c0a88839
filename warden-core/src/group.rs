//! Guard groups: named assert functions plus per-form overrides.
//!
//! Each domain module contributes one [`GuardGroup`]. For every derived
//! form the group may hold an [`Override`] per guard name:
//!
//! - [`Override::Replace`] uses the given function verbatim;
//! - [`Override::Auto`] (see [`auto_guard`]) or no entry derives the form
//!   from the assert function;
//! - [`Override::Absent`] leaves the guard out of that form's namespace.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::derive::{create_assert_wrap, create_check, create_check_wrap};
use crate::error::{Result, WardenError};
use crate::guard::{AssertFn, assert_fn};
use crate::wait_until::{WaitUntilFn, create_wait_until};

/// A type-erased check function.
pub type CheckFn<V> = Arc<dyn Fn(&V, &[V]) -> Result<bool> + Send + Sync>;
/// A type-erased assert-wrap function.
pub type AssertWrapFn<V> = Arc<dyn Fn(V, &[V], Option<&str>) -> Result<V> + Send + Sync>;
/// A type-erased check-wrap function.
pub type CheckWrapFn<V> = Arc<dyn Fn(V, &[V]) -> Result<Option<V>> + Send + Sync>;

/// How one guard is exposed through one derived form.
pub enum Override<F> {
    /// Use this function instead of the derived one.
    Replace(F),
    /// Derive the form from the assert function.
    Auto,
    /// Do not expose the guard through this form.
    Absent,
}

impl<F: Clone> Clone for Override<F> {
    fn clone(&self) -> Self {
        match self {
            Self::Replace(function) => Self::Replace(function.clone()),
            Self::Auto => Self::Auto,
            Self::Absent => Self::Absent,
        }
    }
}

/// Mark a guard's form as derived automatically while still listing it explicitly.
pub const fn auto_guard<F>() -> Override<F> {
    Override::Auto
}

/// Per-form override map, keyed by guard name.
pub type Overrides<F> = BTreeMap<String, Override<F>>;

/// The assert functions and overrides contributed by one domain module.
pub struct GuardGroup<V> {
    name: String,
    asserts: BTreeMap<String, AssertFn<V>>,
    duplicates: BTreeSet<String>,
    check: Overrides<CheckFn<V>>,
    assert_wrap: Overrides<AssertWrapFn<V>>,
    check_wrap: Overrides<CheckWrapFn<V>>,
    wait_until: Overrides<WaitUntilFn<V>>,
}

impl<V: Send + 'static> GuardGroup<V> {
    /// Create an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asserts: BTreeMap::new(),
            duplicates: BTreeSet::new(),
            check: BTreeMap::new(),
            assert_wrap: BTreeMap::new(),
            check_wrap: BTreeMap::new(),
            wait_until: BTreeMap::new(),
        }
    }

    /// Register an assert function under `name`.
    pub fn guard<F>(mut self, name: &str, assertion: F) -> Self
    where
        F: Fn(&V, &[V], Option<&str>) -> Result<()> + Send + Sync + 'static,
    {
        if self
            .asserts
            .insert(name.to_string(), assert_fn(assertion))
            .is_some()
        {
            self.duplicates.insert(name.to_string());
        }
        self
    }

    /// Override how `name` is exposed through `check`.
    pub fn check(mut self, name: &str, entry: Override<CheckFn<V>>) -> Self {
        self.check.insert(name.to_string(), entry);
        self
    }

    /// Override how `name` is exposed through `assert_wrap`.
    pub fn assert_wrap(mut self, name: &str, entry: Override<AssertWrapFn<V>>) -> Self {
        self.assert_wrap.insert(name.to_string(), entry);
        self
    }

    /// Override how `name` is exposed through `check_wrap`.
    pub fn check_wrap(mut self, name: &str, entry: Override<CheckWrapFn<V>>) -> Self {
        self.check_wrap.insert(name.to_string(), entry);
        self
    }

    /// Override how `name` is exposed through `wait_until`.
    pub fn wait_until(mut self, name: &str, entry: Override<WaitUntilFn<V>>) -> Self {
        self.wait_until.insert(name.to_string(), entry);
        self
    }

    /// The group's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registered assert functions.
    pub fn asserts(&self) -> &BTreeMap<String, AssertFn<V>> {
        &self.asserts
    }

    /// Names of every registered guard.
    pub fn guard_names(&self) -> impl Iterator<Item = &str> {
        self.asserts.keys().map(String::as_str)
    }

    /// Fail if a guard name was registered twice within this group.
    pub fn validate(&self) -> Result<()> {
        match self.duplicates.iter().next() {
            Some(name) => Err(WardenError::Registry(format!(
                "guard `{name}` is registered twice in group `{}`",
                self.name
            ))),
            None => Ok(()),
        }
    }

    /// Merge this group's asserts with its `check` overrides.
    pub fn check_group(&self) -> Result<BTreeMap<String, CheckFn<V>>> {
        create_check_group(&self.asserts, &self.check)
            .map_err(|err| in_group(err, &self.name))
    }

    /// Merge this group's asserts with its `assert_wrap` overrides.
    pub fn assert_wrap_group(&self) -> Result<BTreeMap<String, AssertWrapFn<V>>> {
        create_assert_wrap_group(&self.asserts, &self.assert_wrap)
            .map_err(|err| in_group(err, &self.name))
    }

    /// Merge this group's asserts with its `check_wrap` overrides.
    pub fn check_wrap_group(&self) -> Result<BTreeMap<String, CheckWrapFn<V>>> {
        create_check_wrap_group(&self.asserts, &self.check_wrap)
            .map_err(|err| in_group(err, &self.name))
    }

    /// Merge this group's asserts with its `wait_until` overrides.
    pub fn wait_until_group(&self) -> Result<BTreeMap<String, WaitUntilFn<V>>> {
        create_wait_until_group(&self.asserts, &self.wait_until)
            .map_err(|err| in_group(err, &self.name))
    }
}

fn in_group(err: WardenError, group: &str) -> WardenError {
    match err {
        WardenError::Registry(message) => {
            WardenError::Registry(format!("group `{group}`: {message}"))
        }
        other => other,
    }
}

/// Build the `check` mapping for a set of assert functions.
pub fn create_check_group<V: 'static>(
    asserts: &BTreeMap<String, AssertFn<V>>,
    overrides: &Overrides<CheckFn<V>>,
) -> Result<BTreeMap<String, CheckFn<V>>> {
    merge_group(asserts, overrides, |assertion| {
        let assertion = Arc::clone(assertion);
        let check = create_check::<V, [V], _>(
            move |candidate: &V, args: &[V], message: Option<&str>| {
                assertion(candidate, args, message)
            },
        );
        Arc::new(check) as CheckFn<V>
    })
}

/// Build the `assert_wrap` mapping for a set of assert functions.
pub fn create_assert_wrap_group<V: 'static>(
    asserts: &BTreeMap<String, AssertFn<V>>,
    overrides: &Overrides<AssertWrapFn<V>>,
) -> Result<BTreeMap<String, AssertWrapFn<V>>> {
    merge_group(asserts, overrides, |assertion| {
        let assertion = Arc::clone(assertion);
        let assert_wrap = create_assert_wrap::<V, [V], _>(
            move |candidate: &V, args: &[V], message: Option<&str>| {
                assertion(candidate, args, message)
            },
        );
        Arc::new(assert_wrap) as AssertWrapFn<V>
    })
}

/// Build the `check_wrap` mapping for a set of assert functions.
pub fn create_check_wrap_group<V: 'static>(
    asserts: &BTreeMap<String, AssertFn<V>>,
    overrides: &Overrides<CheckWrapFn<V>>,
) -> Result<BTreeMap<String, CheckWrapFn<V>>> {
    merge_group(asserts, overrides, |assertion| {
        let assertion = Arc::clone(assertion);
        let check_wrap = create_check_wrap::<V, [V], _>(
            move |candidate: &V, args: &[V], message: Option<&str>| {
                assertion(candidate, args, message)
            },
        );
        Arc::new(check_wrap) as CheckWrapFn<V>
    })
}

/// Build the `wait_until` mapping for a set of assert functions.
pub fn create_wait_until_group<V: Send + 'static>(
    asserts: &BTreeMap<String, AssertFn<V>>,
    overrides: &Overrides<WaitUntilFn<V>>,
) -> Result<BTreeMap<String, WaitUntilFn<V>>> {
    merge_group(asserts, overrides, |assertion| {
        let assertion = Arc::clone(assertion);
        create_wait_until(
            move |candidate: &V, args: &[V], message: Option<&str>| {
                assertion(candidate, args, message)
            },
            false,
        )
    })
}

fn merge_group<V, F: Clone>(
    asserts: &BTreeMap<String, AssertFn<V>>,
    overrides: &Overrides<F>,
    derive: impl Fn(&AssertFn<V>) -> F,
) -> Result<BTreeMap<String, F>> {
    if let Some(unknown) = overrides.keys().find(|name| !asserts.contains_key(*name)) {
        return Err(WardenError::Registry(format!(
            "override for unknown guard `{unknown}`"
        )));
    }

    let mut merged = BTreeMap::new();
    for (name, assertion) in asserts {
        match overrides.get(name) {
            Some(Override::Replace(function)) => {
                merged.insert(name.clone(), function.clone());
            }
            Some(Override::Absent) => {}
            Some(Override::Auto) | None => {
                merged.insert(name.clone(), derive(assertion));
            }
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::{CheckFn, CheckWrapFn, GuardGroup, Override, auto_guard};
    use crate::error::{Result, WardenError};
    use crate::guard::ensure;
    use std::sync::Arc;

    fn is_positive(candidate: &i64, _args: &[i64], failure_message: Option<&str>) -> Result<()> {
        ensure(*candidate > 0, failure_message, || {
            format!("{candidate} is not positive.")
        })
    }

    fn is_zero(candidate: &i64, _args: &[i64], failure_message: Option<&str>) -> Result<()> {
        ensure(*candidate == 0, failure_message, || format!("{candidate} is not zero."))
    }

    fn always_true(_candidate: &i64, _args: &[i64]) -> Result<bool> {
        Ok(true)
    }

    fn sample_group() -> GuardGroup<i64> {
        GuardGroup::new("numbers")
            .guard("is_positive", is_positive)
            .guard("is_zero", is_zero)
            .check("is_positive", auto_guard())
            .check("is_zero", Override::Replace(Arc::new(always_true) as CheckFn<i64>))
            .check_wrap("is_zero", Override::Absent)
    }

    #[test]
    fn missing_and_auto_entries_are_derived() {
        let group = sample_group();
        let checks = group.check_group().expect("checks");
        let check = checks.get("is_positive").expect("derived check");
        assert!(check(&3, &[]).expect("check"));
        assert!(!check(&-3, &[]).expect("check"));

        let wraps = group.assert_wrap_group().expect("wraps");
        assert_eq!(wraps["is_zero"](0, &[], None).expect("wrap"), 0);
        assert!(wraps["is_zero"](1, &[], None).is_err());
    }

    #[test]
    fn replacements_are_used_verbatim() {
        let checks = sample_group().check_group().expect("checks");
        assert!(checks["is_zero"](&42, &[]).expect("replaced check"));
    }

    #[test]
    fn absent_entries_are_omitted() {
        let wraps = sample_group().check_wrap_group().expect("check wraps");
        assert!(wraps.contains_key("is_positive"));
        assert!(!wraps.contains_key("is_zero"));
    }

    #[test]
    fn overrides_for_unknown_guards_are_rejected() {
        let group = GuardGroup::new("numbers")
            .guard("is_positive", is_positive)
            .check_wrap("is_negative", Override::<CheckWrapFn<i64>>::Absent);
        match group.check_wrap_group() {
            Err(WardenError::Registry(message)) => {
                assert!(message.contains("numbers"));
                assert!(message.contains("is_negative"));
            }
            Err(other) => panic!("expected registry error, got {other:?}"),
            Ok(_) => panic!("expected registry error"),
        }
    }

    #[test]
    fn duplicate_names_fail_validation() {
        let group = GuardGroup::new("numbers")
            .guard("is_positive", is_positive)
            .guard("is_positive", is_zero);
        assert!(matches!(group.validate(), Err(WardenError::Registry(_))));
        assert!(sample_group().validate().is_ok());
    }

    #[tokio::test]
    async fn wait_until_group_derives_polling_forms() {
        let waits = sample_group().wait_until_group().expect("waits");
        let value = waits["is_positive"](vec![crate::wait_until::WaitArg::callback(|| Ok(9))])
            .await
            .expect("resolves");
        assert_eq!(value, 9);
    }
}
