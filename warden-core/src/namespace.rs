//! Flat, name-keyed namespaces assembled from guard groups.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, WardenError};
use crate::form::GuardForm;
use crate::group::{AssertWrapFn, CheckFn, CheckWrapFn, GuardGroup};
use crate::guard::AssertFn;
use crate::wait_until::{WaitArg, WaitUntilCall, WaitUntilFn};

/// Every guard exposed through one form, keyed by name.
pub struct Namespace<F> {
    form: GuardForm,
    entries: BTreeMap<String, F>,
}

impl<F> Namespace<F> {
    fn new(form: GuardForm) -> Self {
        Self {
            form,
            entries: BTreeMap::new(),
        }
    }

    /// The form this namespace exposes.
    pub fn form(&self) -> GuardForm {
        self.form
    }

    /// Look up a guard, failing with [`WardenError::UnknownGuard`] when it is not exposed.
    pub fn get(&self, name: &str) -> Result<&F> {
        self.entries
            .get(name)
            .ok_or_else(|| WardenError::UnknownGuard {
                form: self.form,
                name: name.to_string(),
            })
    }

    /// Whether `name` is exposed through this form.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Exposed guard names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of exposed guards.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no guard is exposed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F> fmt::Debug for Namespace<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("form", &self.form)
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The five namespaces built from a set of guard groups.
pub struct Guards<V> {
    owners: BTreeMap<String, String>,
    asserts: Namespace<AssertFn<V>>,
    checks: Namespace<CheckFn<V>>,
    assert_wraps: Namespace<AssertWrapFn<V>>,
    check_wraps: Namespace<CheckWrapFn<V>>,
    wait_untils: Namespace<WaitUntilFn<V>>,
}

impl<V: Send + 'static> Guards<V> {
    /// Merge every group into flat namespaces.
    ///
    /// Guard names must be unique across groups; a collision is reported as
    /// [`WardenError::Registry`].
    pub fn from_groups(groups: impl IntoIterator<Item = GuardGroup<V>>) -> Result<Self> {
        let mut guards = Self {
            owners: BTreeMap::new(),
            asserts: Namespace::new(GuardForm::Assert),
            checks: Namespace::new(GuardForm::Check),
            assert_wraps: Namespace::new(GuardForm::AssertWrap),
            check_wraps: Namespace::new(GuardForm::CheckWrap),
            wait_untils: Namespace::new(GuardForm::WaitUntil),
        };

        for group in groups {
            group.validate()?;
            for name in group.guard_names() {
                if let Some(owner) = guards.owners.get(name) {
                    return Err(WardenError::Registry(format!(
                        "guard `{name}` is defined by both `{owner}` and `{}`",
                        group.name()
                    )));
                }
                guards
                    .owners
                    .insert(name.to_string(), group.name().to_string());
            }

            guards.asserts.entries.extend(
                group
                    .asserts()
                    .iter()
                    .map(|(name, assertion)| (name.clone(), assertion.clone())),
            );
            guards.checks.entries.extend(group.check_group()?);
            guards.assert_wraps.entries.extend(group.assert_wrap_group()?);
            guards.check_wraps.entries.extend(group.check_wrap_group()?);
            guards.wait_untils.entries.extend(group.wait_until_group()?);
            log::debug!(
                "merged guard group `{}` ({} guards)",
                group.name(),
                group.asserts().len()
            );
        }

        log::debug!(
            "guard namespaces: {} assert, {} check, {} assertWrap, {} checkWrap, {} waitUntil",
            guards.asserts.len(),
            guards.checks.len(),
            guards.assert_wraps.len(),
            guards.check_wraps.len(),
            guards.wait_untils.len()
        );
        Ok(guards)
    }

    /// Run the `assert` form of `name`.
    pub fn assert(
        &self,
        name: &str,
        candidate: &V,
        args: &[V],
        failure_message: Option<&str>,
    ) -> Result<()> {
        let assertion = self.asserts.get(name)?;
        assertion(candidate, args, failure_message)
    }

    /// Run the `check` form of `name`.
    pub fn check(&self, name: &str, candidate: &V, args: &[V]) -> Result<bool> {
        let check = self.checks.get(name)?;
        check(candidate, args)
    }

    /// Run the `assert_wrap` form of `name`.
    pub fn assert_wrap(
        &self,
        name: &str,
        candidate: V,
        args: &[V],
        failure_message: Option<&str>,
    ) -> Result<V> {
        let assert_wrap = self.assert_wraps.get(name)?;
        assert_wrap(candidate, args, failure_message)
    }

    /// Run the `check_wrap` form of `name`.
    pub fn check_wrap(&self, name: &str, candidate: V, args: &[V]) -> Result<Option<V>> {
        let check_wrap = self.check_wraps.get(name)?;
        check_wrap(candidate, args)
    }

    /// Run the `wait_until` form of `name` with an order-flexible argument list.
    pub async fn wait_until(&self, name: &str, args: Vec<WaitArg<V>>) -> Result<V> {
        let wait_until = self.wait_untils.get(name)?.clone();
        wait_until(args).await
    }

    /// Run the `wait_until` form of `name` with an already-structured call.
    pub async fn wait_until_call(&self, name: &str, call: WaitUntilCall<V>) -> Result<V> {
        self.wait_until(name, call.into_args()).await
    }
}

impl<V> Guards<V> {
    /// The `assert` namespace.
    pub fn asserts(&self) -> &Namespace<AssertFn<V>> {
        &self.asserts
    }

    /// The `check` namespace.
    pub fn checks(&self) -> &Namespace<CheckFn<V>> {
        &self.checks
    }

    /// The `assert_wrap` namespace.
    pub fn assert_wraps(&self) -> &Namespace<AssertWrapFn<V>> {
        &self.assert_wraps
    }

    /// The `check_wrap` namespace.
    pub fn check_wraps(&self) -> &Namespace<CheckWrapFn<V>> {
        &self.check_wraps
    }

    /// The `wait_until` namespace.
    pub fn wait_untils(&self) -> &Namespace<WaitUntilFn<V>> {
        &self.wait_untils
    }

    /// Whether `name` is exposed through `form`.
    pub fn contains(&self, form: GuardForm, name: &str) -> bool {
        match form {
            GuardForm::Assert => self.asserts.contains(name),
            GuardForm::Check => self.checks.contains(name),
            GuardForm::AssertWrap => self.assert_wraps.contains(name),
            GuardForm::CheckWrap => self.check_wraps.contains(name),
            GuardForm::WaitUntil => self.wait_untils.contains(name),
        }
    }

    /// Names exposed through `form`, sorted.
    pub fn names(&self, form: GuardForm) -> Vec<&str> {
        match form {
            GuardForm::Assert => self.asserts.names().collect(),
            GuardForm::Check => self.checks.names().collect(),
            GuardForm::AssertWrap => self.assert_wraps.names().collect(),
            GuardForm::CheckWrap => self.check_wraps.names().collect(),
            GuardForm::WaitUntil => self.wait_untils.names().collect(),
        }
    }

    /// The forms `name` is exposed through, in namespace order.
    pub fn forms_of(&self, name: &str) -> Vec<GuardForm> {
        GuardForm::ALL
            .into_iter()
            .filter(|form| self.contains(*form, name))
            .collect()
    }

    /// The group that registered `name`.
    pub fn group_of(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }
}

impl<V> fmt::Debug for Guards<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guards")
            .field("asserts", &self.asserts)
            .field("checks", &self.checks)
            .field("assert_wraps", &self.assert_wraps)
            .field("check_wraps", &self.check_wraps)
            .field("wait_untils", &self.wait_untils)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Guards;
    use crate::error::{Result, WardenError};
    use crate::form::GuardForm;
    use crate::group::{CheckWrapFn, GuardGroup, Override};
    use crate::guard::ensure;
    use crate::wait_until::{WaitArg, WaitUntilCall, WaitUntilOptions};
    use std::time::Duration;

    fn is_even(candidate: &i64, _args: &[i64], failure_message: Option<&str>) -> Result<()> {
        ensure(candidate % 2 == 0, failure_message, || {
            format!("{candidate} is not even.")
        })
    }

    fn is_zero(candidate: &i64, _args: &[i64], failure_message: Option<&str>) -> Result<()> {
        ensure(*candidate == 0, failure_message, || format!("{candidate} is not zero."))
    }

    fn is_multiple_of(candidate: &i64, args: &[i64], failure_message: Option<&str>) -> Result<()> {
        let Some(divisor) = args.first().copied().filter(|divisor| *divisor != 0) else {
            return Err(WardenError::Usage("is_multiple_of needs a non-zero divisor".to_string()));
        };
        ensure(candidate % divisor == 0, failure_message, || {
            format!("{candidate} is not a multiple of {divisor}.")
        })
    }

    fn groups() -> Vec<GuardGroup<i64>> {
        vec![
            GuardGroup::new("parity")
                .guard("is_even", is_even)
                .guard("is_multiple_of", is_multiple_of),
            GuardGroup::new("zero")
                .guard("is_zero", is_zero)
                .check_wrap("is_zero", Override::<CheckWrapFn<i64>>::Absent),
        ]
    }

    #[test]
    fn namespaces_are_flattened_across_groups() {
        let guards = Guards::from_groups(groups()).expect("guards");
        assert_eq!(
            guards.names(GuardForm::Assert),
            vec!["is_even", "is_multiple_of", "is_zero"]
        );
        assert_eq!(guards.group_of("is_zero"), Some("zero"));
        assert_eq!(guards.group_of("is_odd"), None);
        assert!(!guards.contains(GuardForm::CheckWrap, "is_zero"));
        assert_eq!(
            guards.forms_of("is_zero"),
            vec![
                GuardForm::Assert,
                GuardForm::Check,
                GuardForm::AssertWrap,
                GuardForm::WaitUntil
            ]
        );
    }

    #[test]
    fn every_form_agrees_with_assert() {
        let guards = Guards::from_groups(groups()).expect("guards");
        for candidate in [-4, -1, 0, 3, 8] {
            let passes = guards.assert("is_even", &candidate, &[], None).is_ok();
            assert_eq!(guards.check("is_even", &candidate, &[]).expect("check"), passes);
            assert_eq!(
                guards.assert_wrap("is_even", candidate, &[], None).ok(),
                passes.then_some(candidate)
            );
            assert_eq!(
                guards.check_wrap("is_even", candidate, &[]).expect("check wrap"),
                passes.then_some(candidate)
            );
        }
    }

    #[test]
    fn usage_errors_pass_through_check() {
        let guards = Guards::from_groups(groups()).expect("guards");
        assert!(guards.check("is_multiple_of", &9, &[3]).expect("check"));
        assert!(matches!(
            guards.check("is_multiple_of", &9, &[0]),
            Err(WardenError::Usage(_))
        ));
    }

    #[test]
    fn unknown_guards_are_reported_per_form() {
        let guards = Guards::from_groups(groups()).expect("guards");
        match guards.check_wrap("is_zero", 0, &[]) {
            Err(WardenError::UnknownGuard { form, name }) => {
                assert_eq!(form, GuardForm::CheckWrap);
                assert_eq!(name, "is_zero");
            }
            other => panic!("expected unknown guard, got {other:?}"),
        }
    }

    #[test]
    fn name_collisions_across_groups_are_rejected() {
        let mut colliding = groups();
        colliding.push(GuardGroup::new("other").guard("is_even", is_zero));
        match Guards::from_groups(colliding) {
            Err(WardenError::Registry(message)) => {
                assert!(message.contains("is_even"));
                assert!(message.contains("parity"));
                assert!(message.contains("other"));
            }
            Err(other) => panic!("expected registry error, got {other:?}"),
            Ok(_) => panic!("expected registry error"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn wait_until_call_forwards_args_and_options() {
        let guards = Guards::from_groups(groups()).expect("guards");
        let mut next = 0;
        let call = WaitUntilCall::new(crate::wait_until::Callback::sync(move || {
            next += 1;
            Ok(next)
        }))
        .with_args(vec![4])
        .with_options(WaitUntilOptions::default().with_interval(Duration::from_millis(10)));

        let value = guards
            .wait_until_call("is_multiple_of", call)
            .await
            .expect("resolves");
        assert_eq!(value, 4);

        let err = guards
            .wait_until("is_zero", vec![WaitArg::value(1)])
            .await
            .expect_err("missing callback");
        assert!(matches!(err, WardenError::Usage(_)));
    }
}
