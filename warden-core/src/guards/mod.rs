//! Built-in guard groups over JSON-shaped candidates.
//!
//! A candidate is `Option<serde_json::Value>`: `None` stands for an
//! undefined value, `Some(Value::Null)` for an explicit null.

use std::sync::OnceLock;

use serde_json::Value;

use crate::error::{Result, WardenError};
use crate::group::GuardGroup;
use crate::namespace::Guards;

pub mod booleans;
pub mod enums;
pub mod equality;
pub mod http;
pub mod keys;
pub mod nullish;
pub mod numeric;
pub mod regexp;
pub mod runtime_types;
pub mod uuid;
pub mod values;

/// The value every built-in guard inspects.
pub type Candidate = Option<Value>;

/// Every built-in group, in registration order.
pub fn builtin_groups() -> Vec<GuardGroup<Candidate>> {
    vec![
        booleans::group(),
        equality::group(),
        enums::group(),
        http::group(),
        keys::group(),
        nullish::group(),
        numeric::group(),
        regexp::group(),
        runtime_types::group(),
        uuid::group(),
        values::group(),
    ]
}

/// Build fresh namespaces from the built-in groups.
pub fn build_guards() -> Result<Guards<Candidate>> {
    Guards::from_groups(builtin_groups())
}

/// The process-wide namespaces over the built-in groups.
///
/// # Panics
///
/// Panics on first use if the built-in groups cannot be merged, which
/// only happens when two built-in guards share a name.
pub fn guards() -> &'static Guards<Candidate> {
    static GUARDS: OnceLock<Guards<Candidate>> = OnceLock::new();
    GUARDS.get_or_init(|| {
        build_guards().unwrap_or_else(|err| panic!("built-in guard groups are inconsistent: {err}"))
    })
}

/// Render a candidate for a failure message; strings are rendered raw.
pub fn describe(candidate: &Candidate) -> String {
    match candidate {
        None => "undefined".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(value) => value.to_string(),
    }
}

/// Render a candidate as JSON, quoting strings.
pub fn stringify(candidate: &Candidate) -> String {
    match candidate {
        None => "undefined".to_string(),
        Some(value) => value.to_string(),
    }
}

/// JavaScript-style truthiness.
pub fn is_truthy(candidate: &Candidate) -> bool {
    match candidate {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// The extra argument at `index`, which must be defined.
pub(crate) fn required_arg<'a>(
    guard: &str,
    args: &'a [Candidate],
    index: usize,
    what: &str,
) -> Result<&'a Value> {
    args.get(index)
        .and_then(Option::as_ref)
        .ok_or_else(|| WardenError::Usage(format!("{guard} requires {what}")))
}

/// The extra argument at `index` as a number.
pub(crate) fn number_arg(guard: &str, args: &[Candidate], index: usize, what: &str) -> Result<f64> {
    required_arg(guard, args, index, what)?
        .as_f64()
        .ok_or_else(|| WardenError::Usage(format!("{guard} requires {what} as a number")))
}

/// The extra argument at `index` as a string.
pub(crate) fn string_arg<'a>(
    guard: &str,
    args: &'a [Candidate],
    index: usize,
    what: &str,
) -> Result<&'a str> {
    required_arg(guard, args, index, what)?
        .as_str()
        .ok_or_else(|| WardenError::Usage(format!("{guard} requires {what} as a string")))
}

/// The extra argument at `index` as an array.
pub(crate) fn array_arg<'a>(
    guard: &str,
    args: &'a [Candidate],
    index: usize,
    what: &str,
) -> Result<&'a Vec<Value>> {
    required_arg(guard, args, index, what)?
        .as_array()
        .ok_or_else(|| WardenError::Usage(format!("{guard} requires {what} as an array")))
}

#[cfg(test)]
mod tests {
    use super::{build_guards, describe, guards, is_truthy, number_arg, required_arg, stringify};
    use crate::error::WardenError;
    use crate::form::GuardForm;
    use serde_json::json;

    #[test]
    fn describe_renders_strings_raw() {
        assert_eq!(describe(&Some(json!("A"))), "A");
        assert_eq!(describe(&Some(json!([1, "a"]))), "[1,\"a\"]");
        assert_eq!(describe(&None), "undefined");
        assert_eq!(stringify(&Some(json!("A"))), "\"A\"");
    }

    #[test]
    fn truthiness_follows_javascript() {
        let falsy_values = [
            None,
            Some(json!(null)),
            Some(json!(false)),
            Some(json!(0)),
            Some(json!("")),
        ];
        for falsy in falsy_values {
            assert!(!is_truthy(&falsy), "{falsy:?} should be falsy");
        }
        let truthy_values = [
            Some(json!(true)),
            Some(json!(-1.5)),
            Some(json!("0")),
            Some(json!([])),
            Some(json!({})),
        ];
        for truthy in truthy_values {
            assert!(is_truthy(&truthy), "{truthy:?} should be truthy");
        }
    }

    #[test]
    fn argument_helpers_report_usage_errors() {
        let args = vec![Some(json!(3)), None, Some(json!("x"))];
        assert_eq!(number_arg("g", &args, 0, "a floor").expect("number"), 3.0);
        assert!(matches!(required_arg("g", &args, 1, "a value"), Err(WardenError::Usage(_))));
        assert!(matches!(number_arg("g", &args, 2, "a floor"), Err(WardenError::Usage(_))));
        assert!(matches!(required_arg("g", &args, 7, "a value"), Err(WardenError::Usage(_))));
    }

    #[test]
    fn builtin_groups_merge_without_collisions() {
        let built = build_guards().expect("built-in guards");
        assert_eq!(
            built.names(GuardForm::Assert).len(),
            guards().names(GuardForm::Assert).len()
        );
        assert_eq!(guards().group_of("is_enum_value"), Some("enums"));
        assert!(!guards().contains(GuardForm::CheckWrap, "is_undefined"));
        assert!(!guards().contains(GuardForm::CheckWrap, "is_nullish"));
        assert!(!guards().contains(GuardForm::CheckWrap, "is_falsy"));
        assert!(guards().contains(GuardForm::CheckWrap, "is_truthy"));
    }
}
