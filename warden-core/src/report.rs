//! Catalog reports describing which guards exist in which forms.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::form::GuardForm;
use crate::namespace::Guards;

/// One guard and the forms it is exposed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Guard name.
    pub name: String,
    /// Group that registered the guard.
    pub group: String,
    /// Forms exposing the guard, in namespace order.
    pub forms: Vec<GuardForm>,
}

impl CatalogEntry {
    /// Forms the guard is missing from.
    pub fn missing_forms(&self) -> Vec<GuardForm> {
        GuardForm::ALL
            .into_iter()
            .filter(|form| !self.forms.contains(form))
            .collect()
    }
}

/// List every guard, sorted by group then name.
pub fn build_catalog<V>(guards: &Guards<V>) -> Vec<CatalogEntry> {
    let mut entries: Vec<CatalogEntry> = guards
        .names(GuardForm::Assert)
        .into_iter()
        .map(|name| CatalogEntry {
            name: name.to_string(),
            group: guards.group_of(name).unwrap_or_default().to_string(),
            forms: guards.forms_of(name),
        })
        .collect();
    entries.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.name.cmp(&b.name)));
    entries
}

/// Keep only entries exposed through `form`.
pub fn filter_catalog(entries: Vec<CatalogEntry>, form: GuardForm) -> Vec<CatalogEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.forms.contains(&form))
        .collect()
}

/// Render the catalog as Markdown, one section per group.
pub fn render_catalog_markdown(entries: &[CatalogEntry]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Guard Catalog\n");
    if entries.is_empty() {
        let _ = writeln!(output, "No guards registered.");
        return output;
    }

    let mut current_group: Option<&str> = None;
    for entry in entries {
        if current_group != Some(entry.group.as_str()) {
            if current_group.is_some() {
                let _ = writeln!(output);
            }
            let _ = writeln!(output, "## {}", entry.group);
            current_group = Some(entry.group.as_str());
        }
        let _ = write!(output, "- `{}`: {}", entry.name, join_forms(&entry.forms));
        let missing = entry.missing_forms();
        if !missing.is_empty() {
            let _ = write!(output, " (no {})", join_forms(&missing));
        }
        let _ = writeln!(output);
    }
    output
}

/// Render the catalog as plain text, one guard per line.
pub fn render_catalog_text(entries: &[CatalogEntry]) -> String {
    let mut output = String::new();
    for entry in entries {
        let _ = writeln!(
            output,
            "{}\t{}\t{}",
            entry.name,
            entry.group,
            join_forms(&entry.forms)
        );
    }
    output
}

/// Render any serializable payload as pretty JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn join_forms(forms: &[GuardForm]) -> String {
    forms
        .iter()
        .map(|form| form.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::{
        CatalogEntry, build_catalog, filter_catalog, render_catalog_markdown, render_catalog_text,
        render_json,
    };
    use crate::form::GuardForm;
    use crate::guards::guards;

    fn entry(name: &str, group: &str, forms: Vec<GuardForm>) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            group: group.to_string(),
            forms,
        }
    }

    #[test]
    fn catalog_lists_builtin_guards_with_forms() {
        let catalog = build_catalog(guards());
        let undefined = catalog
            .iter()
            .find(|entry| entry.name == "is_undefined")
            .expect("is_undefined listed");
        assert_eq!(undefined.group, "nullish");
        assert_eq!(undefined.missing_forms(), vec![GuardForm::CheckWrap]);

        let check_wraps = filter_catalog(catalog.clone(), GuardForm::CheckWrap);
        assert!(check_wraps.len() < catalog.len());
        assert!(check_wraps.iter().all(|entry| entry.name != "is_undefined"));
    }

    #[test]
    fn markdown_groups_entries_and_notes_missing_forms() {
        let entries = vec![
            entry("is_true", "booleans", GuardForm::ALL.to_vec()),
            entry(
                "is_undefined",
                "nullish",
                vec![
                    GuardForm::Assert,
                    GuardForm::Check,
                    GuardForm::AssertWrap,
                    GuardForm::WaitUntil,
                ],
            ),
        ];
        let markdown = render_catalog_markdown(&entries);
        assert!(markdown.starts_with("# Guard Catalog"));
        assert!(markdown.contains(
            "## booleans\n- `is_true`: assert, check, assertWrap, checkWrap, waitUntil\n"
        ));
        assert!(markdown.contains("## nullish"));
        assert!(markdown.contains("(no checkWrap)"));
    }

    #[test]
    fn empty_catalog_is_reported() {
        assert!(render_catalog_markdown(&[]).contains("No guards registered."));
        assert_eq!(render_catalog_text(&[]), "");
    }

    #[test]
    fn json_uses_camel_case_form_names() {
        let json = render_json(&vec![entry("is_true", "booleans", vec![GuardForm::CheckWrap])])
            .expect("json");
        assert!(json.contains("\"checkWrap\""));
        assert!(json.contains("\"group\": \"booleans\""));
    }
}
