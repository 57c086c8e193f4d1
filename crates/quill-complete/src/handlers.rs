//! Element handlers.
//!
//! One handler per element kind, each implementing the capability pair
//! {structure completion, value completion}. Selection is purely by the
//! element's kind tag, with an explicit fallback: no kind is ever
//! rejected.

use quill_schema::{Element, ElementKind};

use crate::entries::entry_completions;
use crate::providers::DatasetProvider;
use crate::spacing::list_item_prefix;
use crate::suggest::Suggestion;

/// Context for a value completion: where the cursor is, what spacing
/// the surrounding syntax demands, and whether accepting a candidate
/// should chain into another completion.
#[derive(Debug, Clone)]
pub struct ValueCx<'a> {
    /// Literal text inserted before each candidate.
    pub prefix: String,
    /// Literal text inserted after each candidate.
    pub suffix: String,
    /// Whether candidates carry the re-trigger directive.
    pub retrigger: bool,
    /// The cursor's full line.
    pub line: &'a str,
    /// Cursor character offset within the line.
    pub character: u32,
    /// Explicit trigger character, if completion was invoked by one.
    pub trigger: Option<char>,
    /// The extracted in-progress value portion before the cursor.
    pub entry_text: String,
}

impl ValueCx<'_> {
    /// Derive the context for one positional slot: a one-space suffix,
    /// chaining only while further slots exist.
    pub fn for_slot(&self, has_next: bool) -> ValueCx<'_> {
        ValueCx {
            prefix: self.prefix.clone(),
            suffix: " ".to_string(),
            retrigger: has_next,
            line: self.line,
            character: self.character,
            trigger: self.trigger,
            entry_text: self.entry_text.clone(),
        }
    }
}

/// Indentation strings for a structure completion.
#[derive(Debug, Clone, Default)]
pub struct StructureCx {
    /// Compensation prefix inserted before the key (covers the gap
    /// between the physical cursor indentation and the schema's
    /// expected nesting).
    pub lead: String,
    /// Absolute indentation for continuation lines at the key's level.
    pub cont: String,
    /// Absolute indentation one unit deeper than the key.
    pub cont_deeper: String,
}

/// The handler registry: a closed tagged union over element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Boolean,
    Enum,
    List,
    EntryList,
    Key,
    KeyList,
    Fallback,
}

impl Handler {
    /// Select the handler for a kind tag. Untyped and unrecognized
    /// kinds resolve to the fallback.
    pub fn for_kind(kind: ElementKind) -> Handler {
        match kind {
            ElementKind::Boolean => Handler::Boolean,
            ElementKind::Enum => Handler::Enum,
            ElementKind::List => Handler::List,
            ElementKind::EntryList => Handler::EntryList,
            ElementKind::Key => Handler::Key,
            ElementKind::KeyList => Handler::KeyList,
            ElementKind::Text => Handler::Fallback,
        }
    }

    /// The completion inserted on a fresh line for `key`.
    pub fn structure(&self, key: &str, element: &Element, cx: &StructureCx) -> Suggestion {
        let StructureCx {
            lead,
            cont,
            cont_deeper,
        } = cx;
        let insert = match self {
            Handler::Boolean => format!("{lead}{key}: ${{1|true,false|}}"),
            Handler::List => format!("{lead}{key}:\n{cont}- $0"),
            Handler::EntryList => format!("{lead}{key}:\n{cont}$0"),
            Handler::Key => format!("{lead}{key}:\n{cont_deeper}$0"),
            Handler::KeyList => {
                format!("{lead}{key}:\n{cont_deeper}${{1:key}}: ${{2:value}}")
            }
            Handler::Enum | Handler::Fallback => format!("{lead}{key}: $0"),
        };
        Suggestion::new(key, insert)
            .with_detail(element.description.clone())
            // Enum values come from a dataset: chain straight into them.
            .retriggering(matches!(self, Handler::Enum))
    }

    /// The completions for this element's value, after a colon or dash.
    pub async fn value(
        &self,
        element: &Element,
        cx: &ValueCx<'_>,
        datasets: &dyn DatasetProvider,
    ) -> Vec<Suggestion> {
        match self {
            Handler::Boolean => boolean_values(cx),
            Handler::Enum => dataset_values(element, cx, datasets).await,
            Handler::List => {
                if element.dataset.is_some() {
                    list_item_values(element, cx, datasets).await
                } else if !element.entries.is_empty() {
                    entry_completions(element, &cx.entry_text, cx, datasets).await
                } else {
                    Vec::new()
                }
            }
            Handler::EntryList => {
                entry_completions(element, &cx.entry_text, cx, datasets).await
            }
            Handler::Key => {
                if element.values.is_empty() {
                    // A bare key has no scalar value of its own.
                    Vec::new()
                } else {
                    static_values(element, cx)
                }
            }
            Handler::KeyList | Handler::Fallback => static_values(element, cx),
        }
    }
}

/// Exactly the two boolean literals, regardless of element
/// configuration.
fn boolean_values(cx: &ValueCx<'_>) -> Vec<Suggestion> {
    ["true", "false"]
        .iter()
        .map(|literal| {
            Suggestion::new(*literal, format!("{}{literal}{}", cx.prefix, cx.suffix))
                .retriggering(cx.retrigger)
        })
        .collect()
}

/// Enumerate a named dataset. Absent dataset, absent entry: no
/// suggestions.
async fn dataset_values(
    element: &Element,
    cx: &ValueCx<'_>,
    datasets: &dyn DatasetProvider,
) -> Vec<Suggestion> {
    let Some(name) = element.dataset.as_deref() else {
        return Vec::new();
    };
    let Some(dataset) = datasets.get_enum(name).await else {
        tracing::debug!(dataset = name, "unknown dataset");
        return Vec::new();
    };
    dataset
        .entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            Suggestion::new(
                entry.literal.clone(),
                format!("{}{}{}", cx.prefix, entry.literal, cx.suffix),
            )
            .with_detail(entry.description.unwrap_or_default())
            .ranked(index)
            .retriggering(cx.retrigger)
        })
        .collect()
}

/// Dataset-driven list items: spacing comes from the list item spacing
/// rule, and declared static values become a trailing choice
/// placeholder.
async fn list_item_values(
    element: &Element,
    cx: &ValueCx<'_>,
    datasets: &dyn DatasetProvider,
) -> Vec<Suggestion> {
    let Some(prefix) = list_item_prefix(cx.line, cx.character, cx.trigger) else {
        return Vec::new();
    };
    let Some(name) = element.dataset.as_deref() else {
        return Vec::new();
    };
    let Some(dataset) = datasets.get_enum(name).await else {
        tracing::debug!(dataset = name, "unknown dataset");
        return Vec::new();
    };
    let choice = if element.values.is_empty() {
        String::new()
    } else {
        format!(" ${{1|{}|}}", element.values.join(","))
    };
    dataset
        .entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            Suggestion::new(
                entry.literal.clone(),
                format!("{prefix}{}{choice}", entry.literal),
            )
            .with_detail(entry.description.unwrap_or_default())
            .ranked(index)
        })
        .collect()
}

/// The element's static values in declaration order, ranked by index so
/// hosts that re-sort lexically still show the declared order.
fn static_values(element: &Element, cx: &ValueCx<'_>) -> Vec<Suggestion> {
    element
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            Suggestion::new(value, format!("{}{value}{}", cx.prefix, cx.suffix))
                .ranked(index)
                .retriggering(cx.retrigger)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Dataset, StaticDatasets};

    fn cx(entry_text: &str, prefix: &str) -> ValueCx<'static> {
        ValueCx {
            prefix: prefix.to_string(),
            suffix: String::new(),
            retrigger: false,
            line: "",
            character: 0,
            trigger: None,
            entry_text: entry_text.to_string(),
        }
    }

    #[tokio::test]
    async fn boolean_is_always_two_candidates() {
        let element = Element::new(ElementKind::Boolean).with_values(["ignored"]);
        let got = Handler::Boolean.value(&element, &cx("", " "), &StaticDatasets::new()).await;
        let labels: Vec<&str> = got.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["true", "false"]);
        assert_eq!(got[0].insert, " true");
    }

    #[tokio::test]
    async fn fallback_preserves_declaration_order() {
        let element = Element::new(ElementKind::Text).with_values(["zulu", "alpha", "mike"]);
        let got = Handler::Fallback.value(&element, &cx("", ""), &StaticDatasets::new()).await;
        let sorts: Vec<&str> = got.iter().map(|s| s.sort_text.as_deref().unwrap()).collect();
        assert_eq!(sorts, ["000", "001", "002"]);
    }

    #[tokio::test]
    async fn bare_key_has_no_value_completions() {
        let element = Element::new(ElementKind::Key);
        let got = Handler::Key.value(&element, &cx("", ""), &StaticDatasets::new()).await;
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn enum_without_dataset_is_silent() {
        let element = Element::new(ElementKind::Enum);
        let got = Handler::Enum.value(&element, &cx("", ""), &StaticDatasets::new()).await;
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn enum_values_carry_spacing_and_detail() {
        let datasets = StaticDatasets::new()
            .with("devices", Dataset::from_pairs([("lamp", "Desk lamp")]));
        let element = Element::new(ElementKind::Enum).with_dataset("devices");
        let mut context = cx("", " ");
        context.suffix = " ".to_string();
        let got = Handler::Enum.value(&element, &context, &datasets).await;
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].insert, " lamp ");
        assert_eq!(got[0].detail.as_deref(), Some("Desk lamp"));
    }

    #[test]
    fn structure_templates() {
        let scx = StructureCx {
            lead: String::new(),
            cont: "  ".to_string(),
            cont_deeper: "    ".to_string(),
        };
        let element = Element::default();
        assert_eq!(
            Handler::Boolean.structure("Enabled", &element, &scx).insert,
            "Enabled: ${1|true,false|}"
        );
        assert_eq!(
            Handler::List.structure("Actions", &element, &scx).insert,
            "Actions:\n  - $0"
        );
        assert_eq!(
            Handler::KeyList.structure("Options", &element, &scx).insert,
            "Options:\n    ${1:key}: ${2:value}"
        );
        assert!(Handler::Enum.structure("Device", &element, &scx).retrigger);
    }
}
