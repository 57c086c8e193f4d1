//! Schema type definitions.
//!
//! A schema describes the valid structure of an indentation-significant
//! document: which keys may appear at each nesting level, what kind of
//! value each key carries, and where dynamic (wildcard / numbered) keys
//! are admitted. Schemas are built in code or deserialized from JSON.

use std::fmt;

use serde::Deserialize;
use serde::de::{MapAccess, Visitor};

/// The kind tag of a schema element.
///
/// Unrecognized tags deserialize to [`ElementKind::Text`], which is also
/// the default for untyped elements; the handler registry treats it as
/// the fallback kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementKind {
    /// A `true`/`false` scalar.
    Boolean,
    /// A scalar drawn from an externally resolved dataset.
    Enum,
    /// A dash-prefixed list. Items are either dataset values or
    /// positional entry lists.
    List,
    /// A space-delimited sequence of typed slots packed into one token.
    EntryList,
    /// A key introducing nested structure.
    Key,
    /// A dynamic map: user-chosen keys, statically unknowable.
    KeyList,
    /// Plain text (the untyped default).
    #[default]
    #[serde(other)]
    Text,
}

/// One node in the schema tree.
///
/// Only the fields relevant to `kind` are meaningful; unused fields are
/// ignored rather than rejected, so a schema author can annotate freely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Element kind, driving handler dispatch.
    #[serde(rename = "type", default)]
    pub kind: ElementKind,
    /// Human-readable description, shown as completion detail.
    #[serde(default)]
    pub description: String,
    /// Static enumerable values, in declaration order.
    #[serde(default)]
    pub values: Vec<String>,
    /// Name of an externally resolved enumeration.
    #[serde(default)]
    pub dataset: Option<String>,
    /// Nested schema for `Key` / `KeyList` elements.
    #[serde(default)]
    pub keys: Option<Schema>,
    /// Ordered slot types for positional entry lists.
    #[serde(default)]
    pub entries: Vec<Element>,
    /// Caps recursive key expansion: navigation into this element stops
    /// at its immediate nested schema.
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Enablement gate: the element is only active when the named
    /// plugin is enabled. Ungated elements are always active.
    #[serde(default)]
    pub plugin: Option<String>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Element {
            kind,
            ..Element::default()
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dataset(mut self, name: impl Into<String>) -> Self {
        self.dataset = Some(name.into());
        self
    }

    pub fn with_keys(mut self, keys: Schema) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn with_entries<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = Element>,
    {
        self.entries = entries.into_iter().collect();
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn gated(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }
}

/// The key space of one nesting level.
///
/// Three variants of "what can appear as a key here" coexist: named keys
/// (declaration-ordered, order is the suggestion order), an optional
/// wildcard node absorbing any key the user types, and an optional
/// array-keys node admitting a small computed family of literal keys.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    named: Vec<(String, Element)>,
    wildcard: Option<Box<Element>>,
    array: Option<Box<ArrayKeys>>,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    /// Add a named key. Builder-style, preserves insertion order.
    pub fn with_key(mut self, name: impl Into<String>, element: Element) -> Self {
        self.named.push((name.into(), element));
        self
    }

    /// Set the wildcard node.
    pub fn with_wildcard(mut self, element: Element) -> Self {
        self.wildcard = Some(Box::new(element));
        self
    }

    /// Set the array-keys node.
    pub fn with_array(mut self, array: ArrayKeys) -> Self {
        self.array = Some(Box::new(array));
        self
    }

    /// Look up a named key verbatim.
    pub fn get(&self, key: &str) -> Option<&Element> {
        self.named
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, element)| element)
    }

    /// Named keys in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.named
            .iter()
            .map(|(name, element)| (name.as_str(), element))
    }

    pub fn wildcard(&self) -> Option<&Element> {
        self.wildcard.as_deref()
    }

    pub fn array(&self) -> Option<&ArrayKeys> {
        self.array.as_deref()
    }

    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.wildcard.is_none() && self.array.is_none()
    }
}

/// An array-keys node: a closed family of admissible literal keys plus
/// the element they all share.
///
/// `{key}` in the base element's description is substituted with the
/// concrete key, so every admissible key gets its own description.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrayKeys {
    /// How the admissible key set is computed.
    pub keys: ArrayKeySet,
    /// The element backing every admissible key.
    pub element: Element,
}

/// The admissible key set of an [`ArrayKeys`] node.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArrayKeySet {
    /// An explicit list of keys.
    Literal(Vec<String>),
    /// Numbered keys `prefix{start}` through `prefix{end}` inclusive.
    Numbered { prefix: String, start: u32, end: u32 },
}

impl ArrayKeys {
    /// Whether `key` belongs to the admissible set.
    pub fn contains(&self, key: &str) -> bool {
        match &self.keys {
            ArrayKeySet::Literal(keys) => keys.iter().any(|k| k == key),
            ArrayKeySet::Numbered { prefix, start, end } => key
                .strip_prefix(prefix.as_str())
                .and_then(|n| n.parse::<u32>().ok())
                .is_some_and(|n| (*start..=*end).contains(&n)),
        }
    }

    /// Enumerate the admissible keys.
    pub fn possible_keys(&self) -> Vec<String> {
        match &self.keys {
            ArrayKeySet::Literal(keys) => keys.clone(),
            ArrayKeySet::Numbered { prefix, start, end } => {
                (*start..=*end).map(|n| format!("{prefix}{n}")).collect()
            }
        }
    }

    /// Produce a fresh element for one admissible key, with the per-key
    /// description substituted. The canonical element is never mutated.
    pub fn element_for(&self, key: &str) -> Option<Element> {
        if !self.contains(key) {
            return None;
        }
        let mut element = self.element.clone();
        if element.description.contains("{key}") {
            element.description = element.description.replace("{key}", key);
        }
        Some(element)
    }

    /// The canonical (un-overridden) element.
    pub fn base(&self) -> &Element {
        &self.element
    }
}

// The on-disk form of a schema is a JSON object mapping key names to
// elements, with two reserved keys: "$any" (wildcard) and "$array".
// A hand-written visitor keeps declaration order without pulling in an
// order-preserving map.
impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SchemaVisitor;

        impl<'de> Visitor<'de> for SchemaVisitor {
            type Value = Schema;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of key names to schema elements")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Schema, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut schema = Schema::new();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "$any" => {
                            schema.wildcard = Some(Box::new(map.next_value()?));
                        }
                        "$array" => {
                            schema.array = Some(Box::new(map.next_value()?));
                        }
                        _ => {
                            let element = map.next_value()?;
                            schema.named.push((key, element));
                        }
                    }
                }
                Ok(schema)
            }
        }

        deserializer.deserialize_map(SchemaVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_deserialize() {
        let kind: ElementKind = serde_json::from_str("\"ENTRY_LIST\"").unwrap();
        assert_eq!(kind, ElementKind::EntryList);

        // Unknown tags fall back to Text
        let kind: ElementKind = serde_json::from_str("\"FROBNICATOR\"").unwrap();
        assert_eq!(kind, ElementKind::Text);
    }

    #[test]
    fn schema_preserves_declaration_order() {
        let schema: Schema = serde_json::from_str(
            r#"{
                "zebra": { "type": "KEY" },
                "apple": { "type": "BOOLEAN" },
                "mango": {}
            }"#,
        )
        .unwrap();

        let keys: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(keys, ["zebra", "apple", "mango"]);
        assert_eq!(schema.get("apple").unwrap().kind, ElementKind::Boolean);
        assert_eq!(schema.get("mango").unwrap().kind, ElementKind::Text);
    }

    #[test]
    fn reserved_keys_become_variants() {
        let schema: Schema = serde_json::from_str(
            r#"{
                "$any": { "type": "KEY", "keys": { "inner": {} } },
                "$array": {
                    "keys": { "prefix": "slot", "start": 0, "end": 2 },
                    "element": { "description": "Slot {key}" }
                }
            }"#,
        )
        .unwrap();

        assert!(schema.wildcard().is_some());
        let array = schema.array().unwrap();
        assert!(array.contains("slot1"));
        assert!(!array.contains("slot3"));
        assert_eq!(
            array.element_for("slot2").unwrap().description,
            "Slot slot2"
        );
        // The canonical element keeps its template untouched
        assert_eq!(array.base().description, "Slot {key}");
    }

    #[test]
    fn numbered_keys_enumerate() {
        let array = ArrayKeys {
            keys: ArrayKeySet::Numbered {
                prefix: "slot".into(),
                start: 0,
                end: 2,
            },
            element: Element::default(),
        };
        assert_eq!(array.possible_keys(), ["slot0", "slot1", "slot2"]);
        assert!(array.element_for("slotx").is_none());
    }
}
