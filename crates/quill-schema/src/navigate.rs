//! Schema navigation.
//!
//! Maps an ancestor key chain (derived from the document's indentation
//! nesting) onto a node in the schema tree. [`locate`] drives structure
//! completions: it returns the branching point or element governing the
//! cursor's nesting level, together with that level. [`lookup`] drives
//! value completions: it returns the terminal element for an exact path,
//! ignoring depth truncation.
//!
//! Both return `None` for any path the schema has no knowledge of; there
//! is no error variant, a miss simply produces no suggestions.

use crate::types::{Element, ElementKind, Schema};

/// One step of an ancestor key chain: the key text and the document line
/// it was found on. Chains are ordered outermost-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStep {
    pub key: String,
    pub line: u32,
}

impl KeyStep {
    pub fn new(key: impl Into<String>, line: u32) -> Self {
        KeyStep {
            key: key.into(),
            line,
        }
    }
}

/// Result of [`locate`]: where in the schema the cursor's nesting level
/// lands.
#[derive(Debug)]
pub enum Located<'a> {
    /// A branching point: an untyped schema whose child keys are the
    /// structure completions.
    Branch { schema: &'a Schema, level: usize },
    /// A single element (list, key list, or scalar leaf). For array-key
    /// matches this is a fresh element carrying the per-key override.
    Node { element: Element, level: usize },
}

impl Located<'_> {
    pub fn level(&self) -> usize {
        match self {
            Located::Branch { level, .. } | Located::Node { level, .. } => *level,
        }
    }
}

/// Walk `chain` down `schema` and return the node governing the chain's
/// innermost level.
///
/// An empty chain resolves to the root schema at level 0. A `Key`
/// element with nested keys is descended through (level + 1), unless it
/// declares `max_depth`, in which case its immediate nested schema is
/// returned and the rest of the chain is ignored. `KeyList` stops at the
/// element itself (level + 1); `List` stops at the element at the *same*
/// level, since list items sit at their key's indentation. Keys not
/// found verbatim fall back to the wildcard node, then to the array-keys
/// node.
pub fn locate<'a>(schema: &'a Schema, chain: &[KeyStep]) -> Option<Located<'a>> {
    locate_at(schema, chain, 0)
}

fn locate_at<'a>(schema: &'a Schema, chain: &[KeyStep], level: usize) -> Option<Located<'a>> {
    let Some((head, rest)) = chain.split_first() else {
        return Some(Located::Branch { schema, level });
    };

    if let Some(element) = schema.get(&head.key) {
        return descend(element, None, rest, level);
    }

    // The wildcard absorbs any key name.
    if let Some(wildcard) = schema.wildcard() {
        return descend(wildcard, None, rest, level);
    }

    // Array keys admit a computed family of literals; matches resolve to
    // a fresh element with the per-key override applied.
    if let Some(array) = schema.array() {
        if let Some(fresh) = array.element_for(&head.key) {
            return descend(array.base(), Some(fresh), rest, level);
        }
    }

    tracing::trace!(key = %head.key, level, "key chain does not resolve");
    None
}

/// Descend one matched element. `canonical` is the schema-owned node
/// (used for further navigation); `fresh` is an override-carrying copy
/// returned in its place when the walk terminates here.
fn descend<'a>(
    canonical: &'a Element,
    fresh: Option<Element>,
    rest: &[KeyStep],
    level: usize,
) -> Option<Located<'a>> {
    let terminal = || fresh.clone().unwrap_or_else(|| canonical.clone());

    match canonical.kind {
        ElementKind::Key => {
            if let Some(keys) = &canonical.keys {
                // A depth cap means this subtree structurally repeats:
                // completion never unfolds it past one level.
                if canonical.max_depth.is_some() {
                    return Some(Located::Branch {
                        schema: keys,
                        level: level + 1,
                    });
                }
                return locate_at(keys, rest, level + 1);
            }
            if rest.is_empty() {
                return Some(Located::Node {
                    element: terminal(),
                    level: level + 1,
                });
            }
            None
        }
        // KeyList children are not statically enumerable: stop here.
        ElementKind::KeyList => Some(Located::Node {
            element: terminal(),
            level: level + 1,
        }),
        // List items are indentation siblings of the list key.
        ElementKind::List => Some(Located::Node {
            element: terminal(),
            level,
        }),
        _ => {
            if rest.is_empty() {
                return Some(Located::Node {
                    element: terminal(),
                    level: level + 1,
                });
            }
            None
        }
    }
}

/// Exact-path lookup of the terminal element for value completions.
///
/// Wildcard and array-key expansion apply exactly as in [`locate`], but
/// `max_depth` truncation does not: value mode needs the element the
/// chain actually names, not a containing branch.
pub fn lookup(schema: &Schema, chain: &[KeyStep]) -> Option<Element> {
    let (head, rest) = chain.split_first()?;

    if let Some(element) = schema.get(&head.key) {
        return lookup_in(element, None, rest);
    }
    if let Some(wildcard) = schema.wildcard() {
        return lookup_in(wildcard, None, rest);
    }
    if let Some(array) = schema.array() {
        if let Some(fresh) = array.element_for(&head.key) {
            return lookup_in(array.base(), Some(fresh), rest);
        }
    }
    None
}

fn lookup_in(canonical: &Element, fresh: Option<Element>, rest: &[KeyStep]) -> Option<Element> {
    if rest.is_empty() {
        return Some(fresh.unwrap_or_else(|| canonical.clone()));
    }
    let keys = canonical.keys.as_ref()?;
    lookup(keys, rest)
}
