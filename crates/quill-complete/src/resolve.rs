//! Resolution entry point.
//!
//! Decides structure-vs-value mode from the cursor's line, resolves the
//! governing schema node, and dispatches to the element handlers. Every
//! failure mode (unknown path, disabled plugin, missing context,
//! malformed element) collapses into an empty suggestion list; a
//! completion request can never error.

use quill_schema::{Element, Located, Schema, locate, lookup};

use crate::context::{
    DocumentSource, LineKind, Position, ValueScope, ancestor_keys, ancestor_keys_for_list,
    ancestor_keys_with_self, before_cursor, indent_unit, line_kind, value_portion,
};
use crate::handlers::{Handler, StructureCx, ValueCx};
use crate::providers::{DatasetProvider, PluginGates};
use crate::suggest::Suggestion;

/// How completion was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Explicit request (manual invocation).
    Invoked,
    /// Typed trigger character.
    Character(char),
    /// Host-initiated re-query; only structure mode answers these.
    Automatic,
}

impl Trigger {
    fn character(self) -> Option<char> {
        match self {
            Trigger::Character(c) => Some(c),
            _ => None,
        }
    }

    fn is_explicit(self) -> bool {
        !matches!(self, Trigger::Automatic)
    }
}

/// One completion request. All working data is call-local; the engine
/// holds no state across requests.
#[derive(Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub document: &'a dyn DocumentSource,
    pub position: Position,
    pub trigger: Trigger,
}

/// Resolve the ordered suggestion list for a request. Empty means "no
/// suggestions".
pub async fn resolve(
    request: &CompletionRequest<'_>,
    schema: &Schema,
    datasets: &dyn DatasetProvider,
    gates: &dyn PluginGates,
) -> Vec<Suggestion> {
    let document = request.document;
    let position = request.position;
    let Some(line) = document.line(position.line) else {
        return Vec::new();
    };

    match line_kind(line) {
        LineKind::Blank => structure_completions(request, schema, gates),
        LineKind::Key if request.trigger.is_explicit() => {
            value_completions(request, line, ValueScope::AfterColon, schema, datasets, gates)
                .await
        }
        LineKind::ListItem if request.trigger.is_explicit() => {
            value_completions(request, line, ValueScope::AfterDash, schema, datasets, gates)
                .await
        }
        _ => Vec::new(),
    }
}

/// Structure mode: the cursor is on a blank line, suggest what may
/// start here.
fn structure_completions(
    request: &CompletionRequest<'_>,
    schema: &Schema,
    gates: &dyn PluginGates,
) -> Vec<Suggestion> {
    let document = request.document;
    let chain = ancestor_keys(document, request.position);
    if !chain_gate_ok(schema, &chain, gates) {
        return Vec::new();
    }
    let Some(located) = locate(schema, &chain) else {
        tracing::debug!(chain = chain.len(), "no schema node for cursor");
        return Vec::new();
    };

    let unit = indent_unit(document);
    let line = document.line(request.position.line).unwrap_or_default();
    let before = before_cursor(line, request.position.character);
    let typed_cols = before.chars().count();
    let typed_units = typed_cols / unit;

    // Compensate when the physical indentation lags the schema's
    // expected nesting.
    let level = located.level();
    let lead = " ".repeat(level.saturating_sub(typed_units) * unit);
    let cont = " ".repeat(typed_cols + lead.len());
    let cx = StructureCx {
        cont_deeper: format!("{cont}{}", " ".repeat(unit)),
        cont,
        lead,
    };

    match located {
        Located::Branch { schema, .. } => branch_completions(schema, &cx, gates),
        Located::Node { element, .. } => match Handler::for_kind(element.kind) {
            Handler::List => vec![
                Suggestion::new("-", format!("{}- $0", cx.lead))
                    .with_detail(element.description.clone()),
            ],
            Handler::KeyList => vec![
                Suggestion::new(
                    "key: value",
                    format!("{}${{1:key}}: ${{2:value}}", cx.lead),
                )
                .with_detail(element.description.clone()),
            ],
            _ => Vec::new(),
        },
    }
}

/// One structure completion per child key of a branching point, plus
/// wildcard and array-key expansions.
fn branch_completions(
    schema: &Schema,
    cx: &StructureCx,
    gates: &dyn PluginGates,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (key, element) in schema.iter() {
        if !gate_ok(element, gates) {
            continue;
        }
        let index = suggestions.len();
        suggestions.push(
            Handler::for_kind(element.kind)
                .structure(key, element, cx)
                .ranked(index),
        );
    }

    if let Some(wildcard) = schema.wildcard() {
        if gate_ok(wildcard, gates) {
            let insert = if wildcard.keys.is_some() {
                format!("{}${{1:name}}:\n{}$0", cx.lead, cx.cont_deeper)
            } else {
                format!("{}${{1:name}}: $0", cx.lead)
            };
            let index = suggestions.len();
            suggestions.push(
                Suggestion::new("<name>", insert)
                    .with_detail(wildcard.description.clone())
                    .ranked(index),
            );
        }
    }

    if let Some(array) = schema.array() {
        for key in array.possible_keys() {
            let Some(element) = array.element_for(&key) else {
                continue;
            };
            if !gate_ok(&element, gates) {
                continue;
            }
            let index = suggestions.len();
            suggestions.push(
                Handler::for_kind(element.kind)
                    .structure(&key, &element, cx)
                    .ranked(index),
            );
        }
    }

    suggestions
}

/// Value mode: the cursor follows a colon or dash on an explicit
/// invocation.
async fn value_completions(
    request: &CompletionRequest<'_>,
    line: &str,
    scope: ValueScope,
    schema: &Schema,
    datasets: &dyn DatasetProvider,
    gates: &dyn PluginGates,
) -> Vec<Suggestion> {
    let document = request.document;
    let position = request.position;

    let chain = match scope {
        ValueScope::AfterColon => ancestor_keys_with_self(document, position),
        ValueScope::AfterDash => ancestor_keys_for_list(document, position),
    };
    if chain.is_empty() || !chain_gate_ok(schema, &chain, gates) {
        return Vec::new();
    }
    let Some(element) = lookup(schema, &chain) else {
        tracing::debug!("no terminal element for cursor path");
        return Vec::new();
    };
    if !gate_ok(&element, gates) {
        return Vec::new();
    }

    let before = before_cursor(line, position.character);
    // The separator must already be typed, and be before the cursor.
    let Some(portion) = value_portion(before, scope) else {
        return Vec::new();
    };

    let cx = ValueCx {
        prefix: if portion.is_empty() { " " } else { "" }.to_string(),
        suffix: String::new(),
        retrigger: false,
        line,
        character: position.character,
        trigger: request.trigger.character(),
        entry_text: portion.to_string(),
    };

    Handler::for_kind(element.kind)
        .value(&element, &cx, datasets)
        .await
}

fn gate_ok(element: &Element, gates: &dyn PluginGates) -> bool {
    element
        .plugin
        .as_deref()
        .is_none_or(|plugin| gates.is_enabled(plugin))
}

/// Walk the chain and verify every matched element's plugin gate. A
/// disabled gate anywhere along the path hides the whole branch.
fn chain_gate_ok(schema: &Schema, chain: &[quill_schema::KeyStep], gates: &dyn PluginGates) -> bool {
    let mut current = schema;
    for step in chain {
        let element = if let Some(element) = current.get(&step.key) {
            element
        } else if let Some(wildcard) = current.wildcard() {
            wildcard
        } else if let Some(array) = current.array() {
            if !array.contains(&step.key) {
                return true; // unmatched: locate/lookup will miss anyway
            }
            array.base()
        } else {
            return true;
        };
        if !gate_ok(element, gates) {
            return false;
        }
        match &element.keys {
            Some(keys) => current = keys,
            None => break,
        }
    }
    true
}
