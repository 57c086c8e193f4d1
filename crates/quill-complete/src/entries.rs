//! Entry-list resolution.
//!
//! An entry list packs an ordered, fixed-arity sequence of typed slots
//! into one space-delimited token (`mechanic target amount`). Slot
//! boundaries are whitespace, so the resolver has to decide which slot
//! the cursor occupies from the raw text before it, treating
//! brace-delimited inline expressions as opaque single fragments.

use quill_schema::Element;

use crate::handlers::{Handler, ValueCx};
use crate::providers::DatasetProvider;
use crate::suggest::Suggestion;

/// Collapse brace-delimited groups so their interior spaces cannot be
/// mistaken for slot boundaries. Balanced groups become `{}`; an
/// unterminated group swallows the rest of the text into a single `{`
/// fragment (the cursor is inside it).
pub fn opaque_braces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '{' => {
                if depth == 0 {
                    out.push('{');
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        out.push('}');
                    }
                } else {
                    out.push('}');
                }
            }
            _ if depth > 0 => {}
            _ => out.push(ch),
        }
    }
    out
}

/// The zero-based slot index the cursor currently occupies, given the
/// entry portion of the line up to the cursor.
///
/// A fragment still being typed counts as the current slot: the first
/// slot is re-offered until a space is typed after it. A trailing space
/// advances to the next slot. An empty portion is slot 0.
pub fn entry_index(entry_text: &str) -> usize {
    let collapsed = opaque_braces(entry_text);
    let text = collapsed.trim_start();
    if text.is_empty() {
        return 0;
    }
    let fragments = text.split_whitespace().count();
    if text.ends_with(char::is_whitespace) {
        fragments
    } else {
        fragments.saturating_sub(1)
    }
}

/// Resolve value completions for the slot under the cursor.
///
/// `entry_text` is the already-extracted entry portion of the line (the
/// caller strips the key or the list dash). Dispatches to the declared
/// slot type's own handler, with a one-space suffix and a re-trigger
/// directive whenever a further slot exists, so accepting slot `i`
/// immediately reopens suggestions for slot `i + 1`.
pub fn entry_completions<'a>(
    element: &'a Element,
    entry_text: &'a str,
    cx: &'a ValueCx<'a>,
    datasets: &'a dyn DatasetProvider,
) -> std::pin::Pin<Box<dyn Future<Output = Vec<Suggestion>> + Send + 'a>> {
    // Boxed: a slot may itself be an entry list, which recurses here.
    Box::pin(async move {
        if element.entries.is_empty() {
            return Vec::new();
        }
        let index = entry_index(entry_text);
        let Some(slot) = element.entries.get(index) else {
            tracing::trace!(index, arity = element.entries.len(), "cursor beyond declared slots");
            return Vec::new();
        };
        let has_next = index + 1 < element.entries.len();
        let slot_cx = cx.for_slot(has_next);

        let handler = Handler::for_kind(slot.kind);
        handler.value(slot, &slot_cx, datasets).await
    })
}
