//! Document context extraction.
//!
//! Purely textual questions about a document and cursor position: line
//! kind, indentation, ancestor key chain, text before the cursor. No
//! schema knowledge lives here.

use once_cell::sync::Lazy;
use regex::Regex;

use quill_schema::KeyStep;

/// A cursor position: zero-based line and character (char offset, not
/// byte offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// Read access to the host's document. Line-oriented by design: the
/// engine performs local, cursor-anchored inference only.
pub trait DocumentSource: Sync {
    fn line_count(&self) -> u32;
    /// The text of one line, without its trailing newline.
    fn line(&self, index: u32) -> Option<&str>;
    /// Document identity, as an opaque string.
    fn uri(&self) -> &str;
}

/// Plain in-memory document.
#[derive(Debug, Clone)]
pub struct TextDocument {
    uri: String,
    lines: Vec<String>,
}

impl TextDocument {
    pub fn new(uri: impl Into<String>, text: &str) -> Self {
        TextDocument {
            uri: uri.into(),
            lines: text.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect(),
        }
    }
}

impl DocumentSource for TextDocument {
    fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    fn line(&self, index: u32) -> Option<&str> {
        self.lines.get(index as usize).map(String::as_str)
    }

    fn uri(&self) -> &str {
        &self.uri
    }
}

static KEY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([A-Za-z0-9_\-]+)\s*:").expect("key line pattern"));
static LIST_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*-").expect("list line pattern"));

/// The shape of the line under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only.
    Blank,
    /// `key:` optionally followed by a value.
    Key,
    /// A dash-prefixed list item.
    ListItem,
    /// Anything else.
    Other,
}

pub fn line_kind(line: &str) -> LineKind {
    if line.trim().is_empty() {
        LineKind::Blank
    } else if LIST_LINE.is_match(line) {
        LineKind::ListItem
    } else if KEY_LINE.is_match(line) {
        LineKind::Key
    } else {
        LineKind::Other
    }
}

/// Width of the leading space run.
pub fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

/// The key introduced by a key line, if any.
pub fn key_of_line(line: &str) -> Option<&str> {
    KEY_LINE
        .captures(line)
        .and_then(|c| c.get(2))
        .map(|m| m.as_str())
}

/// The text of the cursor's line up to the cursor, char-safe.
pub fn before_cursor(line: &str, character: u32) -> &str {
    match line.char_indices().nth(character as usize) {
        Some((byte, _)) => &line[..byte],
        None => line,
    }
}

/// The document's indentation unit: the smallest non-zero indent of any
/// key line, defaulting to 2.
pub fn indent_unit(doc: &dyn DocumentSource) -> usize {
    let mut unit = None;
    for index in 0..doc.line_count() {
        let Some(line) = doc.line(index) else { continue };
        if key_of_line(line).is_none() {
            continue;
        }
        let width = indent_width(line);
        if width > 0 && unit.is_none_or(|u| width < u) {
            unit = Some(width);
        }
    }
    unit.unwrap_or(2)
}

/// Ancestor key chain for a blank line: the chain of key lines enclosing
/// the cursor, outermost first. The nearest key line above the cursor
/// (at any indentation) opens the chain; each further ancestor must sit
/// at strictly lower indentation.
pub fn ancestor_keys(doc: &dyn DocumentSource, position: Position) -> Vec<KeyStep> {
    collect_ancestors(doc, position.line, usize::MAX)
}

/// Ancestor chain for a key line, including the in-progress line's own
/// key as the chain tail.
pub fn ancestor_keys_with_self(doc: &dyn DocumentSource, position: Position) -> Vec<KeyStep> {
    let Some(line) = doc.line(position.line) else {
        return Vec::new();
    };
    let Some(key) = key_of_line(line) else {
        return Vec::new();
    };
    let mut chain = collect_ancestors(doc, position.line, indent_width(line));
    chain.push(KeyStep::new(key, position.line));
    chain
}

/// Ancestor chain for a list-item line. List items sit at the same
/// indentation as their key, so the first ancestor may be at equal
/// indentation.
pub fn ancestor_keys_for_list(doc: &dyn DocumentSource, position: Position) -> Vec<KeyStep> {
    let Some(line) = doc.line(position.line) else {
        return Vec::new();
    };
    collect_ancestors(doc, position.line, indent_width(line) + 1)
}

fn collect_ancestors(doc: &dyn DocumentSource, from_line: u32, start_indent: usize) -> Vec<KeyStep> {
    let mut chain = Vec::new();
    let mut indent = start_indent;
    let mut index = from_line;
    while index > 0 {
        index -= 1;
        let Some(line) = doc.line(index) else { continue };
        if line.trim().is_empty() {
            continue;
        }
        let width = indent_width(line);
        if width >= indent {
            continue;
        }
        if let Some(key) = key_of_line(line) {
            chain.push(KeyStep::new(key, index));
            indent = width;
            if width == 0 {
                break;
            }
        }
    }
    chain.reverse();
    chain
}

/// Which part of the line carries the value being completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueScope {
    /// Everything after the first colon.
    AfterColon,
    /// Everything after the leading dash.
    AfterDash,
}

/// Extract the in-progress value portion from the text before the
/// cursor. Returns `None` when the separator has not been typed yet
/// (the cursor is still on the key / before the dash).
pub fn value_portion(before: &str, scope: ValueScope) -> Option<&str> {
    match scope {
        ValueScope::AfterColon => before.split_once(':').map(|(_, rest)| rest),
        ValueScope::AfterDash => before.split_once('-').map(|(_, rest)| rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> TextDocument {
        TextDocument::new("file:///test.yml", text)
    }

    fn keys(chain: &[KeyStep]) -> Vec<&str> {
        chain.iter().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn line_kinds() {
        assert_eq!(line_kind(""), LineKind::Blank);
        assert_eq!(line_kind("    "), LineKind::Blank);
        assert_eq!(line_kind("  Damage: 4"), LineKind::Key);
        assert_eq!(line_kind("- something"), LineKind::ListItem);
        assert_eq!(line_kind("  - x: y"), LineKind::ListItem);
        assert_eq!(line_kind("???"), LineKind::Other);
    }

    #[test]
    fn detects_indent_unit() {
        let d = doc("a:\n    b:\n        c: 1\n");
        assert_eq!(indent_unit(&d), 4);
        let d = doc("a: 1\nb: 2\n");
        assert_eq!(indent_unit(&d), 2, "no indentation falls back to 2");
    }

    #[test]
    fn ancestors_on_blank_line() {
        let d = doc("key1:\n  subkey1:\n");
        let chain = ancestor_keys(&d, Position::new(2, 0));
        assert_eq!(keys(&chain), ["key1", "subkey1"]);
    }

    #[test]
    fn nearest_block_wins() {
        let d = doc("key1:\n  subkey1:\n  other: x\n");
        let chain = ancestor_keys(&d, Position::new(3, 0));
        assert_eq!(keys(&chain), ["key1", "other"]);
    }

    #[test]
    fn ancestors_skip_blank_and_list_lines() {
        let d = doc("root:\n  items:\n  - one\n\n");
        let chain = ancestor_keys(&d, Position::new(4, 0));
        assert_eq!(keys(&chain), ["root", "items"]);
    }

    #[test]
    fn chain_includes_current_key_line() {
        let d = doc("rule:\n  Device: la\n");
        let chain = ancestor_keys_with_self(&d, Position::new(1, 12));
        assert_eq!(keys(&chain), ["rule", "Device"]);
    }

    #[test]
    fn list_chain_admits_equal_indent_key() {
        let d = doc("rule:\n  Actions:\n  - notify\n");
        let chain = ancestor_keys_for_list(&d, Position::new(2, 8));
        assert_eq!(keys(&chain), ["rule", "Actions"]);
    }

    #[test]
    fn value_portions() {
        assert_eq!(value_portion("Device: la", ValueScope::AfterColon), Some(" la"));
        assert_eq!(value_portion("Device", ValueScope::AfterColon), None);
        assert_eq!(value_portion("  - notify ", ValueScope::AfterDash), Some(" notify "));
    }

    #[test]
    fn before_cursor_is_char_safe() {
        assert_eq!(before_cursor("héllo", 2), "hé");
        assert_eq!(before_cursor("ab", 10), "ab");
    }
}
