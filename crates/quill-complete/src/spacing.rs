//! List item spacing rule.
//!
//! Decides how many literal spaces must precede a dataset-driven list
//! item value, or declines when the line already carries a complete
//! first token.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::before_cursor;

// Leading space, dash, optional space, one non-space run, trailing
// space: the user has already typed a complete first token.
static COMPLETED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s?\S+\s").expect("completed item pattern"));

/// The space prefix to insert before a list-item value, or `None` to
/// decline completing here.
///
/// `trigger` is the explicit trigger character, when completion was
/// invoked by one.
pub fn list_item_prefix(line: &str, character: u32, trigger: Option<char>) -> Option<String> {
    if COMPLETED_ITEM.is_match(line) {
        return None;
    }

    let before = before_cursor(line, character);

    match trigger {
        None => {
            // Manual invocation: only complete right after the dash.
            let last_non_space = before.chars().rev().find(|c| *c != ' ')?;
            if last_non_space != '-' {
                return None;
            }
            if before.ends_with('-') {
                // Cursor sits on the dash itself.
                Some(" ".to_string())
            } else {
                // Already one space past the dash.
                Some(String::new())
            }
        }
        Some(trigger) => {
            // Triggered invocation: require exactly "- " before the
            // cursor.
            if !before.ends_with("- ") {
                return None;
            }
            if trigger == ' ' {
                Some(String::new())
            } else {
                Some(" ".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declines_when_first_token_is_complete() {
        assert_eq!(list_item_prefix("  - item ", 5, None), None);
        assert_eq!(list_item_prefix("  - item ", 9, Some(' ')), None);
    }

    #[test]
    fn one_space_right_after_the_dash() {
        assert_eq!(list_item_prefix("  -", 3, None), Some(" ".to_string()));
    }

    #[test]
    fn empty_prefix_one_space_past_the_dash() {
        assert_eq!(list_item_prefix("  - ", 4, None), Some(String::new()));
    }

    #[test]
    fn space_trigger_after_dash_space() {
        assert_eq!(list_item_prefix("  - ", 4, Some(' ')), Some(String::new()));
    }

    #[test]
    fn trigger_requires_dash_space() {
        assert_eq!(list_item_prefix("  -", 3, Some(' ')), None);
        assert_eq!(list_item_prefix("  x ", 4, Some(' ')), None);
    }

    #[test]
    fn declines_away_from_the_dash() {
        assert_eq!(list_item_prefix("  x", 3, None), None);
        assert_eq!(list_item_prefix("", 0, None), None);
    }
}
