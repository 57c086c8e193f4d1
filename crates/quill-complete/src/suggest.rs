//! Completion suggestions.

/// One completion candidate.
///
/// `insert` is a snippet template: `$0`/`${n:placeholder}` caret stops
/// and `${n|a,b|}` choice placeholders, in the common editor snippet
/// syntax. `retrigger` asks the host to reopen completions immediately
/// after the suggestion is accepted (chained positional slots rely on
/// this).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub label: String,
    pub detail: Option<String>,
    pub insert: String,
    pub sort_text: Option<String>,
    pub retrigger: bool,
}

impl Suggestion {
    pub fn new(label: impl Into<String>, insert: impl Into<String>) -> Self {
        Suggestion {
            label: label.into(),
            detail: None,
            insert: insert.into(),
            sort_text: None,
            retrigger: false,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if !detail.is_empty() {
            self.detail = Some(detail);
        }
        self
    }

    /// Rank by declaration order: hosts that re-sort lexically still see
    /// the declared order through the zero-padded sort key.
    pub fn ranked(mut self, index: usize) -> Self {
        self.sort_text = Some(format!("{index:03}"));
        self
    }

    pub fn retriggering(mut self, retrigger: bool) -> Self {
        self.retrigger = retrigger;
        self
    }
}
