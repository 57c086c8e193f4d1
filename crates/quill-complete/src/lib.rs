//! Quill completion engine.
//!
//! Given a partially-typed indentation-structured document, a cursor
//! position, and a schema, produces the ranked list of suggestions the
//! user is syntactically allowed to type next — key/structure templates
//! on blank lines, values after colons and dashes, and
//! position-dependent completions inside space-delimited entry lists.
//!
//! The engine is stateless per request and never errors: every failure
//! mode yields an empty suggestion list.

pub mod context;
pub mod entries;
pub mod handlers;
pub mod providers;
pub mod resolve;
pub mod spacing;
pub mod suggest;

pub use context::{DocumentSource, Position, TextDocument};
pub use providers::{
    AllPlugins, Dataset, DatasetEntry, DatasetProvider, EnabledPlugins, PluginGates,
    StaticDatasets,
};
pub use resolve::{CompletionRequest, Trigger, resolve};
pub use suggest::Suggestion;
