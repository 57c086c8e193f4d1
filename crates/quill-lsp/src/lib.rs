//! Quill language server
//!
//! LSP server for indentation-structured rule documents, providing
//! schema-driven completions:
//! - Key / structure templates on blank lines
//! - Values after colons and dashes
//! - Position-aware completions inside space-delimited entry lists

mod config;
mod server;

pub use config::{ServerConfig, load_datasets, load_schema};
pub use server::{QuillLanguageServer, run};
