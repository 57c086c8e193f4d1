//! Quill schema crate.
//!
//! The declarative, recursive schema model consumed by the completion
//! engine, plus the navigator that maps ancestor key chains onto schema
//! nodes.

pub mod navigate;
pub mod types;

pub use navigate::{KeyStep, Located, locate, lookup};
pub use types::{ArrayKeySet, ArrayKeys, Element, ElementKind, Schema};
