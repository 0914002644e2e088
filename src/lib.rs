//! # unmangle
//!
//! Rewrites obfuscated script source into a human-readable equivalent.
//!
//! Obfuscators commonly hoist string constants into large array literals and
//! replace every use with an indexed access (`_0x3f2a[14]`). This crate walks
//! the source line by line, records those array declarations in a scope-aware
//! symbol table, and substitutes every indexed access with the literal it
//! denotes. It is deliberately *not* a JavaScript parser: lexical nesting is
//! tracked by brace counting and names are resolved with a positional depth
//! heuristic, which is enough for the loose, machine-generated sources it
//! targets.
//!
//! The usual entry points are [`SourceLoader`] for file/string input and
//! [`SourceProcessor`] when the rewrite report is needed. Lower-level stages
//! can be composed through [`transforms`].

pub mod buffer;
pub mod concat;
pub mod config;
pub mod extract;
pub mod loader;
pub mod processor;
pub mod rewrite;
pub mod rules;
pub mod scope;
pub mod strip;
pub mod transforms;
pub mod values;

pub use buffer::SourceBuffer;
pub use crate::config::RewriteConfig;
pub use extract::ExtractError;
pub use loader::{LoaderError, SourceLoader};
pub use processor::{Rewrite, RewriteReport, SourceProcessor};
pub use scope::ScopeStack;
