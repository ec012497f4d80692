//! rill-core: shared IR, registries, and error plumbing for the rill
//! transpiler backends.
//!
//! The front end (lexing, parsing, type inference) produces the typed
//! IR defined in [`ast`]; backend crates lower it into a target-language
//! AST. This crate carries no lowering logic of its own.

#[macro_use]
pub mod macros;

pub mod ast;
pub mod error;
pub mod registry;
pub mod types;

// Re-export commonly used items for convenience
pub use tracing;

pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
