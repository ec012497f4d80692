//! rill-cpp: lowers the typed rill IR into a C++ AST.
//!
//! The pipeline is synchronous recursive descent: the
//! [`codegen::CppCodegen`] orchestrator walks module items, hands each
//! function body to an [`engine::Lowerer`], and the rule set under
//! [`rules`] turns IR nodes into [`ast`] nodes bottom-up. Rendering the
//! resulting tree to text lives elsewhere; this crate only decides its
//! shape.

pub mod analysis;
pub mod ast;
pub mod codegen;
pub mod decl;
pub mod engine;
pub mod names;
pub mod policy;
pub mod rules;
pub mod types;

pub use codegen::CppCodegen;
pub use engine::Lowerer;
pub use types::{TypeMapper, DEDUCE};
