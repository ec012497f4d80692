//! The lowering rule set, grouped by concern.
//!
//! Each function is one rule: it receives the node it is responsible
//! for plus the [`crate::engine::Lowerer`] it recurses through. The
//! engine's dispatch `match` decides which rule a node reaches.

pub mod block;
pub mod call;
pub mod expr;
pub mod matching;
pub mod stmt;
