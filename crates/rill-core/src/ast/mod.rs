//! The typed IR consumed by the lowering backends.
//!
//! Every expression node carries the type the front end resolved for it;
//! lowering reads the tree and the types, never mutates either.

mod expr;
mod ident;
mod item;
mod pat;
mod stmt;

pub use expr::*;
pub use ident::*;
pub use item::*;
pub use pat::*;
pub use stmt::*;
