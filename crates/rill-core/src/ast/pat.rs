use serde::{Deserialize, Serialize};

use crate::ast::{Expr, Ident, Lit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pat {
    Wildcard,
    Lit(Lit),
    /// Binds the whole scrutinee to a name; matches anything.
    Bind(Ident),
    Ctor(PatCtor),
    Regex(PatRegex),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatCtor {
    pub name: Ident,
    /// Field binders, in the constructor's declared field order.
    pub fields: Vec<Ident>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatRegex {
    pub pattern: String,
    /// One binder per capture group, in capture-index order. Wildcard
    /// names suppress the binding for that group.
    pub captures: Vec<Ident>,
}

impl Pat {
    pub fn is_regex(&self) -> bool {
        matches!(self, Pat::Regex(_))
    }

    /// Wildcard and bind patterns match unconditionally.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Pat::Wildcard | Pat::Bind(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchArm {
    pub pat: Pat,
    pub guard: Option<Expr>,
    pub body: Expr,
}

impl MatchArm {
    pub fn new(pat: Pat, body: Expr) -> Self {
        Self {
            pat,
            guard: None,
            body,
        }
    }

    pub fn with_guard(pat: Pat, guard: Expr, body: Expr) -> Self {
        Self {
            pat,
            guard: Some(guard),
            body,
        }
    }
}
