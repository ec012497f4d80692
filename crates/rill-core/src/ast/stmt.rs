use serde::{Deserialize, Serialize};

use crate::ast::{Expr, ExprMatch, Ident};
use crate::types::Ty;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(Expr),
    Let(StmtLet),
    Assign(StmtAssign),
    Return(Option<Expr>),
    Break,
    Continue,
    If(StmtIf),
    While(StmtWhile),
    For(StmtFor),
    Match(ExprMatch),
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtLet {
    pub name: Ident,
    /// Declared type, if the source spelled one. `None` leaves the
    /// choice between explicit and deduced typing to the backend.
    pub ty: Option<Ty>,
    pub init: Expr,
    pub mutable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtAssign {
    pub target: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtIf {
    pub cond: Expr,
    pub then: Vec<Stmt>,
    pub else_branch: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtWhile {
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StmtFor {
    pub var: Ident,
    pub iter: Expr,
    pub body: Vec<Stmt>,
}

impl Stmt {
    pub fn expr(expr: Expr) -> Stmt {
        Stmt::Expr(expr)
    }

    pub fn let_(name: impl Into<Ident>, ty: Option<Ty>, init: Expr) -> Stmt {
        Stmt::Let(StmtLet {
            name: name.into(),
            ty,
            init,
            mutable: false,
        })
    }

    /// Name of the statement form, used in lowering error reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Expr(_) => "expr",
            Stmt::Let(_) => "let",
            Stmt::Assign(_) => "assign",
            Stmt::Return(_) => "return",
            Stmt::Break => "break",
            Stmt::Continue => "continue",
            Stmt::If(_) => "if",
            Stmt::While(_) => "while",
            Stmt::For(_) => "for",
            Stmt::Match(_) => "match",
            Stmt::Block(_) => "block",
        }
    }
}
