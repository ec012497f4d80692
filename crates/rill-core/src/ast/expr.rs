use serde::{Deserialize, Serialize};

use crate::ast::{Ident, MatchArm, Stmt};
use crate::types::Ty;

pub type BExpr = Box<Expr>;

/// An expression node together with the type the front end resolved for
/// it. The recorded type is trusted as-is; lowering never re-infers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub ty: Ty,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Var(Ident),
    Lit(Lit),
    Unary(ExprUnary),
    Binary(ExprBinary),
    Index(ExprIndex),
    Member(ExprMember),
    Call(ExprCall),
    Lambda(ExprLambda),
    If(ExprIf),
    Block(ExprBlock),
    Match(ExprMatch),
    Record(ExprRecord),
    Array(ExprArray),
    Comprehension(ExprComprehension),
    /// The `?` operator: unwrap-or-propagate on an optional value.
    Try(BExpr),
}

impl Expr {
    pub fn new(ty: Ty, kind: ExprKind) -> Self {
        Self { ty, kind }
    }

    pub fn ty(&self) -> &Ty {
        &self.ty
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn unit() -> Expr {
        Expr::new(Ty::unit(), ExprKind::Lit(Lit::Unit))
    }

    pub fn var(name: impl Into<Ident>, ty: Ty) -> Expr {
        Expr::new(ty, ExprKind::Var(name.into()))
    }

    pub fn lit(lit: Lit) -> Expr {
        let ty = lit.ty();
        Expr::new(ty, ExprKind::Lit(lit))
    }

    pub fn int(value: i64) -> Expr {
        Expr::lit(Lit::Int(value))
    }

    pub fn bool(value: bool) -> Expr {
        Expr::lit(Lit::Bool(value))
    }

    pub fn string(value: impl Into<String>) -> Expr {
        Expr::lit(Lit::Str(value.into()))
    }

    pub fn is_unit(&self) -> bool {
        self.ty.is_unit()
    }

    pub fn into_block(self) -> ExprBlock {
        match self.kind {
            ExprKind::Block(block) => block,
            kind => ExprBlock {
                stmts: Vec::new(),
                result: Some(Box::new(Expr::new(self.ty, kind))),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Lit {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Regex(String),
    Unit,
}

impl Lit {
    pub fn ty(&self) -> Ty {
        match self {
            Lit::Int(_) => Ty::int(),
            Lit::Float(_) => Ty::float(),
            Lit::Bool(_) => Ty::bool(),
            Lit::Str(_) => Ty::string(),
            Lit::Regex(_) => Ty::regex(),
            Lit::Unit => Ty::unit(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    /// Arithmetic and comparison operators count as "simple" operand
    /// combiners for ternary candidacy; short-circuit ops do too.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprUnary {
    pub op: UnaryOp,
    pub operand: BExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprBinary {
    pub op: BinOp,
    pub lhs: BExpr,
    pub rhs: BExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprIndex {
    pub obj: BExpr,
    pub index: BExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprMember {
    pub obj: BExpr,
    pub field: Ident,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprCall {
    pub callee: BExpr,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprLambda {
    pub params: Vec<LambdaParam>,
    pub body: BExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaParam {
    pub name: Ident,
    pub ty: Ty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprIf {
    pub cond: BExpr,
    pub then: BExpr,
    pub else_branch: Option<BExpr>,
}

/// Ordered statements plus an optional trailing result expression.
/// As an expression the block must yield exactly one value unless its
/// type is unit; as a statement sequence no value is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprBlock {
    pub stmts: Vec<Stmt>,
    pub result: Option<BExpr>,
}

impl ExprBlock {
    pub fn new(stmts: Vec<Stmt>, result: Option<Expr>) -> Self {
        Self {
            stmts,
            result: result.map(Box::new),
        }
    }

    pub fn of_result(result: Expr) -> Self {
        Self::new(Vec::new(), Some(result))
    }
}

/// Scrutinee plus ordered arms. Arms are evaluated in source order; the
/// first satisfied, guard-passing arm wins. Exhaustiveness is a front
/// end responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprMatch {
    pub scrutinee: BExpr,
    pub arms: Vec<MatchArm>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprRecord {
    /// Base type name, without any type arguments.
    pub name: Ident,
    pub fields: Vec<FieldInit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInit {
    pub name: Ident,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprArray {
    pub elems: Vec<Expr>,
}

/// `[output for x in xs if cond]` with any number of generators and
/// filters. Generators nest in declaration order, innermost last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprComprehension {
    pub generators: Vec<Generator>,
    pub filters: Vec<Expr>,
    pub output: BExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub var: Ident,
    pub iter: Expr,
}
