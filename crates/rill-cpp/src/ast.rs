//! AST representation for the emitted C++ program.
//!
//! Lowering builds this tree through the constructor helpers below and
//! never inspects node internals afterwards; rendering it to text is a
//! separate printer's job.

use serde::{Deserialize, Serialize};

/// A whole emitted source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub decls: Vec<CxxDecl>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        Self { decls: Vec::new() }
    }

    pub fn push(&mut self, decl: CxxDecl) {
        self.decls.push(decl);
    }
}

impl Default for TranslationUnit {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level C++ declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CxxDecl {
    Function(CxxFunction),
    Struct(CxxStruct),
    UsingAlias(CxxUsingAlias),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxFunction {
    pub template: TemplateHeader,
    pub ret: String,
    pub name: String,
    pub params: Vec<CxxParam>,
    pub body: Vec<CxxStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxParam {
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxStruct {
    pub template: TemplateHeader,
    pub name: String,
    pub fields: Vec<CxxField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxField {
    pub ty: String,
    pub name: String,
}

/// `using Name = Target;`, optionally under a template header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxUsingAlias {
    pub template: TemplateHeader,
    pub name: String,
    pub target: String,
}

/// `template<class T, class U> requires C1<T> && C2<U>` wrapper data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateHeader {
    pub params: Vec<String>,
    /// (concept, parameter) pairs, rendered as a conjunctive clause.
    pub constraints: Vec<(String, String)>,
}

impl TemplateHeader {
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// C++ statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CxxStmt {
    Expr(CxxExpr),
    VarDecl(CxxVarDecl),
    Assign(CxxAssign),
    Return(Option<CxxExpr>),
    Break,
    Continue,
    If(CxxIf),
    While(CxxWhile),
    ForRange(CxxForRange),
    Block(Vec<CxxStmt>),
    /// `const auto& [a, b] = init;`
    StructuredBinding(CxxStructuredBinding),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxStructuredBinding {
    pub names: Vec<String>,
    pub init: CxxExpr,
}

/// `ty name = init;` — `ty == None` renders as `auto`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxVarDecl {
    pub ty: Option<String>,
    pub name: String,
    pub init: Option<CxxExpr>,
    pub mutable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxAssign {
    pub target: CxxExpr,
    pub value: CxxExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxIf {
    pub cond: CxxExpr,
    pub then: Vec<CxxStmt>,
    pub else_branch: Option<Vec<CxxStmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxWhile {
    pub cond: CxxExpr,
    pub body: Vec<CxxStmt>,
}

/// `for (const auto& var : iterable) { body }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxForRange {
    pub var: String,
    pub iterable: CxxExpr,
    pub body: Vec<CxxStmt>,
}

/// Member access operator: `.` for values, `->` through owning pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberOp {
    Dot,
    Arrow,
}

/// C++ expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CxxExpr {
    Ident(String),
    IntLit(i64),
    FloatLit(f64),
    BoolLit(bool),
    StrLit(String),
    Unary(CxxUnary),
    Binary(CxxBinary),
    Call(CxxCall),
    Member(CxxMember),
    Index(CxxIndex),
    Ternary(CxxTernary),
    Lambda(CxxLambda),
    /// `Type{arg, ...}` aggregate construction.
    BraceInit(CxxBraceInit),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxUnary {
    pub op: String,
    pub operand: Box<CxxExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxBinary {
    pub op: String,
    pub lhs: Box<CxxExpr>,
    pub rhs: Box<CxxExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxCall {
    pub callee: Box<CxxExpr>,
    pub args: Vec<CxxExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxMember {
    pub obj: Box<CxxExpr>,
    pub op: MemberOp,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxIndex {
    pub obj: Box<CxxExpr>,
    pub index: Box<CxxExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxTernary {
    pub cond: Box<CxxExpr>,
    pub then_expr: Box<CxxExpr>,
    pub else_expr: Box<CxxExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxLambda {
    /// Capture clause, e.g. `[&]`.
    pub capture: String,
    pub params: Vec<CxxParam>,
    pub body: Vec<CxxStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CxxBraceInit {
    pub ty: String,
    pub args: Vec<CxxExpr>,
}

impl CxxExpr {
    pub fn ident(name: impl Into<String>) -> CxxExpr {
        CxxExpr::Ident(name.into())
    }

    pub fn int(value: i64) -> CxxExpr {
        CxxExpr::IntLit(value)
    }

    pub fn float(value: f64) -> CxxExpr {
        CxxExpr::FloatLit(value)
    }

    pub fn bool_lit(value: bool) -> CxxExpr {
        CxxExpr::BoolLit(value)
    }

    pub fn str_lit(value: impl Into<String>) -> CxxExpr {
        CxxExpr::StrLit(value.into())
    }

    pub fn unary(op: impl Into<String>, operand: CxxExpr) -> CxxExpr {
        CxxExpr::Unary(CxxUnary {
            op: op.into(),
            operand: Box::new(operand),
        })
    }

    pub fn binary(op: impl Into<String>, lhs: CxxExpr, rhs: CxxExpr) -> CxxExpr {
        CxxExpr::Binary(CxxBinary {
            op: op.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn call(callee: CxxExpr, args: Vec<CxxExpr>) -> CxxExpr {
        CxxExpr::Call(CxxCall {
            callee: Box::new(callee),
            args,
        })
    }

    pub fn call_named(name: impl Into<String>, args: Vec<CxxExpr>) -> CxxExpr {
        CxxExpr::call(CxxExpr::ident(name), args)
    }

    pub fn member(obj: CxxExpr, op: MemberOp, field: impl Into<String>) -> CxxExpr {
        CxxExpr::Member(CxxMember {
            obj: Box::new(obj),
            op,
            field: field.into(),
        })
    }

    /// Zero-argument method call on a receiver, e.g. `recv.size()`.
    pub fn method0(obj: CxxExpr, op: MemberOp, name: impl Into<String>) -> CxxExpr {
        CxxExpr::call(CxxExpr::member(obj, op, name), Vec::new())
    }

    pub fn index(obj: CxxExpr, index: CxxExpr) -> CxxExpr {
        CxxExpr::Index(CxxIndex {
            obj: Box::new(obj),
            index: Box::new(index),
        })
    }

    pub fn ternary(cond: CxxExpr, then_expr: CxxExpr, else_expr: CxxExpr) -> CxxExpr {
        CxxExpr::Ternary(CxxTernary {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        })
    }

    pub fn lambda(capture: impl Into<String>, params: Vec<CxxParam>, body: Vec<CxxStmt>) -> CxxExpr {
        CxxExpr::Lambda(CxxLambda {
            capture: capture.into(),
            params,
            body,
        })
    }

    pub fn brace_init(ty: impl Into<String>, args: Vec<CxxExpr>) -> CxxExpr {
        CxxExpr::BraceInit(CxxBraceInit {
            ty: ty.into(),
            args,
        })
    }

    /// Immediately-invoked zero-argument closure capturing the enclosing
    /// scope by reference: `[&]() { body }()`.
    pub fn iife(body: Vec<CxxStmt>) -> CxxExpr {
        CxxExpr::call(CxxExpr::lambda("[&]", Vec::new(), body), Vec::new())
    }
}

impl CxxStmt {
    pub fn expr(expr: CxxExpr) -> CxxStmt {
        CxxStmt::Expr(expr)
    }

    pub fn ret(expr: CxxExpr) -> CxxStmt {
        CxxStmt::Return(Some(expr))
    }

    /// `auto name = init;`
    pub fn auto_decl(name: impl Into<String>, init: CxxExpr) -> CxxStmt {
        CxxStmt::VarDecl(CxxVarDecl {
            ty: None,
            name: name.into(),
            init: Some(init),
            mutable: true,
        })
    }

    pub fn typed_decl(ty: impl Into<String>, name: impl Into<String>, init: CxxExpr) -> CxxStmt {
        CxxStmt::VarDecl(CxxVarDecl {
            ty: Some(ty.into()),
            name: name.into(),
            init: Some(init),
            mutable: true,
        })
    }
}
