//! Statement rules.
//!
//! Statement forms mirror the expression forms but never yield a value:
//! a block appends its result expression as a plain expression
//! statement, a conditional lowers both branches as nested statement
//! blocks rather than a ternary.

use rill_core::ast::{Expr, ExprKind, Lit, Stmt, StmtLet};
use rill_core::Result;

use crate::ast::{CxxAssign, CxxExpr, CxxForRange, CxxIf, CxxStmt, CxxVarDecl, CxxWhile};
use crate::engine::Lowerer;
use crate::rules::matching;

pub fn lower_stmt(lw: &mut Lowerer, stmt: &Stmt) -> Result<Vec<CxxStmt>> {
    match stmt {
        Stmt::Expr(expr) => lower_expr_as_stmts(lw, expr),
        Stmt::Let(let_stmt) => lower_let(lw, let_stmt),
        Stmt::Assign(assign) => {
            let target = lw.lower_expr(&assign.target)?;
            let value = lw.lower_expr(&assign.value)?;
            Ok(vec![CxxStmt::Assign(CxxAssign { target, value })])
        }
        Stmt::Return(None) => Ok(vec![CxxStmt::Return(None)]),
        Stmt::Return(Some(expr)) => {
            if expr.ty().is_unit() {
                let mut out = lower_expr_as_stmts(lw, expr)?;
                out.push(CxxStmt::Return(None));
                Ok(out)
            } else {
                let lowered = lw.lower_expr(expr)?;
                Ok(vec![CxxStmt::Return(Some(lowered))])
            }
        }
        Stmt::Break => Ok(vec![CxxStmt::Break]),
        Stmt::Continue => Ok(vec![CxxStmt::Continue]),
        Stmt::If(stmt_if) => {
            let cond = lw.lower_expr(&stmt_if.cond)?;
            let then = lw.lower_stmts(&stmt_if.then)?;
            let else_branch = match &stmt_if.else_branch {
                Some(stmts) => Some(lw.lower_stmts(stmts)?),
                None => None,
            };
            Ok(vec![CxxStmt::If(CxxIf {
                cond,
                then,
                else_branch,
            })])
        }
        Stmt::While(stmt_while) => {
            let (hoisted, cond) =
                lw.with_prelude_scope(|this| this.lower_expr(&stmt_while.cond))?;
            let body = lw.lower_stmts(&stmt_while.body)?;
            if hoisted.is_empty() {
                return Ok(vec![CxxStmt::While(CxxWhile { cond, body })]);
            }
            // The condition hoisted statements, which must re-run every
            // iteration: rotate them into the loop ahead of an explicit
            // exit test.
            let mut loop_body = hoisted;
            loop_body.push(CxxStmt::If(CxxIf {
                cond: CxxExpr::unary("!", cond),
                then: vec![CxxStmt::Break],
                else_branch: None,
            }));
            loop_body.extend(body);
            Ok(vec![CxxStmt::While(CxxWhile {
                cond: CxxExpr::bool_lit(true),
                body: loop_body,
            })])
        }
        Stmt::For(stmt_for) => {
            let iterable = lw.lower_expr(&stmt_for.iter)?;
            let body = lw.lower_stmts(&stmt_for.body)?;
            Ok(vec![CxxStmt::ForRange(CxxForRange {
                var: lw.sanitize(stmt_for.var.as_str()),
                iterable,
                body,
            })])
        }
        Stmt::Match(expr_match) => matching::lower_match_stmt(lw, expr_match),
        Stmt::Block(stmts) => Ok(vec![CxxStmt::Block(lw.lower_stmts(stmts)?)]),
    }
}

/// Declarations carry an explicit target type unless deduction is
/// required, in which case the deduced (`auto`) form is used.
fn lower_let(lw: &mut Lowerer, let_stmt: &StmtLet) -> Result<Vec<CxxStmt>> {
    let init = lw.lower_expr(&let_stmt.init)?;
    let declared = let_stmt
        .ty
        .clone()
        .unwrap_or_else(|| let_stmt.init.ty().clone());
    let ty = if lw.requires_deduction(&declared) {
        None
    } else {
        Some(lw.map_ty(&declared))
    };
    Ok(vec![CxxStmt::VarDecl(CxxVarDecl {
        ty,
        name: lw.sanitize(let_stmt.name.as_str()),
        init: Some(init),
        mutable: let_stmt.mutable,
    })])
}

/// A conditional branch in statement position: statements hoisted out
/// of the branch body stay inside the branch.
fn lower_branch(lw: &mut Lowerer, expr: &Expr) -> Result<Vec<CxxStmt>> {
    let (mut out, stmts) = lw.with_prelude_scope(|this| lower_expr_as_stmts(this, expr))?;
    out.extend(stmts);
    Ok(out)
}

/// An expression in statement position. Compound unit-typed forms go
/// through statement lowering; anything else becomes an expression
/// statement.
pub fn lower_expr_as_stmts(lw: &mut Lowerer, expr: &Expr) -> Result<Vec<CxxStmt>> {
    match expr.kind() {
        ExprKind::If(expr_if) if expr.ty().is_unit() => {
            let cond = lw.lower_expr(&expr_if.cond)?;
            let then = lower_branch(lw, &expr_if.then)?;
            let else_branch = match expr_if.else_branch.as_deref() {
                Some(else_branch) => Some(lower_branch(lw, else_branch)?),
                None => None,
            };
            Ok(vec![CxxStmt::If(CxxIf {
                cond,
                then,
                else_branch,
            })])
        }
        ExprKind::Match(expr_match) if expr.ty().is_unit() => {
            matching::lower_match_stmt(lw, expr_match)
        }
        ExprKind::Block(block) => {
            let mut inner = lw.lower_stmts(&block.stmts)?;
            if let Some(result) = block.result.as_deref() {
                inner.extend(lower_expr_as_stmts(lw, result)?);
            }
            Ok(vec![CxxStmt::Block(inner)])
        }
        ExprKind::Lit(Lit::Unit) => Ok(Vec::new()),
        _ => Ok(vec![CxxStmt::Expr(lw.lower_expr(expr)?)]),
    }
}
