//! Match lowering.
//!
//! Both strategies encode first-match-wins as an ordered chain inside an
//! immediately-invoked closure: regex-bearing matches test each arm with
//! `std::regex_match`, variant matches dispatch on the sum type's tag
//! with `std::holds_alternative`/`std::get`. Arms are emitted strictly
//! in source order; a guard that fails falls through to the next arm.

use itertools::Itertools;
use rill_core::ast::{Expr, ExprMatch, MatchArm, Pat, PatCtor, PatRegex};
use rill_core::types::Ty;
use rill_core::Result;
use tracing::trace;

use crate::ast::{CxxExpr, CxxIf, CxxStmt, CxxStructuredBinding, CxxVarDecl, MemberOp};
use crate::engine::Lowerer;
use crate::rules::{expr, stmt};

/// Whether the chain produces a value or only runs arm bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArmContext {
    Value,
    Stmt,
}

pub fn lower_match_value(lw: &mut Lowerer, expr_match: &ExprMatch) -> Result<CxxExpr> {
    let chain = build_chain(lw, expr_match, ArmContext::Value)?;
    Ok(CxxExpr::iife(chain))
}

pub fn lower_match_stmt(lw: &mut Lowerer, expr_match: &ExprMatch) -> Result<Vec<CxxStmt>> {
    let chain = build_chain(lw, expr_match, ArmContext::Stmt)?;
    Ok(vec![CxxStmt::Expr(CxxExpr::iife(chain))])
}

fn build_chain(lw: &mut Lowerer, expr_match: &ExprMatch, ctx: ArmContext) -> Result<Vec<CxxStmt>> {
    let shape = lw.analyzer.classify_match(expr_match);
    let strategy = lw.policy.match_strategy(shape);
    trace!(?shape, ?strategy, "lowering match");

    let scrutinee = lw.lower_expr(&expr_match.scrutinee)?;
    let scrut_name = lw.fresh_temp("s");
    let mut out = vec![CxxStmt::VarDecl(CxxVarDecl {
        ty: None,
        name: scrut_name.clone(),
        init: Some(scrutinee),
        mutable: false,
    })];

    let scrut = CxxExpr::ident(scrut_name);
    for arm in &expr_match.arms {
        out.extend(lower_arm(lw, expr_match.scrutinee.ty(), &scrut, arm, ctx)?);
    }

    // Exhaustiveness is the front end's responsibility; the trailing
    // return keeps the closure well-formed when no arm fired.
    let has_unconditional_catch_all = expr_match
        .arms
        .iter()
        .any(|arm| arm.pat.is_catch_all() && arm.guard.is_none());
    if !has_unconditional_catch_all {
        out.push(fallback_exit(ctx));
    }
    Ok(out)
}

fn fallback_exit(ctx: ArmContext) -> CxxStmt {
    match ctx {
        ArmContext::Value => CxxStmt::Return(Some(CxxExpr::brace_init("", vec![]))),
        ArmContext::Stmt => CxxStmt::Return(None),
    }
}

fn lower_arm(
    lw: &mut Lowerer,
    scrut_ty: &Ty,
    scrut: &CxxExpr,
    arm: &MatchArm,
    ctx: ArmContext,
) -> Result<Vec<CxxStmt>> {
    match &arm.pat {
        Pat::Regex(regex) => lower_regex_arm(lw, scrut, regex, arm, ctx),
        Pat::Ctor(ctor) => lower_ctor_arm(lw, scrut_ty, scrut, ctor, arm, ctx),
        Pat::Lit(lit) => {
            let cond = CxxExpr::binary("==", scrut.clone(), expr::lower_lit(lit)?);
            let exit = arm_exit(lw, &arm.body, ctx)?;
            Ok(vec![CxxStmt::If(CxxIf {
                cond,
                then: guarded(lw, arm.guard.as_ref(), exit)?,
                else_branch: None,
            })])
        }
        Pat::Bind(name) => {
            // Scoped so successive bind arms may reuse a name.
            let mut inner = vec![CxxStmt::VarDecl(CxxVarDecl {
                ty: None,
                name: lw.sanitize(name.as_str()),
                init: Some(scrut.clone()),
                mutable: false,
            })];
            let exit = arm_exit(lw, &arm.body, ctx)?;
            inner.extend(guarded(lw, arm.guard.as_ref(), exit)?);
            Ok(vec![CxxStmt::Block(inner)])
        }
        Pat::Wildcard => {
            let exit = arm_exit(lw, &arm.body, ctx)?;
            guarded(lw, arm.guard.as_ref(), exit)
        }
    }
}

/// One `if (std::regex_match(..))` per arm, with capture bindings
/// declared inside the guarded branch in capture-index order.
fn lower_regex_arm(
    lw: &mut Lowerer,
    scrut: &CxxExpr,
    regex: &PatRegex,
    arm: &MatchArm,
    ctx: ArmContext,
) -> Result<Vec<CxxStmt>> {
    let match_var = lw.fresh_temp("m");
    let decl = CxxStmt::VarDecl(CxxVarDecl {
        ty: Some("std::smatch".to_string()),
        name: match_var.clone(),
        init: None,
        mutable: true,
    });
    let cond = CxxExpr::call_named(
        "std::regex_match",
        vec![
            scrut.clone(),
            CxxExpr::ident(match_var.clone()),
            CxxExpr::call_named("std::regex", vec![CxxExpr::str_lit(regex.pattern.clone())]),
        ],
    );

    let mut inner = Vec::new();
    for (index, capture) in regex.captures.iter().enumerate() {
        if capture.is_wildcard() {
            continue;
        }
        // group 0 is the whole match; captures start at 1
        let group = CxxExpr::index(
            CxxExpr::ident(match_var.clone()),
            CxxExpr::int(index as i64 + 1),
        );
        inner.push(CxxStmt::auto_decl(
            lw.sanitize(capture.as_str()),
            CxxExpr::method0(group, MemberOp::Dot, "str"),
        ));
    }
    let exit = arm_exit(lw, &arm.body, ctx)?;
    inner.extend(guarded(lw, arm.guard.as_ref(), exit)?);

    Ok(vec![
        decl,
        CxxStmt::If(CxxIf {
            cond,
            then: inner,
            else_branch: None,
        }),
    ])
}

/// Dispatch on the variant tag; field binders come out of a structured
/// binding over the matched alternative, in declared field order.
fn lower_ctor_arm(
    lw: &mut Lowerer,
    scrut_ty: &Ty,
    scrut: &CxxExpr,
    ctor: &PatCtor,
    arm: &MatchArm,
    ctx: ArmContext,
) -> Result<Vec<CxxStmt>> {
    let variant_ty = variant_type_name(lw, scrut_ty, ctor);
    let cond = CxxExpr::call_named(
        format!("std::holds_alternative<{}>", variant_ty),
        vec![scrut.clone()],
    );

    let mut inner = Vec::new();
    if !ctor.fields.is_empty() {
        inner.push(CxxStmt::StructuredBinding(CxxStructuredBinding {
            names: ctor
                .fields
                .iter()
                .map(|field| lw.sanitize(field.as_str()))
                .collect(),
            init: CxxExpr::call_named(format!("std::get<{}>", variant_ty), vec![scrut.clone()]),
        }));
    }
    let exit = arm_exit(lw, &arm.body, ctx)?;
    inner.extend(guarded(lw, arm.guard.as_ref(), exit)?);

    Ok(vec![CxxStmt::If(CxxIf {
        cond,
        then: inner,
        else_branch: None,
    })])
}

/// Variant aggregates of a generic sum carry the sum's type arguments.
fn variant_type_name(lw: &Lowerer, scrut_ty: &Ty, ctor: &PatCtor) -> String {
    let base = lw.sanitize(ctor.name.as_str());
    match scrut_ty {
        Ty::Generic(generic) if !generic.args.is_empty() => {
            let args = generic.args.iter().map(|arg| lw.map_ty(arg)).join(", ");
            format!("{}<{}>", base, args)
        }
        _ => base,
    }
}

fn guarded(
    lw: &mut Lowerer,
    guard: Option<&Expr>,
    exit: Vec<CxxStmt>,
) -> Result<Vec<CxxStmt>> {
    match guard {
        Some(guard) => {
            // The guard runs only when the pattern matched, so anything
            // hoisted out of it must stay inside the arm.
            let (mut out, cond) = lw.with_prelude_scope(|this| this.lower_expr(guard))?;
            out.push(CxxStmt::If(CxxIf {
                cond,
                then: exit,
                else_branch: None,
            }));
            Ok(out)
        }
        None => Ok(exit),
    }
}

fn arm_exit(lw: &mut Lowerer, body: &Expr, ctx: ArmContext) -> Result<Vec<CxxStmt>> {
    match ctx {
        ArmContext::Value => {
            let mut out = lw.lower_expr_as_return(body)?;
            if body.ty().is_unit() {
                out.push(CxxStmt::Return(None));
            }
            Ok(out)
        }
        ArmContext::Stmt => {
            let (mut out, stmts) =
                lw.with_prelude_scope(|this| stmt::lower_expr_as_stmts(this, body))?;
            out.extend(stmts);
            out.push(CxxStmt::Return(None));
            Ok(out)
        }
    }
}
