//! Expression rules other than calls, blocks, and matches.

use rill_core::ast::{
    BinOp, ExprBinary, ExprComprehension, ExprIf, ExprIndex, ExprLambda, ExprMember, ExprRecord,
    ExprUnary, Ident, Lit,
};
use rill_core::ast::Expr;
use rill_core::error::Error;
use rill_core::types::Ty;
use rill_core::Result;
use tracing::trace;

use crate::ast::{CxxExpr, CxxParam, CxxStmt, CxxVarDecl, MemberOp};
use crate::engine::Lowerer;
use crate::names;
use crate::policy::CondStrategy;

/// Variable reference: the boolean keywords lower to boolean literals,
/// everything else to a sanitized identifier.
pub fn lower_var(ident: &Ident) -> Result<CxxExpr> {
    match ident.as_str() {
        "true" => Ok(CxxExpr::bool_lit(true)),
        "false" => Ok(CxxExpr::bool_lit(false)),
        name => Ok(CxxExpr::ident(names::sanitize(name))),
    }
}

pub fn lower_lit(lit: &Lit) -> Result<CxxExpr> {
    match lit {
        Lit::Int(value) => Ok(CxxExpr::int(*value)),
        Lit::Float(value) => Ok(CxxExpr::float(*value)),
        Lit::Bool(value) => Ok(CxxExpr::bool_lit(*value)),
        Lit::Str(value) => Ok(CxxExpr::str_lit(value.clone())),
        Lit::Regex(pattern) => Ok(CxxExpr::call_named(
            "std::regex",
            vec![CxxExpr::str_lit(pattern.clone())],
        )),
        // A unit value has no C++ spelling; statement contexts drop it
        // before lowering gets here.
        Lit::Unit => Err(Error::unsupported("unit literal in value position")),
    }
}

pub fn lower_unary(lw: &mut Lowerer, unary: &ExprUnary) -> Result<CxxExpr> {
    let operand = lw.lower_expr(&unary.operand)?;
    Ok(CxxExpr::unary(unary.op.as_str(), operand))
}

/// Operands lower left to right; the operator token carries over. The
/// rhs of a short-circuit operator is conditionally evaluated, so any
/// statements hoisted out of it must not precede the operator: they get
/// wrapped into a closure evaluated only when the rhs is reached.
pub fn lower_binary(lw: &mut Lowerer, binary: &ExprBinary) -> Result<CxxExpr> {
    let lhs = lw.lower_expr(&binary.lhs)?;
    let rhs = if matches!(binary.op, BinOp::And | BinOp::Or) {
        let (hoisted, rhs) = lw.with_prelude_scope(|this| this.lower_expr(&binary.rhs))?;
        if hoisted.is_empty() {
            rhs
        } else {
            let mut body = hoisted;
            body.push(CxxStmt::Return(Some(rhs)));
            CxxExpr::iife(body)
        }
    } else {
        lw.lower_expr(&binary.rhs)?
    };
    Ok(CxxExpr::binary(binary.op.as_str(), lhs, rhs))
}

pub fn lower_index(lw: &mut Lowerer, index: &ExprIndex) -> Result<CxxExpr> {
    let obj = lw.lower_expr(&index.obj)?;
    let idx = lw.lower_expr(&index.index)?;
    Ok(CxxExpr::index(obj, idx))
}

/// `.` for values, `->` through the ownership wrappers.
pub fn lower_member(lw: &mut Lowerer, member: &ExprMember) -> Result<CxxExpr> {
    let op = if member.obj.ty().ownership().is_some() {
        MemberOp::Arrow
    } else {
        MemberOp::Dot
    };
    let obj = lw.lower_expr(&member.obj)?;
    Ok(CxxExpr::member(obj, op, names::sanitize(member.field.as_str())))
}

pub fn lower_lambda(lw: &mut Lowerer, lambda: &ExprLambda) -> Result<CxxExpr> {
    let params = lambda
        .params
        .iter()
        .map(|param| CxxParam {
            ty: if lw.requires_deduction(&param.ty) {
                "auto".to_string()
            } else {
                lw.map_ty(&param.ty)
            },
            name: lw.sanitize(param.name.as_str()),
        })
        .collect();
    let body = lw.lower_expr_as_return(&lambda.body)?;
    Ok(CxxExpr::lambda("[&]", params, body))
}

/// Value-producing conditional. A unit-typed conditional belongs to
/// statement lowering; reaching this rule with one is a rule-set bug.
pub fn lower_conditional(lw: &mut Lowerer, ty: &Ty, expr_if: &ExprIf) -> Result<CxxExpr> {
    if ty.is_unit() {
        return Err(Error::unsupported(
            "unit-typed conditional dispatched as a value expression",
        ));
    }
    let candidate = lw.analyzer.ternary_candidate(expr_if);
    match lw.policy.cond_strategy(candidate) {
        CondStrategy::Ternary => {
            let cond = lw.lower_expr(&expr_if.cond)?;
            let then_expr = lw.lower_expr(&expr_if.then)?;
            // Well-typed input always has an else branch; the zero
            // literal covers a literally absent one.
            let else_expr = match expr_if.else_branch.as_deref() {
                Some(else_branch) => lw.lower_expr(else_branch)?,
                None => CxxExpr::int(0),
            };
            Ok(CxxExpr::ternary(cond, then_expr, else_expr))
        }
        CondStrategy::Branch => {
            let cond = lw.lower_expr(&expr_if.cond)?;
            let then = lw.lower_expr_as_return(&expr_if.then)?;
            let else_branch = match expr_if.else_branch.as_deref() {
                Some(else_branch) => lw.lower_expr_as_return(else_branch)?,
                None => vec![CxxStmt::Return(Some(CxxExpr::int(0)))],
            };
            let body = vec![CxxStmt::If(crate::ast::CxxIf {
                cond,
                then,
                else_branch: Some(else_branch),
            })];
            Ok(CxxExpr::iife(body))
        }
    }
}

/// Record construction. With an unresolved type parameter in the type,
/// the spelling depends on where we are: inside a generic function body
/// the parameter is lexically in scope, so the fully parameterized name
/// is usable; outside one, only the base name is nameable and the
/// constructor arguments carry the deduction.
pub fn lower_record(lw: &mut Lowerer, ty: &Ty, record: &ExprRecord) -> Result<CxxExpr> {
    let type_name = if ty.contains_var() && !lw.in_generic_fn() {
        trace!(name = %record.name, "record type unresolved outside generic body, emitting base name");
        lw.sanitize(record.name.as_str())
    } else {
        lw.map_ty(ty)
    };
    let mut args = Vec::with_capacity(record.fields.len());
    for field in &record.fields {
        args.push(lw.lower_expr(&field.value)?);
    }
    Ok(CxxExpr::brace_init(type_name, args))
}

pub fn lower_array(
    lw: &mut Lowerer,
    ty: &Ty,
    array: &rill_core::ast::ExprArray,
) -> Result<CxxExpr> {
    let mut elems = Vec::with_capacity(array.elems.len());
    for elem in &array.elems {
        elems.push(lw.lower_expr(elem)?);
    }
    Ok(CxxExpr::brace_init(lw.map_ty(ty), elems))
}

/// List comprehension: an immediately-invoked closure declaring the
/// result sequence, one nested loop per generator (innermost generator
/// innermost), filters as negated early-exit guards ahead of the body.
pub fn lower_comprehension(
    lw: &mut Lowerer,
    ty: &Ty,
    comp: &ExprComprehension,
) -> Result<CxxExpr> {
    let out = lw.fresh_temp("out");

    let mut loops = Vec::with_capacity(comp.generators.len());
    for generator in &comp.generators {
        let iterable = lw.lower_expr(&generator.iter)?;
        loops.push((lw.sanitize(generator.var.as_str()), iterable));
    }

    let (hoisted, (guards, output)) = lw.with_prelude_scope(|this| {
        let mut guards = Vec::with_capacity(comp.filters.len());
        for filter in &comp.filters {
            let cond = this.lower_expr(filter)?;
            guards.push(CxxStmt::If(crate::ast::CxxIf {
                cond: CxxExpr::unary("!", cond),
                then: vec![CxxStmt::Continue],
                else_branch: None,
            }));
        }
        let output = this.lower_expr(&comp.output)?;
        Ok((guards, output))
    })?;

    let mut innermost = hoisted;
    innermost.extend(guards);
    innermost.push(CxxStmt::Expr(CxxExpr::call(
        CxxExpr::member(CxxExpr::ident(out.clone()), MemberOp::Dot, "push_back"),
        vec![output],
    )));

    let mut body = innermost;
    for (var, iterable) in loops.into_iter().rev() {
        body = vec![CxxStmt::ForRange(crate::ast::CxxForRange {
            var,
            iterable,
            body,
        })];
    }

    let mut stmts = vec![CxxStmt::VarDecl(CxxVarDecl {
        ty: Some(lw.map_ty(ty)),
        name: out.clone(),
        init: None,
        mutable: true,
    })];
    stmts.extend(body);
    stmts.push(CxxStmt::Return(Some(CxxExpr::ident(out))));
    Ok(CxxExpr::iife(stmts))
}

/// `expr?`: hoist the operand, guard with an early propagating return,
/// and read the unwrapped value.
pub fn lower_try(lw: &mut Lowerer, inner: &Expr) -> Result<CxxExpr> {
    let lowered = lw.lower_expr(inner)?;
    let temp = lw.fresh_temp("t");
    lw.emit_prelude(CxxStmt::auto_decl(temp.clone(), lowered));
    lw.emit_prelude(CxxStmt::If(crate::ast::CxxIf {
        cond: CxxExpr::unary(
            "!",
            CxxExpr::method0(CxxExpr::ident(temp.clone()), MemberOp::Dot, "has_value"),
        ),
        // value-initializes the enclosing optional/expected return
        then: vec![CxxStmt::Return(Some(CxxExpr::brace_init("", vec![])))],
        else_branch: None,
    }));
    Ok(CxxExpr::method0(
        CxxExpr::ident(temp),
        MemberOp::Dot,
        "value",
    ))
}
