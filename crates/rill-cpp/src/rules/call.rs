//! Call lowering: the layered rename/resolution tables.
//!
//! A call tries, in order: the I/O intrinsic table, the single-argument
//! stdlib override table, the function registry, the receiver-type
//! method tables, and finally a literal call with lowered callee and
//! arguments. Table order matters: the specific tables must win before
//! the generic fallthrough.

use rill_core::ast::{Expr, ExprCall, ExprKind, ExprMember};
use rill_core::Result;
use tracing::trace;

use crate::ast::{CxxExpr, MemberOp};
use crate::engine::Lowerer;

/// Fixed I/O intrinsic renames.
fn io_intrinsic(name: &str) -> Option<&'static str> {
    match name {
        "print" => Some("rill::rt::print"),
        "println" => Some("rill::rt::println"),
        "eprintln" => Some("rill::rt::eprintln"),
        "read_line" => Some("rill::rt::read_line"),
        _ => None,
    }
}

/// Fixed single-argument stdlib overrides (numeric narrowing casts and
/// the math functions that map straight onto `<cmath>`).
fn stdlib_override(name: &str) -> Option<&'static str> {
    match name {
        "int" => Some("static_cast<int64_t>"),
        "float" => Some("static_cast<double>"),
        "abs" => Some("std::abs"),
        "sqrt" => Some("std::sqrt"),
        "floor" => Some("std::floor"),
        "ceil" => Some("std::ceil"),
        _ => None,
    }
}

/// Higher-order sequence/text methods that lower to runtime helpers
/// taking the receiver as first argument.
fn runtime_helper(name: &str) -> Option<&'static str> {
    match name {
        "map" => Some("rill::rt::map"),
        "filter" => Some("rill::rt::filter"),
        "fold" => Some("rill::rt::fold"),
        _ => None,
    }
}

pub fn lower_call(lw: &mut Lowerer, call: &ExprCall) -> Result<CxxExpr> {
    if let ExprKind::Var(name) = call.callee.kind() {
        let name = name.as_str();
        if let Some(target) = io_intrinsic(name) {
            trace!(name, target, "io intrinsic rename");
            return Ok(CxxExpr::call_named(target, lower_args(lw, &call.args)?));
        }
        if call.args.len() == 1 {
            if let Some(target) = stdlib_override(name) {
                return Ok(CxxExpr::call_named(target, lower_args(lw, &call.args)?));
            }
        }
        if let Some(entry) = lw.functions.fetch_entry(name) {
            return Ok(CxxExpr::call_named(
                entry.qualified(),
                lower_args(lw, &call.args)?,
            ));
        }
    }

    if let ExprKind::Member(member) = call.callee.kind() {
        if let Some(lowered) = lower_receiver_method(lw, member, &call.args)? {
            return Ok(lowered);
        }
    }

    let callee = lw.lower_expr(&call.callee)?;
    Ok(CxxExpr::call(callee, lower_args(lw, &call.args)?))
}

/// Method-call specializations for sequence and text receivers.
/// Returns `None` when the receiver type or method name has no entry,
/// letting the literal-call fallthrough take over.
fn lower_receiver_method(
    lw: &mut Lowerer,
    member: &ExprMember,
    args: &[Expr],
) -> Result<Option<CxxExpr>> {
    let recv_ty = member.obj.ty();
    let is_seq = recv_ty.is_array();
    let is_text = recv_ty.is_string();
    if !is_seq && !is_text {
        return Ok(None);
    }

    let method = member.field.as_str();
    if let Some(helper) = runtime_helper(method) {
        let mut helper_args = vec![lw.lower_expr(&member.obj)?];
        helper_args.extend(lower_args(lw, args)?);
        return Ok(Some(CxxExpr::call_named(helper, helper_args)));
    }

    let lowered = match method {
        "length" => {
            let recv = lw.lower_expr(&member.obj)?;
            Some(CxxExpr::method0(recv, MemberOp::Dot, "size"))
        }
        "is_empty" => {
            let recv = lw.lower_expr(&member.obj)?;
            Some(CxxExpr::method0(recv, MemberOp::Dot, "empty"))
        }
        "push" => {
            let recv = lw.lower_expr(&member.obj)?;
            let target = if is_seq { "push_back" } else { "append" };
            Some(CxxExpr::call(
                CxxExpr::member(recv, MemberOp::Dot, target),
                lower_args(lw, args)?,
            ))
        }
        "contains" if is_text => {
            let mut helper_args = vec![lw.lower_expr(&member.obj)?];
            helper_args.extend(lower_args(lw, args)?);
            Some(CxxExpr::call_named("rill::rt::contains", helper_args))
        }
        _ => None,
    };
    Ok(lowered)
}

fn lower_args(lw: &mut Lowerer, args: &[Expr]) -> Result<Vec<CxxExpr>> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        out.push(lw.lower_expr(arg)?);
    }
    Ok(out)
}
