//! The lowering context and dispatcher.
//!
//! The IR is a closed enum, so dispatch is an exhaustive `match`:
//! completeness of the rule set is checked by the compiler, and the
//! only runtime-fatal lowering errors left are semantic violations
//! (e.g. a unit-typed conditional reaching the value rule). Branch
//! bodies live in the [`crate::rules`] modules, one per concern.

use rill_core::ast::{Expr, ExprBlock, ExprKind, Stmt};
use rill_core::registry::{FunctionRegistry, TypeRegistry};
use rill_core::types::Ty;
use rill_core::Result;

use crate::analysis::Analyzer;
use crate::ast::{CxxExpr, CxxStmt};
use crate::names;
use crate::policy::RuntimePolicy;
use crate::rules;
use crate::types::TypeMapper;

pub struct Lowerer<'a> {
    pub mapper: &'a TypeMapper,
    pub types: &'a TypeRegistry,
    pub functions: &'a FunctionRegistry,
    pub policy: &'a RuntimePolicy,
    pub analyzer: &'a Analyzer,
    /// True while lowering the body of a type-parameterized function;
    /// decides whether unresolved type parameters are nameable.
    in_generic_fn: bool,
    temp_counter: u32,
    /// Statements hoisted ahead of the one currently being lowered
    /// (`?`-operator guards). One scope per statement or closure body.
    prelude: Vec<Vec<CxxStmt>>,
}

impl<'a> Lowerer<'a> {
    pub fn new(
        mapper: &'a TypeMapper,
        types: &'a TypeRegistry,
        functions: &'a FunctionRegistry,
        policy: &'a RuntimePolicy,
        analyzer: &'a Analyzer,
    ) -> Self {
        Self {
            mapper,
            types,
            functions,
            policy,
            analyzer,
            in_generic_fn: false,
            temp_counter: 0,
            prelude: vec![Vec::new()],
        }
    }

    /// Lower a value-producing expression.
    pub fn lower_expr(&mut self, expr: &Expr) -> Result<CxxExpr> {
        match expr.kind() {
            ExprKind::Var(ident) => rules::expr::lower_var(ident),
            ExprKind::Lit(lit) => rules::expr::lower_lit(lit),
            ExprKind::Unary(unary) => rules::expr::lower_unary(self, unary),
            ExprKind::Binary(binary) => rules::expr::lower_binary(self, binary),
            ExprKind::Index(index) => rules::expr::lower_index(self, index),
            ExprKind::Member(member) => rules::expr::lower_member(self, member),
            ExprKind::Call(call) => rules::call::lower_call(self, call),
            ExprKind::Lambda(lambda) => rules::expr::lower_lambda(self, lambda),
            ExprKind::If(expr_if) => rules::expr::lower_conditional(self, expr.ty(), expr_if),
            ExprKind::Block(block) => rules::block::lower_block_value(self, block),
            ExprKind::Match(expr_match) => rules::matching::lower_match_value(self, expr_match),
            ExprKind::Record(record) => rules::expr::lower_record(self, expr.ty(), record),
            ExprKind::Array(array) => rules::expr::lower_array(self, expr.ty(), array),
            ExprKind::Comprehension(comp) => {
                rules::expr::lower_comprehension(self, expr.ty(), comp)
            }
            ExprKind::Try(inner) => rules::expr::lower_try(self, inner),
        }
    }

    /// Lower one statement. Any prelude statements hoisted while
    /// lowering its expressions come first in the returned sequence.
    pub fn lower_stmt(&mut self, stmt: &Stmt) -> Result<Vec<CxxStmt>> {
        let (mut out, lowered) =
            self.with_prelude_scope(|this| rules::stmt::lower_stmt(this, stmt))?;
        out.extend(lowered);
        Ok(out)
    }

    /// Lower an ordered statement sequence, preserving order.
    pub fn lower_stmts(&mut self, stmts: &[Stmt]) -> Result<Vec<CxxStmt>> {
        let mut out = Vec::new();
        for stmt in stmts {
            out.extend(self.lower_stmt(stmt)?);
        }
        Ok(out)
    }

    /// Lower a block used as a function or closure body: statements,
    /// then the result expression returned (or dropped when unit).
    pub fn lower_body(&mut self, block: &ExprBlock) -> Result<Vec<CxxStmt>> {
        let mut out = self.lower_stmts(&block.stmts)?;
        if let Some(result) = block.result.as_deref() {
            out.extend(self.lower_expr_as_return(result)?);
        }
        Ok(out)
    }

    /// Lower an expression into `return <expr>;` plus any hoisted
    /// prelude, for use inside a closure or function body. A unit-typed
    /// result yields no value, so it goes through statement lowering
    /// instead; a bare unit literal there emits nothing at all.
    pub fn lower_expr_as_return(&mut self, expr: &Expr) -> Result<Vec<CxxStmt>> {
        if expr.ty().is_unit() {
            let (mut out, stmts) =
                self.with_prelude_scope(|this| rules::stmt::lower_expr_as_stmts(this, expr))?;
            out.extend(stmts);
            return Ok(out);
        }
        let (mut out, lowered) = self.with_prelude_scope(|this| this.lower_expr(expr))?;
        out.push(CxxStmt::Return(Some(lowered)));
        Ok(out)
    }

    pub fn map_ty(&self, ty: &Ty) -> String {
        self.mapper.map(ty, Some(self.types))
    }

    pub fn requires_deduction(&self, ty: &Ty) -> bool {
        self.mapper.requires_deduction(ty, Some(self.types))
    }

    pub fn sanitize(&self, name: &str) -> String {
        names::sanitize(name)
    }

    pub fn in_generic_fn(&self) -> bool {
        self.in_generic_fn
    }

    /// Run `f` with the generic-function flag set to `active`,
    /// restoring the prior value on every exit path.
    pub fn with_generic_scope<T>(
        &mut self,
        active: bool,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = self.in_generic_fn;
        self.in_generic_fn = active;
        let result = f(self);
        self.in_generic_fn = saved;
        result
    }

    /// Deterministic fresh name for a hoisted temporary.
    pub fn fresh_temp(&mut self, prefix: &str) -> String {
        let n = self.temp_counter;
        self.temp_counter += 1;
        format!("__{}{}", prefix, n)
    }

    /// Append a hoisted statement ahead of the statement currently
    /// being lowered.
    pub fn emit_prelude(&mut self, stmt: CxxStmt) {
        if let Some(scope) = self.prelude.last_mut() {
            scope.push(stmt);
        }
    }

    /// Run `f` in a fresh prelude scope; returns the statements hoisted
    /// into that scope alongside `f`'s output. The scope is popped on
    /// every exit path.
    pub fn with_prelude_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<(Vec<CxxStmt>, T)> {
        self.prelude.push(Vec::new());
        let result = f(self);
        let hoisted = self.prelude.pop().unwrap_or_default();
        Ok((hoisted, result?))
    }
}
