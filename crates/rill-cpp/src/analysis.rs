//! Complexity classification for compound expressions.
//!
//! The analyzer only classifies; the runtime policy decides which
//! lowering strategy a classification maps to.

use rill_core::ast::{Expr, ExprBlock, ExprIf, ExprKind, ExprMatch, Stmt};

pub const DEFAULT_MATCH_ARM_THRESHOLD: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockComplexity {
    /// Zero statements: a pure result expression.
    Trivial,
    /// At most three statements, all plain, no nested control flow.
    Simple,
    Complex,
}

/// Shape of a match construct, as far as strategy selection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchShape {
    pub has_regex: bool,
    pub arm_count: usize,
    /// Arm count exceeds the configured threshold.
    pub oversized: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    pub match_arm_threshold: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            match_arm_threshold: DEFAULT_MATCH_ARM_THRESHOLD,
        }
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_arm_threshold(mut self, threshold: usize) -> Self {
        self.match_arm_threshold = threshold;
        self
    }

    pub fn classify_block(&self, block: &ExprBlock) -> BlockComplexity {
        if block.stmts.is_empty() {
            return BlockComplexity::Trivial;
        }
        let result_plain = block
            .result
            .as_deref()
            .map_or(true, |result| !expr_has_control_flow(result));
        if block.stmts.len() <= 3 && result_plain && block.stmts.iter().all(stmt_is_plain) {
            BlockComplexity::Simple
        } else {
            BlockComplexity::Complex
        }
    }

    /// A conditional can become a ternary iff both branches are simple
    /// operand expressions and neither is itself control flow.
    pub fn ternary_candidate(&self, expr_if: &ExprIf) -> bool {
        if !branch_is_simple(&expr_if.then) {
            return false;
        }
        expr_if
            .else_branch
            .as_deref()
            .map_or(true, branch_is_simple)
    }

    pub fn classify_match(&self, expr_match: &ExprMatch) -> MatchShape {
        let arm_count = expr_match.arms.len();
        MatchShape {
            has_regex: expr_match.arms.iter().any(|arm| arm.pat.is_regex()),
            arm_count,
            oversized: arm_count > self.match_arm_threshold,
        }
    }
}

/// Plain declaration/expression/assignment without embedded control flow.
fn stmt_is_plain(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Expr(expr) => !expr_has_control_flow(expr),
        Stmt::Let(let_stmt) => !expr_has_control_flow(&let_stmt.init),
        Stmt::Assign(assign) => {
            !expr_has_control_flow(&assign.target) && !expr_has_control_flow(&assign.value)
        }
        _ => false,
    }
}

/// Does this expression transitively contain a conditional, match, or
/// inner block?
pub fn expr_has_control_flow(expr: &Expr) -> bool {
    match expr.kind() {
        ExprKind::If(_) | ExprKind::Match(_) | ExprKind::Block(_) => true,
        ExprKind::Var(_) | ExprKind::Lit(_) => false,
        ExprKind::Unary(unary) => expr_has_control_flow(&unary.operand),
        ExprKind::Binary(binary) => {
            expr_has_control_flow(&binary.lhs) || expr_has_control_flow(&binary.rhs)
        }
        ExprKind::Index(index) => {
            expr_has_control_flow(&index.obj) || expr_has_control_flow(&index.index)
        }
        ExprKind::Member(member) => expr_has_control_flow(&member.obj),
        ExprKind::Call(call) => {
            expr_has_control_flow(&call.callee) || call.args.iter().any(expr_has_control_flow)
        }
        // A lambda body is its own scope; control flow inside it does
        // not complicate the enclosing block.
        ExprKind::Lambda(_) => false,
        ExprKind::Record(record) => record
            .fields
            .iter()
            .any(|field| expr_has_control_flow(&field.value)),
        ExprKind::Array(array) => array.elems.iter().any(expr_has_control_flow),
        ExprKind::Comprehension(_) => true,
        ExprKind::Try(inner) => expr_has_control_flow(inner),
    }
}

/// Ternary-branch simplicity: a literal, a variable, arithmetic over
/// simple operands, or a call whose arguments are all simple.
fn branch_is_simple(expr: &Expr) -> bool {
    match expr.kind() {
        ExprKind::Var(_) | ExprKind::Lit(_) => true,
        ExprKind::Unary(unary) => branch_is_simple(&unary.operand),
        ExprKind::Binary(binary) => branch_is_simple(&binary.lhs) && branch_is_simple(&binary.rhs),
        ExprKind::Member(member) => branch_is_simple(&member.obj),
        ExprKind::Index(index) => branch_is_simple(&index.obj) && branch_is_simple(&index.index),
        ExprKind::Call(call) => {
            branch_is_simple(&call.callee) && call.args.iter().all(branch_is_simple)
        }
        _ => false,
    }
}
