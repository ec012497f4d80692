//! Expression and statement lowering tests.

use pretty_assertions::assert_eq;
use rill_core::ast::{
    BinOp, Expr, ExprBinary, ExprBlock, ExprCall, ExprIf, ExprKind, ExprMatch, ExprMember,
    ExprRecord, FieldInit, MatchArm, Pat, PatCtor, PatRegex, Stmt,
};
use rill_core::error::Error;
use rill_core::registry::{FunctionRegistry, TypeRegistry};
use rill_core::types::Ty;
use rill_cpp::analysis::{Analyzer, BlockComplexity};
use rill_cpp::ast::{CxxExpr, CxxStmt, MemberOp};
use rill_cpp::engine::Lowerer;
use rill_cpp::policy::RuntimePolicy;
use rill_cpp::types::TypeMapper;

struct Fixture {
    mapper: TypeMapper,
    types: TypeRegistry,
    functions: FunctionRegistry,
    policy: RuntimePolicy,
    analyzer: Analyzer,
}

impl Fixture {
    fn new() -> Self {
        Self {
            mapper: TypeMapper::new(),
            types: TypeRegistry::new(),
            functions: FunctionRegistry::new(),
            policy: RuntimePolicy::new(),
            analyzer: Analyzer::new(),
        }
    }

    fn lowerer(&self) -> Lowerer<'_> {
        Lowerer::new(
            &self.mapper,
            &self.types,
            &self.functions,
            &self.policy,
            &self.analyzer,
        )
    }
}

fn add(lhs: Expr, rhs: Expr) -> Expr {
    Expr::new(
        Ty::int(),
        ExprKind::Binary(ExprBinary {
            op: BinOp::Add,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }),
    )
}

fn int_var(name: &str) -> Expr {
    Expr::var(name, Ty::int())
}

fn call_named(name: &str, args: Vec<Expr>, ret: Ty) -> Expr {
    Expr::new(
        ret,
        ExprKind::Call(ExprCall {
            callee: Box::new(Expr::var(name, Ty::unit())),
            args,
        }),
    )
}

#[test]
fn lowering_is_deterministic() {
    let fixture = Fixture::new();
    let expr = Expr::new(
        Ty::int(),
        ExprKind::Block(ExprBlock::new(
            vec![Stmt::let_("a", None, Expr::int(1))],
            Some(add(int_var("a"), Expr::int(2))),
        )),
    );
    let first = fixture.lowerer().lower_expr(&expr).unwrap();
    let second = fixture.lowerer().lower_expr(&expr).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn every_expression_variant_lowers() {
    let fixture = Fixture::new();
    let record = Expr::new(
        Ty::opaque("Point"),
        ExprKind::Record(ExprRecord {
            name: "Point".into(),
            fields: vec![FieldInit {
                name: "x".into(),
                value: Expr::int(1),
            }],
        }),
    );
    let match_expr = Expr::new(
        Ty::int(),
        ExprKind::Match(ExprMatch {
            scrutinee: Box::new(int_var("n")),
            arms: vec![
                MatchArm::new(Pat::Lit(rill_core::ast::Lit::Int(0)), Expr::int(1)),
                MatchArm::new(Pat::Wildcard, Expr::int(2)),
            ],
        }),
    );
    let samples = vec![
        int_var("x"),
        Expr::int(7),
        Expr::new(
            Ty::int(),
            ExprKind::Unary(rill_core::ast::ExprUnary {
                op: rill_core::ast::UnaryOp::Neg,
                operand: Box::new(int_var("x")),
            }),
        ),
        add(int_var("x"), Expr::int(1)),
        Expr::new(
            Ty::int(),
            ExprKind::Index(rill_core::ast::ExprIndex {
                obj: Box::new(Expr::var("xs", Ty::array(Ty::int()))),
                index: Box::new(Expr::int(0)),
            }),
        ),
        Expr::new(
            Ty::int(),
            ExprKind::Member(ExprMember {
                obj: Box::new(Expr::var("p", Ty::opaque("Point"))),
                field: "x".into(),
            }),
        ),
        call_named("f", vec![Expr::int(1)], Ty::int()),
        Expr::new(
            Ty::func(vec![Ty::int()], Ty::int()),
            ExprKind::Lambda(rill_core::ast::ExprLambda {
                params: vec![rill_core::ast::LambdaParam {
                    name: "n".into(),
                    ty: Ty::int(),
                }],
                body: Box::new(int_var("n")),
            }),
        ),
        Expr::new(
            Ty::int(),
            ExprKind::If(ExprIf {
                cond: Box::new(Expr::bool(true)),
                then: Box::new(Expr::int(1)),
                else_branch: Some(Box::new(Expr::int(2))),
            }),
        ),
        Expr::new(
            Ty::int(),
            ExprKind::Block(ExprBlock::of_result(Expr::int(3))),
        ),
        match_expr,
        record,
        Expr::new(
            Ty::array(Ty::int()),
            ExprKind::Array(rill_core::ast::ExprArray {
                elems: vec![Expr::int(1), Expr::int(2)],
            }),
        ),
        Expr::new(
            Ty::array(Ty::int()),
            ExprKind::Comprehension(rill_core::ast::ExprComprehension {
                generators: vec![rill_core::ast::Generator {
                    var: "x".into(),
                    iter: Expr::var("xs", Ty::array(Ty::int())),
                }],
                filters: vec![],
                output: Box::new(int_var("x")),
            }),
        ),
        Expr::new(
            Ty::int(),
            ExprKind::Try(Box::new(Expr::var("maybe", Ty::generic("Option", vec![Ty::int()])))),
        ),
    ];
    for sample in samples {
        let mut lowerer = fixture.lowerer();
        lowerer
            .lower_expr(&sample)
            .unwrap_or_else(|err| panic!("failed to lower {:?}: {}", sample.kind(), err));
    }
}

#[test]
fn every_statement_variant_lowers() {
    let fixture = Fixture::new();
    let samples = vec![
        Stmt::Expr(call_named("f", vec![], Ty::unit())),
        Stmt::let_("x", Some(Ty::int()), Expr::int(1)),
        Stmt::Assign(rill_core::ast::StmtAssign {
            target: int_var("x"),
            value: Expr::int(2),
        }),
        Stmt::Return(Some(Expr::int(1))),
        Stmt::Return(None),
        Stmt::Break,
        Stmt::Continue,
        Stmt::If(rill_core::ast::StmtIf {
            cond: Expr::bool(true),
            then: vec![Stmt::Break],
            else_branch: Some(vec![Stmt::Continue]),
        }),
        Stmt::While(rill_core::ast::StmtWhile {
            cond: Expr::bool(true),
            body: vec![Stmt::Break],
        }),
        Stmt::For(rill_core::ast::StmtFor {
            var: "x".into(),
            iter: Expr::var("xs", Ty::array(Ty::int())),
            body: vec![Stmt::Continue],
        }),
        Stmt::Match(ExprMatch {
            scrutinee: Box::new(int_var("n")),
            arms: vec![MatchArm::new(Pat::Wildcard, Expr::unit())],
        }),
        Stmt::Block(vec![Stmt::Break]),
    ];
    for sample in samples {
        let mut lowerer = fixture.lowerer();
        lowerer
            .lower_stmt(&sample)
            .unwrap_or_else(|err| panic!("failed to lower {:?}: {}", sample.kind_name(), err));
    }
}

#[test]
fn block_statement_order_is_preserved() {
    let fixture = Fixture::new();
    let block = ExprBlock::new(
        vec![
            Stmt::let_("a", None, Expr::int(1)),
            Stmt::let_("b", None, Expr::int(2)),
            Stmt::let_("c", None, Expr::int(3)),
        ],
        Some(add(int_var("a"), int_var("b"))),
    );
    let expr = Expr::new(Ty::int(), ExprKind::Block(block));
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();

    let CxxExpr::Call(call) = lowered else {
        panic!("expected immediately-invoked closure");
    };
    let CxxExpr::Lambda(lambda) = call.callee.as_ref() else {
        panic!("expected lambda callee");
    };
    let names: Vec<_> = lambda
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            CxxStmt::VarDecl(decl) => Some(decl.name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert!(matches!(lambda.body.last(), Some(CxxStmt::Return(Some(_)))));
}

#[test]
fn simple_block_classifies_and_lowers_via_simple_strategy() {
    let fixture = Fixture::new();
    let block = ExprBlock::new(
        vec![
            Stmt::let_("a", None, Expr::int(1)),
            Stmt::let_("b", None, Expr::int(2)),
        ],
        Some(add(int_var("a"), int_var("b"))),
    );
    assert_eq!(
        fixture.analyzer.classify_block(&block),
        BlockComplexity::Simple
    );
    let expr = Expr::new(Ty::int(), ExprKind::Block(block));
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();
    assert!(matches!(lowered, CxxExpr::Call(_)));
}

#[test]
fn trivial_block_inlines_its_result() {
    let fixture = Fixture::new();
    let expr = Expr::new(
        Ty::int(),
        ExprKind::Block(ExprBlock::of_result(Expr::int(42))),
    );
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();
    assert_eq!(lowered, CxxExpr::int(42));
}

#[test]
fn unit_conditional_in_value_position_is_fatal() {
    let fixture = Fixture::new();
    let expr = Expr::new(
        Ty::unit(),
        ExprKind::If(ExprIf {
            cond: Box::new(Expr::bool(true)),
            then: Box::new(Expr::unit()),
            else_branch: None,
        }),
    );
    let err = fixture.lowerer().lower_expr(&expr).unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));
}

#[test]
fn ternary_for_simple_conditional() {
    let fixture = Fixture::new();
    let expr = Expr::new(
        Ty::int(),
        ExprKind::If(ExprIf {
            cond: Box::new(Expr::var("flag", Ty::bool())),
            then: Box::new(Expr::int(1)),
            else_branch: Some(Box::new(Expr::int(2))),
        }),
    );
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();
    assert!(matches!(lowered, CxxExpr::Ternary(_)));
}

#[test]
fn member_access_through_owning_wrapper_uses_arrow() {
    let fixture = Fixture::new();
    let owner = Expr::var("owner", Ty::generic("Own", vec![Ty::opaque("Node")]));
    let expr = Expr::new(
        Ty::int(),
        ExprKind::Member(ExprMember {
            obj: Box::new(owner),
            field: "weight".into(),
        }),
    );
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();
    let CxxExpr::Member(member) = lowered else {
        panic!("expected member access");
    };
    assert_eq!(member.op, MemberOp::Arrow);

    let plain = Expr::var("node", Ty::opaque("Node"));
    let expr = Expr::new(
        Ty::int(),
        ExprKind::Member(ExprMember {
            obj: Box::new(plain),
            field: "weight".into(),
        }),
    );
    let CxxExpr::Member(member) = fixture.lowerer().lower_expr(&expr).unwrap() else {
        panic!("expected member access");
    };
    assert_eq!(member.op, MemberOp::Dot);
}

#[test]
fn generic_record_construction_switches_on_context() {
    let fixture = Fixture::new();
    let record = Expr::new(
        Ty::generic("Box", vec![Ty::var("T")]),
        ExprKind::Record(ExprRecord {
            name: "Box".into(),
            fields: vec![FieldInit {
                name: "value".into(),
                value: Expr::var("v", Ty::var("T")),
            }],
        }),
    );

    let outside = fixture.lowerer().lower_expr(&record).unwrap();
    let CxxExpr::BraceInit(init) = outside else {
        panic!("expected brace init");
    };
    assert_eq!(init.ty, "Box");

    let mut lowerer = fixture.lowerer();
    let inside = lowerer
        .with_generic_scope(true, |lw| lw.lower_expr(&record))
        .unwrap();
    let CxxExpr::BraceInit(init) = inside else {
        panic!("expected brace init");
    };
    assert_eq!(init.ty, "Box<T>");
}

#[test]
fn generic_flag_is_restored_after_errors() {
    let fixture = Fixture::new();
    let mut lowerer = fixture.lowerer();
    let bad = Expr::new(
        Ty::unit(),
        ExprKind::If(ExprIf {
            cond: Box::new(Expr::bool(true)),
            then: Box::new(Expr::unit()),
            else_branch: None,
        }),
    );
    let result = lowerer.with_generic_scope(true, |lw| lw.lower_expr(&bad));
    assert!(result.is_err());
    assert!(!lowerer.in_generic_fn());
}

#[test]
fn regex_arms_keep_source_order() {
    let fixture = Fixture::new();
    let arm = |pattern: &str, value: i64| {
        MatchArm::new(
            Pat::Regex(PatRegex {
                pattern: pattern.into(),
                captures: vec![],
            }),
            Expr::int(value),
        )
    };
    let expr = Expr::new(
        Ty::int(),
        ExprKind::Match(ExprMatch {
            scrutinee: Box::new(Expr::var("line", Ty::string())),
            arms: vec![
                arm("^a+$", 1),
                arm("^b+$", 2),
                MatchArm::new(Pat::Wildcard, Expr::int(3)),
            ],
        }),
    );
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();
    let rendered = serde_json::to_string(&lowered).unwrap();
    let pos_a = rendered.find("^a+$").expect("first pattern missing");
    let pos_b = rendered.find("^b+$").expect("second pattern missing");
    assert!(pos_a < pos_b, "regex arms reordered");
}

#[test]
fn regex_captures_bind_in_index_order_and_skip_wildcards() {
    let fixture = Fixture::new();
    let expr = Expr::new(
        Ty::string(),
        ExprKind::Match(ExprMatch {
            scrutinee: Box::new(Expr::var("line", Ty::string())),
            arms: vec![
                MatchArm::new(
                    Pat::Regex(PatRegex {
                        pattern: "(\\w+)=(\\w+)".into(),
                        captures: vec!["key".into(), "_".into()],
                    }),
                    Expr::var("key", Ty::string()),
                ),
                MatchArm::new(Pat::Wildcard, Expr::string("")),
            ],
        }),
    );
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();
    let rendered = serde_json::to_string(&lowered).unwrap();
    assert!(rendered.contains("key"));
    // the wildcard-named capture produces no binding
    assert!(!rendered.contains("\"_\""));
}

#[test]
fn variant_match_dispatches_on_tag() {
    let fixture = Fixture::new();
    let shape_ty = Ty::opaque("Shape");
    let expr = Expr::new(
        Ty::float(),
        ExprKind::Match(ExprMatch {
            scrutinee: Box::new(Expr::var("shape", shape_ty)),
            arms: vec![
                MatchArm::new(
                    Pat::Ctor(PatCtor {
                        name: "Circle".into(),
                        fields: vec!["radius".into()],
                    }),
                    Expr::var("radius", Ty::float()),
                ),
                MatchArm::new(Pat::Bind("other".into()), Expr::lit(rill_core::ast::Lit::Float(0.0))),
            ],
        }),
    );
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();
    let rendered = serde_json::to_string(&lowered).unwrap();
    assert!(rendered.contains("std::holds_alternative<Circle>"));
    assert!(rendered.contains("std::get<Circle>"));
    assert!(rendered.contains("other"));
}

#[test]
fn try_operator_hoists_a_guarded_temp() {
    let fixture = Fixture::new();
    let stmt = Stmt::let_(
        "x",
        None,
        Expr::new(
            Ty::int(),
            ExprKind::Try(Box::new(Expr::var(
                "maybe",
                Ty::generic("Option", vec![Ty::int()]),
            ))),
        ),
    );
    let lowered = fixture.lowerer().lower_stmt(&stmt).unwrap();
    assert_eq!(lowered.len(), 3);
    assert!(matches!(&lowered[0], CxxStmt::VarDecl(decl) if decl.ty.is_none()));
    assert!(matches!(&lowered[1], CxxStmt::If(_)));
    assert!(matches!(&lowered[2], CxxStmt::VarDecl(decl) if decl.name == "x"));
    let rendered = serde_json::to_string(&lowered[1]).unwrap();
    assert!(rendered.contains("has_value"));
}

#[test]
fn try_in_match_arm_statement_stays_inside_the_closure() {
    let fixture = Fixture::new();
    let unwrapped = Expr::new(
        Ty::int(),
        ExprKind::Try(Box::new(Expr::var(
            "maybe",
            Ty::generic("Option", vec![Ty::int()]),
        ))),
    );
    let stmt = Stmt::Match(ExprMatch {
        scrutinee: Box::new(int_var("n")),
        arms: vec![
            MatchArm::new(Pat::Lit(rill_core::ast::Lit::Int(0)), Expr::unit()),
            MatchArm::new(
                Pat::Wildcard,
                call_named("consume", vec![unwrapped], Ty::unit()),
            ),
        ],
    });
    let lowered = fixture.lowerer().lower_stmt(&stmt).unwrap();
    // nothing hoisted ahead of the match closure
    assert_eq!(lowered.len(), 1);
    let CxxStmt::Expr(CxxExpr::Call(call)) = &lowered[0] else {
        panic!("expected match closure");
    };
    let rendered = serde_json::to_string(&call.callee).unwrap();
    assert!(rendered.contains("has_value"));
}

#[test]
fn try_in_match_guard_stays_inside_the_arm() {
    let fixture = Fixture::new();
    let guard = Expr::new(
        Ty::bool(),
        ExprKind::Try(Box::new(Expr::var(
            "check",
            Ty::generic("Option", vec![Ty::bool()]),
        ))),
    );
    let match_expr = Expr::new(
        Ty::int(),
        ExprKind::Match(ExprMatch {
            scrutinee: Box::new(int_var("n")),
            arms: vec![
                MatchArm::with_guard(Pat::Wildcard, guard, Expr::int(1)),
                MatchArm::new(Pat::Wildcard, Expr::int(2)),
            ],
        }),
    );
    let lowered = fixture
        .lowerer()
        .lower_stmt(&Stmt::let_("x", None, match_expr))
        .unwrap();
    // the guard's unwrap lives inside the closure, not before the decl
    assert_eq!(lowered.len(), 1);
    assert!(matches!(&lowered[0], CxxStmt::VarDecl(decl) if decl.name == "x"));
    let rendered = serde_json::to_string(&lowered[0]).unwrap();
    assert!(rendered.contains("has_value"));
}

#[test]
fn try_in_while_condition_runs_every_iteration() {
    let fixture = Fixture::new();
    let cond = Expr::new(
        Ty::bool(),
        ExprKind::Try(Box::new(Expr::var(
            "next",
            Ty::generic("Option", vec![Ty::bool()]),
        ))),
    );
    let stmt = Stmt::While(rill_core::ast::StmtWhile {
        cond,
        body: vec![Stmt::Break],
    });
    let lowered = fixture.lowerer().lower_stmt(&stmt).unwrap();
    assert_eq!(lowered.len(), 1);
    let CxxStmt::While(while_stmt) = &lowered[0] else {
        panic!("expected loop");
    };
    // the unwrap rotates into the loop behind an explicit exit test
    assert_eq!(while_stmt.cond, CxxExpr::bool_lit(true));
    assert!(matches!(&while_stmt.body[0], CxxStmt::VarDecl(_)));
    assert!(matches!(&while_stmt.body[1], CxxStmt::If(_)));
    let rendered = serde_json::to_string(&while_stmt.body).unwrap();
    assert!(rendered.contains("has_value"));
}

#[test]
fn try_in_short_circuit_rhs_stays_conditional() {
    let fixture = Fixture::new();
    let rhs = Expr::new(
        Ty::bool(),
        ExprKind::Try(Box::new(Expr::var(
            "flag",
            Ty::generic("Option", vec![Ty::bool()]),
        ))),
    );
    let expr = Expr::new(
        Ty::bool(),
        ExprKind::Binary(ExprBinary {
            op: BinOp::And,
            lhs: Box::new(Expr::var("ok", Ty::bool())),
            rhs: Box::new(rhs),
        }),
    );
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();
    let CxxExpr::Binary(binary) = lowered else {
        panic!("expected binary expression");
    };
    assert_eq!(*binary.lhs, CxxExpr::ident("ok"));
    // the rhs unwrap evaluates behind the operator, inside a closure
    assert!(matches!(binary.rhs.as_ref(), CxxExpr::Call(_)));
    let rendered = serde_json::to_string(&binary.rhs).unwrap();
    assert!(rendered.contains("has_value"));
}

#[test]
fn unit_literal_result_emits_nothing() {
    let fixture = Fixture::new();
    let body = fixture
        .lowerer()
        .lower_body(&ExprBlock::of_result(Expr::unit()))
        .unwrap();
    assert!(body.is_empty());

    let lambda = Expr::new(
        Ty::func(vec![], Ty::unit()),
        ExprKind::Lambda(rill_core::ast::ExprLambda {
            params: vec![],
            body: Box::new(Expr::unit()),
        }),
    );
    let CxxExpr::Lambda(lowered) = fixture.lowerer().lower_expr(&lambda).unwrap() else {
        panic!("expected lambda");
    };
    assert!(lowered.body.is_empty());
}

#[test]
fn declarations_use_explicit_types_unless_deduction_is_required() {
    let fixture = Fixture::new();
    let concrete = Stmt::let_("x", Some(Ty::int()), Expr::int(1));
    let lowered = fixture.lowerer().lower_stmt(&concrete).unwrap();
    assert!(
        matches!(&lowered[0], CxxStmt::VarDecl(decl) if decl.ty.as_deref() == Some("int64_t"))
    );

    let unresolved = Stmt::let_("y", Some(Ty::var("T")), int_var("v"));
    let lowered = fixture.lowerer().lower_stmt(&unresolved).unwrap();
    assert!(matches!(&lowered[0], CxxStmt::VarDecl(decl) if decl.ty.is_none()));
}

#[test]
fn reserved_identifiers_are_renamed() {
    let fixture = Fixture::new();
    let expr = Expr::var("class", Ty::int());
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();
    assert_eq!(lowered, CxxExpr::ident("class_"));
}

#[test]
fn boolean_keywords_become_literals() {
    let fixture = Fixture::new();
    let expr = Expr::var("true", Ty::bool());
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();
    assert_eq!(lowered, CxxExpr::bool_lit(true));
}

#[test]
fn call_tables_apply_in_order() {
    let fixture = Fixture::new();
    fixture.functions.register("area", "geo");

    // io intrinsic rename
    let print = call_named("println", vec![Expr::string("hi")], Ty::unit());
    let lowered = fixture.lowerer().lower_expr(&print).unwrap();
    let CxxExpr::Call(call) = lowered else {
        panic!("expected call")
    };
    assert_eq!(*call.callee, CxxExpr::ident("rill::rt::println"));

    // single-argument stdlib override
    let cast = call_named("int", vec![Expr::lit(rill_core::ast::Lit::Float(1.5))], Ty::int());
    let CxxExpr::Call(call) = fixture.lowerer().lower_expr(&cast).unwrap() else {
        panic!("expected call")
    };
    assert_eq!(*call.callee, CxxExpr::ident("static_cast<int64_t>"));

    // registry-qualified resolution
    let qualified = call_named("area", vec![int_var("r")], Ty::float());
    let CxxExpr::Call(call) = fixture.lowerer().lower_expr(&qualified).unwrap() else {
        panic!("expected call")
    };
    assert_eq!(*call.callee, CxxExpr::ident("geo::area"));
}

#[test]
fn sequence_methods_map_to_accessors_and_helpers() {
    let fixture = Fixture::new();
    let xs = Expr::var("xs", Ty::array(Ty::int()));
    let method_call = |name: &str, args: Vec<Expr>, ret: Ty| {
        Expr::new(
            ret,
            ExprKind::Call(ExprCall {
                callee: Box::new(Expr::new(
                    Ty::unit(),
                    ExprKind::Member(ExprMember {
                        obj: Box::new(xs.clone()),
                        field: name.into(),
                    }),
                )),
                args,
            }),
        )
    };

    let length = method_call("length", vec![], Ty::int());
    let rendered = serde_json::to_string(&fixture.lowerer().lower_expr(&length).unwrap()).unwrap();
    assert!(rendered.contains("size"));

    let push = method_call("push", vec![Expr::int(4)], Ty::unit());
    let rendered = serde_json::to_string(&fixture.lowerer().lower_expr(&push).unwrap()).unwrap();
    assert!(rendered.contains("push_back"));

    let mapped = method_call("map", vec![int_var("f")], Ty::array(Ty::int()));
    let CxxExpr::Call(call) = fixture.lowerer().lower_expr(&mapped).unwrap() else {
        panic!("expected call")
    };
    assert_eq!(*call.callee, CxxExpr::ident("rill::rt::map"));
    // receiver is the first helper argument
    assert_eq!(call.args[0], CxxExpr::ident("xs"));
}

#[test]
fn comprehension_shape() {
    let fixture = Fixture::new();
    let expr = Expr::new(
        Ty::array(Ty::int()),
        ExprKind::Comprehension(rill_core::ast::ExprComprehension {
            generators: vec![rill_core::ast::Generator {
                var: "x".into(),
                iter: Expr::var("xs", Ty::array(Ty::int())),
            }],
            filters: vec![Expr::new(
                Ty::bool(),
                ExprKind::Binary(ExprBinary {
                    op: BinOp::Gt,
                    lhs: Box::new(int_var("x")),
                    rhs: Box::new(Expr::int(0)),
                }),
            )],
            output: Box::new(add(int_var("x"), Expr::int(1))),
        }),
    );
    let lowered = fixture.lowerer().lower_expr(&expr).unwrap();
    let CxxExpr::Call(call) = lowered else {
        panic!("expected immediately-invoked closure")
    };
    let CxxExpr::Lambda(lambda) = call.callee.as_ref() else {
        panic!("expected lambda")
    };
    assert!(
        matches!(&lambda.body[0], CxxStmt::VarDecl(decl) if decl.ty.as_deref() == Some("std::vector<int64_t>"))
    );
    let CxxStmt::ForRange(for_range) = &lambda.body[1] else {
        panic!("expected range loop")
    };
    // negated filter guard ahead of the push
    assert!(matches!(&for_range.body[0], CxxStmt::If(guard)
        if matches!(&guard.cond, CxxExpr::Unary(u) if u.op == "!")));
    assert!(matches!(lambda.body.last(), Some(CxxStmt::Return(Some(_)))));
}
