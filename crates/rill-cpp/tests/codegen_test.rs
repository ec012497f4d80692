//! Module-level lowering through [`CppCodegen`].

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rill_core::ast::{
    BinOp, Expr, ExprBinary, ExprBlock, ExprKind, ExprRecord, FieldDef, FieldInit, FunctionDef,
    FunctionParam, Item, Module, RecordDef, Stmt, SumDef, TypeParam, VariantDef,
};
use rill_core::registry::{FunctionRegistry, TypeRegistry};
use rill_core::types::Ty;
use rill_cpp::ast::{CxxDecl, CxxExpr};
use rill_cpp::CppCodegen;

fn codegen() -> CppCodegen {
    CppCodegen::new(
        Arc::new(TypeRegistry::new()),
        Arc::new(FunctionRegistry::new()),
    )
}

fn square_fn() -> FunctionDef {
    FunctionDef {
        name: "square".into(),
        type_params: vec![],
        params: vec![FunctionParam {
            name: "n".into(),
            ty: Ty::int(),
        }],
        ret: Ty::int(),
        body: ExprBlock::of_result(Expr::new(
            Ty::int(),
            ExprKind::Binary(ExprBinary {
                op: BinOp::Mul,
                lhs: Box::new(Expr::var("n", Ty::int())),
                rhs: Box::new(Expr::var("n", Ty::int())),
            }),
        )),
    }
}

#[test]
fn module_lowering_is_deterministic() {
    let module = Module {
        name: "geometry".into(),
        items: vec![
            Item::Record(RecordDef {
                name: "Point".into(),
                type_params: vec![],
                fields: vec![
                    FieldDef {
                        name: "x".into(),
                        ty: Ty::float(),
                    },
                    FieldDef {
                        name: "y".into(),
                        ty: Ty::float(),
                    },
                ],
            }),
            Item::Function(square_fn()),
        ],
    };
    let first = codegen().lower_module(&module).unwrap();
    let second = codegen().lower_module(&module).unwrap();
    assert_eq!(first, second);
}

#[test]
fn function_lowering_shapes_signature_and_body() {
    let unit = codegen()
        .lower_module(&Module {
            name: "main".into(),
            items: vec![Item::Function(square_fn())],
        })
        .unwrap();
    assert_eq!(unit.decls.len(), 1);
    let CxxDecl::Function(function) = &unit.decls[0] else {
        panic!("expected function decl");
    };
    assert!(function.template.is_empty());
    assert_eq!(function.ret, "int64_t");
    assert_eq!(function.name, "square");
    assert_eq!(function.params.len(), 1);
    assert_eq!(function.params[0].ty, "int64_t");
    // the trivial body is a single return
    assert_eq!(function.body.len(), 1);
}

#[test]
fn record_decl_keeps_field_order() {
    let unit = codegen()
        .lower_module(&Module {
            name: "main".into(),
            items: vec![Item::Record(RecordDef {
                name: "Span".into(),
                type_params: vec![],
                fields: vec![
                    FieldDef {
                        name: "start".into(),
                        ty: Ty::int(),
                    },
                    FieldDef {
                        name: "end".into(),
                        ty: Ty::int(),
                    },
                ],
            })],
        })
        .unwrap();
    let CxxDecl::Struct(record) = &unit.decls[0] else {
        panic!("expected struct decl");
    };
    assert_eq!(record.name, "Span");
    let names: Vec<_> = record.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["start", "end"]);
}

#[test]
fn generic_sum_lowers_to_variant_structs_and_alias() {
    let unit = codegen()
        .lower_module(&Module {
            name: "main".into(),
            items: vec![Item::Sum(SumDef {
                name: "Tree".into(),
                type_params: vec![TypeParam::new("T")],
                variants: vec![
                    VariantDef {
                        name: "Leaf".into(),
                        fields: vec![FieldDef {
                            name: "value".into(),
                            ty: Ty::var("T"),
                        }],
                    },
                    VariantDef {
                        name: "Empty".into(),
                        fields: vec![],
                    },
                ],
            })],
        })
        .unwrap();
    assert_eq!(unit.decls.len(), 3);
    let CxxDecl::Struct(leaf) = &unit.decls[0] else {
        panic!("expected variant struct");
    };
    assert_eq!(leaf.name, "Leaf");
    assert_eq!(leaf.template.params, vec!["T"]);
    assert_eq!(leaf.fields[0].ty, "T");
    let CxxDecl::Struct(empty) = &unit.decls[1] else {
        panic!("expected marker struct");
    };
    assert!(empty.fields.is_empty());
    let CxxDecl::UsingAlias(alias) = &unit.decls[2] else {
        panic!("expected alias decl");
    };
    assert_eq!(alias.name, "Tree");
    assert_eq!(alias.target, "std::variant<Leaf<T>, Empty>");
}

#[test]
fn empty_sum_is_rejected() {
    let result = codegen().lower_module(&Module {
        name: "main".into(),
        items: vec![Item::Sum(SumDef {
            name: "Never".into(),
            type_params: vec![],
            variants: vec![],
        })],
    });
    assert!(result.is_err());
}

#[test]
fn generic_function_body_spells_parameterized_record_names() {
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
    let generic_fn = FunctionDef {
        name: "boxed".into(),
        type_params: vec![TypeParam::new("T")],
        params: vec![FunctionParam {
            name: "v".into(),
            ty: Ty::var("T"),
        }],
        ret: Ty::generic("Box", vec![Ty::var("T")]),
        body: ExprBlock::of_result(record.clone()),
    };
    let plain_fn = FunctionDef {
        name: "rebox".into(),
        type_params: vec![],
        params: vec![],
        ret: Ty::generic("Box", vec![Ty::var("T")]),
        body: ExprBlock::new(
            vec![Stmt::let_("v", Some(Ty::int()), Expr::int(1))],
            Some(record),
        ),
    };
    let unit = codegen()
        .lower_module(&Module {
            name: "main".into(),
            items: vec![Item::Function(generic_fn), Item::Function(plain_fn)],
        })
        .unwrap();

    let brace_ty = |decl: &CxxDecl| -> String {
        let CxxDecl::Function(function) = decl else {
            panic!("expected function decl");
        };
        let rendered = serde_json::to_string(&function.body).unwrap();
        let inside = rendered.contains("Box<T>");
        if inside {
            "Box<T>".to_string()
        } else {
            "Box".to_string()
        }
    };
    assert_eq!(brace_ty(&unit.decls[0]), "Box<T>");
    assert_eq!(brace_ty(&unit.decls[1]), "Box");

    let CxxDecl::Function(function) = &unit.decls[0] else {
        panic!("expected function decl");
    };
    assert_eq!(function.template.params, vec!["T"]);
    assert_eq!(function.ret, "Box<T>");
}

#[test]
fn reserved_parameter_names_are_sanitized() {
    let unit = codegen()
        .lower_module(&Module {
            name: "main".into(),
            items: vec![Item::Function(FunctionDef {
                name: "operator".into(),
                type_params: vec![],
                params: vec![FunctionParam {
                    name: "template".into(),
                    ty: Ty::int(),
                }],
                ret: Ty::int(),
                body: ExprBlock::of_result(Expr::var("template", Ty::int())),
            })],
        })
        .unwrap();
    let CxxDecl::Function(function) = &unit.decls[0] else {
        panic!("expected function decl");
    };
    assert_eq!(function.name, "operator_");
    assert_eq!(function.params[0].name, "template_");
    assert_eq!(
        function.body,
        vec![rill_cpp::ast::CxxStmt::Return(Some(CxxExpr::ident(
            "template_"
        )))]
    );
}
