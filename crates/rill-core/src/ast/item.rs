use serde::{Deserialize, Serialize};

use crate::ast::{ExprBlock, Ident};
use crate::types::Ty;

/// A parsed, type-checked module: the orchestrator's whole input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: Ident,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Function(FunctionDef),
    Record(RecordDef),
    Sum(SumDef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<FunctionParam>,
    pub ret: Ty,
    pub body: ExprBlock,
}

impl FunctionDef {
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParam {
    pub name: Ident,
    pub ty: Ty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: Ident,
    /// Named constraint, if the source declared one (e.g. `Ord`).
    pub constraint: Option<String>,
}

impl TypeParam {
    pub fn new(name: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDef {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: Ident,
    pub ty: Ty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumDef {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub variants: Vec<VariantDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: Ident,
    /// Ordered field list; empty for marker variants.
    pub fields: Vec<FieldDef>,
}

impl SumDef {
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

impl RecordDef {
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}
