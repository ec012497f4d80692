use serde::{Deserialize, Serialize};

/// The resolved type attached to every IR expression.
///
/// A type is "fully resolved" iff it contains no type variable
/// transitively; backends query this before choosing between explicit
/// typing and target-side deduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ty {
    Primitive(Primitive),
    /// Unbound generic parameter, e.g. the `T` of a generic function.
    Var(String),
    Generic(TyGeneric),
    Array(Box<Ty>),
    Func(TyFunc),
    Record(TyRecord),
    Sum(TySum),
    /// Externally defined type, known by name only.
    Opaque(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    Int,
    Float,
    Bool,
    Str,
    Regex,
    Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TyGeneric {
    pub base: String,
    pub args: Vec<Ty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TyFunc {
    pub params: Vec<Ty>,
    pub ret: Box<Ty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TyRecord {
    pub name: String,
    pub fields: Vec<TyField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TyField {
    pub name: String,
    pub ty: Ty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TySum {
    pub name: String,
    pub variants: Vec<TyVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TyVariant {
    pub name: String,
    pub fields: Vec<Ty>,
}

/// Ownership-wrapper constructors; the choice drives `.` vs `->` member
/// access in pointer-based targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ownership {
    Unique,
    Shared,
    Weak,
}

impl Ownership {
    pub fn from_base(base: &str) -> Option<Ownership> {
        match base {
            "Own" => Some(Ownership::Unique),
            "Shared" => Some(Ownership::Shared),
            "Weak" => Some(Ownership::Weak),
            _ => None,
        }
    }
}

impl Ty {
    pub fn int() -> Ty {
        Ty::Primitive(Primitive::Int)
    }
    pub fn float() -> Ty {
        Ty::Primitive(Primitive::Float)
    }
    pub fn bool() -> Ty {
        Ty::Primitive(Primitive::Bool)
    }
    pub fn string() -> Ty {
        Ty::Primitive(Primitive::Str)
    }
    pub fn regex() -> Ty {
        Ty::Primitive(Primitive::Regex)
    }
    pub fn unit() -> Ty {
        Ty::Primitive(Primitive::Unit)
    }
    pub fn var(name: impl Into<String>) -> Ty {
        Ty::Var(name.into())
    }
    pub fn array(elem: Ty) -> Ty {
        Ty::Array(Box::new(elem))
    }
    pub fn generic(base: impl Into<String>, args: Vec<Ty>) -> Ty {
        Ty::Generic(TyGeneric {
            base: base.into(),
            args,
        })
    }
    pub fn func(params: Vec<Ty>, ret: Ty) -> Ty {
        Ty::Func(TyFunc {
            params,
            ret: Box::new(ret),
        })
    }
    pub fn opaque(name: impl Into<String>) -> Ty {
        Ty::Opaque(name.into())
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Ty::Primitive(Primitive::Unit))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Ty::Array(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Ty::Primitive(Primitive::Str))
    }

    /// Named record/sum/opaque base, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Ty::Record(record) => Some(record.name.as_str()),
            Ty::Sum(sum) => Some(sum.name.as_str()),
            Ty::Opaque(name) => Some(name.as_str()),
            Ty::Generic(generic) => Some(generic.base.as_str()),
            _ => None,
        }
    }

    /// `Some(..)` when this type is one of the ownership-wrapper
    /// constructors applied to a pointee.
    pub fn ownership(&self) -> Option<Ownership> {
        match self {
            Ty::Generic(generic) => Ownership::from_base(generic.base.as_str()),
            _ => None,
        }
    }

    pub fn contains_var(&self) -> bool {
        match self {
            Ty::Var(_) => true,
            Ty::Primitive(_) | Ty::Opaque(_) => false,
            Ty::Generic(generic) => generic.args.iter().any(Ty::contains_var),
            Ty::Array(elem) => elem.contains_var(),
            Ty::Func(func) => {
                func.params.iter().any(Ty::contains_var) || func.ret.contains_var()
            }
            Ty::Record(record) => record.fields.iter().any(|f| f.ty.contains_var()),
            Ty::Sum(sum) => sum
                .variants
                .iter()
                .any(|v| v.fields.iter().any(Ty::contains_var)),
        }
    }

    /// Fully resolved iff no type variable remains transitively.
    pub fn is_resolved(&self) -> bool {
        !self.contains_var()
    }
}
