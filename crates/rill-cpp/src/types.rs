//! Mapping from IR types to C++ type names.
//!
//! Mapping is pure: the mapper holds a primitive table, consults the
//! optional type registry, and never fails — an unknown type degrades to
//! the deduction marker or its own raw name, deferring the consequence
//! to the C++ compiler.

use std::collections::BTreeMap;

use itertools::Itertools;
use rill_core::registry::TypeRegistry;
use rill_core::types::{Ownership, Primitive, Ty};
use tracing::{trace, warn};

/// The explicit "deduce this type" marker. Never an error: lowering
/// sites that receive it switch to a deduced-type declaration form.
pub const DEDUCE: &str = "auto";

pub struct TypeMapper {
    primitives: BTreeMap<String, String>,
}

impl Default for TypeMapper {
    fn default() -> Self {
        let mut primitives = BTreeMap::new();
        primitives.insert("Int".to_string(), "int64_t".to_string());
        primitives.insert("Float".to_string(), "double".to_string());
        primitives.insert("Bool".to_string(), "bool".to_string());
        primitives.insert("Str".to_string(), "std::string".to_string());
        primitives.insert("Regex".to_string(), "std::regex".to_string());
        primitives.insert("Unit".to_string(), "void".to_string());
        Self { primitives }
    }
}

impl TypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override or extend the primitive table.
    pub fn with_primitive(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.primitives.insert(name.into(), target.into());
        self
    }

    pub fn map(&self, ty: &Ty, registry: Option<&TypeRegistry>) -> String {
        match ty {
            Ty::Primitive(primitive) => self.primitive_name(*primitive),
            // Assumed in scope at the use site (a template parameter).
            Ty::Var(name) => name.clone(),
            Ty::Generic(generic) => {
                let base = match Ownership::from_base(generic.base.as_str()) {
                    Some(Ownership::Unique) => "std::unique_ptr".to_string(),
                    Some(Ownership::Shared) => "std::shared_ptr".to_string(),
                    Some(Ownership::Weak) => "std::weak_ptr".to_string(),
                    None => self.named(generic.base.as_str(), registry),
                };
                let args = generic
                    .args
                    .iter()
                    .map(|arg| self.map(arg, registry))
                    .join(", ");
                format!("{}<{}>", base, args)
            }
            Ty::Array(elem) => format!("std::vector<{}>", self.map(elem, registry)),
            Ty::Func(func) => {
                let params = func
                    .params
                    .iter()
                    .map(|param| self.map(param, registry))
                    .join(", ");
                format!("std::function<{}({})>", self.map(&func.ret, registry), params)
            }
            Ty::Record(record) => self.named(record.name.as_str(), registry),
            Ty::Sum(sum) => self.named(sum.name.as_str(), registry),
            Ty::Opaque(name) => self.named(name.as_str(), registry),
        }
    }

    /// True when a declaration of this type must use the deduced form:
    /// the mapped name is empty or the deduction marker, or the type
    /// transitively contains a type variable, an unresolved function
    /// type, or an unnamed record/sum placeholder.
    pub fn requires_deduction(&self, ty: &Ty, registry: Option<&TypeRegistry>) -> bool {
        if structurally_unresolved(ty) {
            return true;
        }
        let mapped = self.map(ty, registry);
        mapped.is_empty() || mapped == DEDUCE
    }

    fn primitive_name(&self, primitive: Primitive) -> String {
        let key = match primitive {
            Primitive::Int => "Int",
            Primitive::Float => "Float",
            Primitive::Bool => "Bool",
            Primitive::Str => "Str",
            Primitive::Regex => "Regex",
            Primitive::Unit => "Unit",
        };
        self.primitives
            .get(key)
            .cloned()
            .unwrap_or_else(|| DEDUCE.to_string())
    }

    /// Resolution chain for a bare type name: registry, then the
    /// primitive table, then the in-scope-generic-parameter pattern,
    /// then the raw name as a last resort.
    fn named(&self, name: &str, registry: Option<&TypeRegistry>) -> String {
        if name.is_empty() {
            return DEDUCE.to_string();
        }
        if let Some(registry) = registry {
            if let Some(target) = registry.target_name(name) {
                return target;
            }
        }
        if let Some(target) = self.primitives.get(name) {
            return target.clone();
        }
        if looks_like_type_param(name) {
            trace!(name, "treating unregistered name as in-scope type parameter");
            return name.to_string();
        }
        // Probable registry gap; the emitted name keeps the output
        // plausible and lets the C++ compiler report the real problem.
        warn!(name, "type not found in registry or primitive table");
        name.to_string()
    }
}

/// Uppercase-leading short identifier, the conventional shape of a
/// generic parameter name (`T`, `K1`, `TV`).
fn looks_like_type_param(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    name.len() <= 2 && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

fn structurally_unresolved(ty: &Ty) -> bool {
    match ty {
        Ty::Var(_) => true,
        Ty::Primitive(_) => false,
        Ty::Opaque(name) => name.is_empty(),
        Ty::Generic(generic) => generic.args.iter().any(structurally_unresolved),
        Ty::Array(elem) => structurally_unresolved(elem),
        Ty::Func(func) => {
            func.params.iter().any(structurally_unresolved) || structurally_unresolved(&func.ret)
        }
        Ty::Record(record) => {
            record.name.is_empty() || record.fields.iter().any(|f| structurally_unresolved(&f.ty))
        }
        Ty::Sum(sum) => {
            sum.name.is_empty()
                || sum
                    .variants
                    .iter()
                    .any(|v| v.fields.iter().any(structurally_unresolved))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_core::types::Ty;

    #[test]
    fn primitives_map_through_the_table() {
        let mapper = TypeMapper::new();
        assert_eq!(mapper.map(&Ty::int(), None), "int64_t");
        assert_eq!(mapper.map(&Ty::string(), None), "std::string");
        assert_eq!(mapper.map(&Ty::unit(), None), "void");
    }

    #[test]
    fn container_and_function_shapes() {
        let mapper = TypeMapper::new();
        assert_eq!(
            mapper.map(&Ty::array(Ty::int()), None),
            "std::vector<int64_t>"
        );
        assert_eq!(
            mapper.map(&Ty::func(vec![Ty::int(), Ty::bool()], Ty::float()), None),
            "std::function<double(int64_t, bool)>"
        );
    }

    #[test]
    fn ownership_wrappers() {
        let mapper = TypeMapper::new();
        assert_eq!(
            mapper.map(&Ty::generic("Own", vec![Ty::opaque("Node")]), None),
            "std::unique_ptr<Node>"
        );
        assert_eq!(
            mapper.map(&Ty::generic("Weak", vec![Ty::int()]), None),
            "std::weak_ptr<int64_t>"
        );
    }

    #[test]
    fn registry_wins_over_raw_name() {
        let mapper = TypeMapper::new();
        let registry = TypeRegistry::new();
        registry.register_target("Point", "geo::Point");
        assert_eq!(mapper.map(&Ty::opaque("Point"), Some(&registry)), "geo::Point");
        // unregistered long name falls through to the raw spelling
        assert_eq!(mapper.map(&Ty::opaque("Widget"), Some(&registry)), "Widget");
        // short uppercase names read as in-scope generic parameters
        assert_eq!(mapper.map(&Ty::opaque("T"), Some(&registry)), "T");
    }

    #[test]
    fn deduction_predicate() {
        let mapper = TypeMapper::new();
        assert!(mapper.requires_deduction(&Ty::var("T"), None));
        assert!(mapper.requires_deduction(&Ty::array(Ty::var("T")), None));
        assert!(mapper.requires_deduction(&Ty::func(vec![Ty::var("T")], Ty::int()), None));
        assert!(mapper.requires_deduction(&Ty::opaque(""), None));
        assert!(!mapper.requires_deduction(&Ty::array(Ty::int()), None));
        assert!(!mapper.requires_deduction(&Ty::opaque("Widget"), None));
    }
}
