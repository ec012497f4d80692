//! Type and function registries consumed by the lowering backends.
//!
//! Registries are read-only from the core's perspective: they are
//! populated before lowering starts and lowering never writes to them,
//! so one registry pair may back any number of sequential codegen runs.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Structural information the registry carries for a named type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Target-language spelling for the type name.
    pub target: String,
    pub module_name: String,
    pub fields: Vec<String>,
    pub variants: Vec<String>,
}

#[derive(Default)]
pub struct TypeRegistry {
    entries: DashMap<String, TypeInfo>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: impl Into<String>, info: TypeInfo) {
        self.entries.insert(name.into(), info);
    }

    pub fn register_target(&self, name: impl Into<String>, target: impl Into<String>) {
        self.insert(
            name,
            TypeInfo {
                target: target.into(),
                ..TypeInfo::default()
            },
        );
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn target_name(&self, name: &str) -> Option<String> {
        self.entries.get(name).map(|info| info.target.clone())
    }

    pub fn lookup(&self, name: &str) -> Option<TypeInfo> {
        self.entries.get(name).map(|info| info.clone())
    }
}

/// One known function: its unqualified name and the namespace that
/// qualifies call targets in the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub name: String,
    pub namespace: String,
}

impl FunctionEntry {
    /// Qualified spelling for a call target.
    pub fn qualified(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }
}

#[derive(Default)]
pub struct FunctionRegistry {
    entries: DashMap<String, FunctionEntry>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entry: FunctionEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    pub fn register(&self, name: impl Into<String>, namespace: impl Into<String>) {
        let entry = FunctionEntry {
            name: name.into(),
            namespace: namespace.into(),
        };
        self.insert(entry);
    }

    pub fn fetch_entry(&self, name: &str) -> Option<FunctionEntry> {
        self.entries.get(name).map(|entry| entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_registry_roundtrip() {
        let registry = TypeRegistry::new();
        registry.register_target("Point", "geo::Point");
        assert!(registry.has_type("Point"));
        assert_eq!(registry.target_name("Point").as_deref(), Some("geo::Point"));
        assert!(registry.target_name("Missing").is_none());
    }

    #[test]
    fn function_entry_qualification() {
        let registry = FunctionRegistry::new();
        registry.register("area", "geo");
        let entry = registry.fetch_entry("area").unwrap();
        assert_eq!(entry.qualified(), "geo::area");

        registry.register("main", "");
        assert_eq!(registry.fetch_entry("main").unwrap().qualified(), "main");
    }
}
