//! Whole-module lowering: the top-level codegen driver.

use std::sync::Arc;

use rill_core::ast::{FunctionDef, Item, Module};
use rill_core::registry::{FunctionRegistry, TypeRegistry};
use rill_core::Result;
use tracing::debug;

use crate::analysis::Analyzer;
use crate::ast::{CxxDecl, CxxFunction, CxxParam, TranslationUnit};
use crate::decl;
use crate::engine::Lowerer;
use crate::names;
use crate::policy::RuntimePolicy;
use crate::types::TypeMapper;

pub struct CppCodegen {
    mapper: TypeMapper,
    policy: RuntimePolicy,
    analyzer: Analyzer,
    types: Arc<TypeRegistry>,
    functions: Arc<FunctionRegistry>,
}

impl CppCodegen {
    pub fn new(types: Arc<TypeRegistry>, functions: Arc<FunctionRegistry>) -> Self {
        Self {
            mapper: TypeMapper::new(),
            policy: RuntimePolicy::new(),
            analyzer: Analyzer::new(),
            types,
            functions,
        }
    }

    pub fn with_mapper(mut self, mapper: TypeMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_policy(mut self, policy: RuntimePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Lower a whole type-checked module into a translation unit.
    ///
    /// A rule-set error aborts the run; there is no partial-output
    /// mode, so nothing of the failing declaration survives.
    pub fn lower_module(&self, module: &Module) -> Result<TranslationUnit> {
        debug!(module = %module.name, items = module.items.len(), "lowering module");
        let mut unit = TranslationUnit::new();
        for item in &module.items {
            match item {
                Item::Record(def) => {
                    unit.push(decl::lower_record_decl(&self.mapper, &self.types, def));
                }
                Item::Sum(def) => {
                    for lowered in decl::lower_sum_decl(&self.mapper, &self.types, def)? {
                        unit.push(lowered);
                    }
                }
                Item::Function(def) => {
                    unit.push(self.lower_function(def)?);
                }
            }
        }
        Ok(unit)
    }

    pub fn lower_function(&self, def: &FunctionDef) -> Result<CxxDecl> {
        debug!(function = %def.name, generic = def.is_generic(), "lowering function");
        let mut lowerer = Lowerer::new(
            &self.mapper,
            &self.types,
            &self.functions,
            &self.policy,
            &self.analyzer,
        );
        let body =
            lowerer.with_generic_scope(def.is_generic(), |lw| lw.lower_body(&def.body))?;

        let params = def
            .params
            .iter()
            .map(|param| CxxParam {
                ty: self.mapper.map(&param.ty, Some(&self.types)),
                name: names::sanitize(param.name.as_str()),
            })
            .collect();
        Ok(CxxDecl::Function(CxxFunction {
            template: decl::template_header(&def.type_params),
            ret: self.mapper.map(&def.ret, Some(&self.types)),
            name: names::sanitize(def.name.as_str()),
            params,
            body,
        }))
    }
}
