//! Type-declaration lowering: records, sum types, and generic wrapping.

use itertools::Itertools;
use rill_core::ast::{RecordDef, SumDef, TypeParam};
use rill_core::bail;
use rill_core::registry::TypeRegistry;
use rill_core::Result;

use crate::ast::{CxxDecl, CxxField, CxxStruct, CxxUsingAlias, TemplateHeader};
use crate::names;
use crate::types::TypeMapper;

/// Template header for a declaration carrying type parameters; named
/// constraints become a conjunctive clause.
pub fn template_header(params: &[TypeParam]) -> TemplateHeader {
    TemplateHeader {
        params: params.iter().map(|p| p.name.name.clone()).collect(),
        constraints: params
            .iter()
            .filter_map(|p| {
                p.constraint
                    .as_ref()
                    .map(|c| (c.clone(), p.name.name.clone()))
            })
            .collect(),
    }
}

/// Record type: one aggregate, one field per record field in declared
/// order, each field type individually mapped.
pub fn lower_record_decl(
    mapper: &TypeMapper,
    registry: &TypeRegistry,
    def: &RecordDef,
) -> CxxDecl {
    CxxDecl::Struct(CxxStruct {
        template: template_header(&def.type_params),
        name: names::sanitize(def.name.as_str()),
        fields: def
            .fields
            .iter()
            .map(|field| CxxField {
                ty: mapper.map(&field.ty, Some(registry)),
                name: names::sanitize(field.name.as_str()),
            })
            .collect(),
    })
}

/// Sum type: one aggregate per variant (empty variants become marker
/// aggregates), then a tagged-union alias over all of them in declared
/// order. A generic sum parameterizes every variant aggregate with the
/// same type-parameter list.
pub fn lower_sum_decl(
    mapper: &TypeMapper,
    registry: &TypeRegistry,
    def: &SumDef,
) -> Result<Vec<CxxDecl>> {
    if def.variants.is_empty() {
        bail!("sum type {} has no variants", def.name);
    }
    let template = template_header(&def.type_params);
    let mut decls = Vec::with_capacity(def.variants.len() + 1);
    for variant in &def.variants {
        decls.push(CxxDecl::Struct(CxxStruct {
            template: template.clone(),
            name: names::sanitize(variant.name.as_str()),
            fields: variant
                .fields
                .iter()
                .map(|field| CxxField {
                    ty: mapper.map(&field.ty, Some(registry)),
                    name: names::sanitize(field.name.as_str()),
                })
                .collect(),
        }));
    }

    let param_list = def
        .type_params
        .iter()
        .map(|p| p.name.name.as_str())
        .join(", ");
    let alternatives = def
        .variants
        .iter()
        .map(|variant| {
            let name = names::sanitize(variant.name.as_str());
            if def.is_generic() {
                format!("{}<{}>", name, param_list)
            } else {
                name
            }
        })
        .join(", ");
    decls.push(CxxDecl::UsingAlias(CxxUsingAlias {
        template,
        name: names::sanitize(def.name.as_str()),
        target: format!("std::variant<{}>", alternatives),
    }));
    Ok(decls)
}
