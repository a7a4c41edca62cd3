//! Raw-type projection.
//!
//! A raw use of a generic declaration (`List` for `List<E>`) has no type
//! arguments. Rendering it needs arguments anyway: either unbounded
//! wildcards (`List<*>`) or each parameter's upper bound.

use crate::db::TypeDatabase;
use crate::error::DescriptorResult;
use crate::queries::{declaration_of, type_variable_of};
use crate::types::{TypeData, TypeId};
use tracing::debug;

/// Whether `id` is a raw use of a generic declaration. Non-declared
/// descriptors are never raw.
pub fn is_raw(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<bool> {
    match db.require_type(id)? {
        TypeData::Declared {
            declaration,
            arguments,
            ..
        } => Ok(db.type_list(arguments).is_empty() && db.require_declaration(declaration)?.is_generic()),
        TypeData::Primitive(_)
        | TypeData::Array { .. }
        | TypeData::TypeVariable { .. }
        | TypeData::Intersection(_)
        | TypeData::Union(_) => Ok(false),
    }
}

/// Type arguments of a declared type that belong to its own declaration,
/// without those of enclosing generic declarations.
pub fn directly_declared_type_arguments(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<Vec<TypeId>> {
    let declaration = db.require_declaration(declaration_of(db, id)?)?;
    let TypeData::Declared { arguments, .. } = db.require_type(id)? else {
        return Ok(Vec::new());
    };
    Ok(db
        .type_list(arguments)
        .iter()
        .take(declaration.directly_declared_type_parameter_count)
        .copied()
        .collect())
}

/// Directly declared type arguments, with raw types projected.
///
/// A raw type projects each directly declared parameter to the unbounded
/// wildcard when `project_to_wildcards` is set or the declaration is
/// self-recursive, and to the parameter's upper bound otherwise. Expanding
/// a self-recursive parameter to its bound would not terminate, so
/// self-recursion overrides the caller's choice.
pub fn directly_declared_non_raw_type_arguments(
    db: &dyn TypeDatabase,
    id: TypeId,
    project_to_wildcards: bool,
) -> DescriptorResult<Vec<TypeId>> {
    if !is_raw(db, id)? {
        return directly_declared_type_arguments(db, id);
    }

    let declaration = db.require_declaration(declaration_of(db, id)?)?;
    let map_to_wildcard = project_to_wildcards || declaration.is_recursive;
    debug!(
        type_id = id.0,
        project_to_wildcards,
        recursive = declaration.is_recursive,
        "project raw type"
    );

    declaration
        .directly_declared_type_parameters()
        .iter()
        .map(|&parameter| {
            if map_to_wildcard {
                Ok(TypeId::UNBOUNDED_WILDCARD)
            } else {
                let variable = type_variable_of(db, parameter)?;
                Ok(db.require_type_variable(variable)?.upper_bound)
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/projection_tests.rs"]
mod tests;
