//! Classification queries over type descriptors.
//!
//! Every query matches all `TypeData` variants explicitly. Traversals of
//! type-variable bounds thread a `seen` set: bounds may mention the variable
//! itself (`T extends Comparable<T>`) or form longer cycles, and a revisited
//! variable answers `false` for that branch instead of recursing.

use crate::db::TypeDatabase;
use crate::decl::DeclId;
use crate::error::{DescriptorError, DescriptorResult};
use crate::types::{TypeData, TypeId, TypeVarId};
use rustc_hash::FxHashSet;
use tracing::trace;
use xlt_common::limits::MAX_BOUND_CHAIN_DEPTH;

/// Whether `id` is the nullable root class, the bound every unbounded
/// variable carries.
#[inline]
pub fn is_implicit_upper_bound(id: TypeId) -> bool {
    id == TypeId::NULLABLE_ANY
}

/// Whether a value of type `id` can be null.
pub fn is_nullable(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<bool> {
    let mut visiting = FxHashSet::default();
    is_nullable_inner(db, id, &mut visiting)
}

fn is_nullable_inner(
    db: &dyn TypeDatabase,
    id: TypeId,
    visiting: &mut FxHashSet<TypeVarId>,
) -> DescriptorResult<bool> {
    match db.require_type(id)? {
        TypeData::Primitive(_) => Ok(false),
        TypeData::Array { nullable, .. } | TypeData::Declared { nullable, .. } => Ok(nullable),
        TypeData::TypeVariable { variable, nullable } => {
            if nullable {
                return Ok(true);
            }
            if !visiting.insert(variable) {
                trace!(variable = variable.0, "is_nullable: bound cycle");
                return Ok(false);
            }
            let info = db.require_type_variable(variable)?;
            let result = is_nullable_inner(db, info.upper_bound, visiting);
            visiting.remove(&variable);
            result
        }
        TypeData::Intersection(members) => {
            for &member in db.type_list(members).iter() {
                if !is_nullable_inner(db, member, visiting)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        TypeData::Union(members) => {
            for &member in db.type_list(members).iter() {
                if is_nullable_inner(db, member, visiting)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// Whether `id` can be written as a top-level type or type argument in the
/// target syntax.
///
/// The only denotable intersection is `T & Any` with `T` a named variable.
pub fn is_denotable(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<bool> {
    match db.require_type(id)? {
        TypeData::Primitive(_) | TypeData::Array { .. } => Ok(true),
        TypeData::Declared { declaration, .. } => {
            Ok(!db.require_declaration(declaration)?.is_anonymous)
        }
        TypeData::TypeVariable { variable, .. } => {
            Ok(!db.require_type_variable(variable)?.is_wildcard_or_capture)
        }
        TypeData::Intersection(members) => {
            let members = db.type_list(members);
            let [first, second] = members.as_ref() else {
                return Ok(false);
            };
            if *second != TypeId::ANY {
                return Ok(false);
            }
            is_named_type_variable(db, *first)
        }
        TypeData::Union(_) => Ok(false),
    }
}

fn is_named_type_variable(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<bool> {
    match db.require_type(id)? {
        TypeData::TypeVariable { variable, .. } => {
            Ok(!db.require_type_variable(variable)?.is_wildcard_or_capture)
        }
        TypeData::Primitive(_)
        | TypeData::Array { .. }
        | TypeData::Declared { .. }
        | TypeData::Intersection(_)
        | TypeData::Union(_) => Ok(false),
    }
}

/// Whether `id` may be used nullable as an upper bound. Only declarations
/// can forbid it.
pub fn can_be_nullable_as_bound(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<bool> {
    match db.require_type(id)? {
        TypeData::Declared { declaration, .. } => {
            Ok(db.require_declaration(declaration)?.can_be_nullable_as_bound)
        }
        TypeData::Primitive(_)
        | TypeData::Array { .. }
        | TypeData::TypeVariable { .. }
        | TypeData::Intersection(_)
        | TypeData::Union(_) => Ok(true),
    }
}

/// The variable's upper bound, then that bound's upper bound while it is a
/// type variable, until the chain ends or revisits a variable.
pub fn upper_bound_chain(db: &dyn TypeDatabase, variable: TypeVarId) -> DescriptorResult<Vec<TypeId>> {
    let mut chain = Vec::new();
    let mut seen = FxHashSet::default();
    let mut current = variable;

    while seen.insert(current) && (seen.len() as u32) <= MAX_BOUND_CHAIN_DEPTH {
        let bound = db.require_type_variable(current)?.upper_bound;
        chain.push(bound);
        current = match db.require_type(bound)? {
            TypeData::TypeVariable { variable, .. } => variable,
            TypeData::Primitive(_)
            | TypeData::Array { .. }
            | TypeData::Declared { .. }
            | TypeData::Intersection(_)
            | TypeData::Union(_) => break,
        };
    }
    Ok(chain)
}

/// Whether every bound in the variable's upper-bound chain may be nullable
/// as a bound.
pub fn has_nullable_recursive_bounds(db: &dyn TypeDatabase, variable: TypeVarId) -> DescriptorResult<bool> {
    for bound in upper_bound_chain(db, variable)? {
        if !can_be_nullable_as_bound(db, bound)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether the variable's own bound is nullable and its whole bound chain
/// permits that.
pub fn has_nullable_bounds(db: &dyn TypeDatabase, variable: TypeVarId) -> DescriptorResult<bool> {
    let info = db.require_type_variable(variable)?;
    Ok(is_nullable(db, info.upper_bound)? && has_nullable_recursive_bounds(db, variable)?)
}

/// Occurs-check: does `target` appear anywhere within `id`?
///
/// Recurses into type arguments, intersection members, array components
/// and the bounds of every variable reached. A variable already in `seen`
/// answers `false`.
pub fn contains(
    db: &dyn TypeDatabase,
    id: TypeId,
    target: TypeVarId,
    seen: &mut FxHashSet<TypeVarId>,
) -> DescriptorResult<bool> {
    match db.require_type(id)? {
        TypeData::Primitive(_) | TypeData::Union(_) => Ok(false),
        TypeData::Array { component, .. } => match component {
            Some(component) => contains(db, component, target, seen),
            None => Ok(false),
        },
        TypeData::Declared { arguments, .. } => any_contains(db, &db.type_list(arguments), target, seen),
        TypeData::Intersection(members) => any_contains(db, &db.type_list(members), target, seen),
        TypeData::TypeVariable { variable, .. } => {
            if seen.contains(&variable) {
                return Ok(false);
            }
            if variable == target {
                return Ok(true);
            }
            seen.insert(variable);
            let info = db.require_type_variable(variable)?;
            if contains(db, info.upper_bound, target, seen)? {
                return Ok(true);
            }
            match info.lower_bound {
                Some(lower) => contains(db, lower, target, seen),
                None => Ok(false),
            }
        }
    }
}

fn any_contains(
    db: &dyn TypeDatabase,
    ids: &[TypeId],
    target: TypeVarId,
    seen: &mut FxHashSet<TypeVarId>,
) -> DescriptorResult<bool> {
    for &id in ids {
        if contains(db, id, target, seen)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether the variable's own upper bound mentions it (F-bounded).
pub fn is_recursive(db: &dyn TypeDatabase, variable: TypeVarId) -> DescriptorResult<bool> {
    let info = db.require_type_variable(variable)?;
    let mut seen = FxHashSet::default();
    contains(db, info.upper_bound, variable, &mut seen)
}

/// Whether any directly declared type parameter of `declaration` is
/// recursive.
pub fn declaration_has_recursive_type_parameter(
    db: &dyn TypeDatabase,
    declaration: DeclId,
) -> DescriptorResult<bool> {
    let declaration = db.require_declaration(declaration)?;
    for &parameter in declaration.directly_declared_type_parameters() {
        if is_recursive(db, type_variable_of(db, parameter)?)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// The variable behind a `TypeVariable` descriptor.
pub fn type_variable_of(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<TypeVarId> {
    match db.require_type(id)? {
        TypeData::TypeVariable { variable, .. } => Ok(variable),
        other @ (TypeData::Primitive(_)
        | TypeData::Array { .. }
        | TypeData::Declared { .. }
        | TypeData::Intersection(_)
        | TypeData::Union(_)) => Err(DescriptorError::NotTypeVariable {
            id,
            kind: other.kind_name(),
        }),
    }
}

/// The declaration behind a `Declared` descriptor.
pub fn declaration_of(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<DeclId> {
    match db.require_type(id)? {
        TypeData::Declared { declaration, .. } => Ok(declaration),
        other @ (TypeData::Primitive(_)
        | TypeData::Array { .. }
        | TypeData::TypeVariable { .. }
        | TypeData::Intersection(_)
        | TypeData::Union(_)) => Err(DescriptorError::NotDeclared {
            id,
            kind: other.kind_name(),
        }),
    }
}

/// Whether `id` is a wildcard or capture variable.
pub fn is_wildcard(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<bool> {
    match db.require_type(id)? {
        TypeData::TypeVariable { variable, .. } => {
            Ok(db.require_type_variable(variable)?.is_wildcard_or_capture)
        }
        TypeData::Primitive(_)
        | TypeData::Array { .. }
        | TypeData::Declared { .. }
        | TypeData::Intersection(_)
        | TypeData::Union(_) => Ok(false),
    }
}

#[cfg(test)]
#[path = "../tests/queries_tests.rs"]
mod tests;
