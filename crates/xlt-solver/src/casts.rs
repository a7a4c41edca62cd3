//! Casts for nullability mismatches in type arguments.
//!
//! The origin language lets `List<String>` flow where `List<String?>` is
//! expected as long as the raw types agree. The target does not, so a
//! conversion whose source and inferred types differ in the nullability of
//! a type argument, or in the nullability of the type itself, needs an
//! explicit cast to the inferred type.

use crate::db::TypeDatabase;
use crate::error::DescriptorResult;
use crate::queries::{is_nullable, is_wildcard};
use crate::types::{TypeData, TypeId, TypeVarId};
use rustc_hash::FxHashSet;
use tracing::trace;

/// Cast type for converting an expression of `expression_type` to
/// `inferred_type`, or `None` when the conversion needs no cast.
pub fn cast_for_conversion(
    db: &dyn TypeDatabase,
    expression_type: TypeId,
    inferred_type: TypeId,
) -> DescriptorResult<Option<TypeId>> {
    let target = project(db, inferred_type)?;
    if needs_cast(db, expression_type, target)? {
        trace!(from = expression_type.0, to = target.0, "insert nullability cast");
        Ok(Some(target))
    } else {
        Ok(None)
    }
}

/// Replace a wildcard or capture by its lower bound if it has one, else
/// by its upper bound, repeatedly. Other descriptors are returned as is.
pub fn project(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<TypeId> {
    let mut seen = FxHashSet::default();
    let mut current = id;
    loop {
        let TypeData::TypeVariable { variable, .. } = db.require_type(current)? else {
            return Ok(current);
        };
        let info = db.require_type_variable(variable)?;
        if !info.is_wildcard_or_capture || !seen.insert(variable) {
            return Ok(current);
        }
        current = info.lower_bound.unwrap_or(info.upper_bound);
    }
}

/// Whether a value of type `from` needs a cast to be used as `to`.
pub fn needs_cast(db: &dyn TypeDatabase, from: TypeId, to: TypeId) -> DescriptorResult<bool> {
    if !is_denotable_for_cast(db, to, &mut FxHashSet::default())? {
        return Ok(false);
    }
    if is_nullable(db, from)? && !is_nullable(db, to)? {
        return Ok(true);
    }
    type_arguments_need_cast(db, from, to)
}

fn type_arguments_need_cast(db: &dyn TypeDatabase, from: TypeId, to: TypeId) -> DescriptorResult<bool> {
    let from_arguments = type_argument_descriptors(db, from)?;
    let to_arguments = type_argument_descriptors(db, to)?;
    for (&from, &to) in from_arguments.iter().zip(to_arguments.iter()) {
        if type_argument_needs_cast(db, from, to)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn type_argument_needs_cast(db: &dyn TypeDatabase, from: TypeId, to: TypeId) -> DescriptorResult<bool> {
    // Wildcard arguments are sometimes inferred as plain types upstream.
    if is_wildcard(db, from)? && !is_wildcard(db, to)? {
        return Ok(true);
    }
    if is_nullable(db, from)? != is_nullable(db, to)? {
        return Ok(true);
    }
    type_arguments_need_cast(db, from, to)
}

/// Deep denotability: like [`crate::queries::is_denotable`], but type
/// arguments, array components and wildcard bounds must be denotable too.
pub fn is_denotable_for_cast(
    db: &dyn TypeDatabase,
    id: TypeId,
    seen: &mut FxHashSet<TypeVarId>,
) -> DescriptorResult<bool> {
    match db.require_type(id)? {
        TypeData::Primitive(_) => Ok(true),
        TypeData::Intersection(_) | TypeData::Union(_) => Ok(false),
        TypeData::Declared {
            declaration,
            arguments,
            ..
        } => {
            if db.require_declaration(declaration)?.is_anonymous {
                return Ok(false);
            }
            for &argument in db.type_list(arguments).iter() {
                if !is_denotable_for_cast(db, argument, seen)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        TypeData::Array { component, .. } => match component {
            Some(component) => is_denotable_for_cast(db, component, seen),
            None => Ok(false),
        },
        TypeData::TypeVariable { variable, .. } => {
            let info = db.require_type_variable(variable)?;
            if !info.is_wildcard_or_capture || seen.contains(&variable) {
                return Ok(true);
            }
            if let Some(lower) = info.lower_bound
                && !is_denotable_for_cast(db, lower, seen)?
            {
                return Ok(false);
            }
            seen.insert(variable);
            let result = is_denotable_for_cast(db, info.upper_bound, seen);
            seen.remove(&variable);
            result
        }
    }
}

/// Type arguments of a declared type, or the component of an array.
pub fn type_argument_descriptors(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<Vec<TypeId>> {
    Ok(match db.require_type(id)? {
        TypeData::Declared { arguments, .. } => db.type_list(arguments).to_vec(),
        TypeData::Array { component, .. } => component.into_iter().collect(),
        TypeData::Primitive(_)
        | TypeData::TypeVariable { .. }
        | TypeData::Intersection(_)
        | TypeData::Union(_) => Vec::new(),
    })
}

#[cfg(test)]
#[path = "../tests/casts_tests.rs"]
mod tests;
