//! Identity strings and construction helpers for type variables.
//!
//! A type variable is interned from its unique key, so every variable this
//! crate creates needs a key that is a pure function of what the variable
//! means. `unique_id` renders any descriptor into such a string; the helpers
//! below compose keys from it.

use crate::db::TypeDatabase;
use crate::error::{DescriptorError, DescriptorResult};
use crate::types::{TypeData, TypeId, TypeVarId, TypeVariableBounds, TypeVariableInfo};
use tracing::trace;
use xlt_common::Atom;

/// Prefix of keys derived by normalization. Never produced for a source
/// variable, whose keys are `declaring::name`.
pub const DERIVED_KEY_PREFIX: &str = "<??>";

/// Canonical identity string of a descriptor.
///
/// Type variables render as their key, so the string is finite even for
/// self-referential bounds.
pub fn unique_id(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<String> {
    let mut out = String::new();
    write_unique_id(db, id, &mut out)?;
    Ok(out)
}

fn write_unique_id(db: &dyn TypeDatabase, id: TypeId, out: &mut String) -> DescriptorResult<()> {
    match db.require_type(id)? {
        TypeData::Primitive(kind) => out.push_str(kind.keyword()),
        TypeData::Array {
            component,
            nullable,
        } => {
            match component {
                Some(component) => write_unique_id(db, component, out)?,
                None => out.push_str("<unknown>"),
            }
            out.push_str("[]");
            if nullable {
                out.push('?');
            }
        }
        TypeData::Declared {
            declaration,
            arguments,
            nullable,
        } => {
            let name = db
                .declaration_name(declaration)
                .map(|name| db.resolve_atom_ref(name))
                .unwrap_or_else(|| format!("<decl#{}>", declaration.0).into());
            out.push_str(&name);
            let arguments = db.type_list(arguments);
            if !arguments.is_empty() {
                out.push('<');
                for (i, &argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_unique_id(db, argument, out)?;
                }
                out.push('>');
            }
            if nullable {
                out.push('?');
            }
        }
        TypeData::TypeVariable { variable, nullable } => {
            let key = db
                .type_variable_key(variable)
                .ok_or(DescriptorError::UnknownTypeVariable(variable))?;
            out.push_str(&db.resolve_atom_ref(key));
            if nullable {
                out.push('?');
            }
        }
        TypeData::Intersection(members) => {
            out.push('(');
            for (i, &member) in db.type_list(members).iter().enumerate() {
                if i > 0 {
                    out.push('&');
                }
                write_unique_id(db, member, out)?;
            }
            out.push(')');
        }
        TypeData::Union(members) => {
            for (i, &member) in db.type_list(members).iter().enumerate() {
                if i > 0 {
                    out.push('|');
                }
                write_unique_id(db, member, out)?;
            }
        }
    }
    Ok(())
}

/// Key of a named type parameter.
pub fn type_parameter_key(declaring: Option<&str>, name: &str) -> String {
    match declaring {
        Some(declaring) => format!("{declaring}::{name}"),
        None => name.to_string(),
    }
}

/// Key of a variable rebuilt with a new upper bound.
///
/// Encodes the variable's scope, the bound and the lower bound, so two
/// rebuilt variables share a key only when they mean the same thing.
pub fn derived_key(
    db: &dyn TypeDatabase,
    original: &TypeVariableInfo,
    upper_bound: TypeId,
) -> DescriptorResult<String> {
    let declaring = original.declaring.map(|atom| db.resolve_atom(atom));
    let name = db.resolve_atom(original.name);
    let lower = match original.lower_bound {
        Some(lower) => unique_id(db, lower)?,
        None => "null".to_string(),
    };
    Ok(format!(
        "{DERIVED_KEY_PREFIX}{}+{}-{lower}",
        type_parameter_key(declaring.as_deref(), &name),
        unique_id(db, upper_bound)?,
    ))
}

/// Variable `original` with its upper bound replaced.
pub fn rebuild_with_upper_bound(
    db: &dyn TypeDatabase,
    original: &TypeVariableInfo,
    upper_bound: TypeId,
) -> DescriptorResult<TypeVarId> {
    let key = derived_key(db, original, upper_bound)?;
    trace!(key = %key, "rebuild_with_upper_bound");
    let variable = db.declare_type_variable(db.intern_string(&key));
    db.bind_type_variable(
        variable,
        TypeVariableBounds {
            upper_bound,
            ..original.bounds()
        },
    )?;
    Ok(variable)
}

/// Wildcard with the given bounds: `*`, `? extends upper` or `? super lower`.
pub fn wildcard(
    db: &dyn TypeDatabase,
    upper_bound: TypeId,
    lower_bound: Option<TypeId>,
) -> DescriptorResult<TypeId> {
    if upper_bound == TypeId::NULLABLE_ANY && lower_bound.is_none() {
        return Ok(TypeId::UNBOUNDED_WILDCARD);
    }
    let lower = match lower_bound {
        Some(lower) => unique_id(db, lower)?,
        None => "null".to_string(),
    };
    let key = format!("?+{}-{lower}", unique_id(db, upper_bound)?);
    let name = db.intern_string("?");
    let variable = db.declare_type_variable(db.intern_string(&key));
    db.bind_type_variable(
        variable,
        TypeVariableBounds::wildcard(name, upper_bound, lower_bound),
    )?;
    Ok(db.variable(variable, false))
}

/// Named type parameter `declaring::name` bounded by `upper_bound`.
pub fn type_parameter(
    db: &dyn TypeDatabase,
    declaring: Option<Atom>,
    name: Atom,
    upper_bound: TypeId,
) -> DescriptorResult<TypeId> {
    let variable = declare_type_parameter(db, declaring, name);
    db.bind_type_variable(
        variable,
        TypeVariableBounds::parameter(name, declaring, upper_bound),
    )?;
    Ok(db.variable(variable, false))
}

/// Reserve a named type parameter whose bound is bound later.
pub fn declare_type_parameter(db: &dyn TypeDatabase, declaring: Option<Atom>, name: Atom) -> TypeVarId {
    let declaring = declaring.map(|atom| db.resolve_atom(atom));
    let key = type_parameter_key(declaring.as_deref(), &db.resolve_atom(name));
    db.declare_type_variable(db.intern_string(&key))
}

#[cfg(test)]
#[path = "../tests/type_factory_tests.rs"]
mod tests;
