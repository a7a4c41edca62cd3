//! Nullability normalizer: `make_non_null`.
//!
//! Produces a descriptor that is not nullable and otherwise means the same
//! thing. The result is always a new interned value; shared descriptors are
//! never modified.
//!
//! | input                                   | result                        |
//! |-----------------------------------------|-------------------------------|
//! | `Foo?`, `Array<T>?`                     | flag cleared                  |
//! | `*` (unbounded wildcard)                | unchanged                     |
//! | `? extends B`                           | wildcard bounded by `B!!`     |
//! | `T`, bound chain permits null           | `T & Any`                     |
//! | `T`, some bound forbids null            | `T'` bounded by `B!!`         |
//! | `A & B`                                 | `A & B & Any`                 |
//! | `A \| B`                                | `A!! \| B!!`                  |
//!
//! Rebuilt variables get a key derived from their new bound (see
//! [`type_factory::derived_key`]), so repeating the normalization finds the
//! same variable and the function is idempotent.

use crate::db::TypeDatabase;
use crate::error::DescriptorResult;
use crate::queries::{has_nullable_bounds, is_implicit_upper_bound, is_nullable};
use crate::type_factory;
use crate::types::{TypeData, TypeId, TypeListBuffer, TypeVarId};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

/// Returns a non-nullable version of `id`.
///
/// The unbounded wildcard is the one descriptor left nullable: it renders
/// as `*`, which has no non-null form.
pub fn make_non_null(db: &dyn TypeDatabase, id: TypeId) -> DescriptorResult<TypeId> {
    let mut normalizer = NonNullNormalizer {
        db,
        visiting: FxHashSet::default(),
    };
    normalizer.normalize(id)
}

struct NonNullNormalizer<'a> {
    db: &'a dyn TypeDatabase,
    /// Variables whose bounds are being normalized.
    visiting: FxHashSet<TypeVarId>,
}

impl NonNullNormalizer<'_> {
    fn normalize(&mut self, id: TypeId) -> DescriptorResult<TypeId> {
        if !is_nullable(self.db, id)? {
            return Ok(id);
        }

        let db = self.db;
        match db.require_type(id)? {
            // Never nullable, so never reached.
            TypeData::Primitive(_) => Ok(id),
            TypeData::Array { component, .. } => Ok(db.intern(TypeData::Array {
                component,
                nullable: false,
            })),
            TypeData::Declared {
                declaration,
                arguments,
                ..
            } => Ok(db.intern(TypeData::Declared {
                declaration,
                arguments,
                nullable: false,
            })),
            TypeData::TypeVariable { variable, .. } => self.normalize_variable(id, variable),
            TypeData::Intersection(members) => {
                let mut members: Vec<TypeId> = db.type_list(members).to_vec();
                members.push(TypeId::ANY);
                Ok(db.intersection(members))
            }
            TypeData::Union(members) => {
                let mut normalized = TypeListBuffer::new();
                for &member in db.type_list(members).iter() {
                    normalized.push(self.normalize(member)?);
                }
                Ok(db.union(normalized.into_vec()))
            }
        }
    }

    fn normalize_variable(&mut self, id: TypeId, variable: TypeVarId) -> DescriptorResult<TypeId> {
        let db = self.db;
        let info = db.require_type_variable(variable)?;

        if info.is_wildcard_or_capture {
            if is_implicit_upper_bound(info.upper_bound) {
                trace!(variable = variable.0, "make_non_null: unbounded wildcard left as is");
                return Ok(id);
            }
        } else if has_nullable_bounds(db, variable)? {
            debug!(variable = variable.0, "make_non_null: forcing T & Any");
            let unmarked = db.variable(variable, false);
            return Ok(db.intersection(vec![unmarked, TypeId::ANY]));
        }

        if !self.visiting.insert(variable) {
            trace!(variable = variable.0, "make_non_null: bound cycle");
            return Ok(db.variable(variable, false));
        }
        let upper_bound = self.normalize(info.upper_bound);
        self.visiting.remove(&variable);
        let upper_bound = upper_bound?;

        if upper_bound == info.upper_bound {
            // Only the `T?` mark made it nullable.
            return Ok(db.variable(variable, false));
        }

        let rebuilt = type_factory::rebuild_with_upper_bound(db, &info, upper_bound)?;
        debug!(
            variable = variable.0,
            rebuilt = rebuilt.0,
            wildcard = info.is_wildcard_or_capture,
            "make_non_null: rebuilt variable with non-null bound"
        );
        Ok(db.variable(rebuilt, false))
    }
}

#[cfg(test)]
#[path = "../tests/nullability_tests.rs"]
mod tests;
