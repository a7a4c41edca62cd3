//! Type-descriptor algebra for the xlt backend.
//!
//! Decides how each type of a program is rendered in the target syntax:
//!
//! - **Queries** (`queries`): denotability, nullability, nullable bounds,
//!   the occurs-check behind F-bounded type parameters
//! - **Normalizer** (`nullability`): `make_non_null`
//! - **Projector** (`projection`): type arguments of raw types
//! - **Resolver** (`supertype`): which direct supertype a super call targets
//! - **Casts** (`casts`): casts needed for nullability mismatches
//!
//! Descriptors are interned (`TypeId` equality is descriptor equality) and
//! immutable. All operations take `&dyn TypeDatabase` and are safe to run
//! from several threads over one shared `TypeInterner`.

pub mod casts;
mod db;
pub mod decl;
mod error;
pub mod format;
mod intern;
pub mod nullability;
pub mod projection;
pub mod queries;
pub mod recursion;
pub mod supertype;
pub mod type_factory;
pub mod types;

pub use casts::{cast_for_conversion, needs_cast};
pub use db::TypeDatabase;
pub use decl::{DeclId, DeclKind, DeclarationStore, MethodId, MethodInfo, TypeDeclaration};
pub use error::{DescriptorError, DescriptorResult};
pub use format::TypeFormatter;
pub use intern::{OBJECT_NAME, TypeInterner, UNBOUNDED_WILDCARD_KEY};
pub use nullability::make_non_null;
pub use projection::{directly_declared_non_raw_type_arguments, is_raw};
pub use queries::{
    can_be_nullable_as_bound, contains, declaration_has_recursive_type_parameter,
    has_nullable_bounds, has_nullable_recursive_bounds, is_denotable, is_implicit_upper_bound,
    is_nullable, is_recursive,
};
pub use supertype::direct_super_type_for_method_call;
pub use types::{
    PrimitiveKind, TypeData, TypeId, TypeListId, TypeVarId, TypeVariableBounds, TypeVariableInfo,
};

#[cfg(test)]
#[path = "../tests/concurrent_tests.rs"]
mod concurrent_tests;

#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;
