//! Type database abstraction for the solver.
//!
//! Queries and transformations take `&dyn TypeDatabase` rather than the
//! concrete interner, so a semantic model can supply its own storage and its
//! own override predicate without touching the algebra.

use crate::decl::{DeclId, MethodId, MethodInfo, TypeDeclaration};
use crate::error::{DescriptorError, DescriptorResult};
use crate::intern::TypeInterner;
use crate::supertype;
use crate::types::{TypeData, TypeId, TypeListId, TypeVarId, TypeVariableBounds, TypeVariableInfo};
use std::sync::Arc;
use tracing::trace;
use xlt_common::Atom;

/// Query interface for the solver.
pub trait TypeDatabase {
    fn intern(&self, data: TypeData) -> TypeId;
    fn lookup(&self, id: TypeId) -> Option<TypeData>;
    fn intern_string(&self, s: &str) -> Atom;
    fn resolve_atom(&self, atom: Atom) -> String;
    fn resolve_atom_ref(&self, atom: Atom) -> Arc<str>;
    fn type_list(&self, id: TypeListId) -> Arc<[TypeId]>;

    fn declare_type_variable(&self, key: Atom) -> TypeVarId;
    fn bind_type_variable(&self, variable: TypeVarId, bounds: TypeVariableBounds) -> DescriptorResult<()>;
    fn type_variable(&self, variable: TypeVarId) -> Option<Arc<TypeVariableInfo>>;
    fn type_variable_key(&self, variable: TypeVarId) -> Option<Atom>;

    fn declaration(&self, id: DeclId) -> Option<Arc<TypeDeclaration>>;
    /// Name of a declaration, available as soon as its id is reserved.
    fn declaration_name(&self, id: DeclId) -> Option<Atom>;
    fn method(&self, id: MethodId) -> Option<Arc<MethodInfo>>;

    /// Whether `method` overrides `other`.
    fn is_override(&self, method: MethodId, other: MethodId) -> DescriptorResult<bool>;

    fn declared(&self, declaration: DeclId, arguments: Vec<TypeId>, nullable: bool) -> TypeId;
    fn array(&self, component: TypeId, nullable: bool) -> TypeId;
    fn variable(&self, variable: TypeVarId, nullable: bool) -> TypeId;
    fn intersection(&self, members: Vec<TypeId>) -> TypeId;
    fn union(&self, members: Vec<TypeId>) -> TypeId;

    /// Look up `id`, failing on an id the database never handed out.
    fn require_type(&self, id: TypeId) -> DescriptorResult<TypeData> {
        self.lookup(id).ok_or(DescriptorError::UnknownType(id))
    }

    /// Bounds of `variable`, failing when it was never declared or is still
    /// unbound.
    fn require_type_variable(&self, variable: TypeVarId) -> DescriptorResult<Arc<TypeVariableInfo>> {
        if let Some(info) = self.type_variable(variable) {
            return Ok(info);
        }
        match self.type_variable_key(variable) {
            Some(key) => Err(DescriptorError::UnboundTypeVariable {
                variable,
                key: self.resolve_atom(key),
            }),
            None => Err(DescriptorError::UnknownTypeVariable(variable)),
        }
    }

    fn require_declaration(&self, id: DeclId) -> DescriptorResult<Arc<TypeDeclaration>> {
        if let Some(declaration) = self.declaration(id) {
            return Ok(declaration);
        }
        match self.declaration_name(id) {
            Some(name) => Err(DescriptorError::IncompleteDeclaration {
                declaration: id,
                name: self.resolve_atom(name),
            }),
            None => Err(DescriptorError::UnknownDeclaration(id)),
        }
    }

    fn require_method(&self, id: MethodId) -> DescriptorResult<Arc<MethodInfo>> {
        self.method(id).ok_or(DescriptorError::UnknownMethod(id))
    }
}

impl TypeDatabase for TypeInterner {
    fn intern(&self, data: TypeData) -> TypeId {
        TypeInterner::intern(self, data)
    }

    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        TypeInterner::lookup(self, id)
    }

    fn intern_string(&self, s: &str) -> Atom {
        TypeInterner::intern_string(self, s)
    }

    fn resolve_atom(&self, atom: Atom) -> String {
        TypeInterner::resolve_atom(self, atom)
    }

    fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        TypeInterner::resolve_atom_ref(self, atom)
    }

    fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        TypeInterner::type_list(self, id)
    }

    fn declare_type_variable(&self, key: Atom) -> TypeVarId {
        TypeInterner::declare_type_variable(self, key)
    }

    fn bind_type_variable(&self, variable: TypeVarId, bounds: TypeVariableBounds) -> DescriptorResult<()> {
        TypeInterner::bind_type_variable(self, variable, bounds)
    }

    fn type_variable(&self, variable: TypeVarId) -> Option<Arc<TypeVariableInfo>> {
        TypeInterner::type_variable(self, variable)
    }

    fn type_variable_key(&self, variable: TypeVarId) -> Option<Atom> {
        TypeInterner::type_variable_key(self, variable)
    }

    fn declaration(&self, id: DeclId) -> Option<Arc<TypeDeclaration>> {
        TypeInterner::declaration(self, id)
    }

    fn declaration_name(&self, id: DeclId) -> Option<Atom> {
        self.declarations().name(id)
    }

    fn method(&self, id: MethodId) -> Option<Arc<MethodInfo>> {
        TypeInterner::method(self, id)
    }

    /// Distinct methods with the same name and erased signature, where the
    /// overriding method's declaration is a proper subtype of the other's.
    fn is_override(&self, method: MethodId, other: MethodId) -> DescriptorResult<bool> {
        if method == other {
            return Ok(false);
        }
        let overriding = self.require_method(method)?;
        let overridden = self.require_method(other)?;
        if !overriding.has_same_signature(&overridden) {
            return Ok(false);
        }
        let result =
            supertype::is_proper_subtype_declaration(self, overriding.enclosing, overridden.enclosing)?;
        trace!(method = method.0, other = other.0, result, "is_override");
        Ok(result)
    }

    fn declared(&self, declaration: DeclId, arguments: Vec<TypeId>, nullable: bool) -> TypeId {
        TypeInterner::declared(self, declaration, arguments, nullable)
    }

    fn array(&self, component: TypeId, nullable: bool) -> TypeId {
        TypeInterner::array(self, component, nullable)
    }

    fn variable(&self, variable: TypeVarId, nullable: bool) -> TypeId {
        TypeInterner::variable(self, variable, nullable)
    }

    fn intersection(&self, members: Vec<TypeId>) -> TypeId {
        TypeInterner::intersection(self, members)
    }

    fn union(&self, members: Vec<TypeId>) -> TypeId {
        TypeInterner::union(self, members)
    }
}

#[cfg(test)]
#[path = "../tests/db_tests.rs"]
mod tests;
