//! Type declarations and method descriptors.
//!
//! A `TypeDeclaration` is the nominal definition behind every `Declared`
//! descriptor. Many descriptors share one declaration, so declarations are
//! stored once and handed out as `Arc<TypeDeclaration>`.
//!
//! ## Two-phase registration
//!
//! Hierarchies refer to themselves (`class Node implements Comparable<Node>`,
//! methods point at their enclosing declaration), so a declaration id is
//! reserved first and the declaration is completed once its parts exist:
//!
//! ```ignore
//! let node = store.reserve(interner.intern_string("com.example.Node"));
//! let compare_to = store.add_method(MethodInfo::new(name, node, signature));
//! let comparable_of_node = interner.declared(comparable, vec![interner.declared(node, vec![], false)], false);
//! store.complete(
//!     node,
//!     TypeDeclaration::class(node_name)
//!         .with_super_types(vec![comparable_of_node])
//!         .with_methods(vec![compare_to]),
//! )?;
//! ```

use crate::error::{DescriptorError, DescriptorResult};
use crate::types::TypeId;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;
use xlt_common::Atom;

// =============================================================================
// Ids
// =============================================================================

/// Identifier of a type declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl DeclId {
    /// Sentinel value for invalid `DeclId`.
    pub const INVALID: Self = Self(0);

    /// The root class, pre-registered in every store.
    pub const OBJECT: Self = Self(1);

    /// First id handed out by [`DeclarationStore::reserve`].
    pub const FIRST_USER: u32 = 2;

    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

/// Identifier of a method descriptor. Method identity is id equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

// =============================================================================
// TypeDeclaration
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Class,
    Interface,
}

/// Nominal class or interface definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub kind: DeclKind,

    /// Qualified name (`java.util.Map.Entry`).
    pub name: Atom,

    /// Type parameters as `TypeVariable` descriptors: the directly declared
    /// ones first, then those inherited from enclosing generic declarations.
    pub type_parameters: Vec<TypeId>,

    /// How many of `type_parameters` are declared by this declaration itself.
    pub directly_declared_type_parameter_count: usize,

    pub is_anonymous: bool,

    /// A type parameter's bound transitively refers back to the declaration
    /// (`class Node<T extends Node<T>>`).
    pub is_recursive: bool,

    /// Whether a nullable use of this type may appear as a bound.
    pub can_be_nullable_as_bound: bool,

    /// Direct supertypes in declared order: superclass first, then interfaces.
    pub super_types: Vec<TypeId>,

    /// Methods declared directly in this declaration, in declared order.
    pub methods: Vec<MethodId>,
}

impl TypeDeclaration {
    pub fn class(name: Atom) -> Self {
        Self::new(DeclKind::Class, name)
    }

    pub fn interface(name: Atom) -> Self {
        Self::new(DeclKind::Interface, name)
    }

    fn new(kind: DeclKind, name: Atom) -> Self {
        Self {
            kind,
            name,
            type_parameters: Vec::new(),
            directly_declared_type_parameter_count: 0,
            is_anonymous: false,
            is_recursive: false,
            can_be_nullable_as_bound: true,
            super_types: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Set type parameters that are all directly declared.
    pub fn with_type_parameters(mut self, type_parameters: Vec<TypeId>) -> Self {
        self.directly_declared_type_parameter_count = type_parameters.len();
        self.type_parameters = type_parameters;
        self
    }

    /// Append parameters inherited from an enclosing generic declaration.
    pub fn with_enclosing_type_parameters(mut self, enclosing: Vec<TypeId>) -> Self {
        self.type_parameters.extend(enclosing);
        self
    }

    pub fn with_super_types(mut self, super_types: Vec<TypeId>) -> Self {
        self.super_types = super_types;
        self
    }

    pub fn with_methods(mut self, methods: Vec<MethodId>) -> Self {
        self.methods = methods;
        self
    }

    pub const fn anonymous(mut self) -> Self {
        self.is_anonymous = true;
        self
    }

    pub const fn recursive(mut self, is_recursive: bool) -> Self {
        self.is_recursive = is_recursive;
        self
    }

    pub const fn nullable_as_bound(mut self, allowed: bool) -> Self {
        self.can_be_nullable_as_bound = allowed;
        self
    }

    pub fn directly_declared_type_parameters(&self) -> &[TypeId] {
        let count = self
            .directly_declared_type_parameter_count
            .min(self.type_parameters.len());
        &self.type_parameters[..count]
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }
}

// =============================================================================
// MethodInfo
// =============================================================================

/// A method declared in some type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodInfo {
    pub name: Atom,
    /// Declaration the method is declared in.
    pub enclosing: DeclId,
    /// Erased parameter signature (`(Ljava/lang/Object;I)`).
    pub signature: Atom,
}

impl MethodInfo {
    pub const fn new(name: Atom, enclosing: DeclId, signature: Atom) -> Self {
        Self {
            name,
            enclosing,
            signature,
        }
    }

    /// Same name and erased parameter signature.
    pub fn has_same_signature(&self, other: &MethodInfo) -> bool {
        self.name == other.name && self.signature == other.signature
    }
}

// =============================================================================
// DeclarationStore
// =============================================================================

/// Thread-safe storage for declarations and methods.
///
/// Uses `DashMap` so independent compilation units can register and read
/// declarations concurrently.
pub struct DeclarationStore {
    /// Names of reserved declarations, complete or not.
    names: DashMap<DeclId, Atom>,

    declarations: DashMap<DeclId, Arc<TypeDeclaration>>,

    methods: DashMap<MethodId, Arc<MethodInfo>>,

    next_declaration: AtomicU32,

    next_method: AtomicU32,
}

impl Default for DeclarationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationStore {
    pub fn new() -> Self {
        Self {
            names: DashMap::new(),
            declarations: DashMap::new(),
            methods: DashMap::new(),
            next_declaration: AtomicU32::new(DeclId::FIRST_USER),
            next_method: AtomicU32::new(1),
        }
    }

    /// Install the root class under [`DeclId::OBJECT`].
    pub(crate) fn install_root(&self, name: Atom) {
        self.names.insert(DeclId::OBJECT, name);
        self.declarations
            .insert(DeclId::OBJECT, Arc::new(TypeDeclaration::class(name)));
    }

    /// Reserve a declaration id for `name`. The declaration must be
    /// [completed](Self::complete) before any query reads it.
    pub fn reserve(&self, name: Atom) -> DeclId {
        let id = DeclId(self.next_declaration.fetch_add(1, Ordering::SeqCst));
        trace!(declaration = id.0, "DeclarationStore::reserve");
        self.names.insert(id, name);
        id
    }

    /// Complete a reserved declaration.
    ///
    /// Completing it again with identical contents is a no-op; different
    /// contents are rejected since declarations are immutable once read.
    pub fn complete(&self, id: DeclId, declaration: TypeDeclaration) -> DescriptorResult<()> {
        if !self.names.contains_key(&id) {
            return Err(DescriptorError::UnknownDeclaration(id));
        }

        if let Some(existing) = self.declarations.get(&id) {
            if **existing == declaration {
                return Ok(());
            }
            return Err(DescriptorError::ConflictingDeclaration(id));
        }

        trace!(
            declaration = id.0,
            kind = ?declaration.kind,
            type_parameters = declaration.type_parameters.len(),
            super_types = declaration.super_types.len(),
            "DeclarationStore::complete"
        );
        self.declarations.insert(id, Arc::new(declaration));
        Ok(())
    }

    /// Reserve and complete in one step, for declarations that do not refer
    /// to themselves.
    pub fn register(&self, declaration: TypeDeclaration) -> DeclId {
        let id = self.reserve(declaration.name);
        self.declarations.insert(id, Arc::new(declaration));
        id
    }

    pub fn get(&self, id: DeclId) -> Option<Arc<TypeDeclaration>> {
        self.declarations.get(&id).map(|entry| Arc::clone(&entry))
    }

    /// Name of a reserved declaration, available before completion.
    pub fn name(&self, id: DeclId) -> Option<Atom> {
        self.names.get(&id).map(|entry| *entry)
    }

    pub fn is_complete(&self, id: DeclId) -> bool {
        self.declarations.contains_key(&id)
    }

    pub fn add_method(&self, method: MethodInfo) -> MethodId {
        let id = MethodId(self.next_method.fetch_add(1, Ordering::SeqCst));
        trace!(method = id.0, enclosing = method.enclosing.0, "DeclarationStore::add_method");
        self.methods.insert(id, Arc::new(method));
        id
    }

    pub fn method(&self, id: MethodId) -> Option<Arc<MethodInfo>> {
        self.methods.get(&id).map(|entry| Arc::clone(&entry))
    }

    /// Number of reserved declarations, including the root class.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/decl_tests.rs"]
mod tests;
