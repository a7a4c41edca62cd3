//! Type interning for structural deduplication.
//!
//! Converts `TypeData` values into `TypeId` handles so that descriptor
//! equality is id equality and every distinct descriptor is stored once.
//! The interner also owns the type-variable table, the declaration store and
//! the string interner, which makes it the single value a compilation shares
//! across threads.
//!
//! ## Type variables
//!
//! A type variable is interned from its unique key. Declaring a key hands out
//! its `TypeVarId` immediately; its bounds are bound separately. This is what
//! lets `T extends Comparable<T>` be built: `T`'s descriptor exists before the
//! `Comparable<T>` bound that mentions it.

use crate::decl::{DeclId, DeclarationStore, MethodId, MethodInfo, TypeDeclaration};
use crate::error::{DescriptorError, DescriptorResult};
use crate::types::{
    PrimitiveKind, TypeData, TypeId, TypeListBuffer, TypeListId, TypeVarId, TypeVariableBounds,
    TypeVariableInfo,
};
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;
use xlt_common::{Atom, ShardedInterner};

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS; // 64 shards
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

/// Qualified name of the root class.
pub const OBJECT_NAME: &str = "java.lang.Object";

/// Key of the unbounded wildcard variable.
pub const UNBOUNDED_WILDCARD_KEY: &str = "?";

struct TypeShard {
    key_to_index: RwLock<FxHashMap<TypeData, u32>>,
    index_to_key: RwLock<Vec<TypeData>>,
}

impl TypeShard {
    fn new() -> Self {
        TypeShard {
            key_to_index: RwLock::new(FxHashMap::default()),
            index_to_key: RwLock::new(Vec::new()),
        }
    }
}

struct SliceInterner<T> {
    items: Vec<Arc<[T]>>,
    map: FxHashMap<Arc<[T]>, u32>,
}

impl<T> SliceInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        let mut map = FxHashMap::default();
        map.insert(empty.clone(), 0);
        SliceInterner {
            items: vec![empty],
            map,
        }
    }

    fn intern(&mut self, items: &[T]) -> u32
    where
        T: Clone,
    {
        if items.is_empty() {
            return 0;
        }

        if let Some(&id) = self.map.get(items) {
            return id;
        }

        let arc: Arc<[T]> = Arc::from(items);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<[T]>> {
        self.items.get(id as usize).cloned()
    }

    fn empty(&self) -> Arc<[T]> {
        self.items[0].clone()
    }
}

/// Type-variable table: key to id, and the bounds bound to each id.
struct TypeVariableTable {
    by_key: FxHashMap<Atom, TypeVarId>,
    keys: Vec<Atom>,
    infos: Vec<Option<Arc<TypeVariableInfo>>>,
}

impl TypeVariableTable {
    fn new() -> Self {
        TypeVariableTable {
            by_key: FxHashMap::default(),
            keys: Vec::new(),
            infos: Vec::new(),
        }
    }

    fn declare(&mut self, key: Atom) -> TypeVarId {
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        let id = TypeVarId(self.keys.len() as u32);
        self.by_key.insert(key, id);
        self.keys.push(key);
        self.infos.push(None);
        id
    }
}

/// Interning table for type descriptors.
/// Thread-safe via `RwLock` shards for concurrent access.
pub struct TypeInterner {
    /// Sharded storage for user descriptors
    shards: [TypeShard; SHARD_COUNT],
    /// Qualified names, method names, signatures and type-variable keys
    pub string_interner: ShardedInterner,
    type_lists: RwLock<SliceInterner<TypeId>>,
    type_variables: RwLock<TypeVariableTable>,
    declarations: DeclarationStore,
}

impl TypeInterner {
    /// Create an interner with the root class and the unbounded wildcard
    /// pre-registered.
    pub fn new() -> Self {
        let string_interner = ShardedInterner::new();
        string_interner.intern_common();

        let declarations = DeclarationStore::new();
        declarations.install_root(string_interner.intern(OBJECT_NAME));

        let mut variables = TypeVariableTable::new();
        let wildcard_key = string_interner.intern(UNBOUNDED_WILDCARD_KEY);
        let wildcard = variables.declare(wildcard_key);
        debug_assert_eq!(wildcard, TypeVarId::UNBOUNDED_WILDCARD);
        variables.infos[wildcard.0 as usize] = Some(Arc::new(TypeVariableInfo::new(
            wildcard_key,
            TypeVariableBounds::wildcard(wildcard_key, TypeId::NULLABLE_ANY, None),
        )));

        TypeInterner {
            shards: std::array::from_fn(|_| TypeShard::new()),
            string_interner,
            type_lists: RwLock::new(SliceInterner::new()),
            type_variables: RwLock::new(variables),
            declarations,
        }
    }

    pub fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    pub fn resolve_atom(&self, atom: Atom) -> String {
        self.string_interner.resolve(atom).to_string()
    }

    pub fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        let lists = self.type_lists.read().unwrap_or_else(PoisonError::into_inner);
        lists.get(id.0).unwrap_or_else(|| lists.empty())
    }

    /// Intern a descriptor and return its `TypeId`.
    /// If the descriptor already exists, returns the existing id.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = Self::intrinsic_id(&data) {
            return id;
        }

        let mut hasher = FxHasher::default();
        data.hash(&mut hasher);
        let shard_idx = (hasher.finish() as usize) & (SHARD_COUNT - 1);
        let shard = &self.shards[shard_idx];

        {
            let map = shard.key_to_index.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(&local_index) = map.get(&data) {
                return Self::make_id(local_index, shard_idx as u32);
            }
        }

        let mut map = shard.key_to_index.write().unwrap_or_else(PoisonError::into_inner);
        let mut storage = shard.index_to_key.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(&local_index) = map.get(&data) {
            return Self::make_id(local_index, shard_idx as u32);
        }

        let local_index = storage.len() as u32;
        storage.push(data);
        map.insert(data, local_index);

        Self::make_id(local_index, shard_idx as u32)
    }

    /// Look up the descriptor behind `id`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        if id.is_intrinsic() {
            return Self::intrinsic_data(id);
        }

        let raw_val = id.0 - TypeId::FIRST_USER;
        let shard_idx = (raw_val & SHARD_MASK) as usize;
        let local_index = raw_val >> SHARD_BITS;

        let shard = self.shards.get(shard_idx)?;
        let storage = shard.index_to_key.read().unwrap_or_else(PoisonError::into_inner);
        storage.get(local_index as usize).copied()
    }

    fn intern_type_list(&self, members: &[TypeId]) -> TypeListId {
        let mut lists = self.type_lists.write().unwrap_or_else(PoisonError::into_inner);
        TypeListId(lists.intern(members))
    }

    /// Number of interned descriptors, intrinsic range included.
    pub fn len(&self) -> usize {
        let mut total = TypeId::FIRST_USER as usize;
        for shard in &self.shards {
            total += shard
                .index_to_key
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .len();
        }
        total
    }

    /// Check if the interner only has intrinsics.
    pub fn is_empty(&self) -> bool {
        self.len() <= TypeId::FIRST_USER as usize
    }

    #[inline]
    fn make_id(local_index: u32, shard_idx: u32) -> TypeId {
        let raw_val = (local_index << SHARD_BITS) | (shard_idx & SHARD_MASK);
        TypeId(TypeId::FIRST_USER + raw_val)
    }

    fn intrinsic_id(data: &TypeData) -> Option<TypeId> {
        match *data {
            TypeData::Primitive(kind) => Some(kind.to_type_id()),
            TypeData::Declared {
                declaration: DeclId::OBJECT,
                arguments: TypeListId::EMPTY,
                nullable,
            } => Some(if nullable {
                TypeId::NULLABLE_ANY
            } else {
                TypeId::ANY
            }),
            TypeData::TypeVariable {
                variable: TypeVarId::UNBOUNDED_WILDCARD,
                nullable: false,
            } => Some(TypeId::UNBOUNDED_WILDCARD),
            _ => None,
        }
    }

    fn intrinsic_data(id: TypeId) -> Option<TypeData> {
        if let Some(kind) = PrimitiveKind::from_type_id(id) {
            return Some(TypeData::Primitive(kind));
        }
        match id {
            TypeId::NULLABLE_ANY | TypeId::ANY => Some(TypeData::Declared {
                declaration: DeclId::OBJECT,
                arguments: TypeListId::EMPTY,
                nullable: id == TypeId::NULLABLE_ANY,
            }),
            TypeId::UNBOUNDED_WILDCARD => Some(TypeData::TypeVariable {
                variable: TypeVarId::UNBOUNDED_WILDCARD,
                nullable: false,
            }),
            _ => None,
        }
    }

    // =========================================================================
    // Type variables
    // =========================================================================

    /// Reserve the variable identified by `key`. Declaring the same key twice
    /// returns the same id.
    pub fn declare_type_variable(&self, key: Atom) -> TypeVarId {
        let mut table = self.type_variables.write().unwrap_or_else(PoisonError::into_inner);
        table.declare(key)
    }

    /// Bind the bounds of a declared variable.
    ///
    /// Binding again with identical bounds is a no-op; different bounds are
    /// rejected, since a key identifies exactly one bound structure.
    pub fn bind_type_variable(
        &self,
        variable: TypeVarId,
        bounds: TypeVariableBounds,
    ) -> DescriptorResult<()> {
        let mut table = self.type_variables.write().unwrap_or_else(PoisonError::into_inner);
        let index = variable.0 as usize;
        let Some(&key) = table.keys.get(index) else {
            return Err(DescriptorError::UnknownTypeVariable(variable));
        };

        if let Some(existing) = &table.infos[index] {
            if existing.bounds() == bounds {
                return Ok(());
            }
            return Err(DescriptorError::ConflictingTypeVariable {
                variable,
                key: self.resolve_atom(key),
            });
        }

        trace!(
            variable = variable.0,
            upper_bound = bounds.upper_bound.0,
            wildcard = bounds.is_wildcard_or_capture,
            "TypeInterner::bind_type_variable"
        );
        table.infos[index] = Some(Arc::new(TypeVariableInfo::new(key, bounds)));
        Ok(())
    }

    pub fn type_variable(&self, variable: TypeVarId) -> Option<Arc<TypeVariableInfo>> {
        let table = self.type_variables.read().unwrap_or_else(PoisonError::into_inner);
        table.infos.get(variable.0 as usize).cloned().flatten()
    }

    pub fn type_variable_key(&self, variable: TypeVarId) -> Option<Atom> {
        let table = self.type_variables.read().unwrap_or_else(PoisonError::into_inner);
        table.keys.get(variable.0 as usize).copied()
    }

    /// Id of an already declared key, without declaring it.
    pub fn find_type_variable(&self, key: Atom) -> Option<TypeVarId> {
        let table = self.type_variables.read().unwrap_or_else(PoisonError::into_inner);
        table.by_key.get(&key).copied()
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn declarations(&self) -> &DeclarationStore {
        &self.declarations
    }

    pub fn declaration(&self, id: DeclId) -> Option<Arc<TypeDeclaration>> {
        self.declarations.get(id)
    }

    pub fn method(&self, id: MethodId) -> Option<Arc<MethodInfo>> {
        self.declarations.method(id)
    }

    // =========================================================================
    // Convenience methods for common descriptor constructions
    // =========================================================================

    pub fn primitive(&self, kind: PrimitiveKind) -> TypeId {
        kind.to_type_id()
    }

    pub fn declared(&self, declaration: DeclId, arguments: Vec<TypeId>, nullable: bool) -> TypeId {
        let arguments = self.intern_type_list(&arguments);
        self.intern(TypeData::Declared {
            declaration,
            arguments,
            nullable,
        })
    }

    pub fn array(&self, component: TypeId, nullable: bool) -> TypeId {
        self.intern(TypeData::Array {
            component: Some(component),
            nullable,
        })
    }

    pub fn variable(&self, variable: TypeVarId, nullable: bool) -> TypeId {
        self.intern(TypeData::TypeVariable { variable, nullable })
    }

    /// Intersection of `members` in order. A single member is returned as
    /// is; an empty list is the implicit top type.
    pub fn intersection(&self, members: Vec<TypeId>) -> TypeId {
        let members: TypeListBuffer = members.into_iter().collect();
        match members.as_slice() {
            [] => TypeId::NULLABLE_ANY,
            [single] => *single,
            list => {
                let list = self.intern_type_list(list);
                self.intern(TypeData::Intersection(list))
            }
        }
    }

    pub fn intersection2(&self, left: TypeId, right: TypeId) -> TypeId {
        self.intersection(vec![left, right])
    }

    /// Union of `members` in order. A single member is returned as is.
    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        if let [single] = members.as_slice() {
            return *single;
        }
        let list = self.intern_type_list(&members);
        self.intern(TypeData::Union(list))
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
