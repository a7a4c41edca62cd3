//! Type descriptor representation.
//!
//! Every type the backend renders is a `TypeData` value interned into a
//! `TypeId`. The variant set is closed: queries and transformations match
//! every variant explicitly, so adding a variant is a compile error at each
//! site that has to handle it.

use crate::decl::DeclId;
use serde::Serialize;
use smallvec::SmallVec;
use xlt_common::Atom;
use xlt_common::limits::TYPE_LIST_INLINE;

/// Inline buffer used while building member and argument lists.
pub type TypeListBuffer = SmallVec<[TypeId; TYPE_LIST_INLINE]>;

// =============================================================================
// TypeId
// =============================================================================

/// Interned handle of a type descriptor.
///
/// Two descriptors are equal iff their ids are equal. Ids below
/// [`TypeId::FIRST_USER`] are process-wide constants that exist in every
/// interner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const BOOLEAN: TypeId = TypeId(1);
    pub const BYTE: TypeId = TypeId(2);
    pub const CHAR: TypeId = TypeId(3);
    pub const SHORT: TypeId = TypeId(4);
    pub const INT: TypeId = TypeId(5);
    pub const LONG: TypeId = TypeId(6);
    pub const FLOAT: TypeId = TypeId(7);
    pub const DOUBLE: TypeId = TypeId(8);
    pub const VOID: TypeId = TypeId(9);

    /// The nullable root class (`Any?` in the target).
    ///
    /// A type variable bounded by it renders without an explicit bound.
    pub const NULLABLE_ANY: TypeId = TypeId(10);

    /// The non-nullable root class (`Any` in the target).
    pub const ANY: TypeId = TypeId(11);

    /// The unbounded wildcard (`*` in the target).
    pub const UNBOUNDED_WILDCARD: TypeId = TypeId(12);

    /// First id handed out for interned descriptors.
    pub const FIRST_USER: u32 = 100;

    /// Whether this id is one of the pre-registered constants.
    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

// =============================================================================
// Primitive kinds
// =============================================================================

/// Built-in scalar types. Primitives are never nullable; boxed forms are
/// ordinary declared types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Char,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Void,
    ];

    pub const fn to_type_id(self) -> TypeId {
        match self {
            PrimitiveKind::Boolean => TypeId::BOOLEAN,
            PrimitiveKind::Byte => TypeId::BYTE,
            PrimitiveKind::Char => TypeId::CHAR,
            PrimitiveKind::Short => TypeId::SHORT,
            PrimitiveKind::Int => TypeId::INT,
            PrimitiveKind::Long => TypeId::LONG,
            PrimitiveKind::Float => TypeId::FLOAT,
            PrimitiveKind::Double => TypeId::DOUBLE,
            PrimitiveKind::Void => TypeId::VOID,
        }
    }

    pub fn from_type_id(id: TypeId) -> Option<PrimitiveKind> {
        Self::ALL.into_iter().find(|kind| kind.to_type_id() == id)
    }

    /// Keyword in the origin language (`int`, `boolean`, ...).
    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Void => "void",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<PrimitiveKind> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Name of the type in the target syntax.
    pub const fn target_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Int => "Int",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Void => "Unit",
        }
    }

    /// Specialized array class in the target syntax (`IntArray`, ...).
    /// `void` has none.
    pub const fn target_array_name(self) -> Option<&'static str> {
        match self {
            PrimitiveKind::Boolean => Some("BooleanArray"),
            PrimitiveKind::Byte => Some("ByteArray"),
            PrimitiveKind::Char => Some("CharArray"),
            PrimitiveKind::Short => Some("ShortArray"),
            PrimitiveKind::Int => Some("IntArray"),
            PrimitiveKind::Long => Some("LongArray"),
            PrimitiveKind::Float => Some("FloatArray"),
            PrimitiveKind::Double => Some("DoubleArray"),
            PrimitiveKind::Void => None,
        }
    }
}

// =============================================================================
// Ids of interned lists and type variables
// =============================================================================

/// Interned ordered list of descriptors (type arguments, members).
/// `TypeListId(0)` is always the empty list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeListId(pub u32);

impl TypeListId {
    pub const EMPTY: TypeListId = TypeListId(0);
}

/// Identity of a type variable, interned from its unique key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeVarId(pub u32);

impl TypeVarId {
    /// The variable behind [`TypeId::UNBOUNDED_WILDCARD`].
    pub const UNBOUNDED_WILDCARD: TypeVarId = TypeVarId(0);
}

// =============================================================================
// TypeData
// =============================================================================

/// A type descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// Built-in scalar type.
    Primitive(PrimitiveKind),

    /// Array of `component`. The component is absent only for degenerate
    /// descriptors produced by error recovery upstream.
    Array {
        component: Option<TypeId>,
        nullable: bool,
    },

    /// Class or interface type. `arguments` holds the directly declared
    /// arguments first, followed by those of enclosing generic declarations.
    /// Empty arguments on a generic declaration make the type raw.
    Declared {
        declaration: DeclId,
        arguments: TypeListId,
        nullable: bool,
    },

    /// Reference to a type variable. `nullable` is the explicit `T?` mark;
    /// without it the variable is nullable iff its upper bound is.
    TypeVariable { variable: TypeVarId, nullable: bool },

    /// All of the members simultaneously. Always has at least two members.
    Intersection(TypeListId),

    /// One of the members (multi-catch).
    Union(TypeListId),
}

impl TypeData {
    /// Short name of the variant, for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            TypeData::Primitive(_) => "primitive",
            TypeData::Array { .. } => "array",
            TypeData::Declared { .. } => "declared",
            TypeData::TypeVariable { .. } => "type variable",
            TypeData::Intersection(_) => "intersection",
            TypeData::Union(_) => "union",
        }
    }
}

// =============================================================================
// Type variables
// =============================================================================

/// Bounds and flags of a type variable, supplied when it is bound.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeVariableBounds {
    /// Display name (`T`, `?`, `capture#1`).
    pub name: Atom,
    /// Qualified name of the declaring class or method, if any.
    pub declaring: Option<Atom>,
    pub upper_bound: TypeId,
    pub lower_bound: Option<TypeId>,
    pub is_wildcard_or_capture: bool,
}

impl TypeVariableBounds {
    /// A named type parameter bounded by `upper_bound`.
    pub fn parameter(name: Atom, declaring: Option<Atom>, upper_bound: TypeId) -> Self {
        Self {
            name,
            declaring,
            upper_bound,
            lower_bound: None,
            is_wildcard_or_capture: false,
        }
    }

    /// A wildcard with the given bounds.
    pub fn wildcard(name: Atom, upper_bound: TypeId, lower_bound: Option<TypeId>) -> Self {
        Self {
            name,
            declaring: None,
            upper_bound,
            lower_bound,
            is_wildcard_or_capture: true,
        }
    }
}

/// A bound type variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeVariableInfo {
    /// Unique identity key the variable was interned from.
    pub key: Atom,
    pub name: Atom,
    pub declaring: Option<Atom>,
    pub upper_bound: TypeId,
    pub lower_bound: Option<TypeId>,
    pub is_wildcard_or_capture: bool,
}

impl TypeVariableInfo {
    pub fn new(key: Atom, bounds: TypeVariableBounds) -> Self {
        Self {
            key,
            name: bounds.name,
            declaring: bounds.declaring,
            upper_bound: bounds.upper_bound,
            lower_bound: bounds.lower_bound,
            is_wildcard_or_capture: bounds.is_wildcard_or_capture,
        }
    }

    pub fn bounds(&self) -> TypeVariableBounds {
        TypeVariableBounds {
            name: self.name,
            declaring: self.declaring,
            upper_bound: self.upper_bound,
            lower_bound: self.lower_bound,
            is_wildcard_or_capture: self.is_wildcard_or_capture,
        }
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
