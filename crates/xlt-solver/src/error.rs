//! Internal errors of the descriptor algebra.
//!
//! Every error here is fatal for the compilation unit being processed: it
//! means the semantic model handed the backend a descriptor graph the
//! algebra cannot interpret. Cycles in bounds or hierarchies are not errors;
//! hierarchies too deep to walk are.

use crate::decl::{DeclId, MethodId};
use crate::types::{TypeId, TypeVarId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("unknown type descriptor {0:?}")]
    UnknownType(TypeId),

    #[error("unknown type variable {0:?}")]
    UnknownTypeVariable(TypeVarId),

    #[error("type variable `{key}` ({variable:?}) is used before its bounds are bound")]
    UnboundTypeVariable { variable: TypeVarId, key: String },

    #[error("type variable `{key}` ({variable:?}) is already bound to different bounds")]
    ConflictingTypeVariable { variable: TypeVarId, key: String },

    #[error("unknown declaration {0:?}")]
    UnknownDeclaration(DeclId),

    #[error("declaration `{name}` ({declaration:?}) is used before it is complete")]
    IncompleteDeclaration { declaration: DeclId, name: String },

    #[error("declaration {0:?} is already complete with different contents")]
    ConflictingDeclaration(DeclId),

    #[error("supertype walk exceeded its depth or iteration budget at {declaration:?}")]
    HierarchyTooDeep { declaration: DeclId },

    #[error("unknown method {0:?}")]
    UnknownMethod(MethodId),

    #[error("expected a declared type, found {kind} descriptor {id:?}")]
    NotDeclared { id: TypeId, kind: &'static str },

    #[error("expected a type variable, found {kind} descriptor {id:?}")]
    NotTypeVariable { id: TypeId, kind: &'static str },
}

pub type DescriptorResult<T> = Result<T, DescriptorError>;
