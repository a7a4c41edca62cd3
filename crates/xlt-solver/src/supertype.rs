//! Supertype resolution for super calls.
//!
//! The target syntax qualifies a super call with the direct supertype it is
//! routed through (`super<Named>.name()`). Resolution walks the declared
//! supertype graph in declared order; the first direct supertype through
//! which the targeted implementation is reachable wins.

use crate::db::TypeDatabase;
use crate::decl::{DeclId, MethodId};
use crate::error::{DescriptorError, DescriptorResult};
use crate::queries::declaration_of;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::TypeId;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Direct supertype of `declared` that supplies `method` to a super call.
///
/// For each direct supertype `s`, in declared order, the methods declared
/// directly in `s` are searched for `method` or an override of it:
/// - none: `s` is the answer if `method` is reachable further up through `s`
/// - `method` itself: `s` is the answer
/// - an override: `s` shadows `method` and is skipped
///
/// Returns `None` when no direct supertype reaches `method`. Hierarchies
/// deeper than the walk budget are an error, not a `None`.
pub fn direct_super_type_for_method_call(
    db: &dyn TypeDatabase,
    declared: TypeId,
    method: MethodId,
) -> DescriptorResult<Option<TypeId>> {
    let declaration = declaration_of(db, declared)?;
    SupertypeWalk::new(db, WalkTarget::Method(method)).first_direct_super_type(declaration)
}

/// Whether `ancestor` is reachable from `declaration` through one or more
/// supertype edges.
pub fn is_proper_subtype_declaration(
    db: &dyn TypeDatabase,
    declaration: DeclId,
    ancestor: DeclId,
) -> DescriptorResult<bool> {
    if declaration == ancestor {
        return Ok(false);
    }
    let found = SupertypeWalk::new(db, WalkTarget::Ancestor(ancestor))
        .first_direct_super_type(declaration)?;
    Ok(found.is_some())
}

#[derive(Debug, Clone, Copy)]
enum WalkTarget {
    /// Declarations that declare the method, or inherit it unshadowed.
    Method(MethodId),
    /// The ancestor declaration itself.
    Ancestor(DeclId),
}

/// One walk over the supertype graph.
///
/// Each declaration is expanded at most once per walk. A `true` answer ends
/// the walk, so a `false` recorded while a cycle was cut is never
/// contradicted later in the same walk.
struct SupertypeWalk<'a> {
    db: &'a dyn TypeDatabase,
    target: WalkTarget,
    guard: RecursionGuard<DeclId>,
    answers: FxHashMap<DeclId, bool>,
}

impl<'a> SupertypeWalk<'a> {
    fn new(db: &'a dyn TypeDatabase, target: WalkTarget) -> Self {
        Self {
            db,
            target,
            guard: RecursionGuard::with_profile(RecursionProfile::SupertypeWalk),
            answers: FxHashMap::default(),
        }
    }

    /// Enter `declaration`; `Ok(false)` on a cycle.
    fn enter(&mut self, declaration: DeclId) -> DescriptorResult<bool> {
        match self.guard.enter(declaration) {
            RecursionResult::Entered => Ok(true),
            RecursionResult::Cycle => {
                trace!(declaration = declaration.0, "supertype cycle cut");
                Ok(false)
            }
            exceeded @ (RecursionResult::DepthExceeded | RecursionResult::IterationExceeded) => {
                debug!(declaration = declaration.0, ?exceeded, "supertype walk over budget");
                Err(DescriptorError::HierarchyTooDeep { declaration })
            }
        }
    }

    fn first_direct_super_type(&mut self, declaration: DeclId) -> DescriptorResult<Option<TypeId>> {
        if !self.enter(declaration)? {
            return Ok(None);
        }
        let result = self.first_reaching_super_type(declaration);
        self.guard.leave(declaration);
        result
    }

    fn first_reaching_super_type(&mut self, declaration: DeclId) -> DescriptorResult<Option<TypeId>> {
        let declaration = self.db.require_declaration(declaration)?;
        for &super_type in &declaration.super_types {
            let super_declaration = declaration_of(self.db, super_type)?;
            if self.reaches(super_declaration)? {
                trace!(super_type = super_type.0, "target reachable through supertype");
                return Ok(Some(super_type));
            }
        }
        Ok(None)
    }

    fn reaches(&mut self, declaration: DeclId) -> DescriptorResult<bool> {
        if let Some(&known) = self.answers.get(&declaration) {
            return Ok(known);
        }
        if !self.enter(declaration)? {
            return Ok(false);
        }
        let result = self.reaches_entered(declaration);
        self.guard.leave(declaration);
        let reached = result?;
        self.answers.insert(declaration, reached);
        Ok(reached)
    }

    fn reaches_entered(&mut self, declaration: DeclId) -> DescriptorResult<bool> {
        match self.target {
            WalkTarget::Ancestor(ancestor) => {
                if declaration == ancestor {
                    return Ok(true);
                }
            }
            WalkTarget::Method(method) => match find_declared_method(self.db, declaration, method)? {
                None => {}
                Some(found) if found == method => {
                    trace!(declaration = declaration.0, "method declared in supertype");
                    return Ok(true);
                }
                Some(found) => {
                    debug!(
                        declaration = declaration.0,
                        overriding = found.0,
                        "supertype overrides the targeted method"
                    );
                    return Ok(false);
                }
            },
        }
        Ok(self.first_reaching_super_type(declaration)?.is_some())
    }
}

/// First method declared directly in `declaration` that is `method` or
/// overrides it.
fn find_declared_method(
    db: &dyn TypeDatabase,
    declaration: DeclId,
    method: MethodId,
) -> DescriptorResult<Option<MethodId>> {
    let declaration = db.require_declaration(declaration)?;
    for &candidate in &declaration.methods {
        if candidate == method || db.is_override(candidate, method)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

#[cfg(test)]
#[path = "../tests/supertype_tests.rs"]
mod tests;
