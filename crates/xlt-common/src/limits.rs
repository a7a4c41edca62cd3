//! Centralized limits and thresholds for the xlt backend.
//!
//! Occurs-checks over type-variable bounds terminate through their `seen`
//! set and need no limit. Walks over the declared-supertype graph use a
//! `RecursionGuard` whose limits come from the constants below, via
//! `xlt_solver::recursion::RecursionProfile`.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum depth of a supertype-graph walk.
///
/// Used when resolving which direct supertype a super call is routed through
/// and when deciding whether one declaration inherits from another. Real
/// hierarchies are rarely deeper than a dozen levels; past 256 the walk fails
/// with an error rather than guessing.
///
/// ```java
/// interface A { default void m() {} }
/// interface B extends A {}
/// interface C extends B {}
/// class D implements C {
///   public void m() { C.super.m(); } // walks C -> B -> A
/// }
/// ```
pub const MAX_SUPERTYPE_WALK_DEPTH: u32 = 256;

/// Maximum depth when walking a type variable's upper-bound chain.
///
/// `T extends U, U extends V, ...` chains are bounded by the number of
/// distinct variables; the limit only protects against corrupted models.
pub const MAX_BOUND_CHAIN_DEPTH: u32 = 1_024;

// =============================================================================
// Operation Counts
// =============================================================================

/// Total node budget of a single supertype-graph walk.
///
/// Each declaration is expanded once per walk, so the budget is a bound on
/// the number of distinct declarations a single walk may visit.
pub const MAX_SUPERTYPE_WALK_ITERATIONS: u32 = 100_000;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Inline capacity for type-argument and member lists before spilling to the
/// heap.
///
/// Most generic types have one or two arguments and most intersections have
/// two members.
pub const TYPE_LIST_INLINE: usize = 4;
