//! Recursion guard for walks over the declared-supertype graph.
//!
//! Bound-chain traversals (occurs-check, nullability of bounds) carry their
//! own `seen` set because they must answer `false` on a revisit. Hierarchy
//! walks memoize each declaration and use the guard to cut cycles; the depth
//! and iteration limits turn a runaway model into an error.
//!
//! ```ignore
//! let mut guard = RecursionGuard::with_profile(RecursionProfile::SupertypeWalk);
//! match guard.enter(declaration) {
//!     RecursionResult::Entered => {
//!         let found = walk(db, declaration, &mut guard);
//!         guard.leave(declaration);
//!         found
//!     }
//!     RecursionResult::Cycle => Ok(false),
//!     RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => Err(too_deep),
//! }
//! ```

use rustc_hash::FxHashSet;
use std::hash::Hash;
use xlt_common::limits;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Walks over direct supertypes: super-call resolution and the
    /// declaration subtype test behind the default override predicate.
    ///
    /// depth = 256, iterations = 100_000
    SupertypeWalk,
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::SupertypeWalk => limits::MAX_SUPERTYPE_WALK_DEPTH,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::SupertypeWalk => limits::MAX_SUPERTYPE_WALK_ITERATIONS,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited.
    Cycle,
    /// Maximum recursion depth exceeded.
    DepthExceeded,
    /// Maximum iteration count exceeded.
    IterationExceeded,
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Tracks recursion state for cycle detection, depth limiting,
/// and iteration bounding.
///
/// In debug builds, dropping a guard with entries still in the visiting set
/// panics, as does leaving a key that was never entered.
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter a recursive computation for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller must call
    /// [`leave`](Self::leave) with the same key when done.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }

        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave a recursive computation for `key`.
    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);

        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set"
        );

        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set",
                self.visiting.len(),
            );
        }
    }
}
