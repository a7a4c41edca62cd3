//! Driver for the xlt type-descriptor core.
//!
//! Loads JSON program models, builds a descriptor database per model and
//! answers `describe` and `super-call` queries over it.

pub mod args;
pub mod driver;
pub mod model;
pub mod report;
