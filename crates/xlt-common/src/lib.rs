//! Common types and utilities for the xlt transpiler backend.
//!
//! This crate provides foundational pieces used across all xlt crates:
//! - String interning (`Atom`, `ShardedInterner`)
//! - Recursion and iteration limits
//! - Tracing subscriber setup for binaries

// String interning for qualified names and type-variable keys
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Centralized limits and thresholds
pub mod limits;

// Tracing subscriber setup (XLT_LOG / XLT_LOG_FORMAT)
pub mod tracing_config;
