//! Tracing configuration for debugging descriptor normalization.
//!
//! Supports three output formats controlled by `XLT_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Follow every make_non_null decision as a tree
//! XLT_LOG=xlt_solver=trace XLT_LOG_FORMAT=tree xlt describe model.json
//!
//! # JSON (for tooling)
//! XLT_LOG=debug XLT_LOG_FORMAT=json xlt describe model.json
//! ```
//!
//! The subscriber is only initialised when `XLT_LOG` (or `RUST_LOG`) is set,
//! so there is zero overhead in normal runs.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Read the format from the `XLT_LOG_FORMAT` environment variable.
    fn from_env() -> Self {
        Self::parse(&std::env::var("XLT_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `XLT_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("XLT_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `XLT_LOG` nor `RUST_LOG` is set. All output goes
/// to stderr so it never interferes with reports written to stdout. Calling
/// this twice keeps the first subscriber.
pub fn init_tracing() {
    let has_xlt_log = std::env::var("XLT_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_xlt_log && !has_rust_log {
        return;
    }

    let filter = build_filter();

    // A subscriber may already be installed (tests, embedding drivers).
    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).try_init().is_ok()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).try_init().is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };
    if installed {
        tracing::debug!("tracing subscriber installed");
    }
}
