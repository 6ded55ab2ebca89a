//! Error types for the trimerge core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

use crate::models::Side;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Merge errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the merge engine.
///
/// The region walker itself is total over its inputs; the only way a merge
/// fails is the line differ failing on one of the two comparisons.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The line differ failed while comparing base against one side.
    #[error("diff of base against {side} failed: {source}")]
    Diff {
        side: Side,
        #[source]
        source: DiffError,
    },
}

// ---------------------------------------------------------------------------
// Diff errors
// ---------------------------------------------------------------------------

/// Errors a [`LineDiffer`](crate::diff::LineDiffer) may report.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The differ refused the input (e.g. undecodable content).
    #[error("input rejected: {0}")]
    InvalidInput(String),

    /// The diff could not be computed.
    #[error("{0}")]
    Failed(String),
}

// ---------------------------------------------------------------------------
// Resolution errors
// ---------------------------------------------------------------------------

/// Errors from resolving conflict regions of a merge result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No region with this index exists in the result.
    #[error("merge region {0} not found")]
    RegionNotFound(usize),

    /// The region exists but is not a conflict.
    #[error("merge region {0} is not a conflict")]
    NotAConflict(usize),

    /// Merged content was requested while conflicts are still open.
    #[error("{0} conflict(s) still unresolved")]
    Unresolved(usize),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
