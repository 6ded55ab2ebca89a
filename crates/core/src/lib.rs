//! trimerge core library.
//!
//! This crate provides the three-way merge engine: line splitting, line
//! diffing, the region walker that classifies base/ours/theirs into merge
//! regions, conflict marker rendering and resolution, and configuration.

pub mod config;
pub mod conflict;
pub mod diff;
pub mod errors;
pub mod merge;
pub mod models;
pub mod text;

// Re-exports for convenience.
pub use config::MergeConfig;
pub use conflict::{ConflictResolver, Resolution};
pub use diff::{DiffAlgorithm, DiffOptions, EditBlock, LineDiffer, SimilarDiffer};
pub use errors::{CoreError, MergeError};
pub use merge::{merge_texts, MergeOptions, Merger};
pub use models::{FileMergeResult, MergeRegion, MergeSummary, RegionType, Side};
