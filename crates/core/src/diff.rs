//! Line-level diff collaborator.
//!
//! The merge engine only needs, for each of base→ours and base→theirs, the
//! ordered list of [`EditBlock`]s turning one line sequence into the other.
//! Anything implementing [`LineDiffer`] can supply them; [`SimilarDiffer`]
//! is the default, built on the `similar` crate.

use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use similar::algorithms::{diff_slices_deadline, Capture};
use similar::{Algorithm, DiffOp, DiffTag};
use tracing::trace;

use crate::errors::DiffError;
use crate::text::whitespace_key;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One contiguous replace / insert / delete between two line sequences.
///
/// All offsets are 0-based. A pure insertion has `delete_count == 0` and
/// `delete_start` is the old index it is inserted before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBlock {
    pub delete_start: usize,
    pub delete_count: usize,
    pub insert_start: usize,
    pub insert_count: usize,
}

impl EditBlock {
    /// End (exclusive) of the replaced old range.
    pub fn delete_end(&self) -> usize {
        self.delete_start + self.delete_count
    }

    /// Whether the block changes anything at all.
    pub fn is_effective(&self) -> bool {
        self.delete_count > 0 || self.insert_count > 0
    }
}

/// Diff algorithm used by [`SimilarDiffer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    #[default]
    Myers,
    Patience,
    Lcs,
}

impl DiffAlgorithm {
    fn as_similar(self) -> Algorithm {
        match self {
            Self::Myers => Algorithm::Myers,
            Self::Patience => Algorithm::Patience,
            Self::Lcs => Algorithm::Lcs,
        }
    }
}

impl std::fmt::Display for DiffAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Myers => write!(f, "myers"),
            Self::Patience => write!(f, "patience"),
            Self::Lcs => write!(f, "lcs"),
        }
    }
}

impl FromStr for DiffAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "myers" => Ok(Self::Myers),
            "patience" => Ok(Self::Patience),
            "lcs" => Ok(Self::Lcs),
            other => Err(format!(
                "unknown diff algorithm '{}': use myers, patience or lcs",
                other
            )),
        }
    }
}

/// Options forwarded to the differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Treat lines differing only in whitespace as equal.
    pub ignore_whitespace: bool,
    pub algorithm: DiffAlgorithm,
    /// Upper bound on diff time; past it a valid but less minimal diff is
    /// returned.
    pub timeout: Option<Duration>,
}

/// Computes the edit blocks between two line sequences.
pub trait LineDiffer {
    /// Ordered, non-overlapping blocks turning `old` into `new`.
    fn diff(
        &self,
        old: &[String],
        new: &[String],
        options: &DiffOptions,
    ) -> Result<Vec<EditBlock>, DiffError>;
}

// ---------------------------------------------------------------------------
// similar-backed differ
// ---------------------------------------------------------------------------

/// [`LineDiffer`] backed by `similar`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarDiffer;

impl LineDiffer for SimilarDiffer {
    fn diff(
        &self,
        old: &[String],
        new: &[String],
        options: &DiffOptions,
    ) -> Result<Vec<EditBlock>, DiffError> {
        let algorithm = options.algorithm.as_similar();
        let deadline = options.timeout.map(|t| Instant::now() + t);

        // Raw ops only: similar's `Replace` hook reorders delete/insert pairs
        // and reports offsets that do not line up.
        let mut capture = Capture::new();
        let outcome = if options.ignore_whitespace {
            let old_keys: Vec<String> = old.iter().map(|l| whitespace_key(l)).collect();
            let new_keys: Vec<String> = new.iter().map(|l| whitespace_key(l)).collect();
            diff_slices_deadline(algorithm, &mut capture, &old_keys, &new_keys, deadline)
        } else {
            diff_slices_deadline(algorithm, &mut capture, old, new, deadline)
        };
        outcome.map_err(|e| DiffError::Failed(e.to_string()))?;
        let ops = capture.into_ops();

        let blocks = blocks_from_ops(&ops);
        trace!(
            ops = ops.len(),
            blocks = blocks.len(),
            algorithm = %options.algorithm,
            "computed line diff"
        );
        Ok(blocks)
    }
}

/// Fold runs of adjacent non-equal ops into single blocks, so a diff never
/// reports two blocks starting at the same old index.
fn blocks_from_ops(ops: &[DiffOp]) -> Vec<EditBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<EditBlock> = None;

    for op in ops {
        let (tag, old, new) = op.as_tag_tuple();
        if tag == DiffTag::Equal {
            if let Some(block) = open.take() {
                blocks.push(block);
            }
            continue;
        }
        match open.as_mut() {
            Some(block) => {
                block.delete_count += old.len();
                block.insert_count += new.len();
            }
            None => {
                open = Some(EditBlock {
                    delete_start: old.start,
                    delete_count: old.len(),
                    insert_start: new.start,
                    insert_count: new.len(),
                });
            }
        }
    }
    if let Some(block) = open {
        blocks.push(block);
    }

    blocks.retain(EditBlock::is_effective);
    blocks
}
