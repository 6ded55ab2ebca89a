//! Domain model types produced by the merge engine.
//!
//! A [`FileMergeResult`] is the immutable output of one merge: the ordered
//! [`MergeRegion`]s of a single file. UI consumers render the regions and
//! resolvers pick a side for each conflict.

use serde::{Deserialize, Serialize};

use crate::text::join_lines;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// One of the three versions taking part in a merge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Base,
    Ours,
    Theirs,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Ours => write!(f, "ours"),
            Self::Theirs => write!(f, "theirs"),
        }
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// Classification of a merge region.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RegionType {
    /// Both sides agree (untouched, or both made the identical edit).
    Unchanged,
    /// Only ours changed this span.
    OursOnly,
    /// Only theirs changed this span.
    TheirsOnly,
    /// Both sides changed this span differently.
    Conflict,
}

impl std::fmt::Display for RegionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unchanged => write!(f, "unchanged"),
            Self::OursOnly => write!(f, "ours_only"),
            Self::TheirsOnly => write!(f, "theirs_only"),
            Self::Conflict => write!(f, "conflict"),
        }
    }
}

/// One classified, contiguous span of the merged document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeRegion {
    /// Position in the final region list.
    pub index: usize,
    pub region_type: RegionType,
    /// Reconciled content lines. Empty for conflicts.
    pub lines: Vec<String>,
    /// Our competing lines. Only populated for conflicts.
    pub ours_lines: Vec<String>,
    /// Their competing lines. Only populated for conflicts.
    pub theirs_lines: Vec<String>,
    /// The ancestor lines this region replaces (empty for pure insertions).
    pub base_lines: Vec<String>,
    /// 1-based line in the base where the region begins.
    pub base_start_line: usize,
    /// 1-based line in ours where the region begins.
    pub ours_start_line: usize,
    /// 1-based line in theirs where the region begins.
    pub theirs_start_line: usize,
}

impl MergeRegion {
    fn with_type(region_type: RegionType, base_lines: Vec<String>) -> Self {
        Self {
            index: 0,
            region_type,
            lines: Vec::new(),
            ours_lines: Vec::new(),
            theirs_lines: Vec::new(),
            base_lines,
            base_start_line: 1,
            ours_start_line: 1,
            theirs_start_line: 1,
        }
    }

    /// A span both sides agree on.
    pub fn unchanged(lines: Vec<String>, base_lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Self::with_type(RegionType::Unchanged, base_lines)
        }
    }

    /// A span only ours edited.
    pub fn ours_only(lines: Vec<String>, base_lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Self::with_type(RegionType::OursOnly, base_lines)
        }
    }

    /// A span only theirs edited.
    pub fn theirs_only(lines: Vec<String>, base_lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Self::with_type(RegionType::TheirsOnly, base_lines)
        }
    }

    /// A span both sides edited differently.
    pub fn conflict(
        ours_lines: Vec<String>,
        theirs_lines: Vec<String>,
        base_lines: Vec<String>,
    ) -> Self {
        Self {
            ours_lines,
            theirs_lines,
            ..Self::with_type(RegionType::Conflict, base_lines)
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.region_type == RegionType::Conflict
    }

    /// The reconciled text, newline-joined. Empty for conflicts.
    pub fn content(&self) -> String {
        join_lines(&self.lines)
    }

    /// The lines this region occupies in the given version.
    pub fn side_lines(&self, side: Side) -> &[String] {
        match (side, self.region_type) {
            (Side::Base, _) => &self.base_lines,
            (_, RegionType::Unchanged) => &self.lines,
            (Side::Ours, RegionType::OursOnly) => &self.lines,
            (Side::Ours, RegionType::TheirsOnly) => &self.base_lines,
            (Side::Theirs, RegionType::OursOnly) => &self.base_lines,
            (Side::Theirs, RegionType::TheirsOnly) => &self.lines,
            (Side::Ours, RegionType::Conflict) => &self.ours_lines,
            (Side::Theirs, RegionType::Conflict) => &self.theirs_lines,
        }
    }

    /// The lines this region contributes to the merged document, picking
    /// `prefer` if it is a conflict.
    pub fn resolved_lines(&self, prefer: Side) -> &[String] {
        if self.is_conflict() {
            self.side_lines(prefer)
        } else {
            &self.lines
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Per-type region counts for a merge result.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeSummary {
    pub unchanged: usize,
    pub ours_only: usize,
    pub theirs_only: usize,
    pub conflicts: usize,
}

/// The regions of one merged file, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileMergeResult {
    /// Display metadata only.
    pub file_path: Option<String>,
    pub regions: Vec<MergeRegion>,
}

impl FileMergeResult {
    pub fn has_conflicts(&self) -> bool {
        self.regions.iter().any(MergeRegion::is_conflict)
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts().count()
    }

    /// Iterate over the conflict regions only.
    pub fn conflicts(&self) -> impl Iterator<Item = &MergeRegion> {
        self.regions.iter().filter(|r| r.is_conflict())
    }

    pub fn summary(&self) -> MergeSummary {
        let mut summary = MergeSummary::default();
        for region in &self.regions {
            match region.region_type {
                RegionType::Unchanged => summary.unchanged += 1,
                RegionType::OursOnly => summary.ours_only += 1,
                RegionType::TheirsOnly => summary.theirs_only += 1,
                RegionType::Conflict => summary.conflicts += 1,
            }
        }
        summary
    }

    /// Rebuild one input version from the regions.
    pub fn side_lines(&self, side: Side) -> Vec<String> {
        self.regions
            .iter()
            .flat_map(|r| r.side_lines(side).iter().cloned())
            .collect()
    }

    /// The merged document with every conflict resolved to `prefer`.
    pub fn merged_lines(&self, prefer: Side) -> Vec<String> {
        self.regions
            .iter()
            .flat_map(|r| r.resolved_lines(prefer).iter().cloned())
            .collect()
    }

    /// [`merged_lines`](Self::merged_lines), newline-joined.
    pub fn merged_content(&self, prefer: Side) -> String {
        join_lines(&self.merged_lines(prefer))
    }
}
