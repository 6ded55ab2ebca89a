//! Conflict resolution actions.
//!
//! The [`ConflictResolver`] records a [`Resolution`] per conflict region of a
//! [`FileMergeResult`]: keep ours, keep theirs, keep both, or use manually
//! edited text. Once every conflict is resolved it produces the merged
//! document.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::MarkerConfig;
use crate::conflict::markers::push_conflict;
use crate::errors::ResolveError;
use crate::models::{FileMergeResult, MergeRegion, Side};
use crate::text::{join_lines, split_lines};

/// Named resolution strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Keep our lines.
    AcceptOurs,
    /// Keep their lines.
    AcceptTheirs,
    /// Keep our lines followed by theirs.
    AcceptBoth,
    /// Replace the conflict with manually edited text.
    AcceptMerged(String),
}

impl Resolution {
    /// The lines this resolution puts in place of `region`.
    pub fn resolved_lines(&self, region: &MergeRegion) -> Vec<String> {
        match self {
            Self::AcceptOurs => region.side_lines(Side::Ours).to_vec(),
            Self::AcceptTheirs => region.side_lines(Side::Theirs).to_vec(),
            Self::AcceptBoth => {
                let mut lines = region.side_lines(Side::Ours).to_vec();
                lines.extend_from_slice(region.side_lines(Side::Theirs));
                lines
            }
            Self::AcceptMerged(content) => split_lines(content),
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AcceptOurs => write!(f, "accept_ours"),
            Self::AcceptTheirs => write!(f, "accept_theirs"),
            Self::AcceptBoth => write!(f, "accept_both"),
            Self::AcceptMerged(_) => write!(f, "accept_merged"),
        }
    }
}

/// Per-conflict resolutions over a borrowed merge result.
#[derive(Debug)]
pub struct ConflictResolver<'a> {
    result: &'a FileMergeResult,
    resolutions: BTreeMap<usize, Resolution>,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(result: &'a FileMergeResult) -> Self {
        Self {
            result,
            resolutions: BTreeMap::new(),
        }
    }

    /// Resolve the conflict region at `index`, replacing any earlier
    /// resolution.
    pub fn resolve(&mut self, index: usize, resolution: Resolution) -> Result<(), ResolveError> {
        let region = self.conflict_at(index)?;
        info!(
            index,
            base_start_line = region.base_start_line,
            resolution = %resolution,
            "resolving conflict"
        );
        self.resolutions.insert(index, resolution);
        Ok(())
    }

    /// Resolve every conflict the same way.
    pub fn resolve_all(&mut self, resolution: Resolution) {
        info!(resolution = %resolution, "resolving all conflicts");
        for region in self.result.conflicts() {
            self.resolutions.insert(region.index, resolution.clone());
        }
    }

    /// Drop the resolution of the conflict at `index`, if any.
    pub fn clear(&mut self, index: usize) -> Result<(), ResolveError> {
        self.conflict_at(index)?;
        if self.resolutions.remove(&index).is_some() {
            debug!(index, "conflict resolution cleared");
        }
        Ok(())
    }

    pub fn resolution(&self, index: usize) -> Option<&Resolution> {
        self.resolutions.get(&index)
    }

    /// Indices of conflicts without a resolution, in document order.
    pub fn unresolved(&self) -> Vec<usize> {
        self.result
            .conflicts()
            .map(|r| r.index)
            .filter(|index| !self.resolutions.contains_key(index))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved().is_empty()
    }

    /// The merged document lines. Fails while any conflict is unresolved.
    pub fn merged_lines(&self) -> Result<Vec<String>, ResolveError> {
        let open = self.unresolved().len();
        if open > 0 {
            return Err(ResolveError::Unresolved(open));
        }

        let mut lines = Vec::new();
        for region in &self.result.regions {
            match self.resolutions.get(&region.index) {
                Some(resolution) => lines.extend(resolution.resolved_lines(region)),
                None => lines.extend(region.lines.iter().cloned()),
            }
        }
        Ok(lines)
    }

    /// [`merged_lines`](Self::merged_lines), newline-joined.
    pub fn merged_content(&self) -> Result<String, ResolveError> {
        Ok(join_lines(&self.merged_lines()?))
    }

    /// The document so far: resolved conflicts replaced, open ones written
    /// out between conflict markers.
    pub fn render_with_markers(&self, config: &MarkerConfig) -> String {
        let mut lines = Vec::new();
        for region in &self.result.regions {
            match self.resolutions.get(&region.index) {
                Some(resolution) => lines.extend(resolution.resolved_lines(region)),
                None if region.is_conflict() => push_conflict(region, config, &mut lines),
                None => lines.extend(region.lines.iter().cloned()),
            }
        }
        join_lines(&lines)
    }

    fn conflict_at(&self, index: usize) -> Result<&'a MergeRegion, ResolveError> {
        let region = self
            .result
            .regions
            .get(index)
            .ok_or(ResolveError::RegionNotFound(index))?;
        if !region.is_conflict() {
            return Err(ResolveError::NotAConflict(index));
        }
        Ok(region)
    }
}
