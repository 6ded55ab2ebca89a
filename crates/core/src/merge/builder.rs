//! Owned accumulator for walker output.

use crate::merge::annotate::annotate_line_numbers;
use crate::merge::coalesce::coalesce;
use crate::models::{FileMergeResult, MergeRegion};

/// Collects regions in document order; [`finish`](Self::finish) consumes it
/// into the immutable [`FileMergeResult`].
#[derive(Debug, Default)]
pub struct RegionListBuilder {
    regions: Vec<MergeRegion>,
}

impl RegionListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, region: MergeRegion) {
        self.regions.push(region);
    }

    /// Coalesce, number and annotate the regions.
    ///
    /// A merge of three empty texts still yields one empty `Unchanged`
    /// region.
    pub fn finish(self, file_path: Option<String>) -> FileMergeResult {
        let mut regions = coalesce(self.regions);
        if regions.is_empty() {
            regions.push(MergeRegion::unchanged(Vec::new(), Vec::new()));
        }
        annotate_line_numbers(&mut regions);
        FileMergeResult { file_path, regions }
    }
}
