//! Three-way merge engine.
//!
//! Splits base, ours and theirs into lines, diffs base against each side,
//! indexes both diffs by base line, then walks the three versions in
//! lockstep to produce classified [`MergeRegion`](crate::models::MergeRegion)s:
//!
//! 1. **Split** -- [`split_lines`] with line-ending normalization.
//! 2. **Diff** -- two calls into a [`LineDiffer`].
//! 3. **Index** -- one [`BlockMap`] per side.
//! 4. **Walk** -- [`RegionWalker`] emits uncoalesced regions.
//! 5. **Finish** -- [`RegionListBuilder`] coalesces, numbers and annotates.

pub mod annotate;
pub mod block_map;
pub mod builder;
pub mod coalesce;
pub mod walker;

pub use block_map::BlockMap;
pub use builder::RegionListBuilder;
pub use walker::{RegionWalker, Versions, WalkState};

use tracing::{debug, info};

use crate::diff::{DiffOptions, LineDiffer, SimilarDiffer};
use crate::errors::MergeError;
use crate::models::{FileMergeResult, Side};
use crate::text::split_lines;

/// Options for one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Forwarded to the differ; `ignore_whitespace` also governs whether two
    /// sides' edits count as identical.
    pub diff: DiffOptions,
}

impl MergeOptions {
    pub fn ignoring_whitespace(ignore_whitespace: bool) -> Self {
        Self {
            diff: DiffOptions {
                ignore_whitespace,
                ..DiffOptions::default()
            },
        }
    }
}

/// Three-way merge engine over a pluggable line differ.
///
/// Holds no per-merge state; one instance can serve any number of merges,
/// concurrently if the differ allows it.
#[derive(Debug, Clone, Default)]
pub struct Merger<D = SimilarDiffer> {
    differ: D,
    options: MergeOptions,
}

impl Merger<SimilarDiffer> {
    /// An engine using the built-in `similar` differ.
    pub fn new(options: MergeOptions) -> Self {
        Self::with_differ(SimilarDiffer, options)
    }
}

impl<D: LineDiffer> Merger<D> {
    pub fn with_differ(differ: D, options: MergeOptions) -> Self {
        Self { differ, options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge three versions of an unnamed file.
    pub fn merge(
        &self,
        base: &str,
        ours: &str,
        theirs: &str,
    ) -> Result<FileMergeResult, MergeError> {
        self.run(None, base, ours, theirs)
    }

    /// Merge three versions of `file_path`. The path is only carried into
    /// the result for display.
    pub fn merge_file(
        &self,
        file_path: &str,
        base: &str,
        ours: &str,
        theirs: &str,
    ) -> Result<FileMergeResult, MergeError> {
        self.run(Some(file_path.to_string()), base, ours, theirs)
    }

    /// Quick check: would merging these versions leave no conflicts?
    pub fn can_auto_merge(
        &self,
        base: &str,
        ours: &str,
        theirs: &str,
    ) -> Result<bool, MergeError> {
        Ok(!self.merge(base, ours, theirs)?.has_conflicts())
    }

    fn run(
        &self,
        file_path: Option<String>,
        base: &str,
        ours: &str,
        theirs: &str,
    ) -> Result<FileMergeResult, MergeError> {
        let diff_options = &self.options.diff;
        info!(
            file = file_path.as_deref().unwrap_or("<unnamed>"),
            ignore_whitespace = diff_options.ignore_whitespace,
            algorithm = %diff_options.algorithm,
            "performing three-way merge"
        );

        let base_lines = split_lines(base);
        let ours_lines = split_lines(ours);
        let theirs_lines = split_lines(theirs);

        let ours_blocks = self
            .differ
            .diff(&base_lines, &ours_lines, diff_options)
            .map_err(|source| MergeError::Diff {
                side: Side::Ours,
                source,
            })?;
        let theirs_blocks = self
            .differ
            .diff(&base_lines, &theirs_lines, diff_options)
            .map_err(|source| MergeError::Diff {
                side: Side::Theirs,
                source,
            })?;
        let ours_map = BlockMap::from_blocks(&ours_blocks);
        let theirs_map = BlockMap::from_blocks(&theirs_blocks);
        debug!(
            base_lines = base_lines.len(),
            ours_blocks = ours_map.len(),
            theirs_blocks = theirs_map.len(),
            one_sided = ours_map.is_empty() || theirs_map.is_empty(),
            "diffs computed"
        );
        let versions = Versions {
            base: &base_lines,
            ours: &ours_lines,
            theirs: &theirs_lines,
        };

        let mut builder = RegionListBuilder::new();
        let walker = RegionWalker::new(
            versions,
            &ours_map,
            &theirs_map,
            diff_options.ignore_whitespace,
        );
        let mut raw_regions = 0;
        for region in walker {
            debug!(
                region_type = %region.region_type,
                base_lines = region.base_lines.len(),
                "classified region"
            );
            raw_regions += 1;
            builder.push(region);
        }
        let result = builder.finish(file_path);

        let summary = result.summary();
        debug!(
            raw_regions,
            regions = result.regions.len(),
            unchanged = summary.unchanged,
            ours_only = summary.ours_only,
            theirs_only = summary.theirs_only,
            conflicts = summary.conflicts,
            "merge complete"
        );
        Ok(result)
    }
}

/// Merge three texts with the built-in differ.
pub fn merge_texts(
    base: &str,
    ours: &str,
    theirs: &str,
    ignore_whitespace: bool,
) -> Result<FileMergeResult, MergeError> {
    Merger::new(MergeOptions::ignoring_whitespace(ignore_whitespace)).merge(base, ours, theirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::EditBlock;
    use crate::errors::DiffError;
    use crate::models::RegionType;

    fn merge(base: &str, ours: &str, theirs: &str) -> FileMergeResult {
        merge_texts(base, ours, theirs, false).unwrap()
    }

    fn shape(result: &FileMergeResult) -> Vec<(RegionType, String)> {
        result
            .regions
            .iter()
            .map(|r| (r.region_type, r.content()))
            .collect()
    }

    #[test]
    fn test_identical_files() {
        let result = merge("line1\nline2\n", "line1\nline2\n", "line1\nline2\n");
        assert_eq!(result.regions.len(), 1);
        assert_eq!(result.regions[0].region_type, RegionType::Unchanged);
        assert_eq!(result.regions[0].content(), "line1\nline2\n");
        assert!(!result.has_conflicts());
    }

    #[test]
    fn test_only_ours_changed() {
        let result = merge("A\nB\nC", "A\nX\nC", "A\nB\nC");
        assert_eq!(
            shape(&result),
            vec![
                (RegionType::Unchanged, "A".to_string()),
                (RegionType::OursOnly, "X".to_string()),
                (RegionType::Unchanged, "C".to_string()),
            ]
        );
    }

    #[test]
    fn test_only_theirs_changed() {
        let result = merge("A\nB\nC", "A\nB\nC", "A\nX\nC");
        assert_eq!(
            shape(&result),
            vec![
                (RegionType::Unchanged, "A".to_string()),
                (RegionType::TheirsOnly, "X".to_string()),
                (RegionType::Unchanged, "C".to_string()),
            ]
        );
    }

    #[test]
    fn test_same_change_both_sides() {
        let result = merge("A\nB\nC", "A\nX\nC", "A\nX\nC");
        assert_eq!(result.regions.len(), 1);
        assert_eq!(result.regions[0].region_type, RegionType::Unchanged);
        assert_eq!(result.regions[0].content(), "A\nX\nC");
        assert_eq!(result.regions[0].base_lines, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_conflicting_changes() {
        let result = merge("A\nB\nC", "A\nX\nC", "A\nY\nC");
        assert_eq!(result.conflict_count(), 1);
        let regions = &result.regions;
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].content(), "A");
        assert_eq!(regions[1].region_type, RegionType::Conflict);
        assert_eq!(regions[1].ours_lines, vec!["X"]);
        assert_eq!(regions[1].theirs_lines, vec!["Y"]);
        assert_eq!(regions[2].content(), "C");
        assert_eq!(
            (regions[2].base_start_line, regions[2].ours_start_line),
            (3, 3)
        );
    }

    #[test]
    fn test_trailing_divergent_appends() {
        let result = merge("A", "A\nB", "A\nC");
        assert_eq!(result.regions.len(), 2);
        assert_eq!(result.regions[0].content(), "A");
        assert_eq!(result.regions[1].ours_lines, vec!["B"]);
        assert_eq!(result.regions[1].theirs_lines, vec!["C"]);
    }

    #[test]
    fn test_non_overlapping_changes() {
        let base = "aaa\nbbb\nccc\nddd\neee";
        let result = merge(base, "AAA\nbbb\nccc\nddd\neee", "aaa\nbbb\nccc\nddd\nEEE");
        assert!(!result.has_conflicts());
        assert_eq!(result.merged_content(Side::Ours), "AAA\nbbb\nccc\nddd\nEEE");
    }

    #[test]
    fn test_empty_inputs() {
        let result = merge("", "", "");
        assert_eq!(result.regions.len(), 1);
        assert_eq!(result.regions[0].content(), "");

        let result = merge("", "X\nY", "X\nY");
        assert_eq!(shape(&result), vec![(RegionType::Unchanged, "X\nY".to_string())]);

        let result = merge("", "X", "");
        assert_eq!(shape(&result), vec![(RegionType::OursOnly, "X".to_string())]);
    }

    #[test]
    fn test_line_endings_are_normalized() {
        let result = merge("A\r\nB\r\n", "A\nB\n", "A\rB\r");
        assert_eq!(result.regions.len(), 1);
        assert_eq!(result.regions[0].region_type, RegionType::Unchanged);
    }

    #[test]
    fn test_ignore_whitespace() {
        let base = "fn main() {\n    run();\n}";
        let ours = "fn main() {\n  run();\n}";
        let theirs = "fn main() {\n\trun();\n}";
        assert!(merge(base, ours, theirs).has_conflicts());
        assert!(!merge_texts(base, ours, theirs, true).unwrap().has_conflicts());
    }

    #[test]
    fn test_merge_file_keeps_path() {
        let merger = Merger::new(MergeOptions::default());
        let result = merger.merge_file("src/lib.rs", "a", "a", "b").unwrap();
        assert_eq!(result.file_path.as_deref(), Some("src/lib.rs"));
        assert!(merger.merge("a", "b", "a").unwrap().file_path.is_none());
    }

    #[test]
    fn test_can_auto_merge() {
        let merger = Merger::new(MergeOptions::default());
        assert!(merger.can_auto_merge("a\nb\nc", "A\nb\nc", "a\nb\nC").unwrap());
        assert!(!merger.can_auto_merge("a\nb\nc", "a\nx\nc", "a\ny\nc").unwrap());
    }

    struct FailingDiffer;

    impl LineDiffer for FailingDiffer {
        fn diff(
            &self,
            _old: &[String],
            _new: &[String],
            _options: &DiffOptions,
        ) -> Result<Vec<EditBlock>, DiffError> {
            Err(DiffError::InvalidInput("binary content".into()))
        }
    }

    #[test]
    fn test_differ_failure_propagates() {
        let merger = Merger::with_differ(FailingDiffer, MergeOptions::default());
        let err = merger.merge("a", "b", "c").unwrap_err();
        assert!(matches!(err, MergeError::Diff { side: Side::Ours, .. }));
        assert!(err.to_string().contains("binary content"));
    }

    /// Replays a fixed script, ignoring its inputs.
    struct ScriptedDiffer {
        ours: Vec<EditBlock>,
        theirs: Vec<EditBlock>,
    }

    impl LineDiffer for ScriptedDiffer {
        fn diff(
            &self,
            _old: &[String],
            new: &[String],
            _options: &DiffOptions,
        ) -> Result<Vec<EditBlock>, DiffError> {
            if new.first().map(String::as_str) == Some("ours") {
                Ok(self.ours.clone())
            } else {
                Ok(self.theirs.clone())
            }
        }
    }

    #[test]
    fn test_custom_differ_is_used() {
        let differ = ScriptedDiffer {
            ours: vec![EditBlock {
                delete_start: 0,
                delete_count: 1,
                insert_start: 0,
                insert_count: 1,
            }],
            theirs: Vec::new(),
        };
        let merger = Merger::with_differ(differ, MergeOptions::default());
        let result = merger.merge("base", "ours", "base").unwrap();
        assert_eq!(result.regions.len(), 1);
        assert_eq!(result.regions[0].region_type, RegionType::OursOnly);
        assert_eq!(result.regions[0].content(), "ours");
    }

    /// Hands out fixed blocks per side, told apart by the new text.
    struct FixedBlocks {
        ours: Vec<String>,
        ours_blocks: Vec<EditBlock>,
        theirs_blocks: Vec<EditBlock>,
    }

    impl LineDiffer for FixedBlocks {
        fn diff(
            &self,
            _old: &[String],
            new: &[String],
            _options: &DiffOptions,
        ) -> Result<Vec<EditBlock>, DiffError> {
            if new == self.ours.as_slice() {
                Ok(self.ours_blocks.clone())
            } else {
                Ok(self.theirs_blocks.clone())
            }
        }
    }

    #[test]
    fn test_overlapping_blocks_still_rebuild_every_side() {
        let base = "a\nb\nc\nd\ne\nf\ng";
        let ours = "A\nb\nc\nd\ne\nf\ng";
        let theirs = "a\nb\nX\nY\nZ\ng";
        let differ = FixedBlocks {
            ours: split_lines(ours),
            ours_blocks: vec![EditBlock {
                delete_start: 0,
                delete_count: 1,
                insert_start: 0,
                insert_count: 1,
            }],
            // out of order, overlapping, with stale insert offsets
            theirs_blocks: vec![
                EditBlock {
                    delete_start: 3,
                    delete_count: 0,
                    insert_start: 6,
                    insert_count: 3,
                },
                EditBlock {
                    delete_start: 2,
                    delete_count: 4,
                    insert_start: 6,
                    insert_count: 0,
                },
            ],
        };
        let merger = Merger::with_differ(differ, MergeOptions::default());
        let result = merger.merge(base, ours, theirs).unwrap();

        assert_eq!(
            shape(&result),
            vec![
                (RegionType::OursOnly, "A".to_string()),
                (RegionType::Unchanged, "b".to_string()),
                (RegionType::TheirsOnly, "X\nY\nZ".to_string()),
                (RegionType::Unchanged, "g".to_string()),
            ]
        );
        assert_eq!(result.side_lines(Side::Base), split_lines(base));
        assert_eq!(result.side_lines(Side::Ours), split_lines(ours));
        assert_eq!(result.side_lines(Side::Theirs), split_lines(theirs));
        assert_eq!(result.merged_content(Side::Ours), "A\nb\nX\nY\nZ\ng");
    }
}
