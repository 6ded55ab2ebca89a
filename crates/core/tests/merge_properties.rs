//! Property-based tests for the merge engine.
//!
//! Documents are drawn from a tiny line alphabet (including empty and
//! whitespace-only lines) so that the generated versions share many lines
//! and the diffs produce every kind of edit.

use proptest::prelude::*;
use trimerge_core::merge::coalesce::coalesce;
use trimerge_core::text::split_lines;
use trimerge_core::{
    merge_texts, DiffAlgorithm, FileMergeResult, MergeOptions, Merger, RegionType, Side,
};

/// Strategy to generate a document of up to ten short lines.
fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[ab ]{0,2}", 0..10).prop_map(|lines| lines.join("\n"))
}

/// A base document plus two derived versions.
fn versions_strategy() -> impl Strategy<Value = (String, String, String)> {
    (document_strategy(), document_strategy(), document_strategy())
}

fn algorithm_strategy() -> impl Strategy<Value = DiffAlgorithm> {
    prop_oneof![
        Just(DiffAlgorithm::Myers),
        Just(DiffAlgorithm::Patience),
        Just(DiffAlgorithm::Lcs),
    ]
}

fn merge_with(algorithm: DiffAlgorithm, base: &str, ours: &str, theirs: &str) -> FileMergeResult {
    let mut options = MergeOptions::default();
    options.diff.algorithm = algorithm;
    Merger::new(options).merge(base, ours, theirs).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2048))]

    /// Property: every input version can be rebuilt from the regions.
    #[test]
    fn each_side_is_reconstructed(
        (base, ours, theirs) in versions_strategy(),
        algorithm in algorithm_strategy(),
    ) {
        let result = merge_with(algorithm, &base, &ours, &theirs);
        prop_assert_eq!(result.side_lines(Side::Base), split_lines(&base));
        prop_assert_eq!(result.side_lines(Side::Ours), split_lines(&ours));
        prop_assert_eq!(result.side_lines(Side::Theirs), split_lines(&theirs));
    }

    /// Property: each region's type matches what the two sides hold there.
    #[test]
    fn region_types_match_content(
        (base, ours, theirs) in versions_strategy(),
        algorithm in algorithm_strategy(),
    ) {
        let result = merge_with(algorithm, &base, &ours, &theirs);
        for region in &result.regions {
            let here = (
                region.side_lines(Side::Base),
                region.side_lines(Side::Ours),
                region.side_lines(Side::Theirs),
            );
            match region.region_type {
                RegionType::Unchanged => prop_assert_eq!(here.1, here.2),
                RegionType::OursOnly => {
                    prop_assert_eq!(here.2, here.0);
                    prop_assert_ne!(here.1, here.2);
                }
                RegionType::TheirsOnly => {
                    prop_assert_eq!(here.1, here.0);
                    prop_assert_ne!(here.1, here.2);
                }
                RegionType::Conflict => {
                    prop_assert_ne!(here.1, here.2);
                    prop_assert!(region.lines.is_empty());
                }
            }
        }
    }

    /// Property: the region list is already coalesced and densely numbered.
    #[test]
    fn coalescing_is_idempotent((base, ours, theirs) in versions_strategy()) {
        let result = merge_texts(&base, &ours, &theirs, false).unwrap();
        prop_assert_eq!(coalesce(result.regions.clone()), result.regions.clone());
        for (position, region) in result.regions.iter().enumerate() {
            prop_assert_eq!(region.index, position);
        }
    }

    /// Property: merging a document with itself changes nothing.
    #[test]
    fn identity_merge(text in document_strategy()) {
        let result = merge_texts(&text, &text, &text, false).unwrap();
        prop_assert_eq!(result.regions.len(), 1);
        prop_assert_eq!(result.regions[0].region_type, RegionType::Unchanged);
        prop_assert_eq!(result.regions[0].content(), text);
    }

    /// Property: the same inputs always give the same regions.
    #[test]
    fn merge_is_deterministic((base, ours, theirs) in versions_strategy()) {
        let first = merge_texts(&base, &ours, &theirs, false).unwrap();
        let second = merge_texts(&base, &ours, &theirs, false).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: if only one side changed, the merge is clean and equals it.
    #[test]
    fn one_sided_change_never_conflicts(
        base in document_strategy(),
        ours in document_strategy(),
        algorithm in algorithm_strategy(),
    ) {
        let result = merge_with(algorithm, &base, &ours, &base);
        prop_assert!(!result.has_conflicts());
        prop_assert_eq!(result.merged_lines(Side::Theirs), split_lines(&ours));

        let mirrored = merge_with(algorithm, &base, &base, &ours);
        prop_assert!(!mirrored.has_conflicts());
        prop_assert_eq!(mirrored.merged_lines(Side::Ours), split_lines(&ours));
    }
}
