//! Merging of adjacent same-type regions.

use crate::models::MergeRegion;

/// Merge each run of adjacent regions sharing a non-conflict type into one
/// region, then renumber from 0.
///
/// Conflicts are never merged, even with an identical neighbour, so each
/// stays individually addressable. Applying this to its own output is a
/// no-op.
pub fn coalesce(regions: Vec<MergeRegion>) -> Vec<MergeRegion> {
    let mut merged: Vec<MergeRegion> = Vec::with_capacity(regions.len());

    for region in regions {
        match merged.last_mut() {
            Some(prev) if prev.region_type == region.region_type && !region.is_conflict() => {
                prev.lines.extend(region.lines);
                prev.base_lines.extend(region.base_lines);
            }
            _ => merged.push(region),
        }
    }

    for (index, region) in merged.iter_mut().enumerate() {
        region.index = index;
    }
    merged
}
