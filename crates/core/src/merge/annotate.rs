//! Start-line annotation for display and navigation.

use crate::models::{MergeRegion, Side};

/// Record, for every region, the 1-based line where it begins in base, ours
/// and theirs.
pub fn annotate_line_numbers(regions: &mut [MergeRegion]) {
    let mut base = 1;
    let mut ours = 1;
    let mut theirs = 1;

    for region in regions.iter_mut() {
        region.base_start_line = base;
        region.ours_start_line = ours;
        region.theirs_start_line = theirs;

        base += region.side_lines(Side::Base).len();
        ours += region.side_lines(Side::Ours).len();
        theirs += region.side_lines(Side::Theirs).len();
    }
}
