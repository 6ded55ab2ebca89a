//! Region walker: the three-cursor pass that classifies merge regions.
//!
//! The walk is a small state machine:
//!
//! - `Scanning` looks at the current base line. A maximal run of lines
//!   neither side touched becomes one `Unchanged` region; a line where
//!   either side has an edit block moves to `Emitting`.
//! - `Emitting` owns a [`ChangeSpan`] (every block of either side that
//!   overlaps the change), computes each side's content over the span and
//!   classifies it.
//! - `Trailing` handles lines both sides appended after the end of base.
//!
//! Each side also carries a floor: block-map entries below it are already
//! consumed. A pure insertion does not move the base cursor, so without the
//! floor the same insertion would be found again.

use tracing::trace;

use crate::diff::EditBlock;
use crate::merge::block_map::BlockMap;
use crate::models::MergeRegion;
use crate::text::whitespace_key;

/// The three split inputs of a merge.
#[derive(Debug, Clone, Copy)]
pub struct Versions<'a> {
    pub base: &'a [String],
    pub ours: &'a [String],
    pub theirs: &'a [String],
}

/// Blocks of both sides that together make up one change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSpan {
    /// First base line of the span.
    pub start: usize,
    /// End (exclusive) of the span in base.
    pub end: usize,
    pub ours: Vec<EditBlock>,
    pub theirs: Vec<EditBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkState {
    Scanning,
    Emitting(ChangeSpan),
    Trailing,
    Done,
}

/// One side's lines, block map and position.
#[derive(Debug)]
struct SideTrack<'a> {
    lines: &'a [String],
    blocks: &'a BlockMap,
    cursor: usize,
    floor: usize,
}

impl<'a> SideTrack<'a> {
    fn new(lines: &'a [String], blocks: &'a BlockMap) -> Self {
        Self {
            lines,
            blocks,
            cursor: 0,
            floor: 0,
        }
    }

    /// Unconsumed block starting at base index `index`.
    fn pending(&self, index: usize) -> Option<EditBlock> {
        if index < self.floor {
            return None;
        }
        self.blocks.get(index).copied()
    }

    fn next_pending(&self, from: usize, limit: usize) -> usize {
        self.blocks.next_start_at_or_after(from, limit, self.floor)
    }

    /// This side's content over base `start..end`, given the blocks of this
    /// side inside the span. Returns the content and the cursor after it.
    fn content_over(
        &self,
        start: usize,
        end: usize,
        blocks: &[EditBlock],
    ) -> (Vec<String>, usize) {
        let mut content = Vec::new();
        let mut base_pos = start;
        let mut cursor = self.cursor;

        for block in blocks {
            let kept = block.delete_start.saturating_sub(base_pos);
            content.extend_from_slice(bounded(self.lines, cursor, kept));
            cursor = (cursor + kept).min(self.lines.len());

            content.extend_from_slice(bounded(self.lines, cursor, block.insert_count));
            cursor = (cursor + block.insert_count).min(self.lines.len());
            base_pos = base_pos.max(block.delete_end());
        }

        let kept = end.saturating_sub(base_pos);
        content.extend_from_slice(bounded(self.lines, cursor, kept));
        cursor = (cursor + kept).min(self.lines.len());

        (content, cursor)
    }

    fn advance(&mut self, count: usize) {
        self.cursor = (self.cursor + count).min(self.lines.len());
    }

    fn rest(&self) -> &'a [String] {
        bounded(self.lines, self.cursor, usize::MAX)
    }
}

/// `lines[from..from + count]`, clamped to the slice.
fn bounded(lines: &[String], from: usize, count: usize) -> &[String] {
    let start = from.min(lines.len());
    let end = from.saturating_add(count).min(lines.len());
    &lines[start..end]
}

/// Walks base, ours and theirs in lockstep, yielding uncoalesced regions in
/// document order.
#[derive(Debug)]
pub struct RegionWalker<'a> {
    base: &'a [String],
    base_cursor: usize,
    ours: SideTrack<'a>,
    theirs: SideTrack<'a>,
    ignore_whitespace: bool,
    state: WalkState,
}

impl<'a> RegionWalker<'a> {
    pub fn new(
        versions: Versions<'a>,
        ours_blocks: &'a BlockMap,
        theirs_blocks: &'a BlockMap,
        ignore_whitespace: bool,
    ) -> Self {
        Self {
            base: versions.base,
            base_cursor: 0,
            ours: SideTrack::new(versions.ours, ours_blocks),
            theirs: SideTrack::new(versions.theirs, theirs_blocks),
            ignore_whitespace,
            state: WalkState::Scanning,
        }
    }

    pub fn state(&self) -> &WalkState {
        &self.state
    }

    /// Current `(base, ours, theirs)` cursor positions.
    pub fn cursors(&self) -> (usize, usize, usize) {
        (self.base_cursor, self.ours.cursor, self.theirs.cursor)
    }

    /// Run one transition, returning the region it emitted, if any.
    pub fn step(&mut self) -> Option<MergeRegion> {
        match std::mem::replace(&mut self.state, WalkState::Done) {
            WalkState::Scanning => self.scan(),
            WalkState::Emitting(span) => Some(self.emit(span)),
            WalkState::Trailing => self.trail(),
            WalkState::Done => None,
        }
    }

    fn scan(&mut self) -> Option<MergeRegion> {
        let start = self.base_cursor;
        if start >= self.base.len() {
            trace!(base = start, "scanning -> trailing");
            self.state = WalkState::Trailing;
            return None;
        }

        if self.ours.pending(start).is_some() || self.theirs.pending(start).is_some() {
            let span = self.collect_span(start);
            trace!(start = span.start, end = span.end, "scanning -> emitting");
            self.state = WalkState::Emitting(span);
            return None;
        }

        let limit = self.base.len();
        let end = self
            .ours
            .next_pending(start, limit)
            .min(self.theirs.next_pending(start, limit));
        let run = end - start;

        let base_lines = bounded(self.base, start, run).to_vec();
        let lines = bounded(self.ours.lines, self.ours.cursor, run).to_vec();
        self.base_cursor = end;
        self.ours.advance(run);
        self.theirs.advance(run);
        self.state = WalkState::Scanning;

        trace!(start, run, "unchanged run");
        Some(MergeRegion::unchanged(lines, base_lines))
    }

    /// Gather every pending block of either side starting at `start`, then
    /// every block starting strictly inside the growing span.
    fn collect_span(&self, start: usize) -> ChangeSpan {
        let mut end = start;
        let mut ours = Vec::new();
        let mut theirs = Vec::new();

        let mut index = start;
        loop {
            if let Some(block) = self.ours.pending(index) {
                end = end.max(block.delete_end());
                ours.push(block);
            }
            if let Some(block) = self.theirs.pending(index) {
                end = end.max(block.delete_end());
                theirs.push(block);
            }
            index += 1;
            if index >= end.min(self.base.len()) {
                break;
            }
        }

        ChangeSpan {
            start,
            end: end.min(self.base.len()),
            ours,
            theirs,
        }
    }

    fn emit(&mut self, span: ChangeSpan) -> MergeRegion {
        let (ours_content, ours_cursor) =
            self.ours.content_over(span.start, span.end, &span.ours);
        let (theirs_content, theirs_cursor) =
            self.theirs.content_over(span.start, span.end, &span.theirs);
        let base_lines = bounded(self.base, span.start, span.end - span.start).to_vec();

        let ours_edited = span.ours.iter().any(EditBlock::is_effective);
        let theirs_edited = span.theirs.iter().any(EditBlock::is_effective);

        let region = if self.same_lines(&ours_content, &theirs_content) {
            MergeRegion::unchanged(ours_content, base_lines)
        } else if !ours_edited {
            MergeRegion::theirs_only(theirs_content, base_lines)
        } else if !theirs_edited {
            MergeRegion::ours_only(ours_content, base_lines)
        } else {
            MergeRegion::conflict(ours_content, theirs_content, base_lines)
        };

        trace!(
            start = span.start,
            end = span.end,
            region_type = %region.region_type,
            "classified change"
        );

        self.base_cursor = span.end;
        self.ours.cursor = ours_cursor;
        self.theirs.cursor = theirs_cursor;
        if let Some(last) = span.ours.last() {
            self.ours.floor = self.ours.floor.max(last.delete_start + 1);
        }
        if let Some(last) = span.theirs.last() {
            self.theirs.floor = self.theirs.floor.max(last.delete_start + 1);
        }
        self.state = WalkState::Scanning;

        region
    }

    fn trail(&mut self) -> Option<MergeRegion> {
        let ours_rest = self.ours.rest();
        let theirs_rest = self.theirs.rest();
        self.ours.cursor = self.ours.lines.len();
        self.theirs.cursor = self.theirs.lines.len();
        self.state = WalkState::Done;

        trace!(
            ours = ours_rest.len(),
            theirs = theirs_rest.len(),
            "trailing -> done"
        );

        match (ours_rest.is_empty(), theirs_rest.is_empty()) {
            (true, true) => None,
            (false, true) => Some(MergeRegion::ours_only(ours_rest.to_vec(), Vec::new())),
            (true, false) => Some(MergeRegion::theirs_only(theirs_rest.to_vec(), Vec::new())),
            (false, false) if self.same_lines(ours_rest, theirs_rest) => {
                Some(MergeRegion::unchanged(ours_rest.to_vec(), Vec::new()))
            }
            (false, false) => Some(MergeRegion::conflict(
                ours_rest.to_vec(),
                theirs_rest.to_vec(),
                Vec::new(),
            )),
        }
    }

    fn same_lines(&self, a: &[String], b: &[String]) -> bool {
        if !self.ignore_whitespace {
            return a == b;
        }
        a.len() == b.len()
            && a
                .iter()
                .zip(b)
                .all(|(x, y)| whitespace_key(x) == whitespace_key(y))
    }
}

impl Iterator for RegionWalker<'_> {
    type Item = MergeRegion;

    fn next(&mut self) -> Option<MergeRegion> {
        loop {
            if self.state == WalkState::Done {
                return None;
            }
            if let Some(region) = self.step() {
                return Some(region);
            }
        }
    }
}
