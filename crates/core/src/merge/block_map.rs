//! Base-index lookup over one comparison's edit blocks.

use std::collections::HashMap;

use tracing::warn;

use crate::diff::EditBlock;

/// Edit blocks of one comparison (base→ours or base→theirs), keyed by the
/// base line index where each block starts.
#[derive(Debug, Clone, Default)]
pub struct BlockMap {
    blocks: HashMap<usize, EditBlock>,
}

impl BlockMap {
    /// Normalize the blocks and index them by `delete_start`.
    ///
    /// Ineffective blocks are dropped. Blocks are sorted by base index, and a
    /// block starting inside (or at the start of) the previous block's
    /// deleted range is folded into it. Insert offsets are then recomputed
    /// from the running line delta, so every block agrees with a cursor
    /// walking the new side.
    pub fn from_blocks(blocks: &[EditBlock]) -> Self {
        let mut sorted: Vec<EditBlock> = blocks
            .iter()
            .copied()
            .filter(EditBlock::is_effective)
            .collect();
        sorted.sort_by_key(|b| b.delete_start);

        let mut normalized: Vec<EditBlock> = Vec::with_capacity(sorted.len());
        for block in sorted {
            match normalized.last_mut() {
                Some(prev)
                    if block.delete_start < prev.delete_end()
                        || block.delete_start == prev.delete_start =>
                {
                    warn!(
                        delete_start = block.delete_start,
                        previous_start = prev.delete_start,
                        previous_end = prev.delete_end(),
                        "overlapping edit blocks, folding into one"
                    );
                    let end = prev.delete_end().max(block.delete_end());
                    prev.delete_count = end - prev.delete_start;
                    prev.insert_count += block.insert_count;
                }
                _ => normalized.push(block),
            }
        }

        let mut deleted = 0;
        let mut inserted = 0;
        let mut map = HashMap::with_capacity(normalized.len());
        for mut block in normalized {
            let insert_start = block.delete_start.saturating_sub(deleted) + inserted;
            if block.insert_start != insert_start {
                warn!(
                    delete_start = block.delete_start,
                    reported = block.insert_start,
                    expected = insert_start,
                    "edit block insert offset out of line, recomputing"
                );
                block.insert_start = insert_start;
            }
            deleted += block.delete_count;
            inserted += block.insert_count;
            map.insert(block.delete_start, block);
        }
        Self { blocks: map }
    }

    /// The block starting at base index `index`, if any.
    pub fn get(&self, index: usize) -> Option<&EditBlock> {
        self.blocks.get(&index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// First base index in `from..limit` where a block starts and `index >=
    /// floor`, or `limit` if there is none.
    pub fn next_start_at_or_after(&self, from: usize, limit: usize, floor: usize) -> usize {
        (from.max(floor)..limit)
            .find(|i| self.blocks.contains_key(i))
            .unwrap_or(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(delete_start: usize, delete_count: usize, insert_count: usize) -> EditBlock {
        EditBlock {
            delete_start,
            delete_count,
            insert_start: delete_start,
            insert_count,
        }
    }

    #[test]
    fn test_lookup_by_base_index() {
        let map = BlockMap::from_blocks(&[block(1, 1, 1), block(4, 0, 2)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(1), Some(&block(1, 1, 1)));
        assert_eq!(map.get(4).map(|b| b.insert_count), Some(2));
        assert!(map.get(0).is_none());
        assert!(map.get(2).is_none());
    }

    #[test]
    fn test_duplicate_start_is_folded() {
        let map = BlockMap::from_blocks(&[block(2, 1, 0), block(2, 3, 3)]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(2), Some(&block(2, 3, 3)));
    }

    #[test]
    fn test_overlapping_out_of_order_blocks_are_folded() {
        let reported = [
            EditBlock {
                delete_start: 2,
                delete_count: 4,
                insert_start: 6,
                insert_count: 0,
            },
            EditBlock {
                delete_start: 3,
                delete_count: 0,
                insert_start: 6,
                insert_count: 3,
            },
        ];
        let map = BlockMap::from_blocks(&reported);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(2), Some(&block(2, 4, 3)));
        assert!(map.get(3).is_none());

        let mut reversed = reported;
        reversed.reverse();
        assert_eq!(BlockMap::from_blocks(&reversed).get(2), Some(&block(2, 4, 3)));
    }

    #[test]
    fn test_insert_offsets_follow_running_delta() {
        let wrong = |delete_start, delete_count, insert_count| EditBlock {
            delete_start,
            delete_count,
            insert_start: 99,
            insert_count,
        };
        let map = BlockMap::from_blocks(&[wrong(1, 2, 0), wrong(4, 0, 3), wrong(6, 1, 1)]);
        assert_eq!(map.get(1).map(|b| b.insert_start), Some(1));
        assert_eq!(map.get(4).map(|b| b.insert_start), Some(2));
        assert_eq!(map.get(6).map(|b| b.insert_start), Some(7));
    }

    #[test]
    fn test_ineffective_blocks_are_dropped() {
        let map = BlockMap::from_blocks(&[block(0, 0, 0), block(3, 1, 1)]);
        assert_eq!(map.len(), 1);
        assert!(map.get(0).is_none());
    }

    #[test]
    fn test_next_start() {
        let map = BlockMap::from_blocks(&[block(3, 1, 1), block(6, 0, 1)]);
        assert_eq!(map.next_start_at_or_after(0, 10, 0), 3);
        assert_eq!(map.next_start_at_or_after(3, 10, 0), 3);
        assert_eq!(map.next_start_at_or_after(3, 10, 4), 6);
        assert_eq!(map.next_start_at_or_after(0, 5, 4), 5);
        assert!(BlockMap::default().is_empty());
    }
}
