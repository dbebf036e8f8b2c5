//! Greedy top-down segmentation of a sorted chain into subchains.

use crate::chain::Chain;
use crate::params::ChainParams;
use log::debug;
use std::ops::Range;

/// Disjoint half-open index ranges that exactly tile a chain, ordered by start
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubchainPartition {
    ranges: Vec<Range<usize>>,
}

impl SubchainPartition {
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Range<usize>> {
        self.ranges.iter()
    }

    /// A read split into more than one subchain is chimeric
    pub fn is_chimeric(&self) -> bool {
        self.ranges.len() > 1
    }

    /// Check that the ranges tile `[0, n)` without gaps or overlaps
    pub fn tiles(&self, n: usize) -> bool {
        let mut expected_start = 0;
        for range in &self.ranges {
            if range.start != expected_start || range.end <= range.start {
                return false;
            }
            expected_start = range.end;
        }
        expected_start == n
    }
}

/// Index (`i + 1`) and size of the strictly largest gap between adjacent elements in `range`.
/// The first maximum wins on ties.
fn largest_gap(chain: &Chain, range: &Range<usize>, gap_penalty: u64) -> Option<(usize, u64)> {
    let mut longest: Option<(usize, u64)> = None;
    for i in range.start..range.end.saturating_sub(1) {
        let gap = chain.gap_after(i, gap_penalty);
        if longest.map_or(true, |(_, best)| gap > best) {
            longest = Some((i + 1, gap));
        }
    }
    longest
}

/// Split a chain, assumed sorted by query midpoint, at its largest gap while that gap
/// exceeds `params.max_gap`, then recursively on both halves.
///
/// Pending ranges are kept on an explicit worklist. Every split boundary lies strictly
/// inside its range, so each step shrinks the work and the result always tiles the chain.
/// An empty chain yields an empty partition.
pub fn split_chain(chain: &Chain, params: &ChainParams) -> SubchainPartition {
    if chain.is_empty() {
        return SubchainPartition::default();
    }

    let mut ranges = Vec::new();
    let mut pending = vec![0..chain.len()];

    while let Some(range) = pending.pop() {
        match largest_gap(chain, &range, params.gap_penalty) {
            Some((boundary, gap)) if gap > params.max_gap => {
                debug!(
                    "Splitting [{}, {}) at {} (gap {})",
                    range.start, range.end, boundary, gap
                );
                // Right half first so the left one is processed next
                pending.push(boundary..range.end);
                pending.push(range.start..boundary);
            }
            _ => ranges.push(range),
        }
    }

    ranges.sort_by_key(|range| range.start);
    let partition = SubchainPartition { ranges };
    debug_assert!(
        partition.tiles(chain.len()),
        "partition {:?} does not tile a chain of {} elements",
        partition.ranges,
        chain.len()
    );
    partition
}
