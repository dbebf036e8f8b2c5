//! Per-read alignment chains and the gap metric between adjacent alignments.

use crate::alignment_record::AlignmentRecord;
use crate::params::ChainParams;
use crate::split::{split_chain, SubchainPartition};
use std::ops::Index;

/// All alignments of one query read, in arrival order until sorted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    elements: Vec<AlignmentRecord>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: AlignmentRecord) {
        self.elements.push(record);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[AlignmentRecord] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlignmentRecord> {
        self.elements.iter()
    }

    /// Sort by order of occurrence in the read. Ties keep their arrival order.
    pub fn sort_by_midpoint(&mut self) {
        self.elements
            .sort_by(|a, b| a.query_midpoint().total_cmp(&b.query_midpoint()));
    }

    /// Whether the chain is already in non-decreasing midpoint order
    pub fn is_sorted_by_midpoint(&self) -> bool {
        self.elements
            .windows(2)
            .all(|pair| pair[0].query_midpoint() <= pair[1].query_midpoint())
    }

    /// Distance between the elements at `i` and `i + 1`
    pub fn gap_after(&self, i: usize, gap_penalty: u64) -> u64 {
        compute_distance(&self.elements[i], &self.elements[i + 1], gap_penalty)
    }

    /// Split the (sorted) chain at every gap larger than `params.max_gap`
    pub fn split(&self, params: &ChainParams) -> SubchainPartition {
        split_chain(self, params)
    }

    /// Total length of the read, taken from its first alignment
    pub fn query_length(&self) -> usize {
        self.elements.first().map_or(0, |e| e.query_length)
    }
}

impl Index<usize> for Chain {
    type Output = AlignmentRecord;

    fn index(&self, i: usize) -> &AlignmentRecord {
        &self.elements[i]
    }
}

impl FromIterator<AlignmentRecord> for Chain {
    fn from_iter<I: IntoIterator<Item = AlignmentRecord>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a AlignmentRecord;
    type IntoIter = std::slice::Iter<'a, AlignmentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Distance from alignment `a` to the next alignment `b` of the same read.
///
/// On the same contig, overlapping alignments are 0 apart and otherwise the
/// distance is the reference gap between `a`'s forward stop and `b`'s forward
/// start. Across contigs it is the smallest possible unseen sequence (both
/// distances to the contig ends) plus `gap_penalty`.
pub fn compute_distance(a: &AlignmentRecord, b: &AlignmentRecord, gap_penalty: u64) -> u64 {
    if a.contig_name == b.contig_name {
        let a_start = a.forward_start();
        let a_stop = a.forward_stop();
        let b_start = b.forward_start();
        let b_stop = b.forward_stop();

        if (a_stop > b_start && a_start < b_stop) || (b_stop > a_start && b_start < a_stop) {
            0
        } else {
            a_stop.abs_diff(b_start) as u64
        }
    } else {
        a.distance_to_contig_end() as u64 + b.distance_to_contig_end() as u64 + gap_penalty
    }
}
