//! Chimera and palindrome classification of split chains.

use crate::chain::Chain;
use crate::split::SubchainPartition;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyErr {
    /// An alignment's query midpoint is smaller than the one before it
    UnsortedChain {
        index: usize,
        midpoint: f64,
        previous_midpoint: f64,
    },
}

impl std::fmt::Display for ClassifyErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifyErr::UnsortedChain {
                index,
                midpoint,
                previous_midpoint,
            } => write!(
                f,
                "Attempting to classify palindromic chain for unsorted chain: element {} has midpoint {} after {}",
                index, midpoint, previous_midpoint
            ),
        }
    }
}

impl std::error::Error for ClassifyErr {}

/// Query interval covered by one subchain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubchainSpan {
    pub query_start: usize,
    pub query_stop: usize,
}

impl SubchainSpan {
    pub fn length(&self) -> usize {
        self.query_stop.abs_diff(self.query_start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChimeraVerdict {
    NonChimeric {
        query_length: usize,
    },
    Chimeric {
        query_length: usize,
        subchains: Vec<SubchainSpan>,
    },
}

impl ChimeraVerdict {
    pub fn is_chimeric(&self) -> bool {
        matches!(self, ChimeraVerdict::Chimeric { .. })
    }

    pub fn query_length(&self) -> usize {
        match self {
            ChimeraVerdict::NonChimeric { query_length }
            | ChimeraVerdict::Chimeric { query_length, .. } => *query_length,
        }
    }
}

/// A read whose two strands, split at a single reversal point, map to the same contig
#[derive(Debug, Clone, PartialEq)]
pub struct PalindromeCandidate {
    pub contig_name: String,
    /// Index of the first element after the strand reversal
    pub reversal_index: usize,
    pub left_length: usize,
    pub right_length: usize,
    pub length_ratio: f64,
}

/// Classify a sorted chain as chimeric or not from its subchain partition
pub fn classify_chimera(chain: &Chain, partition: &SubchainPartition) -> ChimeraVerdict {
    let query_length = chain.query_length();
    if !partition.is_chimeric() {
        return ChimeraVerdict::NonChimeric { query_length };
    }

    let subchains = partition
        .iter()
        .map(|range| SubchainSpan {
            query_start: chain[range.start].query_start,
            query_stop: chain[range.end - 1].query_stop,
        })
        .collect();

    ChimeraVerdict::Chimeric {
        query_length,
        subchains,
    }
}

/// Look for a single strand reversal with both strands on one shared contig.
///
/// Aligned lengths are accumulated from `alignment_block_length` for the elements
/// before the first reversal (left) and between the first and a second reversal
/// (right). The chain must already be sorted by query midpoint.
pub fn classify_palindrome(chain: &Chain) -> Result<Option<PalindromeCandidate>, ClassifyErr> {
    let mut previous_midpoint = f64::NEG_INFINITY;
    let mut previous_reverse: Option<bool> = None;
    let mut n_strand_reversals = 0;
    let mut reversal_index = 0;

    let mut left_length = 0;
    let mut right_length = 0;
    let mut left_contigs = BTreeSet::new();
    let mut right_contigs = BTreeSet::new();

    for (i, element) in chain.iter().enumerate() {
        let midpoint = element.query_midpoint();
        if midpoint < previous_midpoint {
            return Err(ClassifyErr::UnsortedChain {
                index: i,
                midpoint,
                previous_midpoint,
            });
        }
        previous_midpoint = midpoint;

        // A new strand starts whenever the reversal flag flips
        if previous_reverse.is_some_and(|reverse| reverse != element.is_reverse()) {
            n_strand_reversals += 1;
            if n_strand_reversals == 1 {
                reversal_index = i;
            }
        }
        previous_reverse = Some(element.is_reverse());

        match n_strand_reversals {
            0 => {
                left_length += element.alignment_block_length;
                left_contigs.insert(element.contig_name.as_str());
            }
            1 => {
                right_length += element.alignment_block_length;
                right_contigs.insert(element.contig_name.as_str());
            }
            _ => {}
        }
    }

    if n_strand_reversals != 1 || left_contigs.len() != 1 || right_contigs.len() != 1 {
        return Ok(None);
    }

    let (Some(left_contig), Some(right_contig)) =
        (left_contigs.first(), right_contigs.first())
    else {
        return Ok(None);
    };
    if left_contig != right_contig {
        return Ok(None);
    }

    Ok(Some(PalindromeCandidate {
        contig_name: left_contig.to_string(),
        reversal_index,
        left_length,
        right_length,
        length_ratio: left_length as f64 / right_length as f64,
    }))
}
