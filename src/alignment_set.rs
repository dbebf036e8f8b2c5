//! Grouping of filtered alignments into per-read chains.

use crate::alignment_record::{AlignmentFormat, AlignmentRecord};
use crate::chain::Chain;
use crate::params::IngestFilter;
use crate::{bam, paf};
use log::{info, warn};
use rustc_hash::FxHashMap;
use std::io;
use std::num::NonZeroUsize;

/// An alignment as read from the input, before filtering
#[derive(Debug, Clone, PartialEq)]
pub struct ReadAlignment {
    pub read_name: String,
    pub record: AlignmentRecord,
    /// Minimizers supporting the alignment (`cm:i:` tag), if reported
    pub minimizer_count: Option<u32>,
}

/// Chains of all reads in one input, keyed by read name
#[derive(Debug, Default)]
pub struct AlignmentSet {
    chains: FxHashMap<String, Chain>,
    filter: IngestFilter,
    n_seen: usize,
    n_kept: usize,
}

impl AlignmentSet {
    pub fn new(filter: IngestFilter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    /// Append an alignment to its read's chain if it passes the ingestion filter.
    /// Returns whether it was kept.
    pub fn add_alignment(&mut self, alignment: ReadAlignment) -> bool {
        self.n_seen += 1;
        if !self
            .filter
            .accepts(alignment.record.map_quality, alignment.minimizer_count)
        {
            return false;
        }

        self.chains
            .entry(alignment.read_name)
            .or_default()
            .push(alignment.record);
        self.n_kept += 1;
        true
    }

    /// Number of reads with at least one kept alignment
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, read_name: &str) -> Option<&Chain> {
        self.chains.get(read_name)
    }

    pub fn alignments_seen(&self) -> usize {
        self.n_seen
    }

    pub fn alignments_kept(&self) -> usize {
        self.n_kept
    }

    pub fn into_chains(self) -> FxHashMap<String, Chain> {
        self.chains
    }
}

/// Load and group all alignments of a PAF or BAM file
pub fn load_alignments(
    alignment_file: &str,
    filter: IngestFilter,
    threads: NonZeroUsize,
) -> io::Result<AlignmentSet> {
    let format = AlignmentFormat::from_path(alignment_file).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "Unrecognized alignment format for '{}' (expected .paf, .paf.gz, .paf.bgz, .bam or '-')",
                alignment_file
            ),
        )
    })?;

    let mut alignment_set = AlignmentSet::new(filter);
    match format {
        AlignmentFormat::Paf => paf::parse_paf_file(alignment_file, threads, &mut alignment_set)?,
        AlignmentFormat::Bam => bam::parse_bam_file(alignment_file, threads, &mut alignment_set)?,
    }

    info!(
        "Kept {} of {} alignments across {} reads from {}",
        alignment_set.alignments_kept(),
        alignment_set.alignments_seen(),
        alignment_set.len(),
        alignment_file
    );
    if alignment_set.is_empty() {
        warn!(
            "No alignments in {} passed the filters (mapQ > {}, minimizers > {})",
            alignment_file, filter.min_quality, filter.min_chain_minimizers
        );
    }

    Ok(alignment_set)
}
