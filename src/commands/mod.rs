pub mod filter;
pub mod stats;
pub mod subchains;

use crate::alignment_set::load_alignments;
use crate::params::{ChainParams, IngestFilter};
use crate::pipeline::{process_alignment_set, ReadReport};
use std::io;
use std::num::NonZeroUsize;

/// Load an alignment file and classify every read in it
pub fn analyze_alignments(
    alignment_file: &str,
    filter: IngestFilter,
    params: &ChainParams,
    threads: NonZeroUsize,
) -> io::Result<Vec<ReadReport>> {
    let alignment_set = load_alignments(alignment_file, filter, threads)?;
    process_alignment_set(alignment_set, params)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
