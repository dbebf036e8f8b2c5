use crate::commands::analyze_alignments;
use crate::params::{ChainParams, IngestFilter};
use crate::report::write_subchains;
use std::io::{self, BufWriter, Write};
use std::num::NonZeroUsize;

/// Print the sorted alignments of each read grouped by subchain
pub fn run_subchains(
    alignment_file: &str,
    chimeric_only: bool,
    filter: IngestFilter,
    params: &ChainParams,
    threads: NonZeroUsize,
) -> io::Result<()> {
    let reports = analyze_alignments(alignment_file, filter, params, threads)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for report in reports
        .iter()
        .filter(|report| !chimeric_only || report.is_chimeric())
    {
        write_subchains(&mut out, report)?;
    }
    out.flush()
}
