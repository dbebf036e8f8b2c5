use crate::commands::analyze_alignments;
use crate::params::{ChainParams, IngestFilter};
use crate::report::{default_output_prefix, ReportWriter};
use log::info;
use std::io;
use std::num::NonZeroUsize;
use std::path::Path;

/// Split every read's chain and write the chimeric/non-chimeric reports
pub fn run_filter(
    alignment_file: &str,
    output_prefix: Option<&Path>,
    filter: IngestFilter,
    params: &ChainParams,
    threads: NonZeroUsize,
) -> io::Result<()> {
    let reports = analyze_alignments(alignment_file, filter, params, threads)?;

    let prefix = output_prefix
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_prefix(alignment_file));
    let mut writer = ReportWriter::create(&prefix)?;
    for report in &reports {
        writer.write_report(report)?;
    }
    writer.flush()?;

    info!("Wrote reports for {} reads to {}.*", reports.len(), prefix.display());
    Ok(())
}
