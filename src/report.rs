//! Text reports of chimeric, non-chimeric and palindromic reads.

use crate::classify::ChimeraVerdict;
use crate::pipeline::ReadReport;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output prefix for an input path: the input without its final extension
pub fn default_output_prefix(alignment_file: &str) -> PathBuf {
    if alignment_file == "-" {
        PathBuf::from("pafsplit")
    } else {
        Path::new(alignment_file).with_extension("")
    }
}

fn output_path(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn create(path: &Path) -> io::Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("Could not create output file '{}': {}", path.display(), e),
        )
    })?;
    Ok(BufWriter::new(file))
}

/// Writers for the per-read outputs, all sharing one path prefix
pub struct ReportWriter<W: Write> {
    chimeric_ids: W,
    non_chimeric_ids: W,
    chimer_lengths: W,
    non_chimer_lengths: W,
    chimer_subchain_lengths: W,
    chimer_subchains: W,
    palindromes: W,
}

impl ReportWriter<BufWriter<File>> {
    pub fn create(prefix: &Path) -> io::Result<Self> {
        let chimeric_path = output_path(prefix, "chimeric_reads.txt");
        let non_chimeric_path = output_path(prefix, "non_chimeric_reads.txt");
        info!("Writing chimeric reads to file: {}", chimeric_path.display());
        info!(
            "Writing non-chimeric reads to file: {}",
            non_chimeric_path.display()
        );

        Ok(Self {
            chimeric_ids: create(&chimeric_path)?,
            non_chimeric_ids: create(&non_chimeric_path)?,
            chimer_lengths: create(&output_path(prefix, "chimer_lengths.txt"))?,
            non_chimer_lengths: create(&output_path(prefix, "non_chimer_lengths.txt"))?,
            chimer_subchain_lengths: create(&output_path(prefix, "chimer_subchains_lengths.txt"))?,
            chimer_subchains: create(&output_path(prefix, "chimer_subchains.txt"))?,
            palindromes: create(&output_path(prefix, "palindromes.txt"))?,
        })
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn write_report(&mut self, report: &ReadReport) -> io::Result<()> {
        match &report.verdict {
            ChimeraVerdict::Chimeric {
                query_length,
                subchains,
            } => {
                writeln!(self.chimeric_ids, "{}", report.read_name)?;
                writeln!(self.chimer_lengths, "{}", query_length)?;

                write!(self.chimer_subchains, "{}\t", report.read_name)?;
                for span in subchains {
                    writeln!(self.chimer_subchain_lengths, "{}", span.length())?;
                    write!(
                        self.chimer_subchains,
                        "({},{}),",
                        span.query_start, span.query_stop
                    )?;
                }
                writeln!(self.chimer_subchains)?;
            }
            ChimeraVerdict::NonChimeric { query_length } => {
                writeln!(self.non_chimeric_ids, "{}", report.read_name)?;
                writeln!(self.non_chimer_lengths, "{}", query_length)?;
            }
        }

        if let Some(palindrome) = &report.palindrome {
            writeln!(
                self.palindromes,
                "{}\t{}\t{}\t{}\t{}",
                report.read_name,
                palindrome.contig_name,
                palindrome.left_length,
                palindrome.right_length,
                palindrome.length_ratio
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        for writer in [
            &mut self.chimeric_ids,
            &mut self.non_chimeric_ids,
            &mut self.chimer_lengths,
            &mut self.non_chimer_lengths,
            &mut self.chimer_subchain_lengths,
            &mut self.chimer_subchains,
            &mut self.palindromes,
        ] {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Print every subchain of a read with one alignment per line
pub fn write_subchains<W: Write>(out: &mut W, report: &ReadReport) -> io::Result<()> {
    writeln!(out, "Subchains created for read {}", report.read_name)?;
    for range in report.partition.iter() {
        for element in &report.chain.elements()[range.clone()] {
            writeln!(out, "\t{}", element)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
