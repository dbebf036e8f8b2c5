use crate::commands::analyze_alignments;
use crate::params::{ChainParams, IngestFilter};
use crate::pipeline::ReadReport;
use std::io;
use std::num::NonZeroUsize;

/// Summary counts over all classified reads
#[derive(Debug, Default, PartialEq)]
pub struct ChainStats {
    pub num_reads: usize,
    pub num_alignments: usize,
    pub num_chimeric: usize,
    pub num_palindromic: usize,
    pub mean_subchains: f64,
    /// Reads with the most subchains, most first
    pub top_reads: Vec<(String, usize)>,
}

pub fn compute_stats(reports: &[ReadReport], top: usize) -> ChainStats {
    if reports.is_empty() {
        return ChainStats::default();
    }

    let num_subchains: usize = reports.iter().map(|r| r.partition.len()).sum();
    let mut entries: Vec<(String, usize)> = reports
        .iter()
        .filter(|r| r.is_chimeric())
        .map(|r| (r.read_name.clone(), r.partition.len()))
        .collect();
    // Stable sort keeps the natural read-name order among equal counts
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(top);

    ChainStats {
        num_reads: reports.len(),
        num_alignments: reports.iter().map(|r| r.chain.len()).sum(),
        num_chimeric: reports.iter().filter(|r| r.is_chimeric()).count(),
        num_palindromic: reports.iter().filter(|r| r.palindrome.is_some()).count(),
        mean_subchains: num_subchains as f64 / reports.len() as f64,
        top_reads: entries,
    }
}

/// Print chimera statistics for an alignment file
pub fn run_stats(
    alignment_file: &str,
    filter: IngestFilter,
    params: &ChainParams,
    threads: NonZeroUsize,
) -> io::Result<()> {
    let reports = analyze_alignments(alignment_file, filter, params, threads)?;
    let stats = compute_stats(&reports, 5);

    println!("Number of reads: {}", stats.num_reads);
    println!("Number of alignments: {}", stats.num_alignments);
    println!("Chimeric reads: {}", stats.num_chimeric);
    println!(
        "Non-chimeric reads: {}",
        stats.num_reads - stats.num_chimeric
    );
    println!("Palindrome candidates: {}", stats.num_palindromic);

    if stats.num_reads > 0 {
        println!(
            "\nChimeric fraction: {:.4}",
            stats.num_chimeric as f64 / stats.num_reads as f64
        );
        println!("Mean subchains per read: {:.2}", stats.mean_subchains);
    }

    if !stats.top_reads.is_empty() {
        println!("\nTop reads by number of subchains:");
        for (idx, (name, count)) in stats.top_reads.iter().enumerate() {
            println!("{}. {}: {} subchains", idx + 1, name, count);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment_record::{test_record, Strand};
    use crate::chain::Chain;
    use crate::params::ChainParams;
    use crate::pipeline::process_read;

    fn report(read_name: &str, ref_starts: &[usize]) -> ReadReport {
        let chain: Chain = ref_starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                test_record(
                    "chr1",
                    start,
                    start + 1000,
                    10_000_000,
                    i * 1000,
                    (i + 1) * 1000,
                    Strand::Forward,
                )
            })
            .collect();
        process_read(read_name.to_string(), chain, &ChainParams::default()).unwrap()
    }

    #[test]
    fn test_compute_stats() {
        let reports = vec![
            report("a", &[0, 1000]),
            report("b", &[0, 500_000, 1_000_000]),
            report("c", &[0, 500_000]),
            report("d", &[0]),
        ];
        let stats = compute_stats(&reports, 5);
        assert_eq!(stats.num_reads, 4);
        assert_eq!(stats.num_alignments, 8);
        assert_eq!(stats.num_chimeric, 2);
        assert_eq!(stats.num_palindromic, 0);
        assert_eq!(stats.mean_subchains, 7.0 / 4.0);
        assert_eq!(
            stats.top_reads,
            vec![("b".to_string(), 3), ("c".to_string(), 2)]
        );
    }

    #[test]
    fn test_empty_stats() {
        assert_eq!(compute_stats(&[], 5), ChainStats::default());
    }
}
