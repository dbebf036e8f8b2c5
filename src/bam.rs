//! BAM input: converts mapped records into the same alignments a PAF line describes.

use crate::alignment_record::{AlignmentRecord, Strand};
use crate::alignment_set::{AlignmentSet, ReadAlignment};
use log::debug;
use rust_htslib::bam::record::{Aux, Cigar};
use rust_htslib::bam::{self, Read};
use std::io;
use std::num::NonZeroUsize;

/// Query and block accounting derived from one CIGAR string
#[derive(Debug, Default, PartialEq, Eq)]
struct CigarSummary {
    leading_clip: usize,
    trailing_clip: usize,
    aligned_query: usize,
    match_bases: usize,
    inserted_bases: usize,
    deleted_bases: usize,
    mismatch_bases: usize,
    block_length: usize,
}

fn summarize_cigar<'a, I>(cigar: I) -> CigarSummary
where
    I: IntoIterator<Item = &'a Cigar>,
{
    let mut summary = CigarSummary::default();
    let mut seen_aligned = false;
    for op in cigar {
        let len = op.len() as usize;
        match op {
            Cigar::SoftClip(_) | Cigar::HardClip(_) => {
                if seen_aligned {
                    summary.trailing_clip += len;
                } else {
                    summary.leading_clip += len;
                }
            }
            Cigar::Match(_) | Cigar::Equal(_) => {
                seen_aligned = true;
                summary.aligned_query += len;
                summary.match_bases += len;
                summary.block_length += len;
            }
            Cigar::Diff(_) => {
                seen_aligned = true;
                summary.aligned_query += len;
                summary.mismatch_bases += len;
                summary.block_length += len;
            }
            Cigar::Ins(_) => {
                seen_aligned = true;
                summary.aligned_query += len;
                summary.inserted_bases += len;
                summary.block_length += len;
            }
            Cigar::Del(_) => {
                seen_aligned = true;
                summary.deleted_bases += len;
                summary.block_length += len;
            }
            Cigar::RefSkip(_) | Cigar::Pad(_) => {}
        }
    }
    summary
}

/// Matching bases among the `M`/`=` operations.
///
/// NM counts every mismatch plus inserted and deleted bases. Mismatches already
/// written as `X` are not inside `match_bases`, so only the rest are subtracted.
fn residue_matches(summary: &CigarSummary, edit_distance: Option<u32>) -> usize {
    match edit_distance {
        Some(edit_distance) => {
            let mismatches = (edit_distance as usize)
                .saturating_sub(summary.inserted_bases + summary.deleted_bases);
            summary
                .match_bases
                .saturating_sub(mismatches.saturating_sub(summary.mismatch_bases))
        }
        None => summary.match_bases,
    }
}

fn aux_to_u32(aux: Aux<'_>) -> Option<u32> {
    match aux {
        Aux::I8(v) => u32::try_from(v).ok(),
        Aux::U8(v) => Some(v as u32),
        Aux::I16(v) => u32::try_from(v).ok(),
        Aux::U16(v) => Some(v as u32),
        Aux::I32(v) => u32::try_from(v).ok(),
        Aux::U32(v) => Some(v),
        _ => None,
    }
}

/// Build the PAF-equivalent alignment of a mapped BAM record.
///
/// Query coordinates are reported on the read's original strand, so the clips
/// swap sides for reverse alignments.
fn record_to_alignment(
    record: &bam::Record,
    contig_name: String,
    ref_length: usize,
) -> Result<ReadAlignment, String> {
    let cigar = record.cigar();
    let summary = summarize_cigar(cigar.iter());
    let query_length = summary.leading_clip + summary.aligned_query + summary.trailing_clip;

    let (strand, query_start) = if record.is_reverse() {
        (Strand::Reverse, summary.trailing_clip)
    } else {
        (Strand::Forward, summary.leading_clip)
    };

    let residue_matches =
        residue_matches(&summary, record.aux(b"NM").ok().and_then(aux_to_u32));

    let ref_start = usize::try_from(record.pos())
        .map_err(|_| format!("negative position {}", record.pos()))?;
    let ref_stop = usize::try_from(cigar.end_pos())
        .map_err(|_| format!("negative end position {}", cigar.end_pos()))?;

    let read_name = String::from_utf8_lossy(record.qname()).into_owned();
    let alignment = AlignmentRecord {
        contig_name,
        ref_start,
        ref_stop,
        ref_length,
        query_start,
        query_stop: query_start + summary.aligned_query,
        query_length,
        residue_matches,
        alignment_block_length: summary.block_length,
        map_quality: record.mapq() as u32,
        strand,
    };
    alignment.validate()?;

    Ok(ReadAlignment {
        read_name,
        record: alignment,
        minimizer_count: record.aux(b"cm").ok().and_then(aux_to_u32),
    })
}

/// Read all mapped records of a BAM file into `alignment_set`
pub fn parse_bam_file(
    bam_file: &str,
    threads: NonZeroUsize,
    alignment_set: &mut AlignmentSet,
) -> io::Result<()> {
    let mut reader = bam::Reader::from_path(bam_file).map_err(|e| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("Cannot open bam file '{}': {}", bam_file, e),
        )
    })?;
    reader.set_threads(threads.get()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to set BAM reader threads: {}", e),
        )
    })?;

    let header = reader.header().clone();
    let mut record = bam::Record::new();
    let mut n_unmapped = 0;

    while let Some(result) = reader.read(&mut record) {
        result.map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Failed to read record from {}: {}", bam_file, e),
            )
        })?;

        // The target id might be out of range if the read is unmapped
        if record.is_unmapped() || record.tid() < 0 {
            n_unmapped += 1;
            continue;
        }
        let tid = record.tid() as u32;
        let contig_name = String::from_utf8_lossy(header.tid2name(tid)).into_owned();
        let ref_length = header.target_len(tid).unwrap_or(0) as usize;

        let alignment = record_to_alignment(&record, contig_name, ref_length).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Invalid alignment for read {} in {}: {}",
                    String::from_utf8_lossy(record.qname()),
                    bam_file,
                    e
                ),
            )
        })?;
        alignment_set.add_alignment(alignment);
    }

    debug!("Skipped {} unmapped records in {}", n_unmapped, bam_file);
    Ok(())
}
