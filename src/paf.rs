//! PAF (Pairwise Alignment Format) parsing
//!
//! This module reads PAF records into per-read alignment chains.
//! Supports uncompressed files, stdin (`-`) and BGZF-compressed files.

use crate::alignment_record::{AlignmentRecord, Strand};
use crate::alignment_set::{AlignmentSet, ReadAlignment};
use log::debug;
use noodles::bgzf;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Error as IoError, Read, Seek, SeekFrom};
use std::num::{NonZeroUsize, ParseIntError};

/// Minimizer count tag written by minimap2
const MINIMIZER_TAG: &str = "cm:i:";

#[derive(Debug)]
pub enum ParseErr {
    NotEnoughFields(usize),
    IoError(IoError),
    InvalidField(ParseIntError),
    InvalidStrand(String),
    InvalidFormat(String),
    AtLine(usize, Box<ParseErr>),
}

impl std::fmt::Display for ParseErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErr::NotEnoughFields(n) => write!(
                f,
                "Not enough fields in PAF record: found {}, expected at least 12",
                n
            ),
            ParseErr::IoError(e) => write!(f, "IO error: {}", e),
            ParseErr::InvalidField(e) => write!(f, "Invalid field: {}", e),
            ParseErr::InvalidStrand(token) => {
                write!(f, "Uninterpretable strand symbol is not '-' or '+': {}", token)
            }
            ParseErr::InvalidFormat(msg) => write!(f, "{}", msg),
            ParseErr::AtLine(line, e) => write!(f, "line {}: {}", line, e),
        }
    }
}

impl std::error::Error for ParseErr {}

const BGZF_HEADER_SIZE: usize = 18;

/// Check whether a file starts with a valid BGZF header.
/// Returns `Ok(false)` for regular gzip, too-small files, or plain text.
fn is_bgzf<R: Read + Seek>(reader: &mut R) -> std::io::Result<bool> {
    let mut header = [0u8; BGZF_HEADER_SIZE];
    let result = match reader.read_exact(&mut header) {
        Ok(()) => {
            Ok(header[0..2] == [0x1f, 0x8b]      // gzip magic
                && header[2] == 0x08              // DEFLATE
                && header[3] == 0x04              // FEXTRA
                && header[10..12] == [0x06, 0x00] // XLEN=6
                && header[12..14] == [b'B', b'C'] // BC subfield
                && header[14..16] == [0x02, 0x00]) // SLEN=2
        }
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    };
    reader.seek(SeekFrom::Start(0))?;
    result
}

fn parse_strand(token: &str) -> Result<Strand, ParseErr> {
    match token {
        "+" => Ok(Strand::Forward),
        "-" => Ok(Strand::Reverse),
        _ => Err(ParseErr::InvalidStrand(token.to_string())),
    }
}

/// Parse a single PAF line: https://github.com/lh3/miniasm/blob/master/PAF.md
fn parse_paf_line(line: &str) -> Result<ReadAlignment, ParseErr> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 12 {
        return Err(ParseErr::NotEnoughFields(fields.len()));
    }

    let read_name = fields[0].to_string();
    let query_length = fields[1].parse::<usize>().map_err(ParseErr::InvalidField)?;
    let query_start = fields[2].parse::<usize>().map_err(ParseErr::InvalidField)?;
    let query_stop = fields[3].parse::<usize>().map_err(ParseErr::InvalidField)?;
    let strand = parse_strand(fields[4])?;
    let contig_name = fields[5].to_string();
    let ref_length = fields[6].parse::<usize>().map_err(ParseErr::InvalidField)?;
    let ref_start = fields[7].parse::<usize>().map_err(ParseErr::InvalidField)?;
    let ref_stop = fields[8].parse::<usize>().map_err(ParseErr::InvalidField)?;
    let residue_matches = fields[9].parse::<usize>().map_err(ParseErr::InvalidField)?;
    let alignment_block_length = fields[10].parse::<usize>().map_err(ParseErr::InvalidField)?;
    let map_quality = fields[11].parse::<u32>().map_err(ParseErr::InvalidField)?;

    let minimizer_count = fields[12..]
        .iter()
        .find_map(|tag| tag.strip_prefix(MINIMIZER_TAG))
        .map(|count| count.parse::<u32>().map_err(ParseErr::InvalidField))
        .transpose()?;

    let record = AlignmentRecord {
        contig_name,
        ref_start,
        ref_stop,
        ref_length,
        query_start,
        query_stop,
        query_length,
        residue_matches,
        alignment_block_length,
        map_quality,
        strand,
    };
    record.validate().map_err(ParseErr::InvalidFormat)?;

    Ok(ReadAlignment {
        read_name,
        record,
        minimizer_count,
    })
}

/// Parse every PAF line of `reader` into `alignment_set`. Blank lines are skipped;
/// any malformed line aborts the whole input.
pub fn parse_paf<R: BufRead>(reader: R, alignment_set: &mut AlignmentSet) -> Result<(), ParseErr> {
    for (i, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(ParseErr::IoError)?;
        if line.is_empty() {
            continue;
        }
        let alignment = parse_paf_line(&line).map_err(|e| ParseErr::AtLine(i + 1, Box::new(e)))?;
        alignment_set.add_alignment(alignment);
    }
    Ok(())
}

/// Parse a PAF file with automatic format detection (stdin, compressed or uncompressed)
pub fn parse_paf_file(
    paf_file: &str,
    threads: NonZeroUsize,
    alignment_set: &mut AlignmentSet,
) -> io::Result<()> {
    let result = if paf_file == "-" {
        debug!("Reading PAF from stdin");
        parse_paf(io::stdin().lock(), alignment_set)
    } else if [".gz", ".bgz"].iter().any(|e| paf_file.ends_with(e)) {
        let mut file = File::open(paf_file).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Could not open input file '{}': {}", paf_file, e),
            )
        })?;
        if !is_bgzf(&mut file)? {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "'{}' is regular gzip, not BGZF. Convert with: zcat '{}' | bgzip > output.paf.gz",
                    paf_file, paf_file
                ),
            ));
        }
        debug!("Reading BGZF-compressed PAF {} with {} workers", paf_file, threads);
        let reader = bgzf::io::MultithreadedReader::with_worker_count(threads, file);
        parse_paf(BufReader::new(reader), alignment_set)
    } else {
        let file = File::open(paf_file).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Could not open input file '{}': {}", paf_file, e),
            )
        })?;
        parse_paf(BufReader::new(file), alignment_set)
    };

    result.map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to parse PAF from {}: {}", paf_file, e),
        )
    })
}
