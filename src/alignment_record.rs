use std::fmt;

/// One alignment of a query read fragment against a reference contig
///
/// ## Coordinates
/// - Reference and query intervals are 0-based and half-open.
/// - Query coordinates are always on the read's original (forward) strand,
///   as in PAF; `strand` tells how the fragment lies on the contig.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    pub contig_name: String,
    pub ref_start: usize,
    pub ref_stop: usize,
    pub ref_length: usize,
    pub query_start: usize,
    pub query_stop: usize,
    pub query_length: usize,
    pub residue_matches: usize,
    pub alignment_block_length: usize,
    pub map_quality: u32,
    pub strand: Strand,
}

/// Strand orientation for alignments
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
#[repr(u8)]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    pub fn symbol(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl AlignmentRecord {
    pub fn is_reverse(&self) -> bool {
        self.strand == Strand::Reverse
    }

    /// Reference start as seen by the read: the stop coordinate for reverse alignments
    pub fn forward_start(&self) -> usize {
        match self.strand {
            Strand::Forward => self.ref_start,
            Strand::Reverse => self.ref_stop,
        }
    }

    /// Reference stop as seen by the read: the start coordinate for reverse alignments
    pub fn forward_stop(&self) -> usize {
        match self.strand {
            Strand::Forward => self.ref_stop,
            Strand::Reverse => self.ref_start,
        }
    }

    /// Unaligned reference remaining past this alignment in the direction the read extends
    pub fn distance_to_contig_end(&self) -> usize {
        match self.strand {
            Strand::Forward => self.ref_length.saturating_sub(self.ref_stop),
            Strand::Reverse => self.ref_start,
        }
    }

    /// Midpoint of the aligned query interval
    pub fn query_midpoint(&self) -> f64 {
        (self.query_start as f64 + self.query_stop as f64) / 2.0
    }

    /// Check the coordinate invariants, returning a description of the first violation
    pub fn validate(&self) -> Result<(), String> {
        if self.ref_start > self.ref_stop || self.ref_stop > self.ref_length {
            return Err(format!(
                "reference interval {}-{} does not fit contig {} of length {}",
                self.ref_start, self.ref_stop, self.contig_name, self.ref_length
            ));
        }
        if self.query_start > self.query_stop || self.query_stop > self.query_length {
            return Err(format!(
                "query interval {}-{} does not fit read of length {}",
                self.query_start, self.query_stop, self.query_length
            ));
        }
        Ok(())
    }
}

impl fmt::Display for AlignmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{}){} {} {} {} {} {}",
            self.query_start,
            self.query_stop,
            self.strand.symbol(),
            self.contig_name,
            self.ref_start,
            self.ref_stop,
            self.ref_length,
            self.map_quality
        )
    }
}

/// Alignment file format types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignmentFormat {
    Paf,
    Bam,
}

impl AlignmentFormat {
    /// Detect format from file extension. `-` stands for PAF on stdin.
    pub fn from_path(path: &str) -> Option<Self> {
        if path == "-"
            || path.ends_with(".paf")
            || path.ends_with(".paf.gz")
            || path.ends_with(".paf.bgz")
        {
            Some(AlignmentFormat::Paf)
        } else if path.ends_with(".bam") {
            Some(AlignmentFormat::Bam)
        } else {
            None
        }
    }
}

#[cfg(test)]
pub(crate) fn test_record(
    contig_name: &str,
    ref_start: usize,
    ref_stop: usize,
    ref_length: usize,
    query_start: usize,
    query_stop: usize,
    strand: Strand,
) -> AlignmentRecord {
    AlignmentRecord {
        contig_name: contig_name.to_string(),
        ref_start,
        ref_stop,
        ref_length,
        query_start,
        query_stop,
        query_length: 200_000,
        residue_matches: query_stop - query_start,
        alignment_block_length: query_stop - query_start,
        map_quality: 60,
        strand,
    }
}
