//! Thresholds used while grouping, splitting and filtering alignment chains.

/// Break chains at gaps larger than this
pub const MAX_GAP: u64 = 50_000;

/// Added each time a chain jumps between contigs
pub const GAP_PENALTY: u64 = 5_000;

/// Ignore alignments with a mapQ at or below this
pub const MIN_QUALITY: u32 = 5;

/// Ignore alignments backed by this many minimizers or fewer (`cm:i:` tag)
pub const MIN_CHAIN_MINIMIZERS: u32 = 0;

/// Parameters of the gap metric and the recursive splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParams {
    pub max_gap: u64,
    pub gap_penalty: u64,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            max_gap: MAX_GAP,
            gap_penalty: GAP_PENALTY,
        }
    }
}

/// Ingestion filter applied to every record before it joins a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestFilter {
    pub min_quality: u32,
    pub min_chain_minimizers: u32,
}

impl Default for IngestFilter {
    fn default() -> Self {
        Self {
            min_quality: MIN_QUALITY,
            min_chain_minimizers: MIN_CHAIN_MINIMIZERS,
        }
    }
}

impl IngestFilter {
    /// Check whether an alignment passes the quality and minimizer thresholds.
    ///
    /// A record without a minimizer count only passes while the minimizer
    /// filter is disabled (`min_chain_minimizers == 0`).
    pub fn accepts(&self, map_quality: u32, minimizer_count: Option<u32>) -> bool {
        if map_quality <= self.min_quality {
            return false;
        }
        match minimizer_count {
            Some(count) => count > self.min_chain_minimizers,
            None => self.min_chain_minimizers == 0,
        }
    }
}
