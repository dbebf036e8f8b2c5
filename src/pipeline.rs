//! Sort, split and classify every read of an alignment set.

use crate::alignment_set::AlignmentSet;
use crate::chain::Chain;
use crate::classify::{
    classify_chimera, classify_palindrome, ChimeraVerdict, ClassifyErr, PalindromeCandidate,
};
use crate::params::ChainParams;
use crate::split::SubchainPartition;
use log::{debug, info, log_enabled, Level};
use rayon::prelude::*;
use std::fmt;

/// Everything derived from one read's chain
#[derive(Debug, Clone, PartialEq)]
pub struct ReadReport {
    pub read_name: String,
    pub chain: Chain,
    pub partition: SubchainPartition,
    pub verdict: ChimeraVerdict,
    pub palindrome: Option<PalindromeCandidate>,
}

impl ReadReport {
    pub fn is_chimeric(&self) -> bool {
        self.verdict.is_chimeric()
    }
}

/// Classification failure of a single read
#[derive(Debug, Clone, PartialEq)]
pub struct ReadError {
    pub read_name: String,
    pub source: ClassifyErr,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Read {}: {}", self.read_name, self.source)
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Sort one read's chain by query position, split it and classify the result
pub fn process_read(
    read_name: String,
    mut chain: Chain,
    params: &ChainParams,
) -> Result<ReadReport, ReadError> {
    let dump = log_enabled!(Level::Debug);
    if dump {
        debug!("Chain of {} before sorting:", read_name);
        for element in &chain {
            debug!("\t{}", element);
        }
    }

    chain.sort_by_midpoint();
    debug_assert!(chain.is_sorted_by_midpoint());

    if dump {
        debug!("Chain of {} after sorting:", read_name);
        for element in &chain {
            debug!("\t{}", element);
        }
    }

    let partition = chain.split(params);
    let verdict = classify_chimera(&chain, &partition);
    let palindrome = classify_palindrome(&chain).map_err(|source| ReadError {
        read_name: read_name.clone(),
        source,
    })?;

    if let Some(candidate) = &palindrome {
        debug!(
            "Read {} is a palindrome candidate on {}, length ratio: {}",
            read_name, candidate.contig_name, candidate.length_ratio
        );
    }

    Ok(ReadReport {
        read_name,
        chain,
        partition,
        verdict,
        palindrome,
    })
}

/// Process all reads in parallel. Reports come back in natural read-name order.
///
/// The first read that fails to classify aborts the whole run; no partial
/// report list is returned.
pub fn process_alignment_set(
    alignment_set: AlignmentSet,
    params: &ChainParams,
) -> Result<Vec<ReadReport>, ReadError> {
    let chains = alignment_set.into_chains();
    info!("Splitting chains of {} reads", chains.len());

    let mut reports = chains
        .into_par_iter()
        .map(|(read_name, chain)| process_read(read_name, chain, params))
        .collect::<Result<Vec<_>, _>>()?;

    reports.par_sort_by(|a, b| natord::compare(&a.read_name, &b.read_name));

    let n_chimeric = reports.iter().filter(|r| r.is_chimeric()).count();
    let n_palindromic = reports.iter().filter(|r| r.palindrome.is_some()).count();
    info!(
        "Found {} chimeric and {} non-chimeric reads ({} palindrome candidates)",
        n_chimeric,
        reports.len() - n_chimeric,
        n_palindromic
    );

    Ok(reports)
}
