use clap::Parser;
use log::info;
use pafsplit::commands::{filter::run_filter, stats::run_stats, subchains::run_subchains};
use pafsplit::params::{
    ChainParams, IngestFilter, GAP_PENALTY, MAX_GAP, MIN_CHAIN_MINIMIZERS, MIN_QUALITY,
};
use rayon::ThreadPoolBuilder;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Common options shared between all commands
#[derive(Parser, Debug)]
struct CommonOpts {
    /// Path to the alignments: PAF (optionally BGZF-compressed, '-' for stdin) or BAM.
    #[clap(short = 'i', long = "paf-path", alias = "paf_path", value_parser)]
    alignment_file: String,

    /// Break chains at gaps between adjacent alignments larger than this.
    #[clap(long, value_parser, default_value_t = MAX_GAP)]
    max_gap: u64,

    /// Penalty added to the gap each time a chain jumps between contigs.
    #[clap(long, value_parser, default_value_t = GAP_PENALTY)]
    gap_penalty: u64,

    /// Ignore alignments with a mapping quality at or below this.
    #[clap(short = 'q', long, value_parser, default_value_t = MIN_QUALITY)]
    min_quality: u32,

    /// Ignore alignments supported by this many minimizers or fewer (cm:i: tag).
    #[clap(long, value_parser, default_value_t = MIN_CHAIN_MINIMIZERS)]
    min_chain_minimizers: u32,

    /// Number of threads for parallel processing.
    #[clap(
        short = 't',
        long,
        value_parser,
        default_value_t = NonZeroUsize::new(num_cpus::get()).unwrap()
    )]
    num_threads: NonZeroUsize,

    /// Verbosity level (0 = error, 1 = info, 2 = debug)
    #[clap(short, long, default_value = "0")]
    verbose: u8,
}

impl CommonOpts {
    fn chain_params(&self) -> ChainParams {
        ChainParams {
            max_gap: self.max_gap,
            gap_penalty: self.gap_penalty,
        }
    }

    fn ingest_filter(&self) -> IngestFilter {
        IngestFilter {
            min_quality: self.min_quality,
            min_chain_minimizers: self.min_chain_minimizers,
        }
    }
}

/// Command-line tool for finding chimeric reads in long-read alignments.
#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_subcommand = true)]
enum Args {
    /// Split alignment chains and write chimeric/non-chimeric read reports
    Filter {
        #[clap(flatten)]
        common: CommonOpts,

        /// Prefix of the output files (default: the input path without its extension)
        #[clap(short = 'o', long, value_parser)]
        output_prefix: Option<PathBuf>,
    },
    /// Print every read's alignments grouped into subchains
    Subchains {
        #[clap(flatten)]
        common: CommonOpts,

        /// Only print reads that split into more than one subchain
        #[clap(short = 'c', long, action)]
        chimeric_only: bool,
    },
    /// Print chimera statistics
    Stats {
        #[clap(flatten)]
        common: CommonOpts,
    },
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    match args {
        Args::Filter {
            common,
            output_prefix,
        } => {
            initialize(&common)?;
            run_filter(
                &common.alignment_file,
                output_prefix.as_deref(),
                common.ingest_filter(),
                &common.chain_params(),
                common.num_threads,
            )?;
        }
        Args::Subchains {
            common,
            chimeric_only,
        } => {
            initialize(&common)?;
            run_subchains(
                &common.alignment_file,
                chimeric_only,
                common.ingest_filter(),
                &common.chain_params(),
                common.num_threads,
            )?;
        }
        Args::Stats { common } => {
            initialize(&common)?;
            run_stats(
                &common.alignment_file,
                common.ingest_filter(),
                &common.chain_params(),
                common.num_threads,
            )?;
        }
    }

    Ok(())
}

/// Initialize logging and the thread pool based on common options
fn initialize(common: &CommonOpts) -> io::Result<()> {
    // Initialize logger based on verbosity
    env_logger::Builder::new()
        .filter_level(match common.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    // Configure thread pool
    ThreadPoolBuilder::new()
        .num_threads(common.num_threads.into())
        .build_global()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to initialize thread pool: {}", e),
            )
        })?;

    info!(
        "Using {} threads, max gap {}, gap penalty {}, min mapQ {}",
        common.num_threads, common.max_gap, common.gap_penalty, common.min_quality
    );
    Ok(())
}
