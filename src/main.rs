use bnquery::inference::{ConditionalInferenceEngine, EnumerationEngine, RejectionSamplingEngine};
use bnquery::{xmlbif, Evidence, InferenceError};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use std::path::PathBuf;
use std::process::ExitCode;


/// Answer conditional probability queries on a Bayesian network stored as XMLBIF
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log more (-v for info, -vv for debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    algorithm: Algorithm,
}

#[derive(Subcommand, Debug)]
enum Algorithm {
    /// Exact inference by enumeration
    Enumeration {
        /// The XMLBIF network file
        file: PathBuf,

        /// The query variable
        query: String,

        /// Evidence as variable=outcome pairs
        evidence: Vec<String>,
    },

    /// Approximate inference by rejection sampling
    Rejection {
        /// The number of samples to draw
        #[arg(allow_negative_numbers = true)]
        samples: i64,

        /// The XMLBIF network file
        file: PathBuf,

        /// The query variable
        query: String,

        /// Evidence as variable=outcome pairs
        evidence: Vec<String>,

        /// Seed for the random generator; drawn from entropy when absent
        #[arg(long)]
        seed: Option<u64>,
    },
}


fn run(args: Args) -> Result<()> {
    let distribution = match args.algorithm {
        Algorithm::Enumeration { file, query, evidence } => {
            let evidence = Evidence::parse(&evidence)?;
            let model = xmlbif::load_file(&file)
                .with_context(|| format!("could not load network from {}", file.display()))?;

            EnumerationEngine::new(&model).infer(&query, &evidence)?
        },

        Algorithm::Rejection { samples, file, query, evidence, seed } => {
            if samples <= 0 {
                return Err(InferenceError::InvalidArgument(
                    format!("the number of samples must be positive, got {}", samples)
                ).into());
            }
            let evidence = Evidence::parse(&evidence)?;
            let model = xmlbif::load_file(&file)
                .with_context(|| format!("could not load network from {}", file.display()))?;

            let seed = seed.unwrap_or_else(|| {
                let seed = rand::random();
                info!("no seed given, drew {} from entropy", seed);
                seed
            });

            RejectionSamplingEngine::new(&model, samples as usize, seed)?.infer(&query, &evidence)?
        },
    };

    print!("{}", distribution);
    Ok(())
}


fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
