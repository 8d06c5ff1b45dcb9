use std::io::{Write, stdout};

use anyhow::Result;
use clap::Parser;
use lib_msalign::{
    distance::{distance_matrix, distance_matrix_partial},
    pairwise::PairwiseAligner,
    sequence::Sequence,
};
use log::{LevelFilter, info, warn};

use crate::{
    configuration::CliConfiguration,
    input::{CliInput, CliInputOptions},
    logging::init_logging,
};

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    #[command(flatten)]
    input: CliInput,

    #[command(flatten)]
    input_options: CliInputOptions,

    #[command(flatten)]
    configuration: CliConfiguration,

    /// Print `-` for pairs whose distance is undefined instead of aborting.
    #[clap(long)]
    skip_undefined_distances: bool,
}

pub fn cli(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);
    let configuration = cli.configuration.load()?;
    let sequences = cli.input.load(&cli.input_options)?;
    let (names, sequences): (Vec<_>, Vec<Sequence>) = sequences
        .into_iter()
        .map(|named| (named.name, named.sequence))
        .unzip();

    info!("Computing distances between {} sequences", sequences.len());
    let aligner = PairwiseAligner::new(&configuration);
    let mut out = stdout().lock();

    if cli.skip_undefined_distances {
        let distances = distance_matrix_partial(&aligner, &sequences);
        if !distances.failed_pairs().is_empty() {
            warn!(
                "{} pairs have no defined distance",
                distances.failed_pairs().len()
            );
        }

        for (first, name) in names.iter().enumerate() {
            write!(out, "{name}")?;
            for second in 0..distances.len() {
                match distances.get(first, second) {
                    Some(distance) => write!(out, "\t{distance:.6}")?,
                    None => write!(out, "\t-")?,
                }
            }
            writeln!(out)?;
        }
    } else {
        let distances = distance_matrix(&aligner, &sequences)?;

        for (first, name) in names.iter().enumerate() {
            write!(out, "{name}")?;
            for second in 0..distances.len() {
                write!(out, "\t{:.6}", distances.get(first, second))?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}
