use std::{
    fs::File,
    io::{BufWriter, Write, stdout},
    path::PathBuf,
};

use anyhow::{Context, Result, anyhow, ensure};
use clap::Parser;
use lib_msalign::{
    distance::kimura_distance,
    pairwise::PairwiseAligner,
    sequence::{Sequence, row_to_string},
};
use log::{LevelFilter, info, warn};
use serde::Serialize;

use crate::{
    configuration::CliConfiguration,
    display::{PAIR_COLUMNS, write_pair_blocks},
    input::{CliInput, CliInputOptions},
    logging::init_logging,
};

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// The first sequence, given directly on the command line.
    #[clap(long, requires = "second", conflicts_with_all = ["fasta", "sequences"])]
    first: Option<String>,

    /// The second sequence, given directly on the command line.
    #[clap(long, requires = "first")]
    second: Option<String>,

    #[command(flatten)]
    input: CliInput,

    #[command(flatten)]
    input_options: CliInputOptions,

    #[command(flatten)]
    configuration: CliConfiguration,

    /// The file to store the alignment in toml format.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct PairReport {
    first_name: String,
    second_name: String,
    first: String,
    second: String,
    score: i64,
    /// Absent if the distance is undefined.
    kimura_distance: Option<f64>,
}

pub fn cli(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);
    let configuration = cli.configuration.load()?;

    let ((first_name, first), (second_name, second)) =
        if let (Some(first), Some(second)) = (&cli.first, &cli.second) {
            (
                ("first".to_string(), parse_argument(first)?),
                ("second".to_string(), parse_argument(second)?),
            )
        } else {
            let mut sequences = cli.input.load(&cli.input_options)?;
            ensure!(
                sequences.len() == 2,
                "Expected an input file with two sequences, but found {} sequences",
                sequences.len()
            );
            let second = sequences.remove(1);
            let first = sequences.remove(0);
            (
                (first.name, first.sequence),
                (second.name, second.sequence),
            )
        };

    info!(
        "Aligning {first_name} of length {} and {second_name} of length {}",
        first.len(),
        second.len()
    );
    let aligner = PairwiseAligner::new(&configuration);
    let (alignment, score) = aligner.compute_with_score(&first, &second);
    let rescored = aligner.score_alignment(&alignment)?;
    ensure!(
        rescored == score,
        "The alignment scores {rescored}, but the alignment matrix computed {score}"
    );

    let kimura_distance = match kimura_distance(&alignment) {
        Ok(distance) => Some(distance),
        Err(error) => {
            warn!("No Kimura distance between {first_name} and {second_name}: {error}");
            None
        }
    };

    let mut out = stdout().lock();
    writeln!(out, "Computed alignment:")?;
    write_pair_blocks(&mut out, &alignment, &configuration, PAIR_COLUMNS)?;
    writeln!(out, "Score of alignment: {score}")?;
    if let Some(distance) = kimura_distance {
        writeln!(out, "Kimura distance: {distance:.6}")?;
    }

    if let Some(output) = cli.output {
        info!("Writing alignment to {output:?}");
        let report = PairReport {
            first_name,
            second_name,
            first: row_to_string(&alignment.x),
            second: row_to_string(&alignment.y),
            score: score.as_i64(),
            kimura_distance,
        };
        let mut output = BufWriter::new(
            File::create(&output).with_context(|| format!("Unable to create {output:?}"))?,
        );
        write!(output, "{}", toml::to_string(&report)?)?;
    }

    Ok(())
}

fn parse_argument(sequence: &str) -> Result<Sequence> {
    sequence
        .to_ascii_uppercase()
        .parse::<Sequence>()
        .map_err(|error| anyhow!("Invalid sequence {sequence}: {error}"))
}
