use std::{
    fs::File,
    io::{BufWriter, Write, stdout},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lib_msalign::{
    alignment_matrix::TracebackOrder,
    distance::{distance_matrix, distance_matrix_partial},
    guide_tree::GuideTree,
    pairwise::PairwiseAligner,
    profile::Profile,
    profile_aligner::ProfileAligner,
    progressive::ProgressiveAligner,
    sequence::Sequence,
    sum_of_pairs::score_multiple,
};
use log::{LevelFilter, debug, info, warn};
use serde::Serialize;

use crate::{
    configuration::CliConfiguration,
    display::{PROFILE_COLUMNS, write_profile_blocks},
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

    /// The file to store the alignment and its guide tree in toml format.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,

    /// How to determine the order in which sequences are merged.
    #[clap(long, default_value = "complete-linkage")]
    guide_tree: GuideTreeMethod,

    /// The preference among co-optimal alignments of two profiles.
    ///
    /// `profile` prefers a gap in the second profile over a gap in the first,
    /// `pairwise` prefers a gap in the first profile, as pairwise alignment does.
    #[clap(long, default_value = "profile")]
    traceback_order: TracebackOrderSelector,

    /// Exclude sequences from the alignment until all pairwise distances are defined.
    ///
    /// Without this flag, an undefined distance aborts the alignment.
    /// Has no effect with the sequential guide tree, which does not use distances.
    #[clap(long)]
    skip_undefined_distances: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GuideTreeMethod {
    /// Agglomerative clustering of the Kimura distances with complete linkage.
    CompleteLinkage,
    /// Merge the sequences in input order.
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TracebackOrderSelector {
    Profile,
    Pairwise,
}

#[derive(Serialize)]
struct MultipleAlignmentReport {
    score: i64,
    /// The names of the sequences in the order of the rows of the alignment.
    names: Vec<String>,
    /// The input index of the sequence of each row.
    row_origins: Vec<usize>,
    /// The names of the sequences that were excluded because of undefined distances.
    excluded: Vec<String>,
    alignment: Profile,
    guide_tree: GuideTree,
}

impl From<TracebackOrderSelector> for TracebackOrder {
    fn from(selector: TracebackOrderSelector) -> Self {
        match selector {
            TracebackOrderSelector::Profile => TracebackOrder::PROFILE,
            TracebackOrderSelector::Pairwise => TracebackOrder::PAIRWISE,
        }
    }
}

pub fn cli(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);
    let configuration = cli.configuration.load()?;
    let sequences = cli.input.load(&cli.input_options)?;
    let (names, sequences): (Vec<String>, Vec<Sequence>) = sequences
        .into_iter()
        .map(|named| (named.name, named.sequence))
        .unzip();

    // Indices into the input of the sequences that are aligned.
    let (kept, guide_tree) = match cli.guide_tree {
        GuideTreeMethod::Sequential => (
            (0..sequences.len()).collect::<Vec<_>>(),
            GuideTree::sequential(sequences.len()),
        ),
        GuideTreeMethod::CompleteLinkage => {
            info!("Computing distances between {} sequences", sequences.len());
            let aligner = PairwiseAligner::new(&configuration);

            let (kept, distances) = if cli.skip_undefined_distances {
                let (kept, distances) =
                    distance_matrix_partial(&aligner, &sequences).retain_defined();
                for (index, name) in names.iter().enumerate() {
                    if !kept.contains(&index) {
                        warn!("Excluding sequence {name} because of undefined distances");
                    }
                }
                (kept, distances)
            } else {
                (
                    (0..sequences.len()).collect(),
                    distance_matrix(&aligner, &sequences)?,
                )
            };
            debug!("Distances:\n{distances}");

            info!("Building guide tree");
            (kept, GuideTree::complete_linkage(&distances))
        }
    };

    let kept_sequences: Vec<_> = kept.iter().map(|index| sequences[*index].clone()).collect();
    info!(
        "Aligning {} sequences along {} merges",
        kept_sequences.len(),
        guide_tree.merges().len()
    );
    let profile_aligner = ProfileAligner::new(&configuration)
        .with_traceback_order(cli.traceback_order.into());
    let alignment = ProgressiveAligner::with_profile_aligner(profile_aligner)
        .build_with_row_origins(&kept_sequences, &guide_tree)?;
    let row_origins: Vec<_> = alignment
        .row_origins
        .iter()
        .map(|origin| kept[*origin])
        .collect();
    let score = score_multiple(&configuration, &alignment.profile);

    let mut out = stdout().lock();
    writeln!(out, "Computed alignment:")?;
    write_profile_blocks(&mut out, &alignment.profile, PROFILE_COLUMNS)?;
    writeln!(out, "Score of alignment: {score}")?;

    if let Some(output) = cli.output {
        info!("Writing alignment to {output:?}");
        let report = MultipleAlignmentReport {
            score: score.as_i64(),
            names: row_origins
                .iter()
                .map(|origin| names[*origin].clone())
                .collect(),
            row_origins,
            excluded: names
                .iter()
                .enumerate()
                .filter(|(index, _)| !kept.contains(index))
                .map(|(_, name)| name.clone())
                .collect(),
            alignment: alignment.profile,
            guide_tree,
        };
        let mut output = BufWriter::new(
            File::create(&output).with_context(|| format!("Unable to create {output:?}"))?,
        );
        write!(output, "{}", toml::to_string(&report)?)?;
    }

    Ok(())
}
