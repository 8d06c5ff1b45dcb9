use std::{fs::File, io::Read, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Args;
use lib_msalign::{sequence::Sequence, sequence_source::read_counted_sequences};
use log::info;

use crate::fasta_parser::parse_fasta_file;

#[derive(Args)]
#[group(multiple = false)]
pub struct CliInput {
    /// A fasta file containing the sequences.
    #[clap(long, short = 'f')]
    fasta: Option<PathBuf>,

    /// A text file whose first line is the number of sequences, followed by one sequence per line.
    #[clap(long, short = 's')]
    sequences: Option<PathBuf>,
}

#[derive(Args)]
pub struct CliInputOptions {
    /// A string of characters that should be skipped in the input fasta.
    ///
    /// For example, `-` characters of an existing alignment can be skipped this way.
    #[clap(long, default_value = "")]
    skip_characters: String,
}

/// An input sequence together with its name.
pub struct NamedSequence {
    pub name: String,
    pub sequence: Sequence,
}

impl CliInput {
    /// Loads the sequences, converting them to upper case.
    pub fn load(&self, options: &CliInputOptions) -> Result<Vec<NamedSequence>> {
        if let Some(path) = &self.fasta {
            info!("Loading fasta file {path:?}");
            let skip_characters = options.skip_characters.chars().collect::<Vec<_>>();

            parse_fasta_file(path)?
                .into_iter()
                .map(|mut record| -> Result<NamedSequence> {
                    record.sequence.retain(|c| !skip_characters.contains(&c));
                    record.sequence.make_ascii_uppercase();
                    let sequence = record.sequence.parse::<Sequence>().with_context(|| {
                        format!("Fasta record {} contains an invalid sequence", record.id)
                    })?;
                    Ok(NamedSequence {
                        name: record.id,
                        sequence,
                    })
                })
                .collect()
        } else if let Some(path) = &self.sequences {
            info!("Loading sequence file {path:?}");
            let mut buffer = String::new();
            File::open(path)
                .with_context(|| format!("Unable to open {path:?}"))?
                .read_to_string(&mut buffer)
                .with_context(|| format!("Unable to read {path:?}"))?;
            buffer.make_ascii_uppercase();

            Ok(read_counted_sequences(buffer.as_bytes())
                .with_context(|| format!("Unable to load sequence file {path:?}"))?
                .into_iter()
                .enumerate()
                .map(|(index, sequence)| NamedSequence {
                    name: format!("sequence_{}", index + 1),
                    sequence,
                })
                .collect())
        } else {
            Err(anyhow!("No input file given"))
        }
    }
}
