use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use clap::Args;
use lib_msalign::{
    alignment_configuration::AlignmentConfiguration, substitution_table::SubstitutionTable,
};
use log::{debug, info};
use serde::Deserialize;

#[derive(Args)]
pub struct CliConfiguration {
    /// A toml file containing the alignment configuration.
    ///
    /// It may contain the keys `gap_penalty` and `substitution_table`.
    /// The latter is a path to a plain text substitution table, relative to the configuration file.
    #[clap(long, short = 'c')]
    configuration: Option<PathBuf>,

    /// The penalty of each gap symbol.
    ///
    /// Overrides the gap penalty of the configuration file.
    #[clap(long, short = 'g')]
    gap_penalty: Option<i64>,

    /// A substitution table in plain text format.
    ///
    /// Overrides the substitution table of the configuration file.
    /// If neither is given, BLOSUM50 is used.
    #[clap(long, short = 't')]
    substitution_table: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigurationFile {
    gap_penalty: Option<i64>,
    substitution_table: Option<PathBuf>,
}

impl CliConfiguration {
    pub fn load(&self) -> Result<AlignmentConfiguration> {
        let configuration_file = if let Some(path) = &self.configuration {
            info!("Loading configuration file {path:?}");
            let mut buffer = String::new();
            BufReader::new(
                File::open(path).with_context(|| format!("Unable to open {path:?}"))?,
            )
            .read_to_string(&mut buffer)
            .with_context(|| format!("Unable to read {path:?}"))?;
            let mut configuration_file: ConfigurationFile = toml::from_str(&buffer)
                .with_context(|| format!("Unable to parse configuration file {path:?}"))?;

            if let (Some(table), Some(directory)) =
                (&mut configuration_file.substitution_table, path.parent())
            {
                *table = directory.join(&*table);
            }
            configuration_file
        } else {
            ConfigurationFile::default()
        };

        let gap_penalty = self
            .gap_penalty
            .or(configuration_file.gap_penalty)
            .unwrap_or(AlignmentConfiguration::DEFAULT_GAP_PENALTY);
        ensure!(
            gap_penalty >= 0,
            "The gap penalty must not be negative, but is {gap_penalty}"
        );

        let substitution_table = match self
            .substitution_table
            .as_ref()
            .or(configuration_file.substitution_table.as_ref())
        {
            Some(path) => load_substitution_table(path)?,
            None => SubstitutionTable::blosum50(),
        };

        debug!(
            "Using gap penalty {gap_penalty} and substitution table {}",
            substitution_table.name()
        );
        Ok(AlignmentConfiguration::new(
            gap_penalty.into(),
            substitution_table,
        ))
    }
}

fn load_substitution_table(path: &Path) -> Result<SubstitutionTable> {
    info!("Loading substitution table {path:?}");
    let file = File::open(path).with_context(|| format!("Unable to open {path:?}"))?;
    SubstitutionTable::read_plain(BufReader::new(file))
        .with_context(|| format!("Unable to load substitution table {path:?}"))
}
