use std::{
    fs::File,
    io::{BufWriter, stdout},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{configuration::CliConfiguration, logging::init_logging};

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    #[command(flatten)]
    configuration: CliConfiguration,

    /// Write the table to this file instead of standard output.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,
}

pub fn cli(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);
    let configuration = cli.configuration.load()?;
    let table = &configuration.substitution_table;

    if let Some(output) = cli.output {
        info!("Writing substitution table {} to {output:?}", table.name());
        let output =
            File::create(&output).with_context(|| format!("Unable to create {output:?}"))?;
        table.write_plain(BufWriter::new(output))?;
    } else {
        table.write_plain(stdout().lock())?;
    }
    info!("Gap penalty: {}", configuration.gap_penalty);

    Ok(())
}
