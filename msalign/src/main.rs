use anyhow::Result;
use clap::Parser;
use msalign::{distances, multiple, pair, table};

#[derive(Parser)]
#[command(version, about)]
enum Cli {
    /// Align two sequences.
    Pair(pair::Cli),

    /// Print the Kimura distances between all pairs of sequences.
    Distances(distances::Cli),

    /// Align multiple sequences progressively along a guide tree.
    Multiple(multiple::Cli),

    /// Print the substitution table in plain text format.
    Table(table::Cli),
}

fn main() -> Result<()> {
    match Cli::parse() {
        Cli::Pair(cli) => pair::cli(cli),
        Cli::Distances(cli) => distances::cli(cli),
        Cli::Multiple(cli) => multiple::cli(cli),
        Cli::Table(cli) => table::cli(cli),
    }
}
