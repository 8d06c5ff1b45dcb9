use std::{env, fs, path::PathBuf};

use anyhow::{Result, anyhow};
use clap::Parser;
use msalign::{distances, multiple, pair, table};

pub fn run_in_repo_root(args: &str) -> Result<()> {
    // The manifest directory is this crate, a.k.a. "[...]/msalign-tests".
    // Simulate a call from the repo root by using its parent.
    env::set_current_dir(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .ok_or(anyhow!("No parent directory"))?,
    )?;

    let args = args.split_whitespace();
    match args.clone().next() {
        Some("pair") => pair::cli(pair::Cli::parse_from(args)),
        Some("distances") => distances::cli(distances::Cli::parse_from(args)),
        Some("multiple") => multiple::cli(multiple::Cli::parse_from(args)),
        Some("table") => table::cli(table::Cli::parse_from(args)),
        _ => Err(anyhow!("Unknown command: {args:?}")),
    }
}

/// A path in the temporary directory that is unique to the calling test.
pub fn output_file(name: &str) -> PathBuf {
    env::temp_dir().join(format!("msalign-tests-{}-{name}", std::process::id()))
}

pub fn read_toml(path: &PathBuf) -> Result<toml::Table> {
    let content = fs::read_to_string(path)?;
    fs::remove_file(path)?;
    Ok(toml::from_str(&content)?)
}
