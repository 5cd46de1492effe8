//! # confclone CLI
//!
//! Binary entry point for the `confclone` command-line tool. It parses
//! arguments with `clap`, runs the chosen command and turns top-level errors
//! into a non-zero exit status. All replication logic lives in the library.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
