//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// confclone - Copy XML configuration bundles with on-the-fly edits
#[derive(Parser, Debug)]
#[command(name = "confclone")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy a configuration bundle according to a replication plan
    Copy(commands::copy::CopyArgs),

    /// Check a replication plan without touching any file
    Validate(commands::validate::ValidateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        confclone::logging::init(&self.log_level);

        match self.command {
            Commands::Copy(args) => commands::copy::execute(args),
            Commands::Validate(args) => commands::validate::execute(args),
        }
    }
}
