//! # Validate Command Implementation
//!
//! Parses a replication plan and checks it without reading or writing any
//! bundle file: empty or unparsable from-patterns, blank fileset includes and
//! glob patterns that do not compile. Errors fail the command; warnings only
//! fail it in strict mode.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use confclone::config;

/// Check a replication plan without touching any file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the replication plan.
    #[arg(short, long, value_name = "FILE", env = "CONFCLONE_CONFIG", default_value = "confclone.yaml")]
    pub config: PathBuf,

    /// Use strict validation (fail on warnings).
    #[arg(long)]
    pub strict: bool,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs) -> Result<()> {
    let config_path = &args.config;
    println!("Validating plan: {}", config_path.display());

    let plan = match config::from_file(config_path) {
        Ok(plan) => plan,
        Err(e) => {
            println!("Plan parsing failed: {}", e);
            return Err(anyhow::anyhow!("Plan parsing failed: {}", e));
        }
    };

    println!("   Primary operations: {}", plan.operations.len());
    println!("   Filesets: {}", plan.filesets.len());

    let findings = plan.validate();
    for finding in &findings {
        println!("{}", finding);
    }

    let errors = findings.iter().filter(|f| f.is_error()).count();
    let warnings = findings.len() - errors;

    if errors > 0 {
        println!("Plan has {} error(s) that must be fixed", errors);
        return Err(anyhow::anyhow!("Plan validation failed"));
    }
    if warnings > 0 && args.strict {
        println!("Plan has {} warning(s) (strict mode enabled)", warnings);
        return Err(anyhow::anyhow!("Plan validation failed due to warnings in strict mode"));
    }

    println!("Plan is valid");
    Ok(())
}
