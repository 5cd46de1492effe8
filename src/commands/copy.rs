//! # Copy Command Implementation
//!
//! Runs a replication plan against the real filesystem: the primary document
//! is copied and edited first, then every fileset. Diagnostic lines from the
//! run go through the `log` facade; the final report is printed to stdout as
//! text or JSON. The command fails when any part of the run failed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use log::Level;

use confclone::config;
use confclone::filesystem::DiskFS;
use confclone::logging::{LogForwarder, LogSink, NullLog};
use confclone::replication::{Replicator, RunReport};

/// Copy a configuration bundle according to a replication plan
#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Path to the replication plan.
    #[arg(short, long, value_name = "FILE", env = "CONFCLONE_CONFIG", default_value = "confclone.yaml")]
    pub config: PathBuf,

    /// Source root, overriding `source:` in the plan.
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Destination root, overriding `destination:` in the plan.
    #[arg(long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Set a variable for `${NAME}` expansion (repeatable).
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// Do not expose the process environment to expansion.
    #[arg(long)]
    pub no_inherit_env: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Suppress per-file diagnostic lines.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", s))?;
    if key.is_empty() {
        return Err(format!("empty variable name in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Execute the `copy` command.
pub fn execute(args: CopyArgs) -> Result<()> {
    let plan_config = config::from_file(&args.config)
        .with_context(|| format!("Failed to load plan {}", args.config.display()))?;
    let env = plan_config.build_env(!args.no_inherit_env, &args.vars);
    let plan = plan_config.into_plan(args.source, args.destination)?;

    let mut forwarder = LogForwarder::new(Level::Info);
    let mut null = NullLog;
    let log: &mut dyn LogSink = if args.quiet { &mut null } else { &mut forwarder };

    let mut fs = DiskFS;
    let report = Replicator::new(&mut fs, &env, log).run(&plan);
    print_report(&report, args.format)?;

    if !report.success() {
        anyhow::bail!(
            "Replication from {} to {} failed",
            plan.source.display(),
            plan.destination.display()
        );
    }
    Ok(())
}

fn print_report(report: &RunReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        ReportFormat::Text => {
            println!("primary: {}", status(report.primary));
            for (index, ok) in report.filesets.iter().enumerate() {
                println!("fileset {}: {}", index + 1, status(*ok));
            }
        }
    }
    Ok(())
}

fn status(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "failed"
    }
}
