//! gcu-service-validator - runs the service validators for one apply step
//!
//! Loads an old and a new CONFIG_DB snapshot and triggers the service
//! actions the difference requires.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sonic_gcu_common::{DryRunExecutor, SharedExecutor, ShellExecutor};
use sonic_gcu_validators::{ChangeContext, ConfigSnapshot, ValidatorRegistry};

/// Service validators for the SONiC generic config updater
#[derive(Parser, Debug)]
#[command(name = "gcu-service-validator")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Snapshot before the change (CONFIG_DB JSON, or YAML by extension).
    /// Defaults to an empty configuration.
    #[arg(long)]
    old: Option<PathBuf>,

    /// Snapshot after the change
    #[arg(long)]
    new: PathBuf,

    /// Only run the named validator (repeatable)
    #[arg(long = "validator")]
    validators: Vec<String>,

    /// Log commands instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Shell used to run commands
    #[arg(long, default_value = sonic_gcu_common::shell::SH_CMD)]
    shell: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initializes tracing/logging subsystem
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn load_snapshots(args: &Args) -> Result<(ConfigSnapshot, ConfigSnapshot)> {
    let old = match &args.old {
        Some(path) => ConfigSnapshot::load(path)
            .with_context(|| format!("loading old snapshot {}", path.display()))?,
        None => ConfigSnapshot::new(),
    };
    let new = ConfigSnapshot::load(&args.new)
        .with_context(|| format!("loading new snapshot {}", args.new.display()))?;
    Ok((old, new))
}

fn run(args: &Args) -> Result<bool> {
    let (old, new) = load_snapshots(args)?;

    let executor: SharedExecutor = if args.dry_run {
        Arc::new(DryRunExecutor)
    } else {
        Arc::new(ShellExecutor::with_shell(&args.shell))
    };

    let registry = ValidatorRegistry::with_defaults(executor)?;
    let context = ChangeContext::default();

    if args.validators.is_empty() {
        let report = registry.validate_all(&old, &new, &context);
        for (name, err) in report.failures() {
            error!("{}: {}", name, err);
        }
        return Ok(report.is_success());
    }

    let mut success = true;
    for name in &args.validators {
        if let Err(e) = registry.validate_one(name, &old, &new, &context) {
            error!("{}: {}", name, e);
            success = false;
        }
    }
    Ok(success)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    info!("--- Starting gcu-service-validator ---");

    match run(&args) {
        Ok(true) => {
            info!("Service validation complete");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            error!("One or more services could not be updated");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("gcu-service-validator failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
