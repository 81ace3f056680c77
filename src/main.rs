//! modaudit — inventory 4GL module directories into a row-per-file dataset.
//!
//! Thin binary entry point. All logic lives in the `modaudit-core` crate.

mod summary;

use anyhow::Context;
use clap::Parser;
use modaudit_core::scanner::root_specs;
use modaudit_core::{AuditConfig, AuditError, AuditRequest, Reporter};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Module scanned when no roots are given.
const DEFAULT_ROOT: &str = "audittest.4gm";

#[derive(Parser, Debug)]
#[command(
    name = "modaudit",
    version,
    about = "Collect filesystem statistics for one or more 4GL module directories",
    long_about = "Scans module directories and writes one row per file (root, relative path, \
                  extension, category, size, modification time). Use a .parquet or .pq output \
                  to write Parquet; it falls back to CSV if Parquet cannot be written."
)]
struct Cli {
    /// Module directories to scan (default: audittest.4gm)
    roots: Vec<PathBuf>,

    /// Output file; .parquet/.pq writes Parquet, anything else CSV
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// TOML file overriding the category table and export options
    #[arg(short, long, env = "MODAUDIT_CONFIG")]
    config: Option<PathBuf>,

    /// Rows to preview per module (0 disables)
    #[arg(long, default_value_t = 20)]
    preview: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress the console summary
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match audit(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<AuditError>()
                .map(AuditError::exit_code)
                .unwrap_or(1);
            tracing::error!("{err:#}");
            if code == 2 {
                eprintln!("No valid modules scanned.");
            }
            ExitCode::from(code)
        }
    }
}

fn audit(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => AuditConfig::load(path).map_err(AuditError::from)?,
        None => AuditConfig::default(),
    };

    let roots = if cli.roots.is_empty() {
        vec![PathBuf::from(DEFAULT_ROOT)]
    } else {
        cli.roots.clone()
    };

    let request = AuditRequest {
        roots: root_specs(roots),
        destination: cli.out.clone(),
        config,
    };

    tracing::debug!(roots = request.roots.len(), "starting audit");
    let report = modaudit_core::run(&request, &Reporter::silent())?;

    if !cli.quiet {
        let stdout = std::io::stdout();
        summary::print(&mut stdout.lock(), &report, cli.preview)
            .context("failed to write summary")?;
    }
    Ok(())
}
