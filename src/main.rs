//! wordct - Concurrent Word Frequency Counter
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wordct::config::{CliArgs, CountConfig};
use wordct::engine::CountCoordinator;
use wordct::progress::{print_header, print_summary, write_counts, ProgressReporter};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose, args.quiet)?;

    // Validate and create config
    let config = CountConfig::from_args(args).context("Invalid configuration")?;

    if config.show_progress {
        print_header(
            config.sources.len(),
            config.mode.name(),
            config.store.name(),
        );
    }

    // Spinner only when there are files; stdin may be interactive
    let progress = if config.show_progress && !config.reads_stdin() {
        Some(ProgressReporter::new())
    } else {
        None
    };

    if let Some(ref p) = progress {
        p.set_status(&format!("Counting {} sources...", config.sources.len()));
    }

    let show_progress = config.show_progress;
    let result = CountCoordinator::new(config)
        .run()
        .context("Count failed")?;

    if let Some(ref p) = progress {
        p.finish_and_clear();
    }

    // Output
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_counts(&mut out, &result.counts()).context("Failed to write counts")?;

    if show_progress {
        print_summary(&result);
    }

    if result.producer_failures > 0 {
        info!(
            failures = result.producer_failures,
            "Count completed with producer failures"
        );
    }

    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("wordct=debug,warn")
    } else if quiet {
        EnvFilter::new("wordct=warn")
    } else {
        EnvFilter::new("wordct=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
