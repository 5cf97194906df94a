//! ChangeLogger - folder change logging service
//!
//! Usage: changelogger [-v...] [--data-dir <DIR>]
//!
//! Runs until Ctrl+C. Repositories are configured by editing
//! `Repositories.config` in the data folder while the service runs.

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use changelogger::StorageLayout;

/// ChangeLogger - log every change in the folders you care about
#[derive(Parser, Debug)]
#[command(name = "changelogger")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Folder holding Repositories.config and ChangeLogs/
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level_for(cli.verbose))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let layout = cli
        .data_dir
        .map(StorageLayout::new)
        .unwrap_or_default();

    let (stop_tx, stop_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .context("Error setting Ctrl+C handler")?;

    let service = changelogger::start(layout.clone())
        .with_context(|| format!("failed to start in {}", layout.root().display()))?;
    eprintln!(
        "Watching repositories from {} (Ctrl+C to stop)",
        layout.config_file().display()
    );

    let _ = stop_rx.recv();
    service.shutdown();
    Ok(())
}
