//! headergen: regenerate C headers and module files from an XML API registry.
//!
//! ```text
//! headergen registry/scripts/headers.yaml
//! headergen headers.yaml --timestamp "2025-01-01 00:00:00+00:00" --dry-run
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use headergen::{Config, FsSink, Generator, MemorySink};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "headergen",
    about = "Generate C headers and C++ modules from a Khronos-style XML registry"
)]
struct Cli {
    /// Configuration file listing the outputs to generate.
    config: PathBuf,

    /// Timestamp printed in file banners (defaults to the current UTC time).
    #[arg(long)]
    timestamp: Option<String>,

    /// Render everything but only list the files that would be written.
    #[arg(long)]
    dry_run: bool,

    /// Log progress in more detail.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let timestamp = cli.timestamp.unwrap_or_else(|| {
        chrono::Utc::now()
            .format("%Y-%m-%d %H:%M:%S%.6f%:z")
            .to_string()
    });

    let mut generator = Generator::new(timestamp);
    if cli.dry_run {
        let mut sink = MemorySink::new();
        generator.run(&config, &mut sink).context("generation failed")?;
        for path in sink.paths() {
            println!("{}", path.display());
        }
    } else {
        generator
            .run(&config, &mut FsSink)
            .context("generation failed")?;
    }
    Ok(())
}
