use std::path::PathBuf;

use anyhow::{Context, Result};
use aya::include_bytes_aligned;
use clap::Parser;

use tracemark::TracemarkEngine;
use tracemark::settings::Settings;

#[derive(Debug, Parser)]
struct Opt {
    /// Verbose output
    #[clap(short, long)]
    verbose: bool,

    /// Load an eBPF object file instead of the embedded bytecode
    #[clap(long)]
    object: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if opt.verbose { "info" } else { "warn" }),
    )
    .init();

    let settings = Settings::new().context("Failed to load settings")?;

    let engine = match &opt.object {
        Some(path) => TracemarkEngine::from_object_file(settings, path)?,
        None => TracemarkEngine::new(
            settings,
            include_bytes_aligned!(concat!(env!("OUT_DIR"), "/tracemark")),
        )?,
    };

    engine.run().await
}
