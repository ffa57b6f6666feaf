//! CLI for mapprep. Takes no arguments beyond `--help` and `--version`.

use anyhow::Result;
use clap::Parser;
use mapprep_core::config::PrepConfig;
use mapprep_core::fetch::Fetcher;
use mapprep_core::pipeline;

/// Downloads id's Quake map sources and the Quake texture WAD, then rewrites
/// the maps so TrenchBroom opens them without prompting.
#[derive(Debug, Parser)]
#[command(name = "mapprep", version)]
#[command(about = "Prepare the original Quake map sources for TrenchBroom", long_about)]
pub struct Cli {}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let _cli = Cli::parse();

        let cfg = PrepConfig::default_for_exe()?;
        tracing::debug!("prep config: {:?}", cfg);

        let summary = pipeline::run(&cfg, &Fetcher::new())?;
        tracing::debug!("{:?}", summary);
        tracing::info!("Done.");
        Ok(())
    }
}
