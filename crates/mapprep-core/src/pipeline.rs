//! Download, extract, rewrite, document: the whole preparation run.

use crate::archive;
use crate::config::PrepConfig;
use crate::fetch::{FetchOutcome, Fetcher};
use crate::readme;
use crate::rewrite;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Counts reported after a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepSummary {
    pub downloaded: usize,
    pub already_present: usize,
    pub files_extracted: usize,
    pub maps_rewritten: usize,
    pub output_dir: PathBuf,
}

/// Runs every step in order; the first failure aborts the run.
pub fn run(cfg: &PrepConfig, fetcher: &Fetcher) -> Result<PrepSummary> {
    let mut summary = PrepSummary {
        output_dir: cfg.output_dir(),
        ..PrepSummary::default()
    };

    for source in cfg.archives() {
        let dest = cfg.archive_path(source);
        let outcome = fetcher
            .download(&source.url, &dest)
            .with_context(|| format!("download {}", source.url))?;
        match outcome {
            FetchOutcome::AlreadyPresent => summary.already_present += 1,
            FetchOutcome::Downloaded {
                final_url,
                bytes,
                redirects,
                sha256,
            } => {
                tracing::debug!(
                    "{} bytes from {} after {} redirect(s), sha256 {}",
                    bytes,
                    final_url,
                    redirects,
                    sha256
                );
                summary.downloaded += 1;
            }
        }
    }

    let output_dir = cfg.output_dir();
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;

    for source in cfg.archives() {
        let path = cfg.archive_path(source);
        summary.files_extracted += archive::extract_zip(&path, &output_dir)
            .with_context(|| format!("extract {}", path.display()))?;
    }

    summary.maps_rewritten = rewrite::rewrite_maps_in(&output_dir).context("rewrite maps")?;

    readme::write_provenance(&output_dir, &cfg.texture_wad.url)?;

    Ok(summary)
}
