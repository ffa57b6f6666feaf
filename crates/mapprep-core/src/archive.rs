//! Zip extraction into the output directory.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

/// Extracts every entry of the zip at `archive_path` into `dest_dir`, overwriting
/// files of the same name. Returns the number of files written.
///
/// Entries whose names would land outside `dest_dir` are skipped.
pub fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<usize> {
    tracing::info!(
        "Extracting {} to {}.",
        archive_path.display(),
        dest_dir.display()
    );

    let file =
        File::open(archive_path).with_context(|| format!("open {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("{} is not a readable zip archive", archive_path.display()))?;

    let mut written = 0usize;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("entry {} of {}", i, archive_path.display()))?;
        let entry_path = match entry.enclosed_name() {
            Some(p) => p.to_path_buf(),
            None => {
                tracing::warn!("skipping unsafe archive entry {:?}", entry.name());
                continue;
            }
        };

        let output_path = dest_dir.join(&entry_path);
        if entry.is_dir() {
            fs::create_dir_all(&output_path)
                .with_context(|| format!("create {}", output_path.display()))?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let mut outfile = File::create(&output_path)
            .with_context(|| format!("create {}", output_path.display()))?;
        let n = io::copy(&mut entry, &mut outfile)
            .with_context(|| format!("write {}", output_path.display()))?;
        tracing::debug!("extracted {} ({} bytes)", output_path.display(), n);
        written += 1;
    }

    Ok(written)
}
