//! README and provenance copy written next to the rewritten maps.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// File name the rewriting source is copied to inside the output directory.
pub const SOURCE_COPY_NAME: &str = "rewrite.rs";

/// Source of the map rewriter, embedded so the output documents exactly what ran.
pub const SOURCE_TEXT: &str = include_str!("rewrite.rs");

const MAP_SOURCE_RELEASE_URL: &str = "https://rome.ro/news/2016/2/14/quake-map-sources-released";
const TUTORIAL_URL: &str = "https://youtu.be/sg0iKjYsoBg";

/// Renders README.txt for an output directory whose textures came from `wad_url`.
pub fn readme_text(wad_url: &str, source_name: &str) -> String {
    format!(
        "\
This directory contains id's original Quake levels, modified
ever-so-slightly to make them easy to load into TrenchBroom 2.

The original levels were taken from:

  {MAP_SOURCE_RELEASE_URL}

The WAD containing the textures used in the levels was taken
from:

  {wad_url}

The map files were automatically modified by mapprep; the
rewriting code can be examined at `{source_name}`.

For more details on how to use these maps, see
dumptruck_ds's \"Mapping for Quake: TrenchBroom 2.0 -
The id Maps\" tutorial:

  {TUTORIAL_URL}
"
    )
}

/// Writes README.txt and the rewriting source copy into `output_dir`.
pub fn write_provenance(output_dir: &Path, wad_url: &str) -> Result<()> {
    let readme_path = output_dir.join(crate::config::README_FILE_NAME);
    fs::write(&readme_path, readme_text(wad_url, SOURCE_COPY_NAME))
        .with_context(|| format!("write {}", readme_path.display()))?;

    let copy_path = output_dir.join(SOURCE_COPY_NAME);
    fs::write(&copy_path, SOURCE_TEXT).with_context(|| format!("write {}", copy_path.display()))?;
    tracing::debug!(
        "wrote {} and {}",
        readme_path.display(),
        copy_path.display()
    );
    Ok(())
}
