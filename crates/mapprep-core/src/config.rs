use anyhow::{Context, Result};
use std::path::PathBuf;

/// Texture WAD archive published on Quaddicted; also quoted in the generated README.
pub const QUAKE_WAD_URL: &str = "https://www.quaddicted.com/files/wads/quakewad.zip";

/// id's released map sources.
pub const QUAKE_MAP_SOURCE_URL: &str = "https://rome.ro/s/quake_map_source.zip";

/// Directory (under the base dir) that receives extracted and rewritten files.
pub const OUTPUT_DIR_NAME: &str = "quake_map_source";

pub const README_FILE_NAME: &str = "README.txt";

/// A remote archive and the file name it is stored under in the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSource {
    pub url: String,
    pub file_name: String,
}

impl ArchiveSource {
    pub fn new(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            file_name: file_name.into(),
        }
    }

    pub fn map_sources() -> Self {
        Self::new(QUAKE_MAP_SOURCE_URL, "quake_map_source.zip")
    }

    pub fn texture_wad() -> Self {
        Self::new(QUAKE_WAD_URL, "quakewad.zip")
    }
}

/// Fixed locations and sources for one preparation run.
///
/// Everything is hard-coded; the only variable input is the base directory,
/// which defaults to the directory holding the running executable.
#[derive(Debug, Clone)]
pub struct PrepConfig {
    /// Directory the archives are downloaded into and the output dir lives under.
    pub base_dir: PathBuf,
    /// Name of the output directory inside `base_dir`.
    pub output_dir_name: String,
    /// Archive holding the `.map` sources.
    pub map_sources: ArchiveSource,
    /// Archive holding the texture WAD the rewritten maps reference.
    pub texture_wad: ArchiveSource,
}

impl PrepConfig {
    /// Default sources rooted at `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            output_dir_name: OUTPUT_DIR_NAME.to_string(),
            map_sources: ArchiveSource::map_sources(),
            texture_wad: ArchiveSource::texture_wad(),
        }
    }

    /// Default sources rooted next to the running executable.
    pub fn default_for_exe() -> Result<Self> {
        let exe = std::env::current_exe().context("cannot locate running executable")?;
        let exe = exe
            .canonicalize()
            .with_context(|| format!("resolve {}", exe.display()))?;
        let dir = exe
            .parent()
            .with_context(|| format!("{} has no parent directory", exe.display()))?;
        Ok(Self::with_base_dir(dir))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output_dir_name)
    }

    /// Local path an archive is downloaded to.
    pub fn archive_path(&self, source: &ArchiveSource) -> PathBuf {
        self.base_dir.join(&source.file_name)
    }

    pub fn readme_path(&self) -> PathBuf {
        self.output_dir().join(README_FILE_NAME)
    }

    pub fn source_copy_path(&self) -> PathBuf {
        self.output_dir().join(crate::readme::SOURCE_COPY_NAME)
    }

    /// Both archives, in the order they are downloaded and extracted.
    pub fn archives(&self) -> [&ArchiveSource; 2] {
        [&self.map_sources, &self.texture_wad]
    }
}
