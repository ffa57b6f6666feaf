//! Map rewriting for TrenchBroom.
//!
//! TrenchBroom asks which game and map format a file uses unless the first
//! lines say so, and the default answer fails with a confusing error. The
//! `wad` worldspawn property in id's sources also points at a WAD path on
//! id's machines; it is pointed at the bundled `QUAKE101.WAD` instead so the
//! textures load.

use regex::bytes::{NoExpand, Regex};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Comment lines TrenchBroom reads to pick the game and map format.
pub const MAP_HEADER_LINES: [&str; 2] = ["// Game: Quake", "// Format: Standard"];

/// Replacement for the first `"wad" "..."` line.
pub const WAD_PROPERTY_LINE: &str = "\"wad\"\t\"QUAKE101.WAD\"";

pub const MAP_EXTENSION: &str = "map";

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("unable to find 'wad' property in {}", .path.display())]
    MissingWadProperty { path: PathBuf },
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Map sources are not guaranteed UTF-8 (Latin-1 `message` values), so the
/// value may hold arbitrary bytes.
fn wad_property() -> &'static Regex {
    static WAD_PROPERTY: OnceLock<Regex> = OnceLock::new();
    WAD_PROPERTY.get_or_init(|| {
        Regex::new(r#"(?m)^"wad"\s"(?-u:.)+"$"#).expect("wad property pattern is valid")
    })
}

/// Converts CRLF and lone CR line endings to LF.
fn normalize_newlines(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        if b == b'\r' {
            bytes.next_if_eq(&b'\n');
            out.push(b'\n');
        } else {
            out.push(b);
        }
    }
    out
}

/// Applies the header and `wad` rewrite to raw map bytes.
///
/// Returns None when the substitution changes nothing: no `"wad" "..."` line,
/// or one that already reads `"wad"\t"QUAKE101.WAD"`. Line endings are
/// normalized to `\n`; every other byte passes through untouched.
pub fn rewrite_map_bytes(original: &[u8]) -> Option<Vec<u8>> {
    let mut with_header = MAP_HEADER_LINES.join("\n").into_bytes();
    with_header.push(b'\n');
    with_header.extend_from_slice(&normalize_newlines(original));

    let replaced =
        wad_property().replacen(&with_header, 1, NoExpand(WAD_PROPERTY_LINE.as_bytes()));
    if *replaced == *with_header {
        return None;
    }
    Some(replaced.into_owned())
}

/// [`rewrite_map_bytes`] for text already in memory.
pub fn rewrite_map_text(original: &str) -> Option<String> {
    rewrite_map_bytes(original.as_bytes()).map(|b| String::from_utf8_lossy(&b).into_owned())
}

/// Rewrites one map file in place. The file is left untouched on error.
pub fn rewrite_map_file(path: &Path) -> Result<(), RewriteError> {
    tracing::info!("Rewriting {} for easy opening in TrenchBroom...", path.display());
    let original = fs::read(path).map_err(|source| RewriteError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;
    let rewritten =
        rewrite_map_bytes(&original).ok_or_else(|| RewriteError::MissingWadProperty {
            path: path.to_path_buf(),
        })?;
    fs::write(path, rewritten).map_err(|source| RewriteError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })
}

/// `*.map` files directly inside `dir`, sorted by name. Dotfiles are skipped.
pub fn map_files(dir: &Path) -> Result<Vec<PathBuf>, RewriteError> {
    let list_err = |source| RewriteError::Io {
        action: "list",
        path: dir.to_path_buf(),
        source,
    };
    let mut maps = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let path = entry.map_err(list_err)?.path();
        let hidden = path
            .file_name()
            .map_or(true, |n| n.to_string_lossy().starts_with('.'));
        if !hidden
            && path.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(MAP_EXTENSION)
        {
            maps.push(path);
        }
    }
    maps.sort();
    Ok(maps)
}

/// Rewrites every map in `dir`, stopping at the first failure. Returns the count.
pub fn rewrite_maps_in(dir: &Path) -> Result<usize, RewriteError> {
    let maps = map_files(dir)?;
    for map in &maps {
        rewrite_map_file(map)?;
    }
    Ok(maps.len())
}
