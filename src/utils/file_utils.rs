use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants;

/// Directory the setup menu lists maps from: the first existing candidate
/// ("maps" preferred, current directory otherwise).
pub fn maps_dir() -> PathBuf {
    constants::MAP_DIR_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Map files in the maps directory, sorted by name.
pub fn scan_map_files() -> Result<Vec<PathBuf>> {
    let dir = maps_dir();

    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .with_context(|| format!("failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_allowed_extension(path, constants::MAP_EXTENSIONS))
        .collect();

    files.sort();
    Ok(files)
}

pub fn has_allowed_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    let ext = ext.to_ascii_lowercase();
    allowed.iter().any(|allowed_ext| *allowed_ext == ext.as_str())
}
