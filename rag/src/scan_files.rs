use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};

/// Supported files directly inside `dir`, sorted by name.
///
/// A missing directory is created so first runs start from an empty list.
pub fn scan_files(cfg: &Config, dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(vec![]);
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut results = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !cfg.is_supported(&name) {
            warn!(file = %name, "ignoring file with unsupported format");
            continue;
        }
        results.push(entry.into_path());
    }

    Ok(results)
}
