//! Tile catalog maintenance for point-cloud deliveries.
//!
//! Tiles are files named `<prefix><number><suffix>`. A [`TileCatalog`]
//! reports the tile numbers present in one directory and the names of the
//! tiles missing between them; [`copy_unique_tiles`] gathers tiles split
//! across `fishnet_<n>` folders into one directory.

use crate::error::{HizError, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Tile files in one directory.
#[derive(Debug, Clone)]
pub struct TileCatalog {
    directory: PathBuf,
    prefix: String,
    suffix: String,
    pattern: Regex,
}

impl TileCatalog {
    /// `pattern` must match from the start of a file name and hold exactly
    /// one capture group with the tile number.
    pub fn new(
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        pattern: &str,
    ) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| HizError::Configuration(format!("Invalid tile pattern: {}", e)))?;
        if pattern.captures_len() != 2 {
            return Err(HizError::Configuration(format!(
                "Tile pattern must have exactly one capture group, found {}",
                pattern.captures_len() - 1
            )));
        }

        Ok(Self {
            directory: directory.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
            pattern,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Sorted tile numbers of the matching files.
    pub fn tile_numbers(&self) -> Result<Vec<u64>> {
        let mut numbers = Vec::new();
        for name in file_names(&self.directory)? {
            let Some(captures) = self.pattern.captures(&name) else {
                continue;
            };
            if captures.get(0).is_some_and(|m| m.start() != 0) {
                continue;
            }
            let Some(group) = captures.get(1) else {
                continue;
            };
            match group.as_str().parse::<u64>() {
                Ok(number) => numbers.push(number),
                Err(_) => log::warn!("Ignoring tile '{}': '{}' is not a number", name, group.as_str()),
            }
        }
        numbers.sort_unstable();
        Ok(numbers)
    }

    /// File names of the tiles skipped between consecutive tile numbers.
    pub fn missing_tiles(&self) -> Result<Vec<String>> {
        let numbers = self.tile_numbers()?;
        let missing: Vec<String> = numbers
            .windows(2)
            .flat_map(|pair| (pair[0] + 1)..pair[1])
            .map(|number| format!("{}{}{}", self.prefix, number, self.suffix))
            .collect();

        log::debug!(
            "Found {} tiles and {} gaps in {}",
            numbers.len(),
            missing.len(),
            self.directory.display()
        );
        Ok(missing)
    }
}

/// Outcome of [`copy_unique_tiles`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<String>,
    pub duplicates: Vec<String>,
    pub missing_folders: Vec<PathBuf>,
}

/// Copy tiles named `<prefix>...<suffix>` from `src/fishnet_<n>` for each
/// `n` in `folders` into `dst`, keeping the first copy of each file name.
///
/// `dst` is created when absent. Missing folders are skipped.
pub fn copy_unique_tiles(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    prefix: &str,
    suffix: &str,
    folders: impl IntoIterator<Item = u32>,
) -> Result<CopyReport> {
    let src = src.as_ref();
    let dst = dst.as_ref();
    std::fs::create_dir_all(dst)?;

    let mut seen = BTreeSet::new();
    let mut report = CopyReport::default();

    for folder in folders {
        let folder_path = src.join(format!("fishnet_{}", folder));
        if !folder_path.is_dir() {
            log::warn!("Folder not found: {}", folder_path.display());
            report.missing_folders.push(folder_path);
            continue;
        }

        for name in file_names(&folder_path)? {
            if !(name.starts_with(prefix) && name.ends_with(suffix)) {
                continue;
            }
            if seen.insert(name.clone()) {
                std::fs::copy(folder_path.join(&name), dst.join(&name))?;
                log::debug!("Copied {}", name);
                report.copied.push(name);
            } else {
                log::warn!("Duplicate tile skipped: {}", name);
                report.duplicates.push(name);
            }
        }
    }

    log::info!(
        "Copied {} tiles into {} ({} duplicates, {} missing folders)",
        report.copied.len(),
        dst.display(),
        report.duplicates.len(),
        report.missing_folders.len()
    );
    Ok(report)
}

/// Names of the regular files directly inside `dir`, sorted.
fn file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| HizError::Io(std::io::Error::other(e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pattern_needs_one_group() {
        assert!(TileCatalog::new(".", "t_", ".las", r"t_\d+\.las").is_err());
        assert!(TileCatalog::new(".", "t_", ".las", r"(t_(\d+))\.las").is_err());
        assert!(TileCatalog::new(".", "t_", ".las", r"t_(\d+)\.las").is_ok());
        assert!(TileCatalog::new(".", "t_", ".las", r"t_((\d+)").is_err());
    }

    #[test]
    fn test_pattern_anchored_at_start() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("t_3.las"), b"").unwrap();
        std::fs::write(dir.path().join("old_t_9.las"), b"").unwrap();

        let catalog = TileCatalog::new(dir.path(), "t_", ".las", r"t_(\d+)\.las").unwrap();
        assert_eq!(catalog.tile_numbers().unwrap(), vec![3]);
    }

    #[test]
    fn test_unreadable_directory() {
        let catalog =
            TileCatalog::new("/nonexistent/tiles", "t_", ".las", r"t_(\d+)\.las").unwrap();
        assert!(catalog.tile_numbers().is_err());
    }
}
