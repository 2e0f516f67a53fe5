// src/discovery.rs
//! Descriptor file discovery.

use crate::config::Config;
use crate::error::{PomError, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Walks directory trees collecting `pom.xml` and `*.pom` files.
#[derive(Debug, Clone)]
pub struct FileScanner {
    ignored_dirs: Vec<String>,
    ignored_paths: Vec<PathBuf>,
}

impl FileScanner {
    /// Ignored paths are canonicalized so they compare against walked
    /// entries; a path that does not exist is kept as given.
    #[must_use]
    pub fn new(ignored_dirs: Vec<String>, ignored_paths: Vec<PathBuf>) -> Self {
        let ignored_paths = ignored_paths
            .into_iter()
            .map(|p| p.canonicalize().unwrap_or(p))
            .collect();
        Self {
            ignored_dirs,
            ignored_paths,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ignored_dirs.clone(), config.ignored_paths.clone())
    }

    /// Returns every descriptor file under `root` outside ignored directories.
    /// Unreadable directories are logged and skipped.
    ///
    /// # Errors
    /// Returns `PomError::FileSystem` if `root` does not exist.
    pub fn scan(&self, root: &Path) -> Result<BTreeSet<PathBuf>> {
        let root = root.canonicalize().map_err(|source| PomError::FileSystem {
            source,
            path: root.to_path_buf(),
        })?;

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_type().is_dir() || self.accepts_dir(e.path()));

        let (files, error_count) = accumulate_walker(walker);
        if error_count > 0 {
            tracing::warn!(root = %root.display(), errors = error_count, "skipped unreadable entries during scan");
        }
        Ok(files)
    }

    /// False when the directory name matches the ignore list (case-insensitive)
    /// or its path equals an ignored path.
    #[must_use]
    pub fn accepts_dir(&self, dir: &Path) -> bool {
        let name = dir.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let ignored_by_name = self
            .ignored_dirs
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(&name));
        let ignored_by_path = self.ignored_paths.iter().any(|p| p == dir);
        !(ignored_by_name || ignored_by_path)
    }
}

fn accumulate_walker<I>(walker: I) -> (BTreeSet<PathBuf>, usize)
where
    I: Iterator<Item = walkdir::Result<DirEntry>>,
{
    let mut files = BTreeSet::new();
    let mut errors = 0;
    for item in walker {
        match item {
            Ok(entry) => {
                if entry.file_type().is_file() && is_descriptor(entry.path()) {
                    files.insert(entry.into_path());
                }
            }
            Err(e) => {
                errors += 1;
                tracing::warn!("{}", PomError::from(e));
            }
        }
    }
    (files, errors)
}

/// A descriptor is named `pom.xml` (any case) or ends with `.pom`.
#[must_use]
pub fn is_descriptor(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.eq_ignore_ascii_case("pom.xml") || name.ends_with(".pom")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> std::io::Result<()> {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "<project/>")
    }

    #[test]
    fn test_is_descriptor() {
        assert!(is_descriptor(Path::new("a/pom.xml")));
        assert!(is_descriptor(Path::new("a/POM.XML")));
        assert!(is_descriptor(Path::new("lib-1.0.pom")));
        assert!(!is_descriptor(Path::new("pom.xml.bak")));
        assert!(!is_descriptor(Path::new("build.gradle")));
    }

    #[test]
    fn test_scan_skips_ignored_dirs() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        touch(temp.path(), "pom.xml")?;
        touch(temp.path(), "core/pom.xml")?;
        touch(temp.path(), "core/target/classes/pom.xml")?;
        touch(temp.path(), "Node_Modules/x/pom.xml")?;
        touch(temp.path(), "repo/lib-1.0.pom")?;
        touch(temp.path(), "core/notes.txt")?;

        let scanner = FileScanner::from_config(&Config::new());
        let files = scanner.scan(temp.path())?;

        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| !f.to_string_lossy().contains("target")));
        Ok(())
    }

    #[test]
    fn test_scan_skips_ignored_absolute_path() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        touch(temp.path(), "a/pom.xml")?;
        touch(temp.path(), "b/pom.xml")?;
        let ignored = temp.path().canonicalize()?.join("b");

        let scanner = FileScanner::new(Vec::new(), vec![ignored]);
        let files = scanner.scan(temp.path())?;
        assert_eq!(files.len(), 1);
        Ok(())
    }

    #[test]
    fn test_scan_skips_ignored_path_given_indirectly() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        touch(temp.path(), "a/pom.xml")?;
        touch(temp.path(), "b/pom.xml")?;
        let indirect = temp.path().join("a").join("..").join("b");

        let scanner = FileScanner::new(Vec::new(), vec![indirect]);
        let files = scanner.scan(temp.path())?;
        assert_eq!(files.len(), 1);
        assert!(files.iter().all(|f| f.ends_with("a/pom.xml")));
        Ok(())
    }

    #[test]
    fn test_missing_root_is_filesystem_error() {
        let scanner = FileScanner::from_config(&Config::new());
        let result = scanner.scan(Path::new("/definitely/not/here/pomgraph"));
        assert!(matches!(result, Err(PomError::FileSystem { .. })));
    }
}
