//! Source file discovery
//!
//! Walks the repository with `.gitignore` support, filters by target
//! extension, applies the configured glob excludes, and returns files in
//! lexicographic order so downstream batching is reproducible.

use crate::config::ScannerConfig;
use anyhow::{Context, Result};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A source file handed to the detectors: repo-relative path plus content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub rel_path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(rel_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            rel_path: rel_path.into(),
            content: content.into(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// Enumerates candidate source files under inclusion/exclusion rules.
pub struct Scanner {
    root: PathBuf,
    scan_path: Option<PathBuf>,
    config: ScannerConfig,
    max_files: Option<usize>,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, config: ScannerConfig) -> Self {
        Self {
            root: root.into(),
            scan_path: None,
            config,
            max_files: None,
        }
    }

    /// Restrict the walk to a subdirectory relative to the repo root.
    pub fn with_scan_path(mut self, scan_path: Option<PathBuf>) -> Self {
        self.scan_path = scan_path;
        self
    }

    /// Cap the number of files returned (applied after sorting).
    pub fn with_max_files(mut self, max_files: Option<usize>) -> Self {
        self.max_files = max_files;
        self
    }

    /// Collect matching files, sorted lexicographically by path.
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let scan_root = match &self.scan_path {
            Some(sub) => {
                let joined = self.root.join(sub);
                if !joined.exists() {
                    warn!("Scan path not found: {}", joined.display());
                    return Ok(Vec::new());
                }
                joined
            }
            None => self.root.clone(),
        };

        let mut overrides = OverrideBuilder::new(&scan_root);
        for pattern in &self.config.exclude {
            // Leading '!' marks the glob as an exclusion
            overrides
                .add(&format!("!{}", pattern))
                .with_context(|| format!("invalid exclude pattern '{}'", pattern))?;
        }
        let overrides = overrides.build()?;

        let walker = WalkBuilder::new(&scan_root)
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .overrides(overrides)
            .build();

        let mut files = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() && self.matches_extension(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();

        if let Some(max) = self.max_files {
            if files.len() > max {
                debug!("Limiting analysis to {} of {} files", max, files.len());
                files.truncate(max);
            }
        }

        Ok(files)
    }

    /// Read a file as a repo-relative [`SourceFile`]. Unreadable files are
    /// skipped (logged) rather than failing the run.
    pub fn read(&self, path: &Path) -> Option<SourceFile> {
        let rel_path = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        match std::fs::read(path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes).into_owned();
                Some(SourceFile { rel_path, content })
            }
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => return false,
        };
        self.config.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn scanner(root: &Path) -> Scanner {
        Scanner::new(root, ScannerConfig::default())
    }

    #[test]
    fn test_collect_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/Zeta.java", "class Zeta {}");
        write(dir.path(), "src/Alpha.java", "class Alpha {}");
        write(dir.path(), "src/notes.txt", "not java");

        let files = scanner(dir.path()).collect().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Alpha.java", "Zeta.java"]);
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/Main.java", "class Main {}");
        write(dir.path(), "src/MainTest.java", "class MainTest {}");
        write(dir.path(), "src/test/Helper.java", "class Helper {}");
        write(dir.path(), "src/package-info.java", "");

        let files = scanner(dir.path()).collect().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/Main.java"));
    }

    #[test]
    fn test_max_files_cap() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["A.java", "B.java", "C.java"] {
            write(dir.path(), name, "class X {}");
        }

        let files = scanner(dir.path())
            .with_max_files(Some(2))
            .collect()
            .unwrap();
        assert_eq!(files.len(), 2);
        // Cap is applied after sorting, so the first two survive
        assert!(files[0].ends_with("A.java"));
        assert!(files[1].ends_with("B.java"));
    }

    #[test]
    fn test_missing_scan_path_is_empty_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Main.java", "class Main {}");

        let files = scanner(dir.path())
            .with_scan_path(Some(PathBuf::from("does/not/exist")))
            .collect()
            .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_read_produces_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pkg/Main.java", "class Main {}");

        let s = scanner(dir.path());
        let file = s.read(&dir.path().join("pkg/Main.java")).unwrap();
        assert_eq!(file.rel_path, "pkg/Main.java");
        assert_eq!(file.line_count(), 1);
    }
}
