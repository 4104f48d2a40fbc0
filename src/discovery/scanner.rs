//! File system scanner for discovering stylesheets.
//!
//! Recursively scans directories to find every file with a stylesheet
//! extension (`.css`, `.scss`, `.module.less`, ...).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::types::STYLESHEET_EXTENSIONS;

use super::config::Config;

/// Result of scanning for stylesheets.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Discovered stylesheets, in walk order.
    pub stylesheets: Vec<PathBuf>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of discovered files.
    pub fn total(&self) -> usize {
        self.stylesheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stylesheets.is_empty()
    }

    /// Merge another scan result into this one, skipping duplicates.
    pub fn merge(&mut self, other: ScanResult) {
        for path in other.stylesheets {
            if !self.stylesheets.contains(&path) {
                self.stylesheets.push(path);
            }
        }
    }
}

/// Scan a directory for stylesheets.
pub fn scan_directory(root: &Path, config: &Config) -> ScanResult {
    let mut result = ScanResult::new();

    if !root.exists() {
        return result;
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if path.is_dir() || config.is_excluded(path) {
            continue;
        }

        if is_stylesheet(path) {
            result.stylesheets.push(path.to_path_buf());
        }
    }

    result
}

/// Scan multiple source paths.
pub fn scan_sources(sources: &[String], base_path: &Path, config: &Config) -> ScanResult {
    let mut result = ScanResult::new();

    for source in sources {
        let source_path = if Path::new(source).is_absolute() {
            PathBuf::from(source)
        } else {
            base_path.join(source)
        };

        result.merge(scan_directory(&source_path, config));
    }

    result
}

/// Whether the path has a stylesheet extension.
pub fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| STYLESHEET_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}
