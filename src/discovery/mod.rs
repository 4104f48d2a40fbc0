//! Stylesheet discovery for css-export projects.
//!
//! Finds the stylesheets of a project directory, either by scanning the
//! whole directory or the sources listed in a `css-export.yaml` config.
//!
//! # Example
//!
//! ```ignore
//! use css_export::discovery::discover;
//!
//! let result = discover("./my-project")?;
//! println!("Found {} stylesheets", result.scan.total());
//! ```

mod config;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use config::{matches_pattern, Config, NameCase};
pub use scanner::{is_stylesheet, scan_directory, scan_sources, ScanResult};

/// The name of the config file.
pub const CONFIG_FILENAME: &str = "css-export.yaml";

/// Result of discovering stylesheets in a project.
#[derive(Debug)]
pub struct DiscoveryResult {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded config (default if no css-export.yaml was found).
    pub config: Config,

    /// Whether a css-export.yaml config was found.
    pub has_config: bool,

    /// Discovered stylesheets.
    pub scan: ScanResult,
}

/// Discover stylesheets in a project directory.
///
/// Looks for a `css-export.yaml` in the root directory. If found, scans the
/// config's source paths; otherwise scans the entire directory.
pub fn discover(root: impl AsRef<Path>) -> Result<DiscoveryResult> {
    let root = root.as_ref().to_path_buf();
    let config_path = root.join(CONFIG_FILENAME);
    let (config, has_config) = if config_path.exists() {
        (Config::load(&config_path)?, true)
    } else {
        (Config::default(), false)
    };

    discover_with_config(root, config, has_config)
}

/// Discover stylesheets using an already loaded config.
pub fn discover_with_config(root: PathBuf, config: Config, has_config: bool) -> Result<DiscoveryResult> {
    let sources = config.effective_sources();
    let scan = scan_sources(&sources, &root, &config);

    Ok(DiscoveryResult {
        root,
        config,
        has_config,
        scan,
    })
}

/// Discover stylesheets from specific files and directories.
///
/// Single files are taken as given when they have a stylesheet extension.
pub fn discover_paths(paths: &[PathBuf], config: Config) -> Result<DiscoveryResult> {
    let mut scan = ScanResult::new();

    for path in paths {
        if path.is_dir() {
            scan.merge(scan_directory(path, &config));
        } else if path.is_file() && is_stylesheet(path) {
            scan.merge(ScanResult {
                stylesheets: vec![path.clone()],
            });
        }
    }

    let root = paths
        .first()
        .map(|p| if p.is_dir() { p.as_path() } else { p.parent().unwrap_or(Path::new(".")) })
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(DiscoveryResult {
        root,
        config,
        has_config: false,
        scan,
    })
}
