//! Project configuration (css-export.yaml) parsing.
//!
//! The config file defines where stylesheets live, where generated modules
//! go, and the module options every stylesheet is transformed with.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::casing::{kebab_to_lower_camel, kebab_to_upper_camel};
use crate::error::{CssExportError, Result};
use crate::pipeline::{ModuleOptions, DEFAULT_SHARED_EXPORT_NAME};
use crate::types::SharedData;

/// Renaming applied to export paths and property names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameCase {
    #[default]
    None,
    LowerCamel,
    UpperCamel,
}

/// Project configuration loaded from css-export.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source directories to scan for stylesheets.
    /// Defaults to current directory if empty.
    pub sources: Vec<String>,

    /// Output directory for generated modules.
    pub output: PathBuf,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,

    /// Apply class-map policies to every stylesheet.
    pub is_global_module: bool,

    /// Merge into the class-map default export instead of overriding it.
    pub enable_merge_exports: bool,

    /// Binding name used in merge mode.
    pub shared_export_name: String,

    pub property_name_transformer: NameCase,

    /// Data merged over every stylesheet's own exports.
    pub additional_data: SharedData,

    /// Glob patterns of request paths transformed even without `?export`.
    pub include: Vec<String>,
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: vec![],
            output: default_output(),
            excludes: vec![],
            is_global_module: false,
            enable_merge_exports: false,
            shared_export_name: DEFAULT_SHARED_EXPORT_NAME.to_string(),
            property_name_transformer: NameCase::None,
            additional_data: SharedData::new(),
            include: vec![],
        }
    }
}

impl Config {
    /// Load config from a css-export.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CssExportError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse config from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| CssExportError::Config {
            message: format!("Invalid config: {}", e),
            help: Some("Check css-export.yaml syntax".to_string()),
        })
    }

    /// Check if a path should be excluded based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }

    /// Get effective source paths, defaulting to current directory.
    pub fn effective_sources(&self) -> Vec<String> {
        if self.sources.is_empty() {
            vec![".".to_string()]
        } else {
            self.sources.clone()
        }
    }

    /// Resolve into the options of a plugin instance.
    pub fn module_options(&self) -> Result<ModuleOptions> {
        let mut builder = ModuleOptions::builder()
            .global_module(self.is_global_module)
            .merge_exports(self.enable_merge_exports)
            .shared_export_name(self.shared_export_name.clone())
            .additional_data(self.additional_data.clone());

        builder = match self.property_name_transformer {
            NameCase::None => builder,
            NameCase::LowerCamel => builder.property_name_transformer(kebab_to_lower_camel),
            NameCase::UpperCamel => builder.property_name_transformer(kebab_to_upper_camel),
        };

        if !self.include.is_empty() {
            let include = build_globset(&self.include)?;
            builder = builder.should_transform(move |id| {
                let path = id.split('?').next().unwrap_or(id);
                include.is_match(path) || include.is_match(path.trim_start_matches('/'))
            });
        }

        builder.build()
    }
}

/// Compile include patterns. `*` stays within one path segment, `**` spans any.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| CssExportError::Config {
                message: format!("Invalid include pattern '{}': {}", pattern, e),
                help: Some("Use glob syntax such as `src/**/*.scss`".to_string()),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| CssExportError::Config {
        message: format!("Failed to compile include patterns: {}", e),
        help: None,
    })
}

/// Simple glob pattern matching.
pub fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("**/") {
        // **/dir/* matches anything inside dir anywhere in the path
        if let Some(dir) = suffix.strip_suffix("/*") {
            return path.contains(&format!("/{}/", dir)) || path.starts_with(&format!("{}/", dir));
        }
        return path.contains(suffix);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", prefix))
            || path.contains(&format!("/{}/", prefix));
    }

    path.contains(pattern)
}
