//! Init command implementation.
//!
//! Generates a `css-export.yaml` config from discovered stylesheets.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{discover, CONFIG_FILENAME};
use crate::error::{CssExportError, Result};
use crate::output::{display_path, plural, Printer};

/// Initialize a css-export project by generating css-export.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing css-export.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(CssExportError::Build {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let discovery = discover(&args.path)?;

    // Unique parent directories, relative to the project root
    let mut source_dirs = BTreeSet::new();
    for file in &discovery.scan.stylesheets {
        if let Some(parent) = file.parent() {
            let relative = parent.strip_prefix(&discovery.root).unwrap_or(parent);
            let dir = if relative == Path::new("") {
                ".".to_string()
            } else {
                format!("{}/", relative.display())
            };
            source_dirs.insert(dir);
        }
    }

    // Build YAML manually for clean formatting
    let mut yaml = String::new();
    if !(source_dirs.is_empty() || (source_dirs.len() == 1 && source_dirs.contains("."))) {
        yaml.push_str("sources:\n");
        for dir in &source_dirs {
            yaml.push_str(&format!("  - \"{}\"\n", dir));
        }
    }
    yaml.push_str("output: dist\n");
    yaml.push_str("excludes:\n  - \"**/node_modules/*\"\n");
    yaml.push_str("is_global_module: false\n");
    yaml.push_str("enable_merge_exports: false\n");
    yaml.push_str("shared_export_name: sharedData\n");
    yaml.push_str("# none | lower-camel | upper-camel\n");
    yaml.push_str("property_name_transformer: none\n");
    yaml.push_str("additional_data: {}\n");

    fs::write(&config_path, &yaml).map_err(|e| CssExportError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    if !source_dirs.is_empty() {
        let dirs: Vec<&str> = source_dirs.iter().map(|s| s.as_str()).collect();
        printer.info("Discovered", &dirs.join(", "));
    }

    printer.success(
        "Created",
        &format!(
            "{} ({} found)",
            CONFIG_FILENAME,
            plural(discovery.scan.total(), "stylesheet", "stylesheets")
        ),
    );

    Ok(())
}
