//! Check command implementation.
//!
//! Runs extraction only and reports selector diagnostics.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::discovery::discover_paths;
use crate::error::{CssExportError, Result};
use crate::output::{display_path, plural, Printer};
use crate::parser::extract_shared_data;
use crate::validation::{print_diagnostics, summary, Diagnostics};

use super::load_config;

/// Check export selectors without writing anything
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Stylesheets or directories to check
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Config file (default: ./css-export.yaml when present)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let options = config.module_options()?;
    let transformer = options.property_name_transformer().map(|t| t.as_ref());
    let discovery = discover_paths(&args.paths, config)?;

    let mut all = Diagnostics::new();
    for file in &discovery.scan.stylesheets {
        let source = fs::read_to_string(file).map_err(|e| CssExportError::Io {
            path: file.clone(),
            message: format!("Failed to read file: {}", e),
        })?;
        let display = display_path(file);

        let extraction = extract_shared_data(&source, transformer);
        print_diagnostics(&display, &source, &extraction.diagnostics);
        printer.status(
            "Checked",
            &format!(
                "{} ({})",
                display,
                plural(extraction.result.shared_data.len(), "key", "keys")
            ),
        );
        all.merge(extraction.diagnostics);
    }

    if all.has_errors() {
        printer.error("Failed", &summary(&all));
        return Err(CssExportError::Build {
            message: format!("{} in export selectors", plural(all.error_count(), "error", "errors")),
            help: None,
        });
    }

    let message = format!(
        "{}: {}",
        plural(discovery.scan.total(), "stylesheet", "stylesheets"),
        summary(&all)
    );
    if all.has_warnings() {
        printer.warning("Finished", &message);
    } else {
        printer.success("Finished", &message);
    }
    Ok(())
}
