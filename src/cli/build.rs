//! Build command implementation.
//!
//! Runs every discovered stylesheet through the full pipeline and writes the
//! resulting modules (and, unless inlined, the remaining CSS) to the output
//! directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;

use crate::codegen::esm::string_literal;
use crate::discovery::{discover_paths, discover_with_config, Config, DiscoveryResult};
use crate::error::{CssExportError, Result};
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{CssExportPlugin, CssModuleStage, Pipeline};
use crate::types::{ModuleRequest, EXPORT_PARAM, INLINE_PARAM};
use crate::validation::print_diagnostics;

use super::load_config;

/// Generate ES modules from stylesheets
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Stylesheets or directories to process (default: config sources)
    pub paths: Vec<PathBuf>,

    /// Output directory (default: config output)
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Emit module text only, without a separate CSS file
    #[arg(long)]
    pub inline: bool,

    /// Config file (default: ./css-export.yaml when present)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let output = args.out.clone().unwrap_or_else(|| config.output.clone());

    let options = config.module_options()?;
    let discovery = discover(&args.paths, config)?;
    let plan = plan_outputs(&discovery)?;

    if !output.exists() {
        fs::create_dir_all(&output).map_err(|e| CssExportError::Io {
            path: output.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let plugin = Arc::new(CssExportPlugin::new(options));
    let mut pipeline = Pipeline::new().with_stage(CssModuleStage::new());
    plugin.install(&mut pipeline)?;
    plugin.build_start();

    let mut errors = 0;
    let mut warnings = 0;
    for (target, file) in plan {
        let (file_errors, file_warnings) =
            build_file(&file, &output.join(target), args.inline, &plugin, &pipeline, printer)?;
        errors += file_errors;
        warnings += file_warnings;
    }

    if errors > 0 {
        return Err(CssExportError::Build {
            message: format!("{} in export selectors", plural(errors, "error", "errors")),
            help: Some("Export paths may only contain names separated by spaces".to_string()),
        });
    }

    let mut summary = format!(
        "{} to {}",
        plural(discovery.scan.total(), "stylesheet", "stylesheets"),
        display_path(&output)
    );
    if warnings > 0 {
        summary.push_str(&format!(" ({})", plural(warnings, "warning", "warnings")));
    }
    printer.success("Finished", &summary);

    Ok(())
}

fn discover(paths: &[PathBuf], config: Config) -> Result<DiscoveryResult> {
    if paths.is_empty() {
        discover_with_config(PathBuf::from("."), config, true)
    } else {
        discover_paths(paths, config)
    }
}

/// Map each stylesheet to its output stem under the output directory.
///
/// Directories below the discovery root are kept. Two stylesheets mapping to
/// the same stem would overwrite each other, so that is an error.
fn plan_outputs(discovery: &DiscoveryResult) -> Result<BTreeMap<PathBuf, PathBuf>> {
    let mut plan: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();

    for file in &discovery.scan.stylesheets {
        let dir = file
            .strip_prefix(&discovery.root)
            .ok()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let target = dir.join(output_name(file));

        if let Some(previous) = plan.insert(target.clone(), file.clone()) {
            return Err(CssExportError::Build {
                message: format!(
                    "{} and {} would both be written as {}.js",
                    display_path(&previous),
                    display_path(file),
                    target.display()
                ),
                help: Some("Rename one of the stylesheets or build them separately".to_string()),
            });
        }
    }

    Ok(plan)
}

/// Build one stylesheet into `target` (an output path without extension).
/// Returns its error and warning counts.
fn build_file(
    path: &Path,
    target: &Path,
    inline: bool,
    plugin: &CssExportPlugin,
    pipeline: &Pipeline,
    printer: &Printer,
) -> Result<(usize, usize)> {
    let source = fs::read_to_string(path).map_err(|e| CssExportError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })?;

    let display = display_path(path);
    let id = request_id(&display, inline);
    printer.status("Compiling", &display);

    let transformed = pipeline.run(&id, &source)?;
    print_diagnostics(&display, &source, &transformed.diagnostics);

    let name = output_name(path);
    let dir = target.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(|e| CssExportError::Io {
        path: dir.to_path_buf(),
        message: format!("Failed to create output directory: {}", e),
    })?;
    let mut code = transformed.code;

    if !inline {
        let virtual_id = ModuleRequest::parse(&id).virtual_id();
        let css_name = format!("{}.export.css", name);
        let css = plugin.load(&virtual_id).unwrap_or_default();
        write(&dir.join(&css_name), &css)?;

        code = code.replacen(
            &string_literal(&virtual_id),
            &string_literal(&format!("./{}", css_name)),
            1,
        );
    }

    write(&dir.join(format!("{}.js", name)), &code)?;

    Ok((
        transformed.diagnostics.error_count(),
        transformed.diagnostics.warning_count(),
    ))
}

fn request_id(path: &str, inline: bool) -> String {
    let path = path.replace('\\', "/");
    if inline {
        format!("{}?{}&{}", path, EXPORT_PARAM, INLINE_PARAM)
    } else {
        format!("{}?{}", path, EXPORT_PARAM)
    }
}

/// File name without its stylesheet extension: `theme.module.scss` -> `theme.module`.
fn output_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stylesheet".to_string())
}

fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| CssExportError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write output: {}", e),
    })
}
