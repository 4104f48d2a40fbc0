//! css-export - Share stylesheet values with JavaScript modules
//!
//! Stylesheets declare shareable data in `:export` (or `:share`) rules. The
//! rules are extracted before the stylesheet is compiled, and the data is
//! synthesized into the ES module that importing the stylesheet produces,
//! as named exports and a default export object.

pub mod casing;
pub mod cli;
pub mod codegen;
pub mod discovery;
pub mod error;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use codegen::{data_to_esm, synthesize, MergePolicy};
pub use discovery::{discover, discover_paths, Config, DiscoveryResult, ScanResult};
pub use error::{CssExportError, Result};
pub use parser::{extract_shared_data, Extraction, ParsedResult};
pub use pipeline::{
    BuildContext, CssExportPlugin, CssModuleStage, ModuleOptions, Pipeline, Stage, TransformContext,
    TransformOutput,
};
pub use types::{ModuleRequest, SharedData, SharedValue};
pub use validation::{Diagnostic, Diagnostics, Severity};
