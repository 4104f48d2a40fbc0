//! Pipeline orchestration.
//!
//! A `Pipeline` is a list of named `Stage`s. `CssExportPlugin::install`
//! composes the plugin around the downstream stylesheet compiler:
//!
//! ```text
//! css ──▶ css-export (extract) ──▶ css-post (compile) ──▶ synthesize ──▶ module
//!               │                                             ▲
//!               └────────── BuildContext (ParsedResult) ──────┘
//! ```

mod context;
pub mod downstream;
mod options;
mod plugin;
mod stage;

pub use context::BuildContext;
pub use downstream::{CssModuleStage, DOWNSTREAM_STAGE};
pub use options::{ModuleOptions, ModuleOptionsBuilder, Predicate, Transformer, DEFAULT_SHARED_EXPORT_NAME};
pub use plugin::CssExportPlugin;
pub use stage::{Pipeline, Stage, TransformContext, TransformOutput};
