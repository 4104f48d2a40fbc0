//! Export module synthesis.
//!
//! Turns a shared-data tree into module text and merges it into the module
//! the downstream stylesheet compiler produced.

pub mod esm;
pub mod module;
mod synthesize;

pub use esm::{data_to_esm, is_valid_identifier};
pub use module::{ItemKind, Module, ModuleItem};
pub use synthesize::{synthesize, MergePolicy, RESERVED_EXPORT_PREFIX};
