//! Core domain types for css-export.
//!
//! - `SharedData` - the nested tree of values declared by export rules
//! - `ModuleRequest` - a view over a module id and its query markers

mod request;
mod shared;

pub use request::{ModuleRequest, EXPORT_PARAM, INLINE_PARAM, STYLESHEET_EXTENSIONS, VIRTUAL_PREFIX};
pub use shared::{SharedData, SharedValue};
