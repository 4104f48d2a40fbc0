//! Per-build state shared between the two transform phases.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::parser::ParsedResult;

/// Caches scoped to one build.
///
/// Phase one stores a `ParsedResult` per request id, phase two takes it back
/// out. Passthrough CSS of non-inline requests is kept under its virtual id
/// until the host loads it. Both maps sit behind `RwLock`s so files can be
/// processed from any thread; entries of different ids never alias.
#[derive(Debug, Default)]
pub struct BuildContext {
    results: RwLock<HashMap<String, ParsedResult>>,
    virtual_css: RwLock<HashMap<String, String>>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything from the previous build.
    pub fn begin_build(&self) {
        let stale = {
            let mut results = self.results.write();
            let stale = results.len();
            results.clear();
            stale
        };
        self.virtual_css.write().clear();
        debug!(stale, "build context cleared");
    }

    pub fn store_result(&self, id: impl Into<String>, result: ParsedResult) {
        self.results.write().insert(id.into(), result);
    }

    /// Remove and return the result stored for `id`.
    pub fn take_result(&self, id: &str) -> Option<ParsedResult> {
        self.results.write().remove(id)
    }

    pub fn has_result(&self, id: &str) -> bool {
        self.results.read().contains_key(id)
    }

    pub fn register_virtual_css(&self, virtual_id: impl Into<String>, css: impl Into<String>) {
        self.virtual_css.write().insert(virtual_id.into(), css.into());
    }

    /// CSS registered under `virtual_id`.
    pub fn virtual_css(&self, virtual_id: &str) -> Option<String> {
        self.virtual_css.read().get(virtual_id).cloned()
    }

    pub fn has_virtual_css(&self, virtual_id: &str) -> bool {
        self.virtual_css.read().contains_key(virtual_id)
    }
}
