//! Export-marker selector grammar.
//!
//! ```text
//! selector := marker | marker WS segment (WS segment)*
//! marker   := ":export" | ":share"
//! ```
//!
//! Anything else is an ordinary selector and is left alone.

/// Selector tokens that introduce an export rule.
pub const MARKERS: &[&str] = &[":export", ":share"];

/// A selector that matched the export grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSelector<'a> {
    /// The marker token that introduced the rule.
    pub marker: &'static str,
    /// Everything after the marker, unmodified (starts with whitespace
    /// unless empty).
    pub path: &'a str,
    /// Path segments, empty for a bare marker.
    pub segments: Vec<&'a str>,
}

/// Match a trimmed selector against the export grammar.
pub fn match_export_selector(selector: &str) -> Option<ExportSelector<'_>> {
    MARKERS.iter().find_map(|&marker| {
        let path = selector.strip_prefix(marker)?;
        if !path.is_empty() && !path.starts_with(|c: char| c.is_whitespace()) {
            return None;
        }
        Some(ExportSelector {
            marker,
            path,
            segments: path.split_whitespace().collect(),
        })
    })
}
