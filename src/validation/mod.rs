//! Diagnostics for css-export.
//!
//! Extraction never aborts on a bad selector: problems are collected as
//! diagnostics and handed to the host, which decides whether errors fail the
//! build. The CLI prints them with `print_diagnostics`.

mod selector;
mod warning;

pub use selector::{
    check_export_path, describe_characters, PathIssue, PathIssueKind, DISCOURAGED_CHARACTERS,
    FORBIDDEN_CHARACTERS,
};
pub use warning::{Diagnostic, Diagnostics, Severity};

/// Diagnostic codes.
pub mod codes {
    pub const FORBIDDEN_CHARACTER: &str = "css_export::selector::forbidden";
    pub const DISCOURAGED_CHARACTER: &str = "css_export::selector::discouraged";
    pub const PATH_COLLISION: &str = "css_export::selector::path-collision";
    pub const NESTED_RULE: &str = "css_export::selector::nested-rule";
    pub const UNCLOSED_BLOCK: &str = "css_export::parse::unclosed-block";
}

/// Print diagnostics for one stylesheet to stderr, with source excerpts.
pub fn print_diagnostics(name: &str, source: &str, diagnostics: &Diagnostics) {
    for d in diagnostics.iter() {
        eprintln!("{:?}", d.to_report(name, source));
    }
}

/// One-line summary of diagnostic counts.
pub fn summary(diagnostics: &Diagnostics) -> String {
    let errors = diagnostics.error_count();
    let warnings = diagnostics.warning_count();

    if errors > 0 {
        format!("{} error(s), {} warning(s)", errors, warnings)
    } else if warnings > 0 {
        format!("passed ({} warning(s))", warnings)
    } else {
        "passed".to_string()
    }
}
