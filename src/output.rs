//! Terminal output for the css-export CLI.
//!
//! Status lines are Cargo-style, with a right-aligned verb column, and go to
//! stderr. Diagnostics are rendered separately through miette.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const VERB_WIDTH: usize = 12;

/// Colour of the verb column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Progress,
    Info,
    Warning,
    Failure,
}

impl Tone {
    fn ansi(self) -> &'static str {
        match self {
            Tone::Progress => "\x1b[1;32m",
            Tone::Info => "\x1b[1;36m",
            Tone::Warning => "\x1b[1;33m",
            Tone::Failure => "\x1b[1;31m",
        }
    }
}

/// Status printer. Colour is used only when stderr is a terminal.
#[derive(Debug, Clone)]
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Per-file progress, e.g. `   Compiling src/theme.module.scss`.
    pub fn status(&self, verb: &str, message: &str) {
        self.emit(Tone::Progress, verb, message);
    }

    /// Final line of a command that succeeded.
    pub fn success(&self, verb: &str, message: &str) {
        self.emit(Tone::Progress, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.emit(Tone::Info, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.emit(Tone::Warning, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.emit(Tone::Failure, verb, message);
    }

    fn emit(&self, tone: Tone, verb: &str, message: &str) {
        let line = self.format_line(tone, verb, message);
        let _ = writeln!(io::stderr().lock(), "{}", line);
    }

    fn format_line(&self, tone: Tone, verb: &str, message: &str) -> String {
        if self.color {
            format!("{}{:>width$}\x1b[0m {}", tone.ansi(), verb, message, width = VERB_WIDTH)
        } else {
            format!("{:>width$} {}", verb, message, width = VERB_WIDTH)
        }
    }
}

/// `plural(1, "key", "keys")` -> "1 key".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    let word = if n == 1 { singular } else { pluralized };
    format!("{} {}", n, word)
}

/// Path relative to the working directory when it lies below it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));

    match relative {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(0, "warning", "warnings"), "0 warnings");
        assert_eq!(plural(1, "stylesheet", "stylesheets"), "1 stylesheet");
        assert_eq!(plural(5, "key", "keys"), "5 keys");
    }

    #[test]
    fn test_plain_line_alignment() {
        let printer = Printer { color: false };
        assert_eq!(
            printer.format_line(Tone::Progress, "Compiling", "a.css"),
            "   Compiling a.css"
        );
    }

    #[test]
    fn test_display_path_outside_cwd() {
        let p = Path::new("/nonexistent/styles/theme.css");
        assert_eq!(display_path(p), "/nonexistent/styles/theme.css");
    }
}
