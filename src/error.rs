use miette::Diagnostic;
use thiserror::Error;

/// Main error type for css-export operations
#[derive(Error, Diagnostic, Debug)]
pub enum CssExportError {
    #[error("IO error: {0}")]
    #[diagnostic(code(css_export::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(css_export::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(css_export::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(css_export::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(css_export::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Pipeline stage `{stage}` not found; css exports are disabled for this build")]
    #[diagnostic(
        code(css_export::stage_not_found),
        help("Register the stylesheet compiler stage before installing the css-export plugin")
    )]
    StageNotFound { stage: String },
}

pub type Result<T> = std::result::Result<T, CssExportError>;
