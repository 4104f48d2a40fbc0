pub mod build;
pub mod check;
pub mod completions;
pub mod init;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::discovery::{Config, CONFIG_FILENAME};
use crate::error::Result;

/// css-export - Share stylesheet values with JavaScript modules
#[derive(Parser, Debug)]
#[command(name = "css-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate ES modules from stylesheets
    Build(build::BuildArgs),

    /// Check export selectors without writing anything
    Check(check::CheckArgs),

    /// Initialize a css-export project (generates css-export.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Load an explicit config file, or ./css-export.yaml when present.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => {
            let default = PathBuf::from(CONFIG_FILENAME);
            if default.exists() {
                Config::load(&default)
            } else {
                Ok(Config::default())
            }
        }
    }
}
