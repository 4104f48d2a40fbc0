use clap::Parser;
use css_export::cli::{Cli, Commands};
use css_export::output::Printer;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => css_export::cli::build::run(args, &printer)?,
        Commands::Check(args) => css_export::cli::check::run(args, &printer)?,
        Commands::Init(args) => css_export::cli::init::run(args, &printer)?,
        Commands::Completions(args) => css_export::cli::completions::run(args)?,
    }

    Ok(())
}
