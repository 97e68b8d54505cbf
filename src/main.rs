// ABOUTME: Entry point for the stackpack CLI application.
// ABOUTME: Parses arguments, sets up logging and the pipeline, and dispatches commands.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Context;
use stackpack::config::Config;
use stackpack::error::Result;
use stackpack::output::{Output, OutputMode};
use stackpack::pipeline::PipelineRegistry;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);

    if let Err(e) = run(cli, &mut output).await {
        tracing::debug!(kind = ?e.kind(), "command failed");
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &mut Output) -> Result<()> {
    let root = env::current_dir()?;
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&root)?,
    };

    let mut registry = PipelineRegistry::new();
    registry.register_build(config.package.clone());

    let ctx = Context { root, config };

    match cli.command {
        Commands::Build { filename } => commands::build(&ctx, &registry, filename, output).await,
        Commands::Upload { filename } => commands::upload(&ctx, filename, output).await,
        Commands::Deploy {
            app_name,
            stack_name,
            filename,
        } => commands::deploy(&ctx, app_name, stack_name, filename, output).await,
    }
}
