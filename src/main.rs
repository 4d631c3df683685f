use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod action;
mod cli;
mod commands;
mod config;
mod exemplar;
mod library;
mod prompt;
mod response;
mod templates;

use cli::{Cli, Commands};

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fcx")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("fcx.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = env_logger::Builder::from_default_env();
    if verbose && std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    match &cli.command {
        Commands::Init => {
            commands::init::run(&cli).context("Init command failed")?;
        }
        Commands::List => {
            commands::list::run(&cli).context("List command failed")?;
        }
        Commands::Show(args) => {
            commands::show::run(&cli, args).context("Show command failed")?;
        }
        Commands::Check(args) => {
            commands::check::run(&cli, args).context("Check command failed")?;
        }
        Commands::Render(args) => {
            commands::render::run(&cli, args).context("Render command failed")?;
        }
        Commands::Actions(args) => {
            commands::actions::run(&cli, args).context("Actions command failed")?;
        }
    }

    Ok(())
}
