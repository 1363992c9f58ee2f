// src/main.rs
mod casing;
mod cli;
mod config;
mod error;
mod git;
mod init;
mod rebrand;
mod utils;
mod versions;

use clap::Parser;
use cli::{Cli, Commands};
use config::ScaffoldConfig;
use error::ScaffoldError;
use git::GitCli;
use log::LevelFilter;
use std::env;
use std::process;

fn main() {
  let cli = Cli::parse();

  // Setup logging based on verbosity; warnings only by default so spinners stay readable
  let log_level = match cli.verbose {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  env_logger::Builder::new().filter_level(log_level).init();

  log::debug!("CLI args: {:?}", cli);

  let config = ScaffoldConfig::default();
  log::info!(
    "{} {} using template {}",
    config.tool_name,
    config.tool_version,
    config.remote_url
  );

  // Match on the command
  let (context, result) = match cli.command {
    Commands::Init(args) => ("Failed to initialize project", run_init(args, &config)),
    Commands::Versions => (
      "Failed to list versions",
      versions::run_versions(&config, &GitCli),
    ),
  };

  if let Err(e) = result {
    utils::print_error(context, &e);
    process::exit(1);
  }
}

fn run_init(args: cli::InitArgs, config: &ScaffoldConfig) -> Result<(), ScaffoldError> {
  let workspace = env::current_dir()?;
  init::run_init(args, &workspace, config, &GitCli)
}
