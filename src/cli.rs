// src/cli.rs
use clap::{builder::NonEmptyStringValueParser, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "rn4oh", // Command name users type
    author,
    version,
    about = "RN4OH project initialization tool",
    long_about = None
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Increase verbosity level (e.g., -v, -vv). Goes before the subcommand.
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new RN4OH project
  Init(InitArgs),
  /// List all available template versions
  Versions,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
  /// Name of the project; also the directory created in the current directory
  #[arg(value_parser = NonEmptyStringValueParser::new())]
  pub project_name: String,

  /// Template version (tag) to use instead of the latest default branch
  #[arg(short = 'v', long = "version", value_name = "VERSION")]
  pub tag: Option<String>,
}
