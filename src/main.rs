// src/main.rs
mod cli;
mod config;
mod env_file;
mod error;
mod generate;
mod manifest;
mod prompts;
mod templates;
mod toolchain;
mod utils;
mod validate;

use clap::Parser;
use cli::Cli;
use error::SetupError;
use log::LevelFilter;
use prompts::DialoguerPrompter;
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use toolchain::NpmToolchain;

fn main() {
  let cli = Cli::parse();

  // Setup logging based on verbosity
  let log_level = match cli.verbose {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  env_logger::Builder::new()
    .filter_level(log_level)
    .format_timestamp(None)
    .format_target(false)
    .init();

  log::debug!("CLI args: {:?}", cli);

  if let Err(e) = run(cli) {
    log::error!("Setup failed: {}", e);
    process::exit(1);
  }
}

fn run(cli: Cli) -> Result<(), SetupError> {
  let templates_path = determine_templates_dir(cli.templates_dir)?;
  log::debug!("Using templates directory: {}", templates_path.display());

  let mut prompter = DialoguerPrompter::default();
  let toolchain = NpmToolchain::new(cli.editor);
  let outcome = generate::run_generate(&templates_path, &mut prompter, &toolchain)?;
  log::debug!("Setup finished with outcome {:?}", outcome);
  Ok(())
}

/// Determines the templates directory path.
/// Order of preference:
/// 1. --templates-dir CLI argument (or MERNSPAWN_TEMPLATES_DIR)
/// 2. templates/ subdirectory relative to the executable
/// 3. templates/ subdirectory relative to the current working directory
/// 4. templates/ in the crate source tree (for `cargo run`)
fn determine_templates_dir(cli_path: Option<PathBuf>) -> Result<PathBuf, SetupError> {
  if let Some(path) = cli_path {
    if path.is_dir() {
      return Ok(path);
    } else {
      log::warn!(
        "Provided --templates-dir path does not exist or is not a directory: {}",
        path.display()
      );
    }
  }

  // Env variable check happens automatically via clap's `env` attribute

  if let Ok(mut exe_path) = env::current_exe() {
    exe_path.pop(); // Remove the executable name
    let path = exe_path.join("templates");
    if path.is_dir() {
      return Ok(path);
    }
  }

  let path = PathBuf::from("templates");
  if path.is_dir() {
    return Ok(path);
  }

  let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
  if path.is_dir() {
    return Ok(path);
  }

  Err(SetupError::CannotDetermineTemplatesDir)
}
