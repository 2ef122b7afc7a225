// src/cli.rs
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mernspawn", // Command name users type
    author,
    version,
    about = "Interactively scaffolds a full-stack MERN project (client + server) from bundled templates.",
    long_about = None
)]
pub struct Cli {
  /// Increase verbosity level (e.g., -v, -vv)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Directory holding the `javascript/` and `typescript/` template variants
  #[arg(long)]
  #[clap(env = "MERNSPAWN_TEMPLATES_DIR")]
  pub templates_dir: Option<PathBuf>,

  /// Editor command used to open server/.env (the file path is appended)
  #[arg(long, default_value = "code -r")]
  #[clap(env = "MERNSPAWN_EDITOR")]
  pub editor: String,
}
