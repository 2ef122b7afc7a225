// src/config.rs
use std::fmt;

/// Frontend/backend port pair used by the dev servers and both env files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ports {
  pub frontend: u16,
  pub backend: u16,
}

impl Default for Ports {
  fn default() -> Self {
    Ports {
      frontend: 5173,
      backend: 8000,
    }
  }
}

pub const MIN_PORT: u16 = 1024;
pub const MAX_PORT: u16 = 65535;

pub const MAX_PROJECT_NAME_LEN: usize = 50;
pub const DEFAULT_PROJECT_NAME: &str = "my-mern-app";
pub const PROJECT_NAME_PATTERN: &str = r"^[a-z0-9][a-z0-9-_]*$";

/// Value written to `MONGODB_URI` while waiting for the user to paste a real one.
pub const MONGO_PLACEHOLDER_URI: &str = "enter_yours";
pub const MONGO_URI_PREFIXES: [&str; 2] = ["mongodb://", "mongodb+srv://"];

/// Upper bound on readiness prompts while configuring the database.
pub const MAX_DB_ATTEMPTS: u32 = 3;

/// Entry names never copied out of a template, at any depth.
pub const EXCLUDED_ENTRIES: [&str; 3] = ["node_modules", ".env", "dist"];

pub const ENV_FILE_NAME: &str = ".env";
pub const CLIENT_DIR_NAME: &str = "client";
pub const SERVER_DIR_NAME: &str = "server";
pub const ROOT_MANIFEST_NAME: &str = "package.json";

pub const PACKAGE_MANAGER: &str = if cfg!(windows) { "npm.cmd" } else { "npm" };
pub const DEV_RUNNER: &str = "concurrently";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
  TypeScript,
  JavaScript,
}

impl Language {
  /// Directory name of the template variant under the templates root.
  pub fn dir_name(&self) -> &'static str {
    match self {
      Language::TypeScript => "typescript",
      Language::JavaScript => "javascript",
    }
  }

  pub fn display_name(&self) -> &'static str {
    match self {
      Language::TypeScript => "TypeScript",
      Language::JavaScript => "JavaScript",
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.display_name())
  }
}
