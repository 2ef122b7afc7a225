// src/error.rs
use std::{path::PathBuf, process::ExitStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
  #[error("IO Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Could not determine templates directory")]
  CannotDetermineTemplatesDir,

  #[error("{language} templates are missing. Expected client and server directories in {path}")]
  TemplatesMissing { language: String, path: PathBuf },

  #[error("Failed to create output directory '{path}': {source}")]
  OutputDirCreation {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to remove existing directory '{path}': {source}")]
  DirRemoval {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to copy '{from}' to '{to}': {source}")]
  CopyFailed {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Error walking template directory '{path}': {source}")]
  WalkDirError {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("Failed to read environment file '{path}': {source}")]
  EnvRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to write environment file '{path}': {source}")]
  EnvWrite {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to serialize root manifest: {0}")]
  ManifestSerialize(#[from] serde_json::Error),

  #[error("Failed to write root manifest '{path}': {source}")]
  ManifestWrite {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Command Execution Error for step '{step_name}': {source}")]
  CommandExecError {
    step_name: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>, // Box to handle different error types
  },

  #[error("Command for step '{step_name}' failed with status {status}. Stderr: {stderr}")]
  CommandFailedStatus {
    step_name: String,
    status: ExitStatus,
    stderr: String,
  },

  #[error("User interaction failed: {0}")]
  Prompt(#[from] dialoguer::Error),
}

impl SetupError {
  pub(crate) fn command_exec_error<E>(step_name: &str, error: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    SetupError::CommandExecError {
      step_name: step_name.to_string(),
      source: Box::new(error),
    }
  }
}

/// Rejection reasons for a project name. The message is shown verbatim before re-prompting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidName {
  #[error("Project name cannot be empty")]
  Empty,

  #[error("Project name must start with lowercase letter or number and contain only lowercase letters, numbers, hyphens, and underscores")]
  BadCharacters,

  #[error("Project name must be at most {max} characters (got {len})")]
  TooLong { len: usize, max: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPort {
  #[error("{label} port must be a valid number")]
  NotANumber { label: String },

  #[error("{label} port must be between {min} and {max}")]
  OutOfRange { label: String, min: u16, max: u16 },
}
