use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::time::Duration;

use duct::cmd;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, trace};
use walkdir::{DirEntry, WalkDir};

use crate::config::EXCLUDED_ENTRIES;
use crate::error::SetupError;

fn is_excluded(name: &OsStr) -> bool {
  name
    .to_str()
    .map_or(false, |n| EXCLUDED_ENTRIES.contains(&n))
}

/// Recursively copies `source_dir` into `dest_dir`, creating `dest_dir` first.
///
/// Entries named in [`EXCLUDED_ENTRIES`] are skipped wherever they appear, and excluded
/// directories are not descended into. File contents are copied byte-for-byte. The first
/// failure aborts the copy; whatever was already written stays on disk.
pub fn copy_tree(source_dir: &Path, dest_dir: &Path) -> Result<u64, SetupError> {
  debug!(
    "Copying template from {} to {}",
    source_dir.display(),
    dest_dir.display()
  );

  fs::create_dir_all(dest_dir).map_err(|e| SetupError::OutputDirCreation {
    path: dest_dir.to_path_buf(),
    source: e,
  })?;

  let mut copied: u64 = 0;
  let walker = WalkDir::new(source_dir)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry: &DirEntry| entry.depth() == 0 || !is_excluded(entry.file_name()));

  for entry_result in walker {
    let entry = entry_result.map_err(|e| SetupError::WalkDirError {
      path: source_dir.to_path_buf(),
      source: e,
    })?;
    if entry.depth() == 0 {
      continue;
    }

    let current_path = entry.path();
    let relative_path = current_path
      .strip_prefix(source_dir)
      .map_err(|e| SetupError::CopyFailed {
        from: current_path.to_path_buf(),
        to: dest_dir.to_path_buf(),
        source: std::io::Error::new(ErrorKind::Other, e),
      })?;
    let output_entry_path = dest_dir.join(relative_path);

    if entry.file_type().is_dir() {
      trace!("Creating directory: {}", output_entry_path.display());
      fs::create_dir_all(&output_entry_path).map_err(|e| SetupError::OutputDirCreation {
        path: output_entry_path.clone(),
        source: e,
      })?;
    } else {
      trace!(
        "Copying {} -> {}",
        current_path.display(),
        output_entry_path.display()
      );
      fs::copy(current_path, &output_entry_path).map_err(|e| SetupError::CopyFailed {
        from: current_path.to_path_buf(),
        to: output_entry_path.clone(),
        source: e,
      })?;
      copied += 1;
    }
  }

  debug!("Copied {} files into {}", copied, dest_dir.display());
  Ok(copied)
}

/// Spinner shown while a captured command runs.
pub fn spinner(message: &str) -> ProgressBar {
  let pb = ProgressBar::new_spinner();
  pb.set_style(
    ProgressStyle::default_spinner()
      .template("{spinner:.green} [{elapsed}] {msg}")
      .unwrap_or_else(|_| ProgressStyle::default_spinner()),
  );
  pb.set_message(message.to_string());
  pb.enable_steady_tick(Duration::from_millis(100));
  pb
}

/// Runs `program args...` with stdout/stderr captured and stdin closed.
///
/// Non-zero exits come back as `Ok(Output)`; only spawn and wait failures are errors.
pub fn run_captured(
  step_name: &str,
  program: &str,
  args: &[&str],
  working_dir: Option<&Path>,
) -> Result<Output, SetupError> {
  info!(
    "Executing: Step '{}', Command: `{} {}`",
    step_name,
    program,
    args.join(" ")
  );

  let mut expr = cmd(program, args)
    .stdin_null()
    .stdout_capture()
    .stderr_capture()
    .unchecked();
  if let Some(dir) = working_dir {
    expr = expr.dir(dir);
  }

  let output = expr.run().map_err(|e| {
    debug!("Failed to run command for step '{}': {}", step_name, e);
    if e.kind() == ErrorKind::NotFound {
      SetupError::CommandExecError {
        step_name: step_name.to_string(),
        source: format!("Command not found: {}", program).into(),
      }
    } else {
      SetupError::command_exec_error(step_name, e)
    }
  })?;

  debug!("Step '{}' finished. Status: {:?}", step_name, output.status);
  if log::log_enabled!(log::Level::Trace) {
    trace!(
      "Step '{}' stdout:\n{}",
      step_name,
      String::from_utf8_lossy(&output.stdout)
    );
    trace!(
      "Step '{}' stderr:\n{}",
      step_name,
      String::from_utf8_lossy(&output.stderr)
    );
  }
  Ok(output)
}

/// Like [`run_captured`] but turns a non-zero exit into `CommandFailedStatus`.
pub fn run_checked(
  step_name: &str,
  program: &str,
  args: &[&str],
  working_dir: Option<&Path>,
) -> Result<Output, SetupError> {
  let output = run_captured(step_name, program, args, working_dir)?;
  if !output.status.success() {
    return Err(SetupError::CommandFailedStatus {
      step_name: step_name.to_string(),
      status: output.status,
      stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    });
  }
  Ok(output)
}

/// Runs a command in the foreground with the terminal's stdio, blocking until it exits.
pub fn run_inherited(
  step_name: &str,
  program: &str,
  args: &[&str],
  working_dir: &Path,
) -> Result<ExitStatus, SetupError> {
  info!(
    "Executing (foreground): Step '{}', Command: `{} {}` in {}",
    step_name,
    program,
    args.join(" "),
    working_dir.display()
  );
  cmd(program, args)
    .dir(working_dir)
    .unchecked()
    .run()
    .map(|output| output.status)
    .map_err(|e| SetupError::command_exec_error(step_name, e))
}
