// src/toolchain.rs
//! External processes the setup drives: the package manager, the global dev runner,
//! the editor, and the dev-server pair.

use std::path::Path;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::config::{Ports, PACKAGE_MANAGER};
use crate::error::SetupError;
use crate::utils;

/// Result of trying to open a file in the user's editor. Failure is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOutcome {
  pub opened: bool,
}

/// How the foreground dev-server run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevServerExit {
  Exited,
  StoppedByUser,
}

pub trait Toolchain {
  fn is_global_tool_installed(&self, name: &str) -> bool;
  fn install_global_tool(&self, name: &str) -> Result<(), SetupError>;
  /// Installs client and server dependencies of the project at `project_dir`.
  fn run_install_step(&self, project_dir: &Path) -> Result<(), SetupError>;
  /// Blocks until the dev servers exit. An interrupt is a normal stop, not an error.
  fn run_dev_servers(&self, project_dir: &Path, ports: Ports) -> Result<DevServerExit, SetupError>;
  fn open_in_editor(&self, path: &Path) -> EditorOutcome;
}

/// `npm`-backed toolchain.
#[derive(Debug, Clone)]
pub struct NpmToolchain {
  editor_command: String,
}

impl NpmToolchain {
  pub fn new(editor_command: impl Into<String>) -> Self {
    NpmToolchain {
      editor_command: editor_command.into(),
    }
  }
}

impl Toolchain for NpmToolchain {
  fn is_global_tool_installed(&self, name: &str) -> bool {
    let listed = utils::run_captured(
      "List global packages",
      PACKAGE_MANAGER,
      &["ls", "-g", name],
      None,
    );
    if let Ok(output) = &listed {
      let marker = format!("{}@", name);
      if output.status.success() && String::from_utf8_lossy(&output.stdout).contains(&marker) {
        debug!("'{}' found in global package listing", name);
        return true;
      }
    }

    debug!("'{}' not in global listing, probing '{} --version'", name, name);
    matches!(
      utils::run_captured("Probe tool version", name, &["--version"], None),
      Ok(output) if output.status.success()
    )
  }

  fn install_global_tool(&self, name: &str) -> Result<(), SetupError> {
    let pb = utils::spinner(&format!("Installing '{}' globally...", name));
    let result = utils::run_checked(
      "Install global tool",
      PACKAGE_MANAGER,
      &["install", "-g", name],
      None,
    );
    match &result {
      Ok(_) => pb.finish_with_message(format!("Installed '{}' globally", name)),
      Err(e) => {
        pb.abandon_with_message(format!("Failed to install '{}' globally", name));
        error!("Installation failed: {}", e);
        warn!(
          "You can install it manually with: {} install -g {}",
          PACKAGE_MANAGER, name
        );
      }
    }
    result.map(|_| ())
  }

  fn run_install_step(&self, project_dir: &Path) -> Result<(), SetupError> {
    let pb = utils::spinner("Running npm install for client and server...");
    let result = utils::run_checked(
      "Install dependencies",
      PACKAGE_MANAGER,
      &["run", "setup"],
      Some(project_dir),
    );
    match &result {
      Ok(_) => pb.finish_with_message("Dependencies installed successfully!"),
      Err(e) => {
        pb.abandon_with_message("Failed to install dependencies");
        error!("Installation error: {}", e);
        warn!("You can try installing manually:");
        info!("cd client && npm install && cd ../server && npm install");
      }
    }
    result.map(|_| ())
  }

  fn run_dev_servers(&self, project_dir: &Path, ports: Ports) -> Result<DevServerExit, SetupError> {
    info!("Starting development servers...");
    info!("Frontend: http://localhost:{}", ports.frontend);
    info!("Backend: http://localhost:{}", ports.backend);
    warn!("Press Ctrl+C to stop both servers");

    // The terminal delivers Ctrl+C to the whole foreground group; the child stops, we stay.
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
      debug!("Could not install interrupt handler: {}", e);
    }

    let status = utils::run_inherited("Run dev servers", PACKAGE_MANAGER, &["run", "dev"], project_dir)?;
    if interrupted.load(Ordering::SeqCst) || stopped_by_interrupt(&status) {
      return Ok(DevServerExit::StoppedByUser);
    }
    if !status.success() {
      return Err(SetupError::CommandFailedStatus {
        step_name: "Run dev servers".to_string(),
        status,
        stderr: String::new(),
      });
    }
    Ok(DevServerExit::Exited)
  }

  fn open_in_editor(&self, path: &Path) -> EditorOutcome {
    let mut parts = self.editor_command.split_whitespace();
    let Some(program) = parts.next() else {
      return EditorOutcome { opened: false };
    };
    let path_arg = path.to_string_lossy();
    let mut args: Vec<&str> = parts.collect();
    args.push(&path_arg);

    let opened = matches!(
      utils::run_captured("Open editor", program, &args, None),
      Ok(output) if output.status.success()
    );
    EditorOutcome { opened }
  }
}

/// SIGINT termination, or the shell convention of exit code 130 for it.
fn stopped_by_interrupt(status: &ExitStatus) -> bool {
  #[cfg(unix)]
  {
    use std::os::unix::process::ExitStatusExt;
    if status.signal() == Some(2) {
      return true;
    }
  }
  status.code() == Some(130)
}

#[cfg(test)]
pub(crate) mod fake {
  use super::*;
  use std::cell::RefCell;
  use std::fs;

  /// Records every call and answers from its fields instead of spawning processes.
  #[derive(Debug, Default)]
  pub struct FakeToolchain {
    pub tool_installed: bool,
    pub tool_install_fails: bool,
    pub install_fails: bool,
    pub editor_opens: bool,
    /// Written to the opened file's `MONGODB_URI`, standing in for the user's edit.
    pub edit_mongo_uri: Option<String>,
    pub calls: RefCell<Vec<String>>,
    pub dev_ports: RefCell<Option<Ports>>,
  }

  impl FakeToolchain {
    pub fn calls(&self) -> Vec<String> {
      self.calls.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
      self.calls.borrow_mut().push(call.into());
    }
  }

  impl Toolchain for FakeToolchain {
    fn is_global_tool_installed(&self, name: &str) -> bool {
      self.record(format!("check {}", name));
      self.tool_installed
    }

    fn install_global_tool(&self, name: &str) -> Result<(), SetupError> {
      self.record(format!("install -g {}", name));
      if self.tool_install_fails {
        return Err(SetupError::CommandExecError {
          step_name: "Install global tool".to_string(),
          source: "registry unreachable".into(),
        });
      }
      Ok(())
    }

    fn run_install_step(&self, project_dir: &Path) -> Result<(), SetupError> {
      self.record(format!("setup {}", project_dir.display()));
      if self.install_fails {
        return Err(SetupError::CommandExecError {
          step_name: "Install dependencies".to_string(),
          source: "npm exploded".into(),
        });
      }
      Ok(())
    }

    fn run_dev_servers(&self, project_dir: &Path, ports: Ports) -> Result<DevServerExit, SetupError> {
      self.record(format!("dev {}", project_dir.display()));
      *self.dev_ports.borrow_mut() = Some(ports);
      Ok(DevServerExit::StoppedByUser)
    }

    fn open_in_editor(&self, path: &Path) -> EditorOutcome {
      self.record(format!("edit {}", path.display()));
      if let Some(uri) = &self.edit_mongo_uri {
        let text = fs::read_to_string(path).unwrap_or_default();
        let value = format!("\"{}\"", uri);
        let patched = crate::env_file::patch_assignments(&text, &[("MONGODB_URI", value.as_str())]);
        fs::write(path, patched).unwrap();
      }
      EditorOutcome {
        opened: self.editor_opens,
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_editor_is_not_an_error() {
    let toolchain = NpmToolchain::new("definitely-not-an-editor-binary-xyz --wait");
    let outcome = toolchain.open_in_editor(Path::new("/tmp/server.env"));
    assert_eq!(outcome, EditorOutcome { opened: false });
  }

  #[test]
  fn blank_editor_command_is_not_opened() {
    let toolchain = NpmToolchain::new("   ");
    assert!(!toolchain.open_in_editor(Path::new("x")).opened);
  }

  #[cfg(unix)]
  #[test]
  fn interrupt_statuses() {
    use std::os::unix::process::ExitStatusExt;
    assert!(stopped_by_interrupt(&ExitStatus::from_raw(2)));
    assert!(stopped_by_interrupt(&ExitStatus::from_raw(130 << 8)));
    assert!(!stopped_by_interrupt(&ExitStatus::from_raw(0)));
    assert!(!stopped_by_interrupt(&ExitStatus::from_raw(1 << 8)));
  }
}
