// src/prompts.rs
//! Interactive questions asked during setup.
//!
//! [`Prompter`] is the raw capability (text, yes/no, pick-one). The `ask_*` functions
//! wrap it into typed answers and own the re-prompt loops for validated input.

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use log::{error, info};

use crate::config::{Language, Ports, DEFAULT_PROJECT_NAME};
use crate::error::SetupError;
use crate::validate::{validate_port, validate_project_name};

pub trait Prompter {
  fn input(&mut self, prompt: &str, default: &str) -> Result<String, SetupError>;
  fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, SetupError>;
  /// Returns the index of the chosen item.
  fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> Result<usize, SetupError>;
}

/// Terminal prompts rendered with dialoguer's colorful theme.
#[derive(Default)]
pub struct DialoguerPrompter {
  theme: ColorfulTheme,
}

impl Prompter for DialoguerPrompter {
  fn input(&mut self, prompt: &str, default: &str) -> Result<String, SetupError> {
    Ok(
      Input::<String>::with_theme(&self.theme)
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?,
    )
  }

  fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, SetupError> {
    Ok(
      Confirm::with_theme(&self.theme)
        .with_prompt(prompt)
        .default(default)
        .interact()?,
    )
  }

  fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> Result<usize, SetupError> {
    Ok(
      Select::with_theme(&self.theme)
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()?,
    )
  }
}

/// Answer to "have you put your connection string in server/.env?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MongoReadiness {
  Ready,
  NotYet,
  Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
  DefaultPorts,
  CustomPorts,
  InstallOnly,
}

impl LaunchMode {
  pub fn runs_servers(&self) -> bool {
    !matches!(self, LaunchMode::InstallOnly)
  }
}

/// Asks until the name passes validation.
pub fn ask_project_name(prompter: &mut dyn Prompter) -> Result<String, SetupError> {
  loop {
    let name = prompter.input("Project name", DEFAULT_PROJECT_NAME)?;
    match validate_project_name(&name) {
      Ok(()) => {
        info!("Project name: {}", name);
        return Ok(name);
      }
      Err(e) => error!("{}", e),
    }
  }
}

pub fn ask_language(prompter: &mut dyn Prompter) -> Result<Language, SetupError> {
  let choice = prompter.select(
    "Choose your preferred language",
    &[
      "TypeScript (recommended for larger projects)",
      "JavaScript (simpler setup)",
    ],
    0,
  )?;
  Ok(if choice == 0 {
    Language::TypeScript
  } else {
    Language::JavaScript
  })
}

pub fn ask_overwrite(prompter: &mut dyn Prompter) -> Result<bool, SetupError> {
  prompter.confirm("Do you want to overwrite the existing directory?", false)
}

pub fn ask_wants_database(prompter: &mut dyn Prompter) -> Result<bool, SetupError> {
  info!("Database Configuration");
  let choice = prompter.select(
    "Do you want to connect to MongoDB and have a valid connection string?",
    &[
      "Yes, I have a MongoDB connection string",
      "No, skip database setup for now",
    ],
    0,
  )?;
  Ok(choice == 0)
}

pub fn ask_mongo_readiness(prompter: &mut dyn Prompter) -> Result<MongoReadiness, SetupError> {
  let choice = prompter.select(
    "Have you updated server/.env with your MongoDB URI?",
    &[
      "Yes, I've updated the MongoDB URI",
      "No, I need more time",
      "Skip MongoDB setup for now",
    ],
    0,
  )?;
  Ok(match choice {
    0 => MongoReadiness::Ready,
    1 => MongoReadiness::NotYet,
    _ => MongoReadiness::Skip,
  })
}

pub fn ask_install_now(prompter: &mut dyn Prompter) -> Result<bool, SetupError> {
  info!("Dependency Installation");
  let choice = prompter.select(
    "Do you want to install dependencies now?",
    &[
      "Yes, install dependencies automatically (recommended)",
      "No, I'll install them manually later",
    ],
    0,
  )?;
  Ok(choice == 0)
}

pub fn ask_install_dev_runner(prompter: &mut dyn Prompter, tool: &str) -> Result<bool, SetupError> {
  prompter.confirm(
    &format!(
      "Install '{}' globally? (Required to run both client and server)",
      tool
    ),
    true,
  )
}

pub fn ask_launch_mode(prompter: &mut dyn Prompter) -> Result<LaunchMode, SetupError> {
  info!("Project Launch Configuration");
  let defaults = Ports::default();
  let run_default = format!(
    "Install dependencies and run on default ports (frontend: {}, backend: {})",
    defaults.frontend, defaults.backend
  );
  let choice = prompter.select(
    "How would you like to proceed?",
    &[
      run_default.as_str(),
      "Install dependencies with custom ports",
      "Just install dependencies (don't run yet)",
    ],
    0,
  )?;
  Ok(match choice {
    0 => LaunchMode::DefaultPorts,
    1 => LaunchMode::CustomPorts,
    _ => LaunchMode::InstallOnly,
  })
}

/// Asks for frontend then backend port, re-prompting each until valid and distinct.
pub fn ask_custom_ports(prompter: &mut dyn Prompter) -> Result<Ports, SetupError> {
  info!("Configuring custom ports...");
  let defaults = Ports::default();

  let frontend = loop {
    let raw = prompter.input("Enter frontend port", &defaults.frontend.to_string())?;
    match validate_port(&raw, "Frontend") {
      Ok(port) => {
        info!("Frontend port set to: {}", port);
        break port;
      }
      Err(e) => error!("{}", e),
    }
  };

  let backend = loop {
    let raw = prompter.input("Enter backend port", &defaults.backend.to_string())?;
    match validate_port(&raw, "Backend") {
      Ok(port) if port == frontend => {
        error!("Backend port cannot be the same as frontend port");
      }
      Ok(port) => {
        info!("Backend port set to: {}", port);
        break port;
      }
      Err(e) => error!("{}", e),
    }
  };

  Ok(Ports { frontend, backend })
}

#[cfg(test)]
pub(crate) mod scripted {
  use super::*;
  use std::collections::VecDeque;

  #[derive(Debug, Clone, PartialEq, Eq)]
  pub enum Answer {
    Text(String),
    Confirm(bool),
    Select(usize),
  }

  /// Replays a fixed list of answers, panicking if the flow asks something unexpected.
  #[derive(Debug, Default)]
  pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub asked: Vec<String>,
  }

  impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
      ScriptedPrompter {
        answers: answers.into_iter().collect(),
        asked: Vec::new(),
      }
    }

    pub fn remaining(&self) -> usize {
      self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Answer {
      self.asked.push(prompt.to_string());
      self
        .answers
        .pop_front()
        .unwrap_or_else(|| panic!("no scripted answer left for '{}'", prompt))
    }
  }

  impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str, _default: &str) -> Result<String, SetupError> {
      match self.next(prompt) {
        Answer::Text(text) => Ok(text),
        other => panic!("'{}' expected text, script had {:?}", prompt, other),
      }
    }

    fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool, SetupError> {
      match self.next(prompt) {
        Answer::Confirm(yes) => Ok(yes),
        other => panic!("'{}' expected confirm, script had {:?}", prompt, other),
      }
    }

    fn select(&mut self, prompt: &str, items: &[&str], _default: usize) -> Result<usize, SetupError> {
      match self.next(prompt) {
        Answer::Select(idx) if idx < items.len() => Ok(idx),
        other => panic!("'{}' expected select, script had {:?}", prompt, other),
      }
    }
  }

  pub fn text(s: &str) -> Answer {
    Answer::Text(s.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::scripted::{text, Answer, ScriptedPrompter};
  use super::*;

  #[test]
  fn project_name_reprompts_until_valid() {
    let mut prompter = ScriptedPrompter::new([text(""), text("-bad"), text("good-name")]);
    assert_eq!(ask_project_name(&mut prompter).unwrap(), "good-name");
    assert_eq!(prompter.asked.len(), 3);
  }

  #[test]
  fn custom_ports_reject_invalid_and_duplicate_values() {
    let mut prompter = ScriptedPrompter::new([
      text("80"),
      text("abc"),
      text("3000"),
      text("3000"),
      text("70000"),
      text("4000"),
    ]);
    let ports = ask_custom_ports(&mut prompter).unwrap();
    assert_eq!(
      ports,
      Ports {
        frontend: 3000,
        backend: 4000
      }
    );
    assert_eq!(prompter.remaining(), 0);
  }

  #[test]
  fn tri_state_readiness_maps_to_variants() {
    let mut prompter =
      ScriptedPrompter::new([Answer::Select(0), Answer::Select(1), Answer::Select(2)]);
    assert_eq!(ask_mongo_readiness(&mut prompter).unwrap(), MongoReadiness::Ready);
    assert_eq!(ask_mongo_readiness(&mut prompter).unwrap(), MongoReadiness::NotYet);
    assert_eq!(ask_mongo_readiness(&mut prompter).unwrap(), MongoReadiness::Skip);
  }

  #[test]
  fn launch_modes() {
    let mut prompter =
      ScriptedPrompter::new([Answer::Select(0), Answer::Select(1), Answer::Select(2)]);
    assert_eq!(ask_launch_mode(&mut prompter).unwrap(), LaunchMode::DefaultPorts);
    assert_eq!(ask_launch_mode(&mut prompter).unwrap(), LaunchMode::CustomPorts);
    let last = ask_launch_mode(&mut prompter).unwrap();
    assert_eq!(last, LaunchMode::InstallOnly);
    assert!(!last.runs_servers());
  }
}
