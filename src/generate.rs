// src/generate.rs
use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use log::{debug, error, info, warn};

use crate::config::{
  Language, Ports, CLIENT_DIR_NAME, DEV_RUNNER, ENV_FILE_NAME, MAX_DB_ATTEMPTS,
  MONGO_PLACEHOLDER_URI, SERVER_DIR_NAME,
};
use crate::env_file::{self, EnvSettings};
use crate::error::SetupError;
use crate::manifest;
use crate::prompts::{self, LaunchMode, MongoReadiness, Prompter};
use crate::templates::{self, TemplatePaths};
use crate::toolchain::{DevServerExit, Toolchain};
use crate::utils;
use crate::validate::validate_mongo_uri;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseMode {
  None,
  /// Placeholder written, waiting for the user to paste a connection string.
  Pending,
  Configured,
}

/// Where a run ended. Every variant is a successful exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
  /// Existing directory kept; nothing was touched.
  Cancelled,
  ManualInstall,
  InstallFailed,
  /// Dependencies installed, dev servers not started.
  Installed,
  DevServersExited,
}

/// Mutable state of one generator run.
#[derive(Debug)]
pub struct SetupSession {
  project_name: String,
  language: Language,
  pub ports: Ports,
  pub database: DatabaseMode,
  pub dev_runner_ready: bool,
  pub should_run: bool,
  project_dir: PathBuf,
  client_dir: PathBuf,
  server_dir: PathBuf,
}

impl SetupSession {
  /// Derives all project paths from `project_name` under `base_dir`.
  pub fn new(project_name: impl Into<String>, language: Language, base_dir: &Path) -> Self {
    let project_name = project_name.into();
    let project_dir = base_dir.join(&project_name);
    SetupSession {
      client_dir: project_dir.join(CLIENT_DIR_NAME),
      server_dir: project_dir.join(SERVER_DIR_NAME),
      project_dir,
      project_name,
      language,
      ports: Ports::default(),
      database: DatabaseMode::None,
      dev_runner_ready: false,
      should_run: false,
    }
  }

  pub fn client_env_path(&self) -> PathBuf {
    self.client_dir.join(ENV_FILE_NAME)
  }

  pub fn server_env_path(&self) -> PathBuf {
    self.server_dir.join(ENV_FILE_NAME)
  }
}

/// Entry point of the interactive flow: asks name and language, then runs the setup
/// in the current working directory.
pub fn run_generate(
  templates_dir: &Path,
  prompter: &mut dyn Prompter,
  toolchain: &dyn Toolchain,
) -> Result<SetupOutcome, SetupError> {
  println!();
  println!("{}", style("MERN Stack Project Generator").cyan().bold());
  println!(
    "{}",
    style("Create a full-stack JavaScript or TypeScript application").dim()
  );
  println!();

  let project_name = prompts::ask_project_name(prompter)?;
  let language = prompts::ask_language(prompter)?;
  info!("Creating {} with {}...", project_name, language);

  let cwd = std::env::current_dir()?;
  let mut session = SetupSession::new(project_name, language, &cwd);
  let outcome = run_setup(&mut session, templates_dir, prompter, toolchain)?;
  if outcome != SetupOutcome::Cancelled {
    info!("All done! Happy coding!");
  }
  Ok(outcome)
}

/// Drives the fixed stage sequence for `session`. Any `Err` is fatal for the run.
pub fn run_setup(
  session: &mut SetupSession,
  templates_dir: &Path,
  prompter: &mut dyn Prompter,
  toolchain: &dyn Toolchain,
) -> Result<SetupOutcome, SetupError> {
  info!(
    "Setting up {} project: {}",
    session.language, session.project_name
  );

  // --- 1. Validate Templates ---
  let template_paths = templates::resolve_templates(templates_dir, session.language)?;
  debug!("Template paths: {:?}", template_paths);

  // --- 2. Existing Directory ---
  if !handle_existing_directory(session, prompter)? {
    return Ok(SetupOutcome::Cancelled);
  }

  // --- 3. Copy Templates ---
  copy_templates(session, &template_paths)?;

  // --- 4. Database ---
  configure_database(session, prompter, toolchain)?;

  // --- 5. Dependencies ---
  configure_dependencies(session, prompter, toolchain)
}

/// Returns `false` when the user keeps an existing directory.
fn handle_existing_directory(
  session: &SetupSession,
  prompter: &mut dyn Prompter,
) -> Result<bool, SetupError> {
  if !session.project_dir.is_dir() {
    return Ok(true);
  }

  warn!("Directory '{}' already exists!", session.project_name);
  if !prompts::ask_overwrite(prompter)? {
    info!("Setup cancelled by user");
    return Ok(false);
  }

  fs::remove_dir_all(&session.project_dir).map_err(|e| SetupError::DirRemoval {
    path: session.project_dir.clone(),
    source: e,
  })?;
  info!("Existing directory removed");
  Ok(true)
}

fn copy_templates(session: &SetupSession, paths: &TemplatePaths) -> Result<(), SetupError> {
  let pb = utils::spinner("Copying template files...");
  let result = fs::create_dir_all(&session.project_dir)
    .map_err(|e| SetupError::OutputDirCreation {
      path: session.project_dir.clone(),
      source: e,
    })
    .and_then(|_| utils::copy_tree(&paths.client, &session.client_dir))
    .and_then(|client| Ok(client + utils::copy_tree(&paths.server, &session.server_dir)?));

  match result {
    Ok(files) => {
      pb.finish_with_message(format!(
        "{} templates copied successfully! ({} files)",
        session.language, files
      ));
      info!(
        "Created project structure in: {}",
        session.project_dir.display()
      );
      Ok(())
    }
    Err(e) => {
      pb.abandon_with_message("Failed to copy template files");
      Err(e)
    }
  }
}

fn configure_database(
  session: &mut SetupSession,
  prompter: &mut dyn Prompter,
  toolchain: &dyn Toolchain,
) -> Result<(), SetupError> {
  let wants_db = prompts::ask_wants_database(prompter)?;
  session.database = if wants_db {
    DatabaseMode::Pending
  } else {
    DatabaseMode::None
  };
  let mongo_uri = if wants_db { MONGO_PLACEHOLDER_URI } else { "" };

  let server_env = session.server_env_path();
  env_file::create_env_files(
    &session.client_env_path(),
    &server_env,
    &EnvSettings {
      ports: session.ports,
      mongo_uri,
    },
  )?;
  info!("Environment files created");

  if !wants_db {
    info!("Skipping MongoDB configuration as requested");
    return Ok(());
  }

  info!("Opening server/.env file for MongoDB configuration...");
  if toolchain.open_in_editor(&server_env).opened {
    info!("Opened .env file in your editor");
  } else {
    warn!("Could not open an editor automatically. Please open server/.env manually to configure your MongoDB URI.");
    info!("File location: {}", server_env.display());
  }

  await_mongo_uri(session, &server_env, prompter)
}

/// Bounded readiness loop. Every answer, "not yet" included, spends one attempt.
fn await_mongo_uri(
  session: &mut SetupSession,
  server_env: &Path,
  prompter: &mut dyn Prompter,
) -> Result<(), SetupError> {
  let mut attempts = 0;
  while session.database == DatabaseMode::Pending && attempts < MAX_DB_ATTEMPTS {
    attempts += 1;
    println!();
    info!("Please update the MONGODB_URI in server/.env with your actual MongoDB connection string");
    warn!("Attempt {}/{}", attempts, MAX_DB_ATTEMPTS);

    match prompts::ask_mongo_readiness(prompter)? {
      MongoReadiness::Skip => {
        info!("Skipping MongoDB setup. You can configure it later in server/.env");
        env_file::patch_mongo_uri(server_env, "")?;
        session.database = DatabaseMode::None;
        return Ok(());
      }
      MongoReadiness::NotYet => {
        info!("Take your time. The setup will wait for you to configure MongoDB.");
      }
      MongoReadiness::Ready => match fs::read_to_string(server_env) {
        Ok(text) if validate_mongo_uri(&text) => {
          info!("Valid MongoDB URI detected!");
          session.database = DatabaseMode::Configured;
        }
        Ok(_) => {
          error!("MongoDB URI not detected or invalid format");
          info!("Expected format: mongodb://... or mongodb+srv://...");
          warn!("Make sure you've replaced '{}' with your actual MongoDB URI", MONGO_PLACEHOLDER_URI);
        }
        Err(e) => error!("Failed to read .env file: {}", e),
      },
    }
  }

  if session.database == DatabaseMode::Pending {
    warn!(
      "Maximum attempts ({}) reached. Continuing without a validated MongoDB URI.",
      MAX_DB_ATTEMPTS
    );
    info!("You can configure MongoDB later in server/.env");
    session.database = DatabaseMode::None;
  }
  Ok(())
}

fn configure_dependencies(
  session: &mut SetupSession,
  prompter: &mut dyn Prompter,
  toolchain: &dyn Toolchain,
) -> Result<SetupOutcome, SetupError> {
  println!();
  if !prompts::ask_install_now(prompter)? {
    print_manual_instructions(session);
    return Ok(SetupOutcome::ManualInstall);
  }

  session.dev_runner_ready = ensure_dev_runner(prompter, toolchain)?;

  let launch = prompts::ask_launch_mode(prompter)?;
  session.should_run = launch.runs_servers();
  if launch == LaunchMode::CustomPorts {
    session.ports = prompts::ask_custom_ports(prompter)?;
    env_file::update_env_files(
      &session.client_env_path(),
      &session.server_env_path(),
      session.ports,
    )?;
    info!("Environment files updated with custom ports");
    info!("Backend port is set in server/.env (PORT); frontend port is used by the dev script.");
  }

  info!("Creating root package.json...");
  manifest::write_root_manifest(
    &session.project_dir,
    &session.project_name,
    session.language,
    session.ports,
  )?;
  info!("Root package.json created");

  install_and_run(session, toolchain)
}

/// Makes sure the global dev runner is usable. Declining or a failed install only
/// disables the automatic launch.
fn ensure_dev_runner(
  prompter: &mut dyn Prompter,
  toolchain: &dyn Toolchain,
) -> Result<bool, SetupError> {
  info!("Checking for '{}' package...", DEV_RUNNER);
  if toolchain.is_global_tool_installed(DEV_RUNNER) {
    info!("'{}' is already available", DEV_RUNNER);
    return Ok(true);
  }

  warn!("'{}' is not installed globally", DEV_RUNNER);
  if !prompts::ask_install_dev_runner(prompter, DEV_RUNNER)? {
    warn!(
      "Skipping '{}' installation. You'll need to run client and server separately.",
      DEV_RUNNER
    );
    return Ok(false);
  }

  match toolchain.install_global_tool(DEV_RUNNER) {
    Ok(()) => Ok(true),
    Err(e) => {
      error!(
        "Failed to install {}: {}. You may need to install it manually or run client and server separately.",
        DEV_RUNNER, e
      );
      Ok(false)
    }
  }
}

fn install_and_run(
  session: &SetupSession,
  toolchain: &dyn Toolchain,
) -> Result<SetupOutcome, SetupError> {
  println!();
  info!("Installing dependencies... This may take a few minutes.");
  if let Err(e) = toolchain.run_install_step(&session.project_dir) {
    debug!("Install step failed: {}", e);
    return Ok(SetupOutcome::InstallFailed);
  }

  match (session.should_run, session.dev_runner_ready) {
    (true, true) => {
      match toolchain.run_dev_servers(&session.project_dir, session.ports) {
        Ok(DevServerExit::StoppedByUser) => info!("Development servers stopped by user"),
        Ok(DevServerExit::Exited) => info!("Development servers exited"),
        Err(e) => error!("Failed to start development servers: {}", e),
      }
      Ok(SetupOutcome::DevServersExited)
    }
    (true, false) => {
      println!();
      warn!("Skipping auto-start because '{}' is not available.", DEV_RUNNER);
      info!("To run client and server together, install {} then run:", DEV_RUNNER);
      print_command(&format!("npm install -g {}", DEV_RUNNER));
      print_command(&format!("cd {}", session.project_name));
      print_command("npm run dev");
      println!();
      info!("Or run client and server in separate terminals:");
      print_command("cd client && npm run dev");
      print_command("cd server && npm run dev");
      Ok(SetupOutcome::Installed)
    }
    (false, _) => {
      println!();
      info!("Setup completed successfully!");
      info!("To start development servers:");
      print_command(&format!("cd {}", session.project_name));
      print_command("npm run dev");
      println!();
      info!("Frontend will be available at: http://localhost:{}", session.ports.frontend);
      info!("Backend will be available at: http://localhost:{}", session.ports.backend);
      Ok(SetupOutcome::Installed)
    }
  }
}

fn print_command(command: &str) {
  println!("  {}", style(command).green());
}

fn print_manual_instructions(session: &SetupSession) {
  info!("You chose to install dependencies manually.");
  println!();
  info!("Manual installation instructions:");
  let steps: [(&str, Vec<String>); 4] = [
    (
      "1. Navigate to your project:",
      vec![format!("cd {}", session.project_name)],
    ),
    (
      "2. Install client dependencies:",
      vec!["cd client".into(), "npm install".into()],
    ),
    (
      "3. Install server dependencies:",
      vec!["cd ../server".into(), "npm install".into()],
    ),
    (
      "4. Start development:",
      vec!["cd .. (back to project root)".into(), "npm run dev".into()],
    ),
  ];
  for (title, commands) in &steps {
    println!("{}", style(title).cyan());
    for command in commands {
      print_command(command);
    }
    println!();
  }
  info!("Setup finished. Follow the instructions above to continue.");
}
