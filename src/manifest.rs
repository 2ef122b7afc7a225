// src/manifest.rs
//! Root `package.json` that ties the client and server together.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::config::{Language, Ports, DEV_RUNNER, ROOT_MANIFEST_NAME};
use crate::error::SetupError;

#[derive(Debug, Serialize)]
pub struct RootManifest {
  pub name: String,
  pub version: String,
  pub description: String,
  pub scripts: RootScripts,
}

// Field order is the script order in the written file.
#[derive(Debug, Serialize)]
pub struct RootScripts {
  pub setup: String,
  #[serde(rename = "install-client")]
  pub install_client: String,
  #[serde(rename = "install-server")]
  pub install_server: String,
  pub dev: String,
  #[serde(rename = "dev-client")]
  pub dev_client: String,
  #[serde(rename = "dev-server")]
  pub dev_server: String,
  pub build: String,
  #[serde(rename = "build-server")]
  pub build_server: String,
}

impl RootManifest {
  pub fn new(project_name: &str, language: Language, ports: Ports) -> Self {
    RootManifest {
      name: format!("{}-root", project_name),
      version: "1.0.0".to_string(),
      description: format!("{} MERN stack application", language.display_name()),
      scripts: RootScripts {
        setup: "npm run install-client && npm run install-server".to_string(),
        install_client: "cd client && npm install".to_string(),
        install_server: "cd server && npm install".to_string(),
        dev: format!("{} \"npm run dev-client\" \"npm run dev-server\"", DEV_RUNNER),
        dev_client: format!("cd client && npm run dev -- --port {}", ports.frontend),
        dev_server: "cd server && npm run dev".to_string(),
        build: "cd client && npm run build".to_string(),
        build_server: "cd server && npm run build".to_string(),
      },
    }
  }
}

/// Serializes the root manifest into `<project_dir>/package.json`, replacing any existing one.
pub fn write_root_manifest(
  project_dir: &Path,
  project_name: &str,
  language: Language,
  ports: Ports,
) -> Result<PathBuf, SetupError> {
  let manifest = RootManifest::new(project_name, language, ports);
  let mut content = serde_json::to_string_pretty(&manifest)?;
  content.push('\n');

  let path = project_dir.join(ROOT_MANIFEST_NAME);
  debug!("Writing root manifest {}", path.display());
  fs::write(&path, content).map_err(|e| SetupError::ManifestWrite {
    path: path.clone(),
    source: e,
  })?;
  Ok(path)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::Value;
  use tempfile::TempDir;

  #[test]
  fn dev_client_carries_frontend_port() {
    let dir = TempDir::new().unwrap();
    let ports = Ports {
      frontend: 3000,
      backend: 4000,
    };
    let path = write_root_manifest(dir.path(), "shop", Language::TypeScript, ports).unwrap();

    let json: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["name"], "shop-root");
    assert_eq!(json["description"], "TypeScript MERN stack application");
    assert_eq!(
      json["scripts"]["dev-client"],
      "cd client && npm run dev -- --port 3000"
    );
    assert_eq!(
      json["scripts"]["dev"],
      "concurrently \"npm run dev-client\" \"npm run dev-server\""
    );
  }

  #[test]
  fn scripts_keep_declared_order() {
    let manifest = RootManifest::new("app", Language::JavaScript, Ports::default());
    let text = serde_json::to_string(&manifest).unwrap();
    let order = [
      "\"setup\"",
      "\"install-client\"",
      "\"install-server\"",
      "\"dev\"",
      "\"dev-client\"",
      "\"dev-server\"",
      "\"build\"",
      "\"build-server\"",
    ];
    let positions: Vec<usize> = order.iter().map(|k| text.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);
  }

  #[test]
  fn write_into_missing_dir_fails() {
    let dir = TempDir::new().unwrap();
    let err = write_root_manifest(
      &dir.path().join("absent"),
      "app",
      Language::JavaScript,
      Ports::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SetupError::ManifestWrite { .. }));
  }
}
