// src/templates.rs
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::{Language, CLIENT_DIR_NAME, SERVER_DIR_NAME};
use crate::error::SetupError;

/// Client and server template roots for one language variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePaths {
  pub client: PathBuf,
  pub server: PathBuf,
}

/// Resolves `<templates_dir>/<language>/{client,server}`. Both must be directories.
pub fn resolve_templates(templates_dir: &Path, language: Language) -> Result<TemplatePaths, SetupError> {
  let variant_dir = templates_dir.join(language.dir_name());
  let client = variant_dir.join(CLIENT_DIR_NAME);
  let server = variant_dir.join(SERVER_DIR_NAME);
  debug!(
    "Looking for {} templates at {} and {}",
    language,
    client.display(),
    server.display()
  );

  if !client.is_dir() || !server.is_dir() {
    return Err(SetupError::TemplatesMissing {
      language: language.display_name().to_string(),
      path: variant_dir,
    });
  }
  Ok(TemplatePaths { client, server })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn finds_both_halves() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("typescript/client")).unwrap();
    fs::create_dir_all(dir.path().join("typescript/server")).unwrap();

    let paths = resolve_templates(dir.path(), Language::TypeScript).unwrap();
    assert_eq!(paths.client, dir.path().join("typescript/client"));
    assert_eq!(paths.server, dir.path().join("typescript/server"));
  }

  #[test]
  fn missing_half_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("javascript/client")).unwrap();
    fs::write(dir.path().join("javascript/server"), "not a dir").unwrap();

    let err = resolve_templates(dir.path(), Language::JavaScript).unwrap_err();
    assert!(matches!(err, SetupError::TemplatesMissing { .. }));
    assert!(err.to_string().starts_with("JavaScript templates are missing"));
  }

  #[test]
  fn bundled_templates_are_complete() {
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
    for language in [Language::TypeScript, Language::JavaScript] {
      let paths = resolve_templates(&bundled, language).unwrap();
      assert!(paths.client.join("package.json").is_file());
      assert!(paths.server.join("package.json").is_file());
    }
  }
}
