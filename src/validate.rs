// src/validate.rs
//! Input checks for the values collected during setup. Nothing here touches the filesystem.

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{
  MAX_PORT, MAX_PROJECT_NAME_LEN, MIN_PORT, MONGO_PLACEHOLDER_URI, MONGO_URI_PREFIXES,
  PROJECT_NAME_PATTERN,
};
use crate::error::{InvalidName, InvalidPort};

static PROJECT_NAME_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(PROJECT_NAME_PATTERN).expect("project name pattern is valid"));

// One `MONGODB_URI=<value>` assignment per line, value optionally quoted.
static MONGO_ASSIGNMENT_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r#"(?m)^[ \t]*MONGODB_URI[ \t]*=[ \t]*["']?(.*?)["']?[ \t\r]*$"#)
    .expect("mongo assignment pattern is valid")
});

/// Checks a project name: non-blank, matches the npm-style grammar once lowercased,
/// and no longer than the configured maximum.
pub fn validate_project_name(name: &str) -> Result<(), InvalidName> {
  if name.trim().is_empty() {
    return Err(InvalidName::Empty);
  }
  if !PROJECT_NAME_RE.is_match(&name.to_lowercase()) {
    return Err(InvalidName::BadCharacters);
  }
  let len = name.chars().count();
  if len > MAX_PROJECT_NAME_LEN {
    return Err(InvalidName::TooLong {
      len,
      max: MAX_PROJECT_NAME_LEN,
    });
  }
  Ok(())
}

/// Parses `raw` as a port number in the unprivileged range. `label` names the port
/// ("Frontend", "Backend") in the error message.
pub fn validate_port(raw: &str, label: &str) -> Result<u16, InvalidPort> {
  let value: i64 = raw.trim().parse().map_err(|_| InvalidPort::NotANumber {
    label: label.to_string(),
  })?;
  if value < i64::from(MIN_PORT) || value > i64::from(MAX_PORT) {
    return Err(InvalidPort::OutOfRange {
      label: label.to_string(),
      min: MIN_PORT,
      max: MAX_PORT,
    });
  }
  // Range checked above.
  Ok(value as u16)
}

/// Returns true when `env_text` binds `MONGODB_URI` to a real connection string.
pub fn validate_mongo_uri(env_text: &str) -> bool {
  let Some(caps) = MONGO_ASSIGNMENT_RE.captures(env_text) else {
    trace!("No MONGODB_URI assignment found");
    return false;
  };
  let uri = caps.get(1).map_or("", |m| m.as_str()).trim();
  trace!("Found MONGODB_URI value '{}'", uri);

  !uri.is_empty()
    && uri != MONGO_PLACEHOLDER_URI
    && MONGO_URI_PREFIXES
      .iter()
      .any(|prefix| uri.starts_with(prefix))
}
