use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A pluggable component directory (name, version, location).
#[derive(Debug, Clone, Serialize)]
pub struct Module {
  pub name: String,
  pub version: String,
  pub dir: PathBuf,
}

impl Module {
  pub fn new(name: impl Into<String>, version: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
    Self {
      name: name.into(),
      version: version.into(),
      dir: dir.into(),
    }
  }
}

/// Modules are identified by name alone.
impl PartialEq for Module {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
  }
}

impl Eq for Module {}

/// Displays as the module directory, the form build descriptions use it in.
impl fmt::Display for Module {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.dir.display())
  }
}
