use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating systems Tide can be built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Win32,
  Osx,
  Linux,
}

impl Os {
  /// Returns the lowercase identifier used in build directories and defines
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Win32 => "win32",
      Self::Osx => "osx",
      Self::Linux => "linux",
    }
  }

  /// Name of the `OS_<NAME>` preprocessor define for this OS
  pub fn define_name(&self) -> String {
    format!("OS_{}", self.as_str().to_uppercase())
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for Os {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "win32" => Ok(Self::Win32),
      "osx" => Ok(Self::Osx),
      "linux" => Ok(Self::Linux),
      other => Err(format!("unknown os '{other}' (expected win32, osx or linux)")),
    }
  }
}
