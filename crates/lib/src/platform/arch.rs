use std::fmt;

use serde::{Deserialize, Serialize};

/// CPU architectures Tide targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
  X86,
  X86_64,
}

impl Arch {
  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
    }
  }

  pub fn is_64(&self) -> bool {
    matches!(self, Self::X86_64)
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for Arch {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "x86" => Ok(Self::X86),
      "x86_64" => Ok(Self::X86_64),
      other => Err(format!("unknown arch '{other}' (expected x86 or x86_64)")),
    }
  }
}
