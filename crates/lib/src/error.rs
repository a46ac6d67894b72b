//! Errors raised while assembling a build configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::args::ArgsError;
use crate::placeholder::PlaceholderError;

/// Exit status used when the macOS developer tools cannot be located.
pub const EXIT_XCODE_NOT_FOUND: i32 = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
  /// The host kernel is not one Tide builds on.
  #[error("unsupported build host: {sysname}")]
  UnsupportedHost { sysname: String },

  /// `xcode-select` returned a path that does not exist.
  #[error("XCode not found. Make sure you have set your xcode with xcode-select (got '{}')", .0.display())]
  XcodeNotFound(PathBuf),

  #[error("invalid argument: {0}")]
  InvalidArgument(#[from] ArgsError),

  #[error("failed to read defaults file {path}: {source}")]
  ReadDefaults {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse defaults file {path}: {source}")]
  ParseDefaults {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("substitution error: {0}")]
  Placeholder(#[from] PlaceholderError),

  /// A target ended up depending on its own phase.
  #[error("dependency cycle detected involving {0}")]
  CycleDetected(String),
}

impl ConfigError {
  /// Process exit status for a CLI reporting this error.
  pub fn exit_code(&self) -> i32 {
    match self {
      Self::XcodeNotFound(_) => EXIT_XCODE_NOT_FOUND,
      _ => 1,
    }
  }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
