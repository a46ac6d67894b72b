//! Project defaults (`tide.toml`).
//!
//! These are the values a project hands to the configuration builder before
//! any environment or invocation override is applied.
//!
//! ```toml
//! product_version = "1.3.0"
//! product_name = "Tide"
//! global_namespace = "Ti"
//! config_filename = "tiapp.xml"
//! distribution_url = "https://dist.example.com"
//! build_dir = "build"
//! third_party_dir = "thirdparty"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

pub const DEFAULTS_FILENAME: &str = "tide.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectDefaults {
  pub product_version: String,
  pub product_name: String,
  pub global_namespace: String,
  pub config_filename: String,
  pub distribution_url: String,
  pub boot_runtime_flag: String,
  pub boot_home_flag: String,
  /// Root under which per-OS build directories are created.
  pub build_dir: PathBuf,
  /// Root of the prebuilt third-party dependency tree.
  pub third_party_dir: PathBuf,
  pub macosx_sdk_version: String,
}

impl Default for ProjectDefaults {
  fn default() -> Self {
    Self {
      product_version: "1.3.0".to_string(),
      product_name: "Tide".to_string(),
      global_namespace: "Ti".to_string(),
      config_filename: "tiapp.xml".to_string(),
      distribution_url: "https://api.tidesdk.org".to_string(),
      boot_runtime_flag: "--runtime".to_string(),
      boot_home_flag: "--start".to_string(),
      build_dir: PathBuf::from("build"),
      third_party_dir: PathBuf::from("thirdparty"),
      macosx_sdk_version: "10.8".to_string(),
    }
  }
}

impl ProjectDefaults {
  /// Load defaults from a TOML file. Keys not present keep their built-in values.
  pub fn from_file(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadDefaults {
      path: path.to_path_buf(),
      source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::ParseDefaults {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Load `tide.toml` from `dir` if it exists, otherwise use built-in defaults.
  pub fn discover(dir: &Path) -> Result<Self> {
    let path = dir.join(DEFAULTS_FILENAME);
    if path.is_file() {
      Self::from_file(&path)
    } else {
      Ok(Self::default())
    }
  }
}
