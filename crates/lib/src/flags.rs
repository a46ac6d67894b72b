//! Compiler and linker flags for each platform.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::env::{BuildEnv, Define, ListKey};
use crate::error::{ConfigError, Result};
use crate::platform::Platform;
use crate::platform::arch::Arch;
use crate::platform::os::Os;

const FLAGS_64: [&str; 6] = [
  "-m64",
  "-Wall",
  "-Werror",
  "-fno-common",
  "-fvisibility=hidden",
  "-fno-strict-aliasing",
];

const FLAGS_32: [&str; 5] = ["-m32", "-Wall", "-fno-common", "-fvisibility=hidden", "-fno-strict-aliasing"];

/// Locates the active macOS developer directory.
pub trait DeveloperDirProbe {
  /// Returns the reported developer directory. An empty path means nothing
  /// was reported.
  fn developer_dir(&self) -> PathBuf;
}

/// Asks `xcode-select` for the developer directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct XcodeSelect;

impl XcodeSelect {
  pub const PROGRAM: &'static str = "/usr/bin/xcode-select";
}

impl DeveloperDirProbe for XcodeSelect {
  fn developer_dir(&self) -> PathBuf {
    debug!(program = Self::PROGRAM, "querying developer directory");
    match Command::new(Self::PROGRAM).arg("--print-path").output() {
      Ok(output) => {
        let stdout = String::from_utf8_lossy(&output.stdout);
        PathBuf::from(stdout.lines().next().unwrap_or_default())
      }
      Err(e) => {
        warn!(error = %e, "failed to run xcode-select");
        PathBuf::new()
      }
    }
  }
}

/// Append the word-size flags and the platform-specific toolchain setup.
///
/// Unrecognized OS/arch combinations only get `OS_32`.
pub fn compose(platform: Platform, env: &mut BuildEnv, probe: &dyn DeveloperDirProbe, sdk_version: &str) -> Result<()> {
  apply_word_size(platform, env);

  if platform.is_osx() {
    apply_osx_sdk(env, probe, sdk_version)?;
  }

  Ok(())
}

fn apply_word_size(platform: Platform, env: &mut BuildEnv) {
  match (platform.os, platform.arch) {
    (Os::Linux, Arch::X86_64) => {
      env.append(ListKey::CppFlags, FLAGS_64);
      env.append(ListKey::LinkFlags, ["-m64"]);
      env.define(Define::new("OS_64", "1"));
    }
    (Os::Linux, _) | (Os::Osx, _) => {
      env.append(ListKey::CppFlags, FLAGS_32);
      env.append(ListKey::LinkFlags, ["-m32"]);
      env.define(Define::new("OS_32", "1"));
    }
    _ => {
      debug!(platform = %platform, "no word-size flags for platform");
      env.define(Define::new("OS_32", "1"));
    }
  }
}

/// Path of the macOS SDK inside a developer directory.
pub fn osx_sdk_dir(developer_dir: &Path, sdk_version: &str) -> PathBuf {
  developer_dir
    .join("Platforms/MacOSX.platform/Developer/SDKs")
    .join(format!("MacOSX{sdk_version}.sdk"))
}

fn apply_osx_sdk(env: &mut BuildEnv, probe: &dyn DeveloperDirProbe, sdk_version: &str) -> Result<()> {
  let developer_dir = probe.developer_dir();
  if developer_dir.as_os_str().is_empty() || !developer_dir.exists() {
    return Err(ConfigError::XcodeNotFound(developer_dir));
  }

  let sdk_dir = osx_sdk_dir(&developer_dir, sdk_version).display().to_string();
  let min_version = format!("-mmacosx-version-min={sdk_version}");
  info!(sdk = %sdk_dir, "using macOS SDK");

  env.set("MACOSX_DEPLOYMENT_TARGET", [sdk_version]);
  env.set("CC", ["gcc", "-arch", "i386"]);
  env.set("CXX", ["g++", "-arch", "i386"]);
  env.append(ListKey::Frameworks, ["Foundation", "IOKit"]);
  env.append(
    ListKey::CxxFlags,
    [
      "-isysroot".to_string(),
      sdk_dir.clone(),
      min_version.clone(),
      "-x".to_string(),
      "objective-c++".to_string(),
    ],
  );
  env.append(
    ListKey::LinkFlags,
    [
      "-isysroot".to_string(),
      sdk_dir.clone(),
      format!("-syslibroot,{sdk_dir}"),
      "-lstdc++".to_string(),
      min_version,
    ],
  );
  env.append(
    ListKey::CppFlags,
    [
      "-Wall".to_string(),
      "-fno-common".to_string(),
      "-fvisibility=hidden".to_string(),
      format!("-DMACOSX_DEPLOYMENT_TARGET={sdk_version}"),
    ],
  );

  Ok(())
}

/// Put the Platform SDK and Visual Studio directories ahead of every other
/// search path. The build tool does not read the IDE's own settings.
pub fn apply_windows_search_paths(env: &mut BuildEnv) {
  env.prepend(ListKey::Path, ["${MSPSDK}"]);
  env.prepend(ListKey::CppPath, [r"${MSPSDK}\include"]);
  env.prepend(ListKey::LibPath, [r"${MSPSDK}\lib"]);
  env.prepend(ListKey::CppPath, [r"${MSVS}\VC\atlmfc\include"]);
}
