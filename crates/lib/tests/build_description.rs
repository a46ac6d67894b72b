//! End-to-end tests that drive the library the way a build description does:
//! assemble a configuration, register targets and derive per-target environments.

use std::path::PathBuf;

use tempfile::TempDir;
use tide_build::env::ListKey;
use tide_build::flags::DeveloperDirProbe;
use tide_build::module::Module;
use tide_build::platform::{Arch, HostInfo, Os};
use tide_build::targets::{Node, Phase, Target};
use tide_build::{BuildArgs, BuildConfig, ConfigError, ProjectDefaults};

struct FixedDir(PathBuf);

impl DeveloperDirProbe for FixedDir {
  fn developer_dir(&self) -> PathBuf {
    self.0.clone()
  }
}

fn defaults_in(temp: &TempDir) -> ProjectDefaults {
  ProjectDefaults {
    build_dir: temp.path().join("build"),
    third_party_dir: temp.path().join("thirdparty"),
    ..ProjectDefaults::default()
  }
}

#[test]
fn linux_description_builds_stages_and_dists() {
  let temp = TempDir::new().unwrap();
  let host = HostInfo::new("Linux", "x86_64");
  let args = BuildArgs::parse(["PRODUCT_VERSION=1.4.0", "lite=1"]).unwrap();
  let mut config = BuildConfig::new(&defaults_in(&temp), args, Some(&host), &FixedDir(PathBuf::new())).unwrap();

  assert_eq!(config.platform.os, Os::Linux);
  assert_eq!(config.platform.arch, Arch::X86_64);
  assert!(config.is_64());
  assert_eq!(config.version, "1.4.0");

  let module = Module::new("tidecore", config.version.clone(), config.dir.join("modules").join("tidecore"));
  config.add_module(module);
  assert!(config.get_module("tidecore").is_some());

  let mut webkit_env = config.env.clone();
  config.add_thirdparty(&mut webkit_env, "webkit");
  config.add_thirdparty(&mut webkit_env, "poco");
  let rendered = webkit_env.render().unwrap();

  assert_eq!(&rendered.get(ListKey::Libs)[..2], ["webkitgtk-1.0", "PocoFoundation"]);
  assert!(rendered.get(ListKey::CppFlags).contains(&"-Werror".to_string()));
  assert_eq!(
    rendered.define("_PRODUCT_VERSION").and_then(|d| d.value.as_deref()),
    Some("1.4.0")
  );
  assert!(rendered.define("TIDE_LITE").is_some());

  config.mark_build_target(vec!["libtidecore.so", "tide"]);
  let sdk_dir = config.dir.join("sdk").display().to_string();
  config.mark_stage_target(sdk_dir.as_str());
  config.mark_dist_target("sdk.zip");

  let closure = config.targets.closure(Phase::Dist).unwrap();
  let position = |node: &Node| closure.iter().position(|n| n == node).unwrap();
  assert!(position(&Node::Target(Target::new("tide"))) < position(&Node::Alias(Phase::Build)));
  assert!(position(&Node::Alias(Phase::Build)) < position(&Node::Alias(Phase::Stage)));
  assert!(position(&Node::Alias(Phase::Stage)) < position(&Node::Target(Target::new("sdk.zip"))));
  assert_eq!(closure.last(), Some(&Node::Alias(Phase::Dist)));

  let build_only = config.targets.closure(Phase::Build).unwrap();
  assert!(!build_only.contains(&Node::Target(Target::new("sdk.zip"))));
}

#[test]
fn osx_description_uses_developer_tools() {
  let temp = TempDir::new().unwrap();
  let xcode = TempDir::new().unwrap();
  let host = HostInfo::new("Darwin", "x86_64");
  let config = BuildConfig::new(
    &defaults_in(&temp),
    BuildArgs::new(),
    Some(&host),
    &FixedDir(xcode.path().to_path_buf()),
  )
  .unwrap();

  assert!(config.is_osx());
  assert!(config.is_32());

  let mut env = config.env.clone();
  config.add_thirdparty(&mut env, "webkit");
  let rendered = env.render().unwrap();

  assert!(rendered.get(ListKey::Frameworks).contains(&"Foundation".to_string()));
  assert!(rendered.get(ListKey::Frameworks).contains(&"WebKit".to_string()));
  assert_eq!(rendered.define("OS_OSX").and_then(|d| d.value.as_deref()), Some("1"));
}

#[test]
fn cyclic_registration_is_reported() {
  let temp = TempDir::new().unwrap();
  let host = HostInfo::new("Linux", "i686");
  let mut config =
    BuildConfig::new(&defaults_in(&temp), BuildArgs::new(), Some(&host), &FixedDir(PathBuf::new())).unwrap();

  config.mark_build_target("shared");
  config.mark_stage_target("shared");

  let err = config.targets.closure(Phase::Dist).unwrap_err();
  assert!(matches!(err, ConfigError::CycleDetected(_)));
}
