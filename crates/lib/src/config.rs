//! The build configuration assembled once per build invocation.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::args::BuildArgs;
use crate::defaults::ProjectDefaults;
use crate::env::{BuildEnv, Define, ListKey};
use crate::error::{ConfigError, Result};
use crate::flags::{self, DeveloperDirProbe, XcodeSelect};
use crate::module::Module;
use crate::platform::{HostInfo, Platform, detect};
use crate::targets::{PhaseTracker, TargetSpec};
use crate::thirdparty::{self, ResolveContext};
use crate::vars::Variables;

/// Invocation argument enabling the lite build variant.
pub const ARG_LITE: &str = "lite";
/// Invocation argument enabling a debug build.
pub const ARG_DEBUG: &str = "debug";
/// Invocation argument selecting debug WebKit libraries on Windows.
pub const ARG_WEBKIT_DEBUG: &str = "webkit_debug";

/// Source tree locations, known once the build description names its source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDirs {
  pub source_dir: PathBuf,
  pub include_dir: PathBuf,
  pub utils_dir: PathBuf,
}

#[derive(Debug)]
pub struct BuildConfig {
  pub platform: Platform,
  pub debug: bool,
  pub lite: bool,
  pub modules: Vec<Module>,
  pub env: BuildEnv,
  pub variables: Variables,
  /// Resolved `PRODUCT_VERSION`.
  pub version: String,
  /// Per-OS build output root.
  pub dir: PathBuf,
  pub dist_dir: PathBuf,
  pub runtime_build_dir: PathBuf,
  pub runtime_template_dir: PathBuf,
  pub third_party_dir: PathBuf,
  pub source: Option<SourceDirs>,
  pub targets: PhaseTracker,
  args: BuildArgs,
}

/// Declare every variable a Tide build understands.
pub fn declare_variables(defaults: &ProjectDefaults) -> Variables {
  let mut vars = Variables::new();
  vars.add(
    "PRODUCT_VERSION",
    "The product version for Tide",
    &defaults.product_version,
  );
  vars.add(
    "PRODUCT_NAME",
    "The product name that libTide will display (default: \"Tide\")",
    &defaults.product_name,
  );
  vars.add(
    "GLOBAL_NAMESPACE",
    "The name of the Tide global variable",
    &defaults.global_namespace,
  );
  vars.add(
    "CONFIG_FILENAME",
    "The name of the Tide config file",
    &defaults.config_filename,
  );
  vars.add(
    "DISTRIBUTION_URL",
    "The base URL of all streams",
    &defaults.distribution_url,
  );
  vars.add("MSVC_VERSION", "", "8.0Exp");
  vars.add(
    "BOOT_RUNTIME_FLAG",
    "Command-line flag the boot loader uses to locate the runtime",
    &defaults.boot_runtime_flag,
  );
  vars.add(
    "BOOT_HOME_FLAG",
    "Command-line flag the boot loader uses to locate the application home",
    &defaults.boot_home_flag,
  );

  vars.add_from_environ(
    "MSPSDK",
    "Path of the Microsoft Platform SDK",
    r"C:\Program Files\Microsoft Platform SDK",
  );
  vars.add_from_environ(
    "MSVS",
    "Path of Microsoft Visual Studio",
    r"C:\Program Files\Microsoft Visual Studio 8",
  );
  vars.add_from_environ("PKG_CONFIG_PATH", "The path for pkg-config", "/usr/lib/pkgconfig");
  vars.add_from_environ("PYTHON_VERSION", "The version of Python to build against", "2.7");
  vars.add_from_environ("PYTHON_INCLUDE", "The Python include directory", "/usr/include/python2.7");
  vars
}

fn absolute(path: &Path) -> PathBuf {
  std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

impl BuildConfig {
  /// Assemble the configuration for the running host.
  pub fn for_host(defaults: &ProjectDefaults, args: BuildArgs) -> Result<Self> {
    Self::new(defaults, args, HostInfo::current().as_ref(), &XcodeSelect)
  }

  /// Assemble the configuration for an explicit host report.
  ///
  /// # Errors
  ///
  /// Returns `UnsupportedHost` if the host is not recognized and
  /// `XcodeNotFound` on macOS without developer tools.
  pub fn new(
    defaults: &ProjectDefaults,
    args: BuildArgs,
    host: Option<&HostInfo>,
    probe: &dyn DeveloperDirProbe,
  ) -> Result<Self> {
    let detection = detect(host).ok_or_else(|| ConfigError::UnsupportedHost {
      sysname: host.map(|h| h.sysname.clone()).unwrap_or_default(),
    })?;
    let platform = detection.platform;
    info!(os = %platform.os, arch = %platform.arch, "detected platform");

    let variables = declare_variables(defaults);
    let resolved = variables.resolve(&args);
    let version = resolved.get("PRODUCT_VERSION").unwrap_or_default().to_string();

    let mut env = BuildEnv::new(resolved);
    if detection.force_x86_processor {
      env.set_process_env("PROCESSOR_ARCHITECTURE", "x86");
    }

    env.define(Define::new(platform.os.define_name(), "1"));
    env.define(Define::new("_OS_NAME", platform.os.as_str()));
    for (name, var) in [
      ("_PRODUCT_VERSION", "PRODUCT_VERSION"),
      ("_PRODUCT_NAME", "PRODUCT_NAME"),
      ("_GLOBAL_NAMESPACE", "GLOBAL_NAMESPACE"),
      ("_CONFIG_FILENAME", "CONFIG_FILENAME"),
      ("_BOOT_RUNTIME_FLAG", "BOOT_RUNTIME_FLAG"),
      ("_BOOT_HOME_FLAG", "BOOT_HOME_FLAG"),
      ("_DISTRIBUTION_URL", "DISTRIBUTION_URL"),
    ] {
      env.define(Define::new(name, format!("${{{var}}}")));
    }

    let dir = absolute(&defaults.build_dir.join(platform.os.as_str()));
    let dist_dir = dir.join("dist");
    let runtime_build_dir = dir.join("runtime");
    let runtime_template_dir = runtime_build_dir.join("template");

    env.append(ListKey::LibPath, [dir.display().to_string()]);

    let lite = args.flag(ARG_LITE);
    if lite {
      env.define(Define::flag("TIDE_LITE"));
    }

    flags::compose(platform, &mut env, probe, &defaults.macosx_sdk_version)?;

    if platform.is_win32() {
      flags::apply_windows_search_paths(&mut env);
    }

    Ok(Self {
      platform,
      debug: args.flag(ARG_DEBUG),
      lite,
      modules: Vec::new(),
      env,
      variables,
      version,
      dir,
      dist_dir,
      runtime_build_dir,
      runtime_template_dir,
      third_party_dir: defaults.third_party_dir.clone(),
      source: None,
      targets: PhaseTracker::new(),
      args,
    })
  }

  pub fn args(&self) -> &BuildArgs {
    &self.args
  }

  /// Record the source root and derive the directories built from it.
  pub fn set_source_dir(&mut self, dir: &Path) {
    let source_dir = absolute(dir);
    self.source = Some(SourceDirs {
      include_dir: self.dir.join("sdk").join("include"),
      utils_dir: source_dir.join("lib").join("utils"),
      source_dir,
    });
  }

  pub fn is_linux(&self) -> bool {
    self.platform.is_linux()
  }

  pub fn is_osx(&self) -> bool {
    self.platform.is_osx()
  }

  pub fn is_win32(&self) -> bool {
    self.platform.is_win32()
  }

  pub fn is_64(&self) -> bool {
    self.platform.is_64()
  }

  pub fn is_32(&self) -> bool {
    self.platform.is_32()
  }

  pub fn add_module(&mut self, module: Module) {
    self.modules.push(module);
  }

  /// First module registered under `name`.
  pub fn get_module(&self, name: &str) -> Option<&Module> {
    self.modules.iter().find(|m| m.name == name)
  }

  /// Join path components onto the third-party root.
  pub fn tp<I, P>(&self, parts: I) -> PathBuf
  where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
  {
    parts
      .into_iter()
      .fold(self.third_party_dir.clone(), |path, part| path.join(part))
  }

  pub fn resolve_context(&self) -> ResolveContext<'_> {
    ResolveContext {
      platform: self.platform,
      lite: self.lite,
      webkit_debug: self.args.flag(ARG_WEBKIT_DEBUG),
      third_party_dir: &self.third_party_dir,
    }
  }

  /// Append a third-party library's paths and link libraries onto `env`.
  ///
  /// `env` is usually a per-target copy of [`BuildConfig::env`]. Unknown
  /// libraries leave it untouched.
  pub fn add_thirdparty(&self, env: &mut BuildEnv, name: &str) {
    thirdparty::resolve(name, &self.resolve_context()).apply_to(env);
  }

  pub fn mark_build_target(&mut self, spec: impl Into<TargetSpec>) {
    self.targets.mark_build(spec);
  }

  pub fn mark_stage_target(&mut self, spec: impl Into<TargetSpec>) {
    self.targets.mark_stage(spec);
  }

  pub fn mark_dist_target(&mut self, spec: impl Into<TargetSpec>) {
    self.targets.mark_dist(spec);
  }
}
