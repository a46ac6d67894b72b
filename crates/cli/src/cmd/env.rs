//! Implementation of the `tide env` command.
//!
//! Assembles the build configuration for the running host, applies any
//! requested third-party libraries and prints the fully expanded environment.

use anyhow::{Context, Result};
use tide_build::env::ListKey;
use tide_build::{BuildArgs, BuildConfig, ProjectDefaults};
use tracing::info;

use crate::output::{print_info, print_json, print_list, print_success};

const LIST_ORDER: [ListKey; 9] = [
  ListKey::Path,
  ListKey::CppPath,
  ListKey::LibPath,
  ListKey::Libs,
  ListKey::CppFlags,
  ListKey::CxxFlags,
  ListKey::LinkFlags,
  ListKey::FrameworkPath,
  ListKey::Frameworks,
];

pub fn cmd_env(defaults: &ProjectDefaults, args: BuildArgs, thirdparty: &[String], json: bool) -> Result<()> {
  let config = BuildConfig::for_host(defaults, args)?;

  let mut env = config.env.clone();
  for name in thirdparty {
    info!(library = %name, "adding third-party library");
    config.add_thirdparty(&mut env, name);
  }

  let rendered = env.render().context("Failed to expand build environment")?;

  if json {
    return print_json(&serde_json::json!({
      "platform": config.platform,
      "lite": config.lite,
      "debug": config.debug,
      "version": config.version,
      "build_dir": config.dir,
      "env": rendered,
    }));
  }

  print_success(&format!("Tide {} for {}", config.version, config.platform));
  if config.lite {
    print_info("Lite build");
  }
  println!();

  for key in LIST_ORDER {
    print_list(key.as_str(), rendered.get(key));
  }

  let defines: Vec<String> = rendered.defines.iter().map(|d| d.to_string()).collect();
  print_list("CPPDEFINES", &defines);

  for (name, value) in &rendered.settings {
    print_list(name, value);
  }

  let process_env: Vec<String> = rendered
    .process_env
    .iter()
    .map(|(k, v)| format!("{k}={v}"))
    .collect();
  print_list("ENV", &process_env);

  Ok(())
}
