//! Implementation of the `tide thirdparty` command.
//!
//! Resolves third-party libraries for any platform without touching the host.

use anyhow::{Result, bail};
use tide_build::platform::{Arch, Os, Platform};
use tide_build::thirdparty::{ResolveContext, known_libraries, resolve};

use crate::output::{print_info, print_json, print_list, print_warning};

/// Fill in whichever of `os` and `arch` is missing from the detected host.
pub fn target_platform(os: Option<Os>, arch: Option<Arch>) -> Result<Platform> {
  let platform = match (os, arch, Platform::current()) {
    (Some(os), Some(arch), _) => Platform::new(os, arch),
    (os, arch, Some(host)) => Platform::new(os.unwrap_or(host.os), arch.unwrap_or(host.arch)),
    (_, _, None) => bail!("Could not detect the host platform; pass both --os and --arch"),
  };
  Ok(platform)
}

pub fn cmd_thirdparty(names: &[String], ctx: &ResolveContext<'_>, json: bool) -> Result<()> {
  let ResolveContext { platform, lite, .. } = *ctx;

  if names.is_empty() {
    let known: Vec<String> = known_libraries().into_iter().map(String::from).collect();
    if json {
      return print_json(&known);
    }
    print_list("Known libraries", &known);
    return Ok(());
  }

  let resolutions: Vec<_> = names.iter().map(|name| (name, resolve(name, ctx))).collect();

  if json {
    let items: Vec<_> = resolutions
      .iter()
      .map(|(name, r)| serde_json::json!({ "name": name, "platform": platform, "lite": lite, "resolution": r }))
      .collect();
    return print_json(&items);
  }

  for (name, r) in &resolutions {
    print_info(&format!("{name} ({platform}{})", if lite { ", lite" } else { "" }));
    if r.is_empty() {
      print_warning(&format!("No paths or libraries for {name} on {}", platform.os));
      continue;
    }
    print_list("CPPPATH", &r.include_paths);
    print_list("LIBPATH", &r.library_paths);
    print_list("LIBS", &r.libraries);
    print_list("FRAMEWORKPATH", &r.framework_paths);
    print_list("FRAMEWORKS", &r.frameworks);
  }

  Ok(())
}
