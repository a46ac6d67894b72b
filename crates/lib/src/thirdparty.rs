//! Third-party dependency resolution.
//!
//! Each supported library is described by rows in a static rule table. Resolving a
//! library collects every row whose selector matches the platform and build
//! variant, in table order. A library with no matching row resolves to
//! nothing.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::env::{BuildEnv, ListKey};
use crate::platform::Platform;
use crate::platform::os::Os;

/// A search path in a rule: relative to the third-party root, or absolute on the host.
#[derive(Debug, Clone, Copy)]
enum PathSpec {
  ThirdParty(&'static [&'static str]),
  System(&'static str),
}

impl PathSpec {
  fn render(&self, third_party_dir: &Path) -> String {
    match self {
      Self::ThirdParty(parts) => parts
        .iter()
        .fold(third_party_dir.to_path_buf(), |path, part| path.join(part))
        .display()
        .to_string(),
      Self::System(path) => (*path).to_string(),
    }
  }
}

#[derive(Debug, Clone, Copy)]
struct Rule {
  library: &'static str,
  /// Operating systems the row applies to; empty means all.
  os: &'static [Os],
  /// Build variant the row applies to; `None` means both.
  lite: Option<bool>,
  include: &'static [PathSpec],
  libpath: &'static [PathSpec],
  libs: &'static [&'static str],
  /// Append `_debug` to each library when a debug WebKit is requested.
  debug_suffix: bool,
  framework_path: &'static [PathSpec],
  frameworks: &'static [&'static str],
}

impl Rule {
  const EMPTY: Rule = Rule {
    library: "",
    os: &[],
    lite: None,
    include: &[],
    libpath: &[],
    libs: &[],
    debug_suffix: false,
    framework_path: &[],
    frameworks: &[],
  };

  fn matches(&self, library: &str, ctx: &ResolveContext<'_>) -> bool {
    self.library == library
      && (self.os.is_empty() || self.os.contains(&ctx.platform.os))
      && self.lite.is_none_or(|lite| lite == ctx.lite)
  }
}

use PathSpec::{System, ThirdParty};

const ALL_BUT_LINUX: &[Os] = &[Os::Win32, Os::Osx];

const RULES: &[Rule] = &[
  Rule {
    library: "poco",
    include: &[ThirdParty(&["poco", "include"])],
    libpath: &[ThirdParty(&["poco", "lib"])],
    libs: &[
      "PocoFoundation",
      "PocoNet",
      "PocoUtil",
      "PocoXML",
      "PocoZip",
      "PocoData",
      "PocoSQLite",
    ],
    ..Rule::EMPTY
  },
  Rule {
    library: "curl",
    include: &[ThirdParty(&["curl", "include"])],
    libpath: &[ThirdParty(&["curl", "lib"])],
    ..Rule::EMPTY
  },
  Rule {
    library: "curl",
    os: &[Os::Win32],
    libs: &["libcurl_imp"],
    ..Rule::EMPTY
  },
  Rule {
    library: "curl",
    os: &[Os::Osx, Os::Linux],
    libs: &["curl"],
    ..Rule::EMPTY
  },
  Rule {
    library: "libxml",
    os: &[Os::Osx],
    include: &[System("/usr/include/libxml2")],
    libs: &["xml2"],
    ..Rule::EMPTY
  },
  Rule {
    library: "libxml",
    os: &[Os::Win32],
    include: &[ThirdParty(&["libxml", "include"]), ThirdParty(&["icu", "include"])],
    libs: &["libxml2"],
    ..Rule::EMPTY
  },
  Rule {
    library: "cairo",
    os: &[Os::Win32],
    include: &[ThirdParty(&["cairo", "include"])],
    libpath: &[ThirdParty(&["cairo", "lib"])],
    libs: &["cairo"],
    ..Rule::EMPTY
  },
  Rule {
    library: "libproxy",
    os: &[Os::Win32, Os::Linux],
    include: &[ThirdParty(&["libproxy", "include"])],
    libpath: &[ThirdParty(&["libproxy", "lib"])],
    libs: &["libproxy"],
    ..Rule::EMPTY
  },
  Rule {
    library: "libsoup",
    os: &[Os::Linux],
    include: &[ThirdParty(&["libsoup", "include"])],
    libpath: &[ThirdParty(&["libsoup", "lib"])],
    libs: &["libsoup-2.4", "libsoup-gnome-2.4"],
    ..Rule::EMPTY
  },
  Rule {
    library: "boost",
    os: ALL_BUT_LINUX,
    include: &[ThirdParty(&["boost", "include"])],
    libpath: &[ThirdParty(&["boost", "lib"])],
    ..Rule::EMPTY
  },
  // Not picked up automatically on these platforms
  Rule {
    library: "boost",
    os: &[Os::Osx, Os::Linux],
    libs: &["boost_system-mt", "boost_thread-mt"],
    ..Rule::EMPTY
  },
  Rule {
    library: "boost_include",
    os: ALL_BUT_LINUX,
    include: &[ThirdParty(&["boost", "include"])],
    ..Rule::EMPTY
  },
  Rule {
    library: "openssl",
    include: &[ThirdParty(&["openssl", "include"])],
    libpath: &[ThirdParty(&["openssl", "lib"])],
    ..Rule::EMPTY
  },
  Rule {
    library: "openssl",
    os: &[Os::Win32],
    libs: &["libeay32", "ssleay32"],
    ..Rule::EMPTY
  },
  Rule {
    library: "openssl",
    os: &[Os::Osx],
    libs: &["ssl", "crypto"],
    ..Rule::EMPTY
  },
  Rule {
    library: "webkit",
    os: &[Os::Win32],
    lite: Some(false),
    include: &[ThirdParty(&["webkit-patch", "include"])],
    libpath: &[ThirdParty(&["webkit-patch", "lib"])],
    ..Rule::EMPTY
  },
  Rule {
    library: "webkit",
    os: &[Os::Win32],
    lite: Some(true),
    include: &[ThirdParty(&["webkit-lite", "include"])],
    libpath: &[ThirdParty(&["webkit-lite", "lib"])],
    ..Rule::EMPTY
  },
  Rule {
    library: "webkit",
    os: &[Os::Win32],
    libs: &["WebKit", "WebKitGUID", "JavaScriptCore"],
    debug_suffix: true,
    ..Rule::EMPTY
  },
  Rule {
    library: "webkit",
    os: &[Os::Linux],
    lite: Some(false),
    include: &[
      ThirdParty(&["webkit", "include"]),
      ThirdParty(&["webkit", "include", "glib-2.0"]),
    ],
    libpath: &[ThirdParty(&["webkit", "lib"])],
    libs: &["webkittitanium-1.0"],
    ..Rule::EMPTY
  },
  Rule {
    library: "webkit",
    os: &[Os::Linux],
    lite: Some(true),
    include: &[System("/usr/include/webkitgtk-1.0/")],
    libs: &["webkitgtk-1.0"],
    ..Rule::EMPTY
  },
  Rule {
    library: "webkit",
    os: &[Os::Osx],
    lite: Some(false),
    framework_path: &[ThirdParty(&["webkit"])],
    ..Rule::EMPTY
  },
  Rule {
    library: "webkit",
    os: &[Os::Osx],
    frameworks: &["WebKit", "JavaScriptCore"],
    ..Rule::EMPTY
  },
];

/// Inputs that select rows of the table.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
  pub platform: Platform,
  pub lite: bool,
  pub webkit_debug: bool,
  pub third_party_dir: &'a Path,
}

/// Search paths and libraries contributed by one library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
  pub include_paths: Vec<String>,
  pub library_paths: Vec<String>,
  pub libraries: Vec<String>,
  pub framework_paths: Vec<String>,
  pub frameworks: Vec<String>,
}

impl Resolution {
  pub fn is_empty(&self) -> bool {
    self.include_paths.is_empty()
      && self.library_paths.is_empty()
      && self.libraries.is_empty()
      && self.framework_paths.is_empty()
      && self.frameworks.is_empty()
  }

  /// Append every non-empty list onto the environment's accumulators.
  pub fn apply_to(&self, env: &mut BuildEnv) {
    let lists = [
      (ListKey::FrameworkPath, &self.framework_paths),
      (ListKey::Frameworks, &self.frameworks),
      (ListKey::CppPath, &self.include_paths),
      (ListKey::LibPath, &self.library_paths),
      (ListKey::Libs, &self.libraries),
    ];
    for (key, items) in lists {
      if !items.is_empty() {
        env.append(key, items.iter().cloned());
      }
    }
  }
}

/// Names with at least one row in the table, in table order.
pub fn known_libraries() -> Vec<&'static str> {
  let mut names: Vec<&'static str> = Vec::new();
  for rule in RULES {
    if !names.contains(&rule.library) {
      names.push(rule.library);
    }
  }
  names
}

/// Resolve a library for the given platform and variant.
pub fn resolve(library: &str, ctx: &ResolveContext<'_>) -> Resolution {
  let mut resolution = Resolution::default();
  let render = |specs: &[PathSpec]| -> Vec<String> { specs.iter().map(|s| s.render(ctx.third_party_dir)).collect() };

  for rule in RULES.iter().filter(|r| r.matches(library, ctx)) {
    resolution.include_paths.extend(render(rule.include));
    resolution.library_paths.extend(render(rule.libpath));
    resolution.framework_paths.extend(render(rule.framework_path));
    resolution.frameworks.extend(rule.frameworks.iter().map(|f| f.to_string()));

    let suffix = if rule.debug_suffix && ctx.webkit_debug { "_debug" } else { "" };
    resolution
      .libraries
      .extend(rule.libs.iter().map(|lib| format!("{lib}{suffix}")));
  }

  if resolution.is_empty() {
    debug!(library, platform = %ctx.platform, lite = ctx.lite, "no third-party paths for library");
  }

  resolution
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::arch::Arch;
  use std::path::PathBuf;
  use tracing_test::traced_test;

  fn tp(parts: &[&str]) -> String {
    parts
      .iter()
      .fold(PathBuf::from("/tp"), |p, part| p.join(part))
      .display()
      .to_string()
  }

  fn resolve_on(library: &str, os: Os, lite: bool) -> Resolution {
    let ctx = ResolveContext {
      platform: Platform::new(os, Arch::X86),
      lite,
      webkit_debug: false,
      third_party_dir: Path::new("/tp"),
    };
    resolve(library, &ctx)
  }

  #[test]
  fn webkit_linux_lite_uses_system_webkitgtk() {
    let r = resolve_on("webkit", Os::Linux, true);
    assert_eq!(r.libraries, ["webkitgtk-1.0"]);
    assert_eq!(r.include_paths, ["/usr/include/webkitgtk-1.0/"]);
    assert!(r.library_paths.is_empty());
  }

  #[test]
  fn webkit_linux_full_uses_patched_webkit() {
    let r = resolve_on("webkit", Os::Linux, false);
    assert_eq!(r.libraries, ["webkittitanium-1.0"]);
    assert_eq!(
      r.include_paths,
      [tp(&["webkit", "include"]), tp(&["webkit", "include", "glib-2.0"])]
    );
    assert_eq!(r.library_paths, [tp(&["webkit", "lib"])]);
  }

  #[test]
  fn webkit_win32_variants_and_debug_suffix() {
    let full = resolve_on("webkit", Os::Win32, false);
    assert_eq!(full.include_paths, [tp(&["webkit-patch", "include"])]);
    assert_eq!(full.libraries, ["WebKit", "WebKitGUID", "JavaScriptCore"]);

    let lite = resolve_on("webkit", Os::Win32, true);
    assert_eq!(lite.library_paths, [tp(&["webkit-lite", "lib"])]);

    let ctx = ResolveContext {
      platform: Platform::new(Os::Win32, Arch::X86),
      lite: false,
      webkit_debug: true,
      third_party_dir: Path::new("/tp"),
    };
    assert_eq!(
      resolve("webkit", &ctx).libraries,
      ["WebKit_debug", "WebKitGUID_debug", "JavaScriptCore_debug"]
    );
  }

  #[test]
  fn webkit_osx_uses_frameworks() {
    let full = resolve_on("webkit", Os::Osx, false);
    assert_eq!(full.framework_paths, [tp(&["webkit"])]);
    assert_eq!(full.frameworks, ["WebKit", "JavaScriptCore"]);
    assert!(full.include_paths.is_empty());

    let lite = resolve_on("webkit", Os::Osx, true);
    assert!(lite.framework_paths.is_empty());
    assert_eq!(lite.frameworks, ["WebKit", "JavaScriptCore"]);
  }

  #[test]
  #[traced_test]
  fn unknown_library_resolves_to_nothing() {
    assert!(resolve_on("sqlite-but-not-really", Os::Linux, false).is_empty());
    assert!(logs_contain("no third-party paths for library"));
  }

  #[test]
  fn library_without_rows_for_os_resolves_to_nothing() {
    assert!(resolve_on("cairo", Os::Linux, false).is_empty());
    assert!(resolve_on("libxml", Os::Linux, false).is_empty());
    assert!(resolve_on("boost_include", Os::Linux, false).is_empty());
  }

  #[test]
  fn curl_library_name_depends_on_os() {
    assert_eq!(resolve_on("curl", Os::Win32, false).libraries, ["libcurl_imp"]);
    assert_eq!(resolve_on("curl", Os::Linux, false).libraries, ["curl"]);
    assert_eq!(resolve_on("curl", Os::Osx, false).include_paths, [tp(&["curl", "include"])]);
  }

  #[test]
  fn boost_paths_and_libs_split_by_os() {
    let linux = resolve_on("boost", Os::Linux, false);
    assert!(linux.include_paths.is_empty());
    assert_eq!(linux.libraries, ["boost_system-mt", "boost_thread-mt"]);

    let win = resolve_on("boost", Os::Win32, false);
    assert_eq!(win.include_paths, [tp(&["boost", "include"])]);
    assert!(win.libraries.is_empty());
  }

  #[test]
  fn openssl_links_nothing_on_linux() {
    let linux = resolve_on("openssl", Os::Linux, false);
    assert_eq!(linux.include_paths, [tp(&["openssl", "include"])]);
    assert!(linux.libraries.is_empty());
    assert_eq!(resolve_on("openssl", Os::Osx, false).libraries, ["ssl", "crypto"]);
  }

  #[test]
  fn apply_appends_in_call_order() {
    let mut env = BuildEnv::default();
    resolve_on("curl", Os::Linux, false).apply_to(&mut env);
    resolve_on("libsoup", Os::Linux, false).apply_to(&mut env);

    assert_eq!(env.get(ListKey::Libs), ["curl", "libsoup-2.4", "libsoup-gnome-2.4"]);
    assert_eq!(
      env.get(ListKey::CppPath),
      [tp(&["curl", "include"]), tp(&["libsoup", "include"])]
    );
  }

  #[test]
  fn applying_empty_resolution_leaves_env_untouched() {
    let mut env = BuildEnv::default();
    resolve_on("nothing", Os::Osx, false).apply_to(&mut env);
    assert!(env.get(ListKey::CppPath).is_empty());
    assert!(env.get(ListKey::Libs).is_empty());
  }

  #[test]
  fn known_libraries_are_unique() {
    let names = known_libraries();
    assert_eq!(names.first(), Some(&"poco"));
    assert!(names.contains(&"webkit"));
    assert_eq!(names.iter().filter(|n| **n == "curl").count(), 1);
  }
}
