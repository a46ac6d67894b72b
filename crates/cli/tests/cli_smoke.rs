//! CLI smoke tests for tide.
//!
//! Every command runs from an empty temp directory so a stray `tide.toml`
//! in the working tree never leaks into the results.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

fn tide_cmd(dir: &TempDir) -> Command {
  let mut cmd = cargo_bin_cmd!("tide");
  cmd.current_dir(dir.path());
  cmd.env_remove("RUST_LOG");
  cmd
}

fn empty_dir() -> TempDir {
  TempDir::new().unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"))
    .stdout(predicate::str::contains("thirdparty"));
}

#[test]
fn version_flag_works() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("tide"));
}

#[test]
fn unknown_subcommand_fails() {
  let dir = empty_dir();
  tide_cmd(&dir).arg("frobnicate").assert().failure();
}

// =============================================================================
// info
// =============================================================================

#[test]
#[cfg(target_os = "linux")]
fn info_reports_linux_host() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains("linux"));
}

#[test]
fn info_json_is_valid() {
  let dir = empty_dir();
  let output = tide_cmd(&dir).args(["info", "--json"]).output().unwrap();
  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert!(json.get("platform").is_some());
}

// =============================================================================
// vars
// =============================================================================

#[test]
#[serial]
fn vars_lists_declared_variables() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .arg("vars")
    .assert()
    .success()
    .stdout(predicate::str::contains("PRODUCT_VERSION"))
    .stdout(predicate::str::contains("GLOBAL_NAMESPACE"))
    .stdout(predicate::str::contains("1.3.0"));
}

#[test]
#[serial]
fn vars_argument_override_is_reported() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .args(["vars", "PRODUCT_NAME=Acme"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Acme (argument)"));
}

#[test]
#[serial]
fn vars_environment_value_is_reported() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .args(["vars", "--json"])
    .env("PYTHON_VERSION", "3.12")
    .assert()
    .success()
    .stdout(predicate::str::contains("\"3.12\""))
    .stdout(predicate::str::contains("\"environment\""));
}

#[test]
fn vars_rejects_malformed_argument() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .args(["vars", "NOT_AN_ASSIGNMENT"])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("NOT_AN_ASSIGNMENT"));
}

#[test]
#[serial]
fn vars_reads_discovered_defaults_file() {
  let dir = empty_dir();
  std::fs::write(dir.path().join("tide.toml"), "product_version = \"2.0.0\"\n").unwrap();
  tide_cmd(&dir)
    .arg("vars")
    .assert()
    .success()
    .stdout(predicate::str::contains("2.0.0"));
}

#[test]
#[serial]
fn explicit_defaults_file_is_used() {
  let dir = empty_dir();
  let path = dir.path().join("custom.toml");
  std::fs::write(&path, "global_namespace = \"Acme\"\n").unwrap();
  tide_cmd(&dir)
    .arg("--defaults")
    .arg(&path)
    .arg("vars")
    .assert()
    .success()
    .stdout(predicate::str::contains("Acme"));
}

#[test]
fn missing_defaults_file_fails() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .args(["--defaults", "does-not-exist.toml", "vars"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("does-not-exist.toml"));
}

#[test]
fn unknown_defaults_key_fails() {
  let dir = empty_dir();
  std::fs::write(dir.path().join("tide.toml"), "no_such_key = 1\n").unwrap();
  tide_cmd(&dir).arg("vars").assert().failure();
}

// =============================================================================
// thirdparty
// =============================================================================

#[test]
fn thirdparty_webkit_lite_on_linux_uses_system_library() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .args(["thirdparty", "webkit", "--os", "linux", "--arch", "x86_64", "--lite"])
    .assert()
    .success()
    .stdout(predicate::str::contains("webkitgtk-1.0"));
}

#[test]
fn thirdparty_json_uses_given_root() {
  let dir = empty_dir();
  let output = tide_cmd(&dir)
    .args([
      "thirdparty",
      "poco",
      "--os",
      "win32",
      "--arch",
      "x86",
      "--third-party-dir",
      "/opt/tp",
      "--json",
    ])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let resolution = &json[0]["resolution"];
  assert_eq!(resolution["libraries"][0], "PocoFoundation");
  assert!(resolution["include_paths"][0].as_str().unwrap().starts_with("/opt/tp"));
}

#[test]
fn thirdparty_unknown_library_resolves_to_nothing() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .args(["thirdparty", "nonexistent", "--os", "linux", "--arch", "x86"])
    .assert()
    .success()
    .stderr(predicate::str::contains("No paths or libraries"));
}

#[test]
fn thirdparty_without_names_lists_known_libraries() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .args(["thirdparty", "--os", "osx", "--arch", "x86"])
    .assert()
    .success()
    .stdout(predicate::str::contains("webkit"))
    .stdout(predicate::str::contains("poco"));
}

#[test]
fn thirdparty_rejects_unknown_os() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .args(["thirdparty", "curl", "--os", "beos", "--arch", "x86"])
    .assert()
    .failure();
}

// =============================================================================
// env
// =============================================================================

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn env_prints_defines_and_flags() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .arg("env")
    .assert()
    .success()
    .stdout(predicate::str::contains("OS_LINUX=1"))
    .stdout(predicate::str::contains("_OS_NAME=linux"))
    .stdout(predicate::str::contains("_PRODUCT_VERSION=1.3.0"));
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn env_applies_lite_and_thirdparty() {
  let dir = empty_dir();
  tide_cmd(&dir)
    .args(["env", "--thirdparty", "webkit", "lite=1"])
    .assert()
    .success()
    .stdout(predicate::str::contains("TIDE_LITE"))
    .stdout(predicate::str::contains("webkitgtk-1.0"));
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn env_json_expands_placeholders() {
  let dir = empty_dir();
  let output = tide_cmd(&dir)
    .args(["env", "--json", "PRODUCT_NAME=Acme"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let stdout = String::from_utf8(output.stdout).unwrap();
  assert!(stdout.contains("Acme"));
  assert!(!stdout.contains("${"));
}
