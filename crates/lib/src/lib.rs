//! tide-build: build configuration for the Tide runtime
//!
//! This crate assembles everything a Tide build description needs before the
//! build tool takes over:
//! - `platform`: host OS and architecture detection
//! - `vars`: declared build variables and their override precedence
//! - `env`: the build-tool environment (search paths, flags, defines)
//! - `flags`: per-platform compiler and linker flags
//! - `thirdparty`: search paths and link libraries for bundled dependencies
//! - `targets`: the build → stage → dist phase graph
//! - `config`: the `BuildConfig` tying them together

pub mod args;
pub mod config;
pub mod defaults;
pub mod env;
pub mod error;
pub mod flags;
pub mod module;
pub mod placeholder;
pub mod platform;
pub mod targets;
pub mod thirdparty;
pub mod vars;

pub use args::BuildArgs;
pub use config::BuildConfig;
pub use defaults::ProjectDefaults;
pub use error::{ConfigError, Result};
