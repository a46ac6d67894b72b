mod cmd;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tide_build::platform::{Arch, Os};
use tide_build::thirdparty::ResolveContext;
use tide_build::{BuildArgs, ConfigError, ProjectDefaults};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_env, cmd_info, cmd_thirdparty, cmd_vars, target_platform};
use output::print_error;

/// tide - build configuration for the Tide runtime
#[derive(Parser)]
#[command(name = "tide")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Project defaults file (default: ./tide.toml when present)
  #[arg(long, global = true, value_name = "FILE")]
  defaults: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show the detected host platform
  Info {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// List build variables with their defaults and resolved values
  Vars {
    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Build arguments as KEY=VALUE
    #[arg(value_name = "KEY=VALUE")]
    args: Vec<String>,
  },

  /// Print the fully expanded build environment for this host
  Env {
    /// Apply a third-party library (repeatable)
    #[arg(long = "thirdparty", value_name = "NAME")]
    thirdparty: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Build arguments as KEY=VALUE
    #[arg(value_name = "KEY=VALUE")]
    args: Vec<String>,
  },

  /// Resolve third-party include paths and libraries
  Thirdparty {
    /// Libraries to resolve (lists known libraries when empty)
    names: Vec<String>,

    /// Target OS (default: host)
    #[arg(long)]
    os: Option<Os>,

    /// Target architecture (default: host)
    #[arg(long)]
    arch: Option<Arch>,

    /// Resolve for a lite build
    #[arg(long)]
    lite: bool,

    /// Use debug WebKit libraries on win32
    #[arg(long)]
    webkit_debug: bool,

    /// Third-party root (default: from project defaults)
    #[arg(long, value_name = "DIR")]
    third_party_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      let code = err.downcast_ref::<ConfigError>().map_or(1, ConfigError::exit_code);
      ExitCode::from(code as u8)
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let defaults = load_defaults(cli.defaults.as_deref())?;

  match cli.command {
    Commands::Info { json } => cmd_info(json),
    Commands::Vars { json, args } => cmd_vars(&defaults, &parse_args(&args)?, json),
    Commands::Env { thirdparty, json, args } => cmd_env(&defaults, parse_args(&args)?, &thirdparty, json),
    Commands::Thirdparty {
      names,
      os,
      arch,
      lite,
      webkit_debug,
      third_party_dir,
      json,
    } => {
      let dir = third_party_dir.unwrap_or_else(|| defaults.third_party_dir.clone());
      let ctx = ResolveContext {
        platform: target_platform(os, arch)?,
        lite,
        webkit_debug,
        third_party_dir: &dir,
      };
      cmd_thirdparty(&names, &ctx, json)
    }
  }
}

fn load_defaults(path: Option<&Path>) -> Result<ProjectDefaults> {
  let defaults = match path {
    Some(path) => ProjectDefaults::from_file(path)?,
    None => {
      let cwd = std::env::current_dir().context("Failed to read current directory")?;
      ProjectDefaults::discover(&cwd)?
    }
  };
  Ok(defaults)
}

fn parse_args(args: &[String]) -> Result<BuildArgs> {
  BuildArgs::parse(args).map_err(ConfigError::from).map_err(Into::into)
}
