//! Implementation of the `tide vars` command.
//!
//! Lists every declared build variable with its default, its resolved value
//! and where that value came from.

use anyhow::Result;
use tide_build::config::declare_variables;
use tide_build::{BuildArgs, ProjectDefaults};

use crate::output::print_json;

pub fn cmd_vars(defaults: &ProjectDefaults, args: &BuildArgs, json: bool) -> Result<()> {
  let variables = declare_variables(defaults);

  if json {
    let resolved = variables.resolve(args);
    let items: Vec<_> = variables
      .iter()
      .map(|var| {
        serde_json::json!({
          "key": var.key,
          "help": var.help,
          "default": var.default,
          "value": resolved.get(&var.key),
          "origin": resolved.origin(&var.key),
        })
      })
      .collect();
    return print_json(&items);
  }

  print!("{}", variables.help_text(args));
  Ok(())
}
