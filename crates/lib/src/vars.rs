//! Declared build variables and their override precedence.
//!
//! A variable's value comes from, in increasing precedence:
//! 1. the default given at declaration
//! 2. an environment variable of the same name, read at declaration time
//!    (only for variables declared with [`Variables::add_from_environ`])
//! 3. a `KEY=VALUE` invocation argument, read at resolution time

use std::collections::BTreeMap;
use std::env::VarError;
use std::fmt::{self, Write as _};

use serde::Serialize;
use tracing::{debug, warn};

use crate::args::BuildArgs;
use crate::placeholder::Resolver;

/// Where a variable's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
  Default,
  Environment,
  Argument,
}

impl Origin {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Default => "default",
      Self::Environment => "environment",
      Self::Argument => "argument",
    }
  }
}

impl fmt::Display for Origin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A declared variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
  pub key: String,
  pub help: String,
  /// The default after any environment override was applied.
  pub default: String,
  pub origin: Origin,
}

/// Ordered set of declared variables.
#[derive(Debug, Clone, Default)]
pub struct Variables {
  vars: Vec<Variable>,
}

impl Variables {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declare a variable with a fixed default.
  ///
  /// Redeclaring a key replaces the earlier declaration in place.
  pub fn add(&mut self, key: impl Into<String>, help: impl Into<String>, default: impl Into<String>) {
    self.declare(Variable {
      key: key.into(),
      help: help.into(),
      default: default.into(),
      origin: Origin::Default,
    });
  }

  /// Declare a variable whose default may be replaced by the process environment.
  pub fn add_from_environ(&mut self, key: impl Into<String>, help: impl Into<String>, default: impl Into<String>) {
    let key = key.into();
    let (default, origin) = match std::env::var(&key) {
      Ok(value) => {
        debug!(key = %key, value = %value, "variable default taken from environment");
        (value, Origin::Environment)
      }
      Err(VarError::NotPresent) => (default.into(), Origin::Default),
      Err(VarError::NotUnicode(raw)) => {
        let value = raw.to_string_lossy().into_owned();
        warn!(key = %key, value = %value, "environment value is not valid UTF-8, using it lossily");
        (value, Origin::Environment)
      }
    };
    self.declare(Variable {
      key,
      help: help.into(),
      default,
      origin,
    });
  }

  fn declare(&mut self, var: Variable) {
    match self.vars.iter_mut().find(|v| v.key == var.key) {
      Some(existing) => *existing = var,
      None => self.vars.push(var),
    }
  }

  pub fn get(&self, key: &str) -> Option<&Variable> {
    self.vars.iter().find(|v| v.key == key)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Variable> {
    self.vars.iter()
  }

  /// Resolve every declared variable against the invocation arguments.
  ///
  /// Arguments naming undeclared keys are ignored.
  pub fn resolve(&self, args: &BuildArgs) -> ResolvedVars {
    let values = self
      .vars
      .iter()
      .map(|var| {
        let resolved = match args.get(&var.key) {
          Some(value) => ResolvedVar {
            value: value.to_string(),
            origin: Origin::Argument,
          },
          None => ResolvedVar {
            value: var.default.clone(),
            origin: var.origin,
          },
        };
        (var.key.clone(), resolved)
      })
      .collect();

    ResolvedVars(values)
  }

  /// Render help text listing each variable, its default, its actual value
  /// and where that value came from.
  pub fn help_text(&self, args: &BuildArgs) -> String {
    let resolved = self.resolve(args);
    let mut out = String::new();
    for var in &self.vars {
      let _ = writeln!(out);
      let _ = writeln!(out, "{}: {}", var.key, var.help);
      let _ = writeln!(out, "    default: {}", var.default);
      if let (Some(actual), Some(origin)) = (resolved.get(&var.key), resolved.origin(&var.key)) {
        let _ = writeln!(out, "    actual: {actual} ({origin})");
      }
    }
    out
  }
}

/// A resolved variable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVar {
  pub value: String,
  pub origin: Origin,
}

/// Variable values after all override sources were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedVars(BTreeMap<String, ResolvedVar>);

impl ResolvedVars {
  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(key).map(|v| v.value.as_str())
  }

  pub fn origin(&self, key: &str) -> Option<Origin> {
    self.0.get(key).map(|v| v.origin)
  }

  /// Set a value outside the declaration mechanism.
  pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>, origin: Origin) {
    self.0.insert(
      key.into(),
      ResolvedVar {
        value: value.into(),
        origin,
      },
    );
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedVar)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v))
  }
}

impl Resolver for ResolvedVars {
  fn resolve_var(&self, name: &str) -> Option<&str> {
    self.get(name)
  }
}
