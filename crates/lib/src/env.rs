//! The build-tool environment: an ordered property bag of search paths,
//! flags, libraries and preprocessor defines.
//!
//! Entries are stored exactly as written, variable references included.
//! [`BuildEnv::render`] expands them against the resolved variables.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::placeholder::{self, PlaceholderError};
use crate::vars::ResolvedVars;

/// List-valued environment keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListKey {
  /// Executable search path for spawned tools
  Path,
  /// Include search paths
  CppPath,
  /// Library search paths
  LibPath,
  /// Libraries to link
  Libs,
  /// Preprocessor/compiler flags for C and C++
  CppFlags,
  /// Compiler flags for C++ only
  CxxFlags,
  LinkFlags,
  Frameworks,
  FrameworkPath,
}

impl ListKey {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Path => "PATH",
      Self::CppPath => "CPPPATH",
      Self::LibPath => "LIBPATH",
      Self::Libs => "LIBS",
      Self::CppFlags => "CPPFLAGS",
      Self::CxxFlags => "CXXFLAGS",
      Self::LinkFlags => "LINKFLAGS",
      Self::Frameworks => "FRAMEWORKS",
      Self::FrameworkPath => "FRAMEWORKPATH",
    }
  }
}

impl fmt::Display for ListKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A preprocessor macro definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Define {
  pub name: String,
  pub value: Option<String>,
}

impl Define {
  pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      value: Some(value.into()),
    }
  }

  pub fn flag(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      value: None,
    }
  }
}

impl fmt::Display for Define {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.value {
      Some(value) => write!(f, "{}={}", self.name, value),
      None => write!(f, "{}", self.name),
    }
  }
}

/// Mutable environment assembled during configuration.
#[derive(Debug, Clone, Default)]
pub struct BuildEnv {
  lists: BTreeMap<ListKey, Vec<String>>,
  defines: Vec<Define>,
  settings: BTreeMap<String, Vec<String>>,
  process_env: BTreeMap<String, String>,
  vars: ResolvedVars,
}

impl BuildEnv {
  pub fn new(vars: ResolvedVars) -> Self {
    Self {
      vars,
      ..Self::default()
    }
  }

  /// Append items to the end of a list.
  pub fn append<I, S>(&mut self, key: ListKey, items: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.lists.entry(key).or_default().extend(items.into_iter().map(Into::into));
  }

  /// Insert items at the front of a list, keeping their relative order.
  pub fn prepend<I, S>(&mut self, key: ListKey, items: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let list = self.lists.entry(key).or_default();
    let mut items: Vec<String> = items.into_iter().map(Into::into).collect();
    items.append(list);
    *list = items;
  }

  pub fn get(&self, key: ListKey) -> &[String] {
    self.lists.get(&key).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn define(&mut self, define: Define) {
    self.defines.push(define);
  }

  pub fn defines(&self) -> &[Define] {
    &self.defines
  }

  /// Replace a scalar or command setting such as `CC` or `MACOSX_DEPLOYMENT_TARGET`.
  pub fn set<I, S>(&mut self, name: impl Into<String>, value: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self
      .settings
      .insert(name.into(), value.into_iter().map(Into::into).collect());
  }

  pub fn setting(&self, name: &str) -> Option<&[String]> {
    self.settings.get(name).map(Vec::as_slice)
  }

  /// Set a variable in the environment passed to every spawned tool.
  pub fn set_process_env(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.process_env.insert(name.into(), value.into());
  }

  pub fn process_env(&self) -> &BTreeMap<String, String> {
    &self.process_env
  }

  pub fn vars(&self) -> &ResolvedVars {
    &self.vars
  }

  /// Expand variable references in a single string.
  pub fn subst(&self, input: &str) -> Result<String, PlaceholderError> {
    placeholder::substitute(input, &self.vars)
  }

  /// Expand every entry, producing the environment as the build tool would see it.
  pub fn render(&self) -> Result<RenderedEnv, PlaceholderError> {
    let expand_all = |items: &[String]| -> Result<Vec<String>, PlaceholderError> {
      items.iter().map(|s| self.subst(s)).collect()
    };

    let mut lists = BTreeMap::new();
    for (key, items) in &self.lists {
      lists.insert(*key, expand_all(items)?);
    }

    let defines = self
      .defines
      .iter()
      .map(|d| {
        Ok(Define {
          name: d.name.clone(),
          value: d.value.as_deref().map(|v| self.subst(v)).transpose()?,
        })
      })
      .collect::<Result<Vec<_>, PlaceholderError>>()?;

    let mut settings = BTreeMap::new();
    for (name, value) in &self.settings {
      settings.insert(name.clone(), expand_all(value)?);
    }

    Ok(RenderedEnv {
      lists,
      defines,
      settings,
      process_env: self.process_env.clone(),
    })
  }
}

/// Fully expanded environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEnv {
  pub lists: BTreeMap<ListKey, Vec<String>>,
  pub defines: Vec<Define>,
  pub settings: BTreeMap<String, Vec<String>>,
  pub process_env: BTreeMap<String, String>,
}

impl RenderedEnv {
  pub fn get(&self, key: ListKey) -> &[String] {
    self.lists.get(&key).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn define(&self, name: &str) -> Option<&Define> {
    self.defines.iter().find(|d| d.name == name)
  }
}
