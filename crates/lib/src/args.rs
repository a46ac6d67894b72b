//! Invocation-time `KEY=VALUE` arguments.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
  #[error("expected KEY=VALUE, got '{0}'")]
  MissingSeparator(String),

  #[error("empty key in argument '{0}'")]
  EmptyKey(String),
}

/// Key/value arguments given on the command line for one build invocation.
///
/// Later occurrences of a key replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildArgs(BTreeMap<String, String>);

impl BuildArgs {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parse arguments of the form `KEY=VALUE`. The value may itself contain `=`.
  pub fn parse<I, S>(args: I) -> Result<Self, ArgsError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut map = BTreeMap::new();
    for arg in args {
      let arg = arg.as_ref();
      let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| ArgsError::MissingSeparator(arg.to_string()))?;
      if key.is_empty() {
        return Err(ArgsError::EmptyKey(arg.to_string()));
      }
      map.insert(key.to_string(), value.to_string());
    }
    Ok(Self(map))
  }

  pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.0.insert(key.into(), value.into());
    self
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(key).map(String::as_str)
  }

  /// A flag is set when the key is present with a non-empty value.
  pub fn flag(&self, key: &str) -> bool {
    self.get(key).is_some_and(|v| !v.is_empty())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_key_value_pairs() {
    let args = BuildArgs::parse(["PRODUCT_NAME=Tide", "DISTRIBUTION_URL=http://x/?a=b"]).unwrap();
    assert_eq!(args.get("PRODUCT_NAME"), Some("Tide"));
    assert_eq!(args.get("DISTRIBUTION_URL"), Some("http://x/?a=b"));
  }

  #[test]
  fn later_value_wins() {
    let args = BuildArgs::parse(["lite=", "lite=1"]).unwrap();
    assert_eq!(args.get("lite"), Some("1"));
  }

  #[test]
  fn flags_need_a_value() {
    let args = BuildArgs::parse(["lite=1", "webkit_debug="]).unwrap();
    assert!(args.flag("lite"));
    assert!(!args.flag("webkit_debug"));
    assert!(!args.flag("debug"));
  }

  #[test]
  fn rejects_malformed_arguments() {
    assert_eq!(
      BuildArgs::parse(["lite"]),
      Err(ArgsError::MissingSeparator("lite".to_string()))
    );
    assert_eq!(BuildArgs::parse(["=1"]), Err(ArgsError::EmptyKey("=1".to_string())));
  }
}
