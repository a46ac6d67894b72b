//! Variable reference parsing and substitution for deferred value resolution.
//!
//! Environment entries may reference build variables whose values are not
//! settled until every override source has been consulted. References stay
//! in the strings as written and are expanded only when the environment is
//! rendered.
//!
//! # Reference Formats
//!
//! - `${NAME}` - value of variable `NAME`
//! - `$NAME` - same, where `NAME` is `[A-Za-z_][A-Za-z0-9_]*`
//!
//! # Escaping
//!
//! `$$` produces a literal `$`. A `$` followed by anything that cannot start
//! a name passes through unchanged.
//!
//! Variable values are themselves expanded, so a default may refer to
//! another variable.
//!
//! # Example
//!
//! ```
//! use tide_build::placeholder::{parse, Segment};
//!
//! let segments = parse("${MSPSDK}\\include").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Variable("MSPSDK".to_string()),
//!     Segment::Literal("\\include".to_string()),
//! ]);
//! ```

use thiserror::Error;

/// Maximum nesting of variable values referring to other variables.
const MAX_DEPTH: usize = 16;

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no references)
  Literal(String),

  /// A variable reference to be resolved
  Variable(String),
}

/// Errors that can occur during parsing or resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
  #[error("unclosed variable reference at position {0}")]
  Unclosed(usize),

  #[error("invalid variable name: '{0}'")]
  InvalidName(String),

  #[error("undefined variable: {0}")]
  Undefined(String),

  #[error("variable {0} expands recursively")]
  Recursive(String),
}

/// Source of variable values during substitution.
pub trait Resolver {
  /// Look up the raw (unexpanded) value of a variable.
  fn resolve_var(&self, name: &str) -> Option<&str>;
}

impl Resolver for std::collections::BTreeMap<String, String> {
  fn resolve_var(&self, name: &str) -> Option<&str> {
    self.get(name).map(String::as_str)
  }
}

fn is_name_start(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a string containing variable references into segments.
///
/// # Errors
///
/// Returns an error if a `${` is never closed or encloses an invalid name.
pub fn parse(input: &str) -> Result<Vec<Segment>, PlaceholderError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    if ch != '$' {
      literal.push(ch);
      continue;
    }

    match chars.peek() {
      Some((_, '$')) => {
        chars.next();
        literal.push('$');
      }
      Some((_, '{')) => {
        chars.next();

        let mut name = String::new();
        let mut found_close = false;
        for (_, c) in chars.by_ref() {
          if c == '}' {
            found_close = true;
            break;
          }
          name.push(c);
        }

        if !found_close {
          return Err(PlaceholderError::Unclosed(pos));
        }
        if !name.starts_with(is_name_start) || !name.chars().all(is_name_char) {
          return Err(PlaceholderError::InvalidName(name));
        }

        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Variable(name));
      }
      Some(&(_, c)) if is_name_start(c) => {
        let mut name = String::new();
        while let Some(&(_, c)) = chars.peek() {
          if !is_name_char(c) {
            break;
          }
          name.push(c);
          chars.next();
        }

        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Variable(name));
      }
      _ => literal.push('$'),
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Substitute all variable references in a string using the provided resolver.
///
/// # Errors
///
/// Returns an error if parsing fails, a variable is undefined, or a value
/// expands back into itself.
pub fn substitute(input: &str, resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let mut stack = Vec::new();
  expand(input, resolver, &mut stack)
}

fn expand(input: &str, resolver: &impl Resolver, stack: &mut Vec<String>) -> Result<String, PlaceholderError> {
  let segments = parse(input)?;
  let mut result = String::new();

  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(&s),
      Segment::Variable(name) => {
        if stack.contains(&name) || stack.len() >= MAX_DEPTH {
          return Err(PlaceholderError::Recursive(name));
        }
        let raw = resolver
          .resolve_var(&name)
          .ok_or_else(|| PlaceholderError::Undefined(name.clone()))?;

        stack.push(name);
        let value = expand(raw, resolver, stack)?;
        stack.pop();

        result.push_str(&value);
      }
    }
  }

  Ok(result)
}
