// src/casing.rs
use std::borrow::Cow;
use std::fs;
use std::path::Path;

use log::trace;
use regex::{Captures, NoExpand, Regex, RegexBuilder};

use crate::error::ScaffoldError;

/// Surface case of a single marker occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
  Upper,       // RN4OH
  Lower,       // rn4oh
  Capitalized, // Rn4oh, RN4oh
  Mixed,       // rN4oh, rn4OH
}

impl Casing {
  /// Classifies a matched occurrence. Rules are checked in order, so an
  /// all-uppercase match never reaches the capitalized branch.
  pub fn classify(matched: &str) -> Self {
    if matched == matched.to_uppercase() {
      Casing::Upper
    } else if matched == matched.to_lowercase() {
      Casing::Lower
    } else if matched.chars().next().map_or(false, is_upper_form) {
      Casing::Capitalized
    } else {
      Casing::Mixed
    }
  }

  /// Produces the replacement base in this casing. Mixed falls back to lowercase.
  pub fn apply(self, base: &str) -> String {
    match self {
      Casing::Upper => base.to_uppercase(),
      Casing::Lower | Casing::Mixed => base.to_lowercase(),
      Casing::Capitalized => capitalize(base),
    }
  }
}

// A char is in "upper form" when uppercasing leaves it unchanged (digits included).
fn is_upper_form(c: char) -> bool {
  let mut upper = c.to_uppercase();
  upper.next() == Some(c) && upper.next().is_none()
}

/// First character uppercased, the remainder lowercased.
pub fn capitalize(text: &str) -> String {
  let mut chars = text.chars();
  match chars.next() {
    Some(first) => {
      let rest = chars.as_str().to_lowercase();
      first.to_uppercase().chain(rest.chars()).collect()
    }
    None => String::new(),
  }
}

/// First character lowercased, second uppercased, the rest lowercased (`rN4oh`).
fn invert_capitalize(text: &str) -> String {
  text
    .chars()
    .enumerate()
    .map(|(i, c)| {
      if i == 1 {
        c.to_uppercase().collect::<String>()
      } else {
        c.to_lowercase().collect::<String>()
      }
    })
    .collect()
}

fn literal_pattern(text: &str, case_insensitive: bool) -> Regex {
  RegexBuilder::new(&regex::escape(text))
    .case_insensitive(case_insensitive)
    .build()
    .expect("escaped literal is always a valid pattern")
}

/// Replaces the marker token with a project name, preserving the case of each
/// occurrence where the caller asks for it.
///
/// The three flavours are not interchangeable:
/// * [`TokenReplacer::replace_in_content`] only knows the literal lower and
///   upper forms of the marker;
/// * [`TokenReplacer::replace_each_occurrence`] classifies every occurrence on
///   its own (directory names);
/// * [`TokenReplacer::replace_by_first_pattern`] picks one casing from the first
///   matching pattern and applies it to the whole name (file names).
#[derive(Debug)]
pub struct TokenReplacer {
  marker: String,
  base: String,
  any_case: Regex,
  file_patterns: Vec<Regex>,
}

impl TokenReplacer {
  pub fn new(marker: &str, base: &str) -> Self {
    let any_case = literal_pattern(marker, true);
    // Patterns 2-4 are subsumed by the first; they stay to keep the match order.
    let file_patterns = vec![
      any_case.clone(),
      literal_pattern(&marker.to_uppercase(), false),
      literal_pattern(&capitalize(marker), false),
      literal_pattern(&invert_capitalize(marker), false),
    ];
    Self {
      marker: marker.to_string(),
      base: base.to_string(),
      any_case,
      file_patterns,
    }
  }

  /// Case-insensitive containment check used to decide whether a directory is renamed.
  pub fn matches_name(&self, name: &str) -> bool {
    self.any_case.is_match(name)
  }

  /// Two literal passes: lowercase marker first, then uppercase marker.
  pub fn replace_in_content(&self, content: &str) -> String {
    content
      .replace(&self.marker.to_lowercase(), &self.base.to_lowercase())
      .replace(&self.marker.to_uppercase(), &self.base.to_uppercase())
  }

  /// Every occurrence is classified and replaced independently, so
  /// `RN4OH_rn4oh` becomes `APP_app`.
  pub fn replace_each_occurrence<'a>(&self, name: &'a str) -> Cow<'a, str> {
    self
      .any_case
      .replace_all(name, |caps: &Captures| Casing::classify(&caps[0]).apply(&self.base))
  }

  /// Stops at the first of the four file-name patterns that matches, takes the
  /// casing of its first occurrence and applies that one casing to every
  /// occurrence the pattern finds, so `RN4OH_rn4oh` becomes `APP_APP`.
  ///
  /// Returns `None` when no pattern matches.
  pub fn replace_by_first_pattern(&self, name: &str) -> Option<String> {
    self.file_patterns.iter().find_map(|pattern| {
      let first = pattern.find(name)?;
      let replacement = Casing::classify(first.as_str()).apply(&self.base);
      Some(pattern.replace_all(name, NoExpand(&replacement)).into_owned())
    })
  }

  /// Rewrites a file in place with [`TokenReplacer::replace_in_content`].
  /// Bytes are decoded lossily as UTF-8 and binary files are not special-cased,
  /// so a binary containing the marker is written back in text form.
  pub fn rewrite_file(&self, path: &Path) -> Result<(), ScaffoldError> {
    let bytes = fs::read(path).map_err(|e| ScaffoldError::FileRewrite {
      path: path.to_path_buf(),
      source: e,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    let replaced = self.replace_in_content(&content);
    if replaced == content {
      trace!("No marker found in {}", path.display());
      return Ok(());
    }
    trace!("Rewriting content of {}", path.display());
    fs::write(path, replaced).map_err(|e| ScaffoldError::FileRewrite {
      path: path.to_path_buf(),
      source: e,
    })
  }
}
