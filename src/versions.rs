// src/versions.rs
use std::cmp::Ordering;
use std::collections::HashSet;

use log::{debug, info};

use crate::config::ScaffoldConfig;
use crate::error::ScaffoldError;
use crate::git::SourceControl;
use crate::utils;

const TAG_REF_PREFIX: &str = "refs/tags/";
const DEREF_SUFFIX: &str = "^{}";

/// Lists the template's published versions, newest first.
pub fn run_versions(config: &ScaffoldConfig, git: &dyn SourceControl) -> Result<(), ScaffoldError> {
  info!("Running versions command...");
  let tags = utils::run_step(
    "Fetching available versions...",
    "Fetched available versions",
    |_| fetch_versions(config, git),
  )?;

  if tags.is_empty() {
    utils::print_notice("No versions available");
    return Ok(());
  }

  utils::print_heading("Available versions:");
  for tag in &tags {
    utils::print_hint(&format!("  {}", tag));
  }

  utils::print_notice("Usage:");
  utils::print_hint(&format!("  {} init <project-name> -v <version>", config.tool_name));
  utils::print_hint(&format!("Example: {} init my-project -v {}", config.tool_name, tags[0]));
  Ok(())
}

/// Queries the remote and returns its tags deduplicated and sorted newest first.
pub fn fetch_versions(
  config: &ScaffoldConfig,
  git: &dyn SourceControl,
) -> Result<Vec<String>, ScaffoldError> {
  let raw = git.list_remote_tags(&config.remote_url)?;
  let mut tags = parse_remote_tags(&raw);
  sort_versions(&mut tags);
  debug!("Remote tags: {:?}", tags);
  Ok(tags)
}

/// Extracts tag names from `git ls-remote --tags` output.
///
/// Peeled refs (`v1.0.0^{}`) collapse onto their tag; the first occurrence of
/// each name keeps its position.
pub fn parse_remote_tags(raw: &str) -> Vec<String> {
  let mut seen = HashSet::new();
  raw
    .lines()
    .filter_map(|line| line.split(TAG_REF_PREFIX).nth(1))
    .map(|tag| tag.strip_suffix(DEREF_SUFFIX).unwrap_or(tag))
    .filter(|tag| seen.insert(tag.to_string()))
    .map(str::to_string)
    .collect()
}

/// Stable sort, newest first, on the first three numeric components.
pub fn sort_versions(tags: &mut [String]) {
  tags.sort_by(|a, b| compare_versions(b, a));
}

fn compare_versions(a: &str, b: &str) -> Ordering {
  version_key(a).cmp(&version_key(b))
}

// Missing or non-numeric components are `None`, which orders below any number.
// An empty component counts as 0.
fn version_key(tag: &str) -> [Option<u64>; 3] {
  let mut key = [None; 3];
  let trimmed = tag.strip_prefix('v').unwrap_or(tag);
  for (slot, part) in key.iter_mut().zip(trimmed.split('.')) {
    let part = part.trim();
    *slot = if part.is_empty() { Some(0) } else { part.parse().ok() };
  }
  key
}
