// src/error.rs
use std::{path::PathBuf, process::ExitStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
  #[error("IO Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Directory '{0}' already exists")]
  DirectoryExists(PathBuf),

  #[error("Version '{0}' does not exist in the template repository")]
  VersionNotFound(String),

  #[error("git is not installed or not found in PATH")]
  GitNotInstalled,

  #[error("Failed to execute `{command}`: {source}")]
  GitExec {
    command: String,
    #[source]
    source: std::io::Error,
  },

  #[error("`{command}` failed with status {status}. Stderr: {stderr}")]
  GitFailed {
    command: String,
    status: ExitStatus,
    stderr: String,
  },

  /// Any failure raised while rebranding the cloned tree.
  #[error("Failed to update project files: {0}")]
  Rebrand(#[source] Box<ScaffoldError>),

  #[error("Cannot rename '{from}' to '{to}': destination already exists")]
  RenameCollision { from: PathBuf, to: PathBuf },

  #[error("Failed to rename '{from}' to '{to}': {source}")]
  Rename {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Error walking directory '{path}': {source}")]
  WalkDir {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("Failed to replace content in file '{path}': {source}")]
  FileRewrite {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Project manifest not found at path: {0}")]
  PackageJsonMissing(PathBuf),

  #[error("Could not parse project manifest '{path}': {source}")]
  PackageJsonParse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Project manifest '{0}' is not a JSON object")]
  PackageJsonNotObject(PathBuf),
}

impl ScaffoldError {
  /// Wraps an error raised during rebranding so it carries the fixed prefix.
  pub fn rebrand(error: ScaffoldError) -> Self {
    match error {
      already @ ScaffoldError::Rebrand(_) => already,
      other => ScaffoldError::Rebrand(Box::new(other)),
    }
  }
}
