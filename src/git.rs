// src/git.rs
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;

use duct::cmd;
use log::{debug, info, trace};

use crate::error::ScaffoldError;

/// The handful of source-control operations the scaffolder needs.
pub trait SourceControl {
  /// Raw output of `git ls-remote --tags <url>`.
  fn list_remote_tags(&self, url: &str) -> Result<String, ScaffoldError>;

  /// Clones `url` into `dest`. A shallow clone only fetches the default branch tip.
  fn clone_repo(&self, url: &str, dest: &Path, shallow: bool) -> Result<(), ScaffoldError>;

  /// Checks out `reference` inside an existing clone.
  fn checkout(&self, repo_dir: &Path, reference: &str) -> Result<(), ScaffoldError>;
}

/// [`SourceControl`] backed by the `git` executable on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCli;

impl GitCli {
  fn run(&self, args: Vec<OsString>, working_dir: Option<&Path>) -> Result<String, ScaffoldError> {
    let command = format!(
      "git {}",
      args
        .iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
    );
    info!("Executing `{}`", command);

    let mut expr = cmd("git", args)
      .stdout_capture()
      .stderr_capture()
      .unchecked(); // Non-zero exits come back as Ok(Output)
    if let Some(dir) = working_dir {
      debug!("Working directory: {}", dir.display());
      expr = expr.dir(dir);
    }

    let output = expr.run().map_err(|e| {
      if e.kind() == ErrorKind::NotFound {
        ScaffoldError::GitNotInstalled
      } else {
        ScaffoldError::GitExec {
          command: command.clone(),
          source: e,
        }
      }
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    trace!("`{}` stdout:\n{}", command, stdout);
    trace!("`{}` stderr:\n{}", command, stderr);

    if !output.status.success() {
      return Err(ScaffoldError::GitFailed {
        command,
        status: output.status,
        stderr: stderr.trim().to_string(),
      });
    }
    Ok(stdout)
  }
}

impl SourceControl for GitCli {
  fn list_remote_tags(&self, url: &str) -> Result<String, ScaffoldError> {
    self.run(vec!["ls-remote".into(), "--tags".into(), url.into()], None)
  }

  fn clone_repo(&self, url: &str, dest: &Path, shallow: bool) -> Result<(), ScaffoldError> {
    let mut args: Vec<OsString> = vec!["clone".into()];
    if shallow {
      args.push("--depth".into());
      args.push("1".into());
    }
    args.push(url.into());
    args.push(dest.as_os_str().to_os_string());
    self.run(args, None).map(|_| ())
  }

  fn checkout(&self, repo_dir: &Path, reference: &str) -> Result<(), ScaffoldError> {
    self
      .run(vec!["checkout".into(), reference.into()], Some(repo_dir))
      .map(|_| ())
  }
}

#[cfg(test)]
pub(crate) mod testing {
  use std::cell::RefCell;
  use std::fs;
  use std::path::{Path, PathBuf};

  use super::SourceControl;
  use crate::error::ScaffoldError;

  /// Recorded call against [`ScriptedGit`].
  #[derive(Debug, Clone, PartialEq, Eq)]
  pub enum GitCall {
    ListRemoteTags(String),
    Clone { url: String, dest: PathBuf, shallow: bool },
    Checkout { repo_dir: PathBuf, reference: String },
  }

  type Populate = Box<dyn Fn(&Path)>;

  /// In-memory stand-in for git: answers `ls-remote` with canned output and
  /// "clones" by creating the destination and running a populate closure.
  pub struct ScriptedGit {
    pub remote_tags: Result<String, String>,
    pub clone_fails: bool,
    populate: Populate,
    calls: RefCell<Vec<GitCall>>,
  }

  impl ScriptedGit {
    pub fn new(remote_tags: &str) -> Self {
      Self {
        remote_tags: Ok(remote_tags.to_string()),
        clone_fails: false,
        populate: Box::new(|_| {}),
        calls: RefCell::new(Vec::new()),
      }
    }

    pub fn unreachable(message: &str) -> Self {
      Self {
        remote_tags: Err(message.to_string()),
        ..Self::new("")
      }
    }

    pub fn with_populate(mut self, populate: impl Fn(&Path) + 'static) -> Self {
      self.populate = Box::new(populate);
      self
    }

    pub fn calls(&self) -> Vec<GitCall> {
      self.calls.borrow().clone()
    }

    fn failure(message: &str) -> ScaffoldError {
      ScaffoldError::GitExec {
        command: "git (scripted)".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, message.to_string()),
      }
    }
  }

  impl SourceControl for ScriptedGit {
    fn list_remote_tags(&self, url: &str) -> Result<String, ScaffoldError> {
      self.calls.borrow_mut().push(GitCall::ListRemoteTags(url.to_string()));
      self.remote_tags.clone().map_err(|m| Self::failure(&m))
    }

    fn clone_repo(&self, url: &str, dest: &Path, shallow: bool) -> Result<(), ScaffoldError> {
      self.calls.borrow_mut().push(GitCall::Clone {
        url: url.to_string(),
        dest: dest.to_path_buf(),
        shallow,
      });
      if self.clone_fails {
        return Err(Self::failure("repository not found"));
      }
      fs::create_dir_all(dest.join(".git"))?;
      fs::write(dest.join(".git").join("HEAD"), "ref: refs/heads/main\n")?;
      (self.populate)(dest);
      Ok(())
    }

    fn checkout(&self, repo_dir: &Path, reference: &str) -> Result<(), ScaffoldError> {
      self.calls.borrow_mut().push(GitCall::Checkout {
        repo_dir: repo_dir.to_path_buf(),
        reference: reference.to_string(),
      });
      Ok(())
    }
  }
}
