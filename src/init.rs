// src/init.rs
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::cli::InitArgs;
use crate::config::ScaffoldConfig;
use crate::error::ScaffoldError;
use crate::git::SourceControl;
use crate::rebrand::rebrand_project;
use crate::utils;
use crate::versions::fetch_versions;

pub fn run_init(
  args: InitArgs,
  workspace: &Path,
  config: &ScaffoldConfig,
  git: &dyn SourceControl,
) -> Result<(), ScaffoldError> {
  info!("Running init command...");
  debug!("Args: {:?}, Workspace: {}", args, workspace.display());

  let target = init_project(workspace, &args.project_name, args.tag.as_deref(), config, git)?;
  info!("Project created at {}", target.display());

  print_next_steps(&args.project_name);
  Ok(())
}

/// Creates `<workspace>/<project_name>` from the template repository and
/// returns its path.
///
/// The target must not exist yet; that is checked before any git call. When a
/// version is given it must be one of the remote's tags. On failure whatever
/// was already written stays on disk.
pub fn init_project(
  workspace: &Path,
  project_name: &str,
  version: Option<&str>,
  config: &ScaffoldConfig,
  git: &dyn SourceControl,
) -> Result<PathBuf, ScaffoldError> {
  let target = workspace.join(project_name);

  // --- 1. Target must be free ---
  if fs::symlink_metadata(&target).is_ok() {
    return Err(ScaffoldError::DirectoryExists(target));
  }

  // --- 2. Clone (optionally at a tag) ---
  match version {
    Some(version) => {
      utils::run_step("Checking version...", "Version check passed", |_| {
        let tags = fetch_versions(config, git)?;
        ensure_version_exists(&tags, version)
      })?;

      utils::run_step(
        format!("Cloning project ({})...", version),
        format!("Cloned project ({})", version),
        |_| {
          git.clone_repo(&config.remote_url, &target, false)?;
          git.checkout(&target, version)
        },
      )?;
    }
    None => {
      utils::run_step("Cloning latest version...", "Cloned latest version", |_| {
        git.clone_repo(&config.remote_url, &target, true)
      })?;
    }
  }

  // --- 3. Rebrand ---
  utils::run_step(
    "Updating project configuration...",
    "Project configuration updated",
    |pb| rebrand_project(&target, project_name, config, pb),
  )?;

  // --- 4. Drop template history ---
  remove_git_metadata(&target)?;

  Ok(target)
}

// Exact match only; "v1.0" does not select "v1.0.0".
fn ensure_version_exists(tags: &[String], version: &str) -> Result<(), ScaffoldError> {
  if tags.iter().any(|t| t == version) {
    Ok(())
  } else {
    Err(ScaffoldError::VersionNotFound(version.to_string()))
  }
}

fn remove_git_metadata(target: &Path) -> Result<(), ScaffoldError> {
  let git_dir = target.join(".git");
  match fs::remove_dir_all(&git_dir) {
    Ok(()) => {
      debug!("Removed {}", git_dir.display());
      Ok(())
    }
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
    Err(e) => Err(ScaffoldError::Io(e)),
  }
}

fn print_next_steps(project_name: &str) {
  utils::print_success(&format!("✨ Project {} initialized successfully!", project_name));

  utils::print_heading("Next steps:");
  utils::print_hint(&format!("\n  cd {}", project_name));
  utils::print_hint("  npm install");
  utils::print_hint("  npm start");

  utils::print_notice("Tips:");
  utils::print_hint("- Use npm start to launch the development server");
  utils::print_hint("- Use npm run ios to run the iOS simulator");
  utils::print_hint("- Use npm run android to run the Android emulator");
  utils::print_hint("- Use npm run oh:dev to run the OpenHarmony development server");
}
