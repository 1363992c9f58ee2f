// src/rebrand.rs
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::{debug, trace, warn};
use serde_json::Value;
use walkdir::WalkDir;

use crate::casing::TokenReplacer;
use crate::config::ScaffoldConfig;
use crate::error::ScaffoldError;

/// Rebrands a freshly cloned template in place.
///
/// Runs in three phases whose order matters:
/// 1. walk the tree, renaming matching directories and files and collecting
///    the final path of every file;
/// 2. set the `name` field of the root manifest to the lowercased project name;
/// 3. rewrite the content of every collected file (the manifest included).
///
/// Every failure is wrapped in [`ScaffoldError::Rebrand`]. Nothing is rolled back.
pub fn rebrand_project(
  root: &Path,
  project_name: &str,
  config: &ScaffoldConfig,
  pb: &ProgressBar,
) -> Result<(), ScaffoldError> {
  update_project_files(root, project_name, config, pb).map_err(ScaffoldError::rebrand)
}

fn update_project_files(
  root: &Path,
  project_name: &str,
  config: &ScaffoldConfig,
  pb: &ProgressBar,
) -> Result<(), ScaffoldError> {
  let replacer = TokenReplacer::new(&config.marker, project_name);

  // --- 1. Rename pass ---
  let mut files = Vec::new();
  collect_and_rename(root, &replacer, config, &mut files)?;
  debug!("Collected {} files under {}", files.len(), root.display());

  // --- 2. Manifest name ---
  update_manifest_name(&root.join(&config.manifest_file), project_name)?;

  // --- 3. Content pass ---
  for (i, file) in files.iter().enumerate() {
    let relative = file.strip_prefix(root).unwrap_or(file);
    pb.set_message(format!("Updating [{}/{}] {}", i + 1, files.len(), relative.display()));
    replacer.rewrite_file(file)?;
  }
  Ok(())
}

/// Visits the children of `dir` in file-name order. Directories are renamed
/// before being entered, files before being collected, so `files` only ever
/// holds post-rename paths.
pub(crate) fn collect_and_rename(
  dir: &Path,
  replacer: &TokenReplacer,
  config: &ScaffoldConfig,
  files: &mut Vec<PathBuf>,
) -> Result<(), ScaffoldError> {
  // Sorting makes walkdir read the whole listing before yielding, so renaming
  // siblings while iterating is safe.
  let children = WalkDir::new(dir)
    .min_depth(1)
    .max_depth(1)
    .sort_by_file_name();

  for entry_result in children {
    let entry = entry_result.map_err(|e| ScaffoldError::WalkDir {
      path: dir.to_path_buf(),
      source: e,
    })?;
    let name = entry.file_name().to_str();

    if name.map_or(false, |n| config.is_excluded(n)) {
      trace!("Skipping excluded entry {}", entry.path().display());
      continue;
    }
    if name.is_none() {
      warn!(
        "Non-UTF8 entry name, leaving it unrenamed: {}",
        entry.path().display()
      );
    }

    if entry.file_type().is_dir() {
      let dir_path = match name {
        Some(n) if replacer.matches_name(n) => {
          let new_name = replacer.replace_each_occurrence(n).into_owned();
          rename_entry(entry.path(), &new_name)?
        }
        _ => entry.path().to_path_buf(),
      };
      collect_and_rename(&dir_path, replacer, config, files)?;
    } else {
      let file_path = match name.and_then(|n| replacer.replace_by_first_pattern(n)) {
        Some(new_name) => rename_entry(entry.path(), &new_name)?,
        None => entry.path().to_path_buf(),
      };
      files.push(file_path);
    }
  }
  Ok(())
}

/// Renames `from` within its parent. An existing destination is a hard error.
fn rename_entry(from: &Path, new_name: &str) -> Result<PathBuf, ScaffoldError> {
  let to = from.with_file_name(new_name);
  if to == from {
    return Ok(to);
  }
  if fs::symlink_metadata(&to).is_ok() {
    return Err(ScaffoldError::RenameCollision {
      from: from.to_path_buf(),
      to,
    });
  }
  fs::rename(from, &to).map_err(|e| ScaffoldError::Rename {
    from: from.to_path_buf(),
    to: to.clone(),
    source: e,
  })?;
  debug!("Renamed {} -> {}", from.display(), to.display());
  Ok(to)
}

/// Sets the manifest's `name` field, keeping key order, and writes it back
/// with 2-space indentation.
fn update_manifest_name(manifest_path: &Path, project_name: &str) -> Result<(), ScaffoldError> {
  let content = fs::read_to_string(manifest_path).map_err(|e| match e.kind() {
    ErrorKind::NotFound => ScaffoldError::PackageJsonMissing(manifest_path.to_path_buf()),
    _ => ScaffoldError::Io(e),
  })?;
  let mut manifest: Value =
    serde_json::from_str(&content).map_err(|e| ScaffoldError::PackageJsonParse {
      path: manifest_path.to_path_buf(),
      source: e,
    })?;

  let Some(fields) = manifest.as_object_mut() else {
    return Err(ScaffoldError::PackageJsonNotObject(manifest_path.to_path_buf()));
  };
  fields.insert("name".to_string(), Value::String(project_name.to_lowercase()));

  let serialized =
    serde_json::to_string_pretty(&manifest).map_err(|e| ScaffoldError::PackageJsonParse {
      path: manifest_path.to_path_buf(),
      source: e,
    })?;
  fs::write(manifest_path, serialized)?;
  debug!("Set manifest name in {}", manifest_path.display());
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::{tempdir, TempDir};

  fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }

  fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
  }

  fn template_tree() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(
      root,
      "package.json",
      r#"{"name":"rn4oh","displayName":"RN4OH","version":"0.0.1","scripts":{"oh:dev":"rn4oh-dev"}}"#,
    );
    write(root, "README.md", "# RN4OH\nnpx rn4oh init");
    write(root, "RN4OH_rn4oh_config/settings.json", r#"{"app":"rn4oh"}"#);
    write(
      root,
      "harmony/rn4oh/Rn4ohPackage.ts",
      "export class Rn4ohPackage {} // rn4oh",
    );
    write(root, "node_modules/rn4oh/index.js", "module.exports = 'rn4oh';");
    write(root, ".git/rn4oh.txt", "rn4oh");
    dir
  }

  fn run(root: &Path, project_name: &str) -> Result<(), ScaffoldError> {
    rebrand_project(root, project_name, &ScaffoldConfig::default(), &ProgressBar::hidden())
  }

  #[test]
  fn renames_directories_per_occurrence_and_files_per_pattern() {
    let dir = template_tree();
    let root = dir.path();

    run(root, "MyApp").unwrap();

    assert!(root.join("MYAPP_myapp_config").is_dir());
    assert!(!root.join("RN4OH_rn4oh_config").exists());
    assert_eq!(read(root, "MYAPP_myapp_config/settings.json"), r#"{"app":"myapp"}"#);

    // Content pass leaves the capitalized form alone, the rename does not.
    assert_eq!(
      read(root, "harmony/myapp/MyappPackage.ts"),
      "export class Rn4ohPackage {} // myapp"
    );
    assert_eq!(read(root, "README.md"), "# MYAPP\nnpx myapp init");
  }

  #[test]
  fn never_enters_excluded_directories() {
    let dir = template_tree();
    let root = dir.path();

    run(root, "MyApp").unwrap();

    assert_eq!(read(root, "node_modules/rn4oh/index.js"), "module.exports = 'rn4oh';");
    assert_eq!(read(root, ".git/rn4oh.txt"), "rn4oh");
  }

  #[test]
  fn manifest_name_is_lowercased_and_other_fields_rewritten() {
    let dir = template_tree();
    let root = dir.path();

    run(root, "My-Project").unwrap();

    let manifest = read(root, "package.json");
    let parsed: Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(parsed["name"], "my-project");
    assert_eq!(parsed["displayName"], "MY-PROJECT");
    assert_eq!(parsed["scripts"]["oh:dev"], "my-project-dev");
    assert!(manifest.starts_with("{\n  \"name\": \"my-project\",\n  \"displayName\""));
  }

  #[test]
  fn binary_assets_do_not_abort_the_rebrand() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", r#"{"name":"rn4oh"}"#);
    write(root, "App.tsx", "rn4oh");
    let icon = "android/app/src/main/res/mipmap-hdpi/ic_launcher.png";
    let icon_bytes = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0xfe];
    fs::create_dir_all(root.join(icon).parent().unwrap()).unwrap();
    fs::write(root.join(icon), icon_bytes).unwrap();

    run(root, "MyApp").unwrap();

    assert_eq!(read(root, "App.tsx"), "myapp");
    assert_eq!(fs::read(root.join(icon)).unwrap(), icon_bytes);
    let parsed: Value = serde_json::from_str(&read(root, "package.json")).unwrap();
    assert_eq!(parsed["name"], "myapp");
  }

  #[test]
  fn collects_post_rename_paths() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "src/rn4oh/rn4oh.ts", "");
    write(root, "src/index.ts", "");

    let replacer = TokenReplacer::new("rn4oh", "demo");
    let mut files = Vec::new();
    collect_and_rename(root, &replacer, &ScaffoldConfig::default(), &mut files).unwrap();

    assert_eq!(
      files,
      vec![root.join("src/index.ts"), root.join("src/demo/demo.ts")]
    );
  }

  #[test]
  fn missing_manifest_fails_with_prefixed_error() {
    let dir = tempdir().unwrap();
    write(dir.path(), "index.js", "rn4oh");

    let err = run(dir.path(), "demo").unwrap_err();

    assert!(err.to_string().starts_with("Failed to update project files: "));
    match err {
      ScaffoldError::Rebrand(inner) => {
        assert!(matches!(*inner, ScaffoldError::PackageJsonMissing(_)))
      }
      other => panic!("unexpected error: {other}"),
    }
    // The rename pass has already run; content is untouched.
    assert_eq!(read(dir.path(), "index.js"), "rn4oh");
  }

  #[test]
  fn malformed_manifest_fails() {
    let dir = tempdir().unwrap();
    write(dir.path(), "package.json", "{ \"name\": ");

    let err = run(dir.path(), "demo").unwrap_err();

    match err {
      ScaffoldError::Rebrand(inner) => {
        assert!(matches!(*inner, ScaffoldError::PackageJsonParse { .. }))
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn rename_collision_aborts() {
    let dir = tempdir().unwrap();
    write(dir.path(), "package.json", "{}");
    write(dir.path(), "demo.txt", "existing");
    write(dir.path(), "rn4oh.txt", "template");

    let err = run(dir.path(), "demo").unwrap_err();

    match err {
      ScaffoldError::Rebrand(inner) => {
        assert!(matches!(*inner, ScaffoldError::RenameCollision { .. }))
      }
      other => panic!("unexpected error: {other}"),
    }
    assert_eq!(read(dir.path(), "demo.txt"), "existing");
  }
}
