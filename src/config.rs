// src/config.rs

/// Template repository that every project is cloned from.
pub const TEMPLATE_REPO_URL: &str = "git@github.com:Kayshen-X/rn4oh-template.git";

/// Placeholder token baked into the template's names and file contents.
pub const MARKER_TOKEN: &str = "rn4oh";

/// Runtime settings shared by the `init` and `versions` commands.
///
/// Built once in `main` and handed down by reference; nothing here can be
/// overridden from the command line or the environment.
#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
  pub tool_name: String,
  pub tool_version: String,
  pub remote_url: String,
  pub marker: String,
  /// Entry names the rebrander never enters nor renames.
  pub excluded_dirs: Vec<String>,
  /// Manifest at the project root whose `name` field is rewritten.
  pub manifest_file: String,
}

impl Default for ScaffoldConfig {
  fn default() -> Self {
    Self {
      tool_name: "rn4oh".to_string(),
      tool_version: env!("CARGO_PKG_VERSION").to_string(),
      remote_url: TEMPLATE_REPO_URL.to_string(),
      marker: MARKER_TOKEN.to_string(),
      excluded_dirs: default_excluded_dirs(),
      manifest_file: default_manifest_file(),
    }
  }
}

impl ScaffoldConfig {
  pub fn is_excluded(&self, entry_name: &str) -> bool {
    self.excluded_dirs.iter().any(|d| d == entry_name)
  }
}

fn default_excluded_dirs() -> Vec<String> {
  vec!["node_modules".to_string(), ".git".to_string()]
}
fn default_manifest_file() -> String {
  "package.json".to_string()
}
