use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Cache policy of a `uses: cache` step.
///
/// `path` lists the workspace-relative directories or files persisted and
/// restored. The exact key is derived from `key`; `restore-keys` are fallback
/// prefixes tried in order when no exact match exists.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CacheOptions {
  pub path: Vec<String>,
  pub key: CacheKey,
  #[serde(rename = "restore-keys", default)]
  pub restore_keys: Vec<String>,
}

/// Content-addressed cache key: `<prefix>-<sha256 over the matched files>`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CacheKey {
  pub prefix: String,
  #[serde(default)]
  pub files: Vec<String>,
}

impl CacheKey {
  /// Derive the exact cache key for a workspace.
  ///
  /// Glob matches of `files` are sorted before hashing so the key only
  /// depends on the matched file set and its bytes, never on match order.
  /// Patterns that match nothing contribute nothing; the key stays valid.
  pub fn resolve(&self, workspace: &Path) -> Result<String> {
    let mut matched: Vec<PathBuf> = Vec::new();

    for pattern in &self.files {
      let full_pattern = workspace.join(pattern);
      let full_pattern = full_pattern.to_str().ok_or_else(|| {
        Error::internal_runtime_error("Cache file pattern is not valid UTF-8")
      })?;

      let entries = glob::glob(full_pattern).map_err(|err| {
        Error::workflow_config_error(format!("Invalid cache file pattern: {}", err))
      })?;

      for entry in entries {
        match entry {
          Ok(path) if path.is_file() => matched.push(path),
          Ok(_) => {}
          Err(err) => {
            log::warn!("Skipping unreadable cache input: {}", err);
          }
        }
      }
    }

    matched.sort();
    matched.dedup();

    if matched.is_empty() {
      log::trace!("No cache input files matched under {}", workspace.display());
    }

    let mut hasher = Sha256::new();
    for path in &matched {
      let relative = path.strip_prefix(workspace).unwrap_or(path);
      hasher.update(relative.to_string_lossy().as_bytes());
      hasher.update([0]);
      hasher.update(std::fs::read(path)?);
    }

    let hash = hasher.finalize();

    Ok(format!("{}-{:x}", self.prefix, hash))
  }
}
