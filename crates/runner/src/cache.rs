use crate::utils::copy_recursively;
use cirro_run::{Error, Result};
use std::{
  path::{Path, PathBuf},
  time::{SystemTime, UNIX_EPOCH},
};

/// Directory-backed cache store shared by every job run of a runner.
///
/// One directory per key. The store is append-mostly: `save` never
/// overwrites an existing entry, and concurrent savers of the same key race
/// benignly through a staging directory and an atomic rename. Eviction is
/// left to whoever owns the disk.
#[derive(Clone)]
pub struct LocalCacheStore {
  root: PathBuf,
}

struct PrefixMatch {
  modified: SystemTime,
  key: String,
}

impl LocalCacheStore {
  pub fn new(root: PathBuf) -> Self {
    Self { root }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn contains(&self, key: &str) -> bool {
    self.entry_directory(key).exists()
  }

  /// Restore the declared paths into the workspace from the exact key, or
  /// from the first restore-key prefix with a match (most recent entry
  /// wins within a prefix). A total miss is not an error: `Ok(None)`.
  pub async fn restore(
    &self,
    key: &str,
    restore_keys: &[String],
    paths: &[String],
    workspace: &Path,
  ) -> Result<Option<String>> {
    let matched_key = match self.lookup(key, restore_keys)? {
      Some(matched_key) => matched_key,
      None => return Ok(None),
    };

    let entry = self.root.join(&matched_key);
    let paths = paths.to_vec();
    let workspace = workspace.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
      for path in &paths {
        let source = entry.join(encode_path(path));
        if !source.exists() {
          continue;
        }

        copy_recursively(&source, &workspace.join(path))?;
      }

      Ok(())
    })
    .await
    .map_err(|err| Error::internal_runtime_error(format!("Cache restore task failed: {}", err)))??;

    Ok(Some(matched_key))
  }

  /// Save the declared paths under `key` if the entry does not already
  /// exist. Returns whether a new entry was written.
  pub async fn save(&self, key: &str, paths: &[String], workspace: &Path) -> Result<bool> {
    let entry = self.entry_directory(key);
    if entry.exists() {
      return Ok(false);
    }

    let staging = self.staging_directory(key);
    let paths = paths.to_vec();
    let workspace = workspace.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<bool> {
      std::fs::create_dir_all(&staging)?;

      for path in &paths {
        let source = workspace.join(path);
        if !source.exists() {
          log::warn!("Cache path {} does not exist, skipping", path);
          continue;
        }

        copy_recursively(&source, &staging.join(encode_path(path)))?;
      }

      match std::fs::rename(&staging, &entry) {
        Ok(()) => Ok(true),
        Err(err) => {
          let _ = std::fs::remove_dir_all(&staging);

          if entry.exists() {
            // Lost the race against a concurrent saver; the entry under this
            // key is equivalent by construction
            Ok(false)
          } else {
            Err(Error::io_error(err))
          }
        }
      }
    })
    .await
    .map_err(|err| Error::internal_runtime_error(format!("Cache save task failed: {}", err)))?
  }

  fn entry_directory(&self, key: &str) -> PathBuf {
    self.root.join(sanitize_key(key))
  }

  fn staging_directory(&self, key: &str) -> PathBuf {
    let nanos = SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .map(|duration| duration.as_nanos())
      .unwrap_or_default();

    self
      .root
      .join(".staging")
      .join(format!("{}-{}-{}", sanitize_key(key), std::process::id(), nanos))
  }

  fn lookup(&self, key: &str, restore_keys: &[String]) -> Result<Option<String>> {
    let exact = sanitize_key(key);
    if self.root.join(&exact).exists() {
      return Ok(Some(exact));
    }

    if !self.root.exists() {
      return Ok(None);
    }

    for prefix in restore_keys {
      let prefix = sanitize_key(prefix);
      let mut best: Option<PrefixMatch> = None;

      for entry in std::fs::read_dir(&self.root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();

        // Staging and other internal directories are never cache entries
        if name.starts_with('.') || !name.starts_with(&prefix) {
          continue;
        }

        let modified = entry
          .metadata()?
          .modified()
          .unwrap_or(SystemTime::UNIX_EPOCH);

        let is_newer = best
          .as_ref()
          .map(|best| modified > best.modified)
          .unwrap_or(true);

        if is_newer {
          best = Some(PrefixMatch {
            modified,
            key: name,
          });
        }
      }

      if let Some(best) = best {
        return Ok(Some(best.key));
      }
    }

    Ok(None)
  }
}

fn sanitize_key(key: &str) -> String {
  key
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
        c
      } else {
        '-'
      }
    })
    .collect()
}

fn encode_path(path: &str) -> String {
  path.trim_matches('/').replace('/', "__")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cirro-{}-{}", label, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[tokio::test]
  async fn test_save_and_restore() {
    let store = LocalCacheStore::new(temp_dir("store"));
    let workspace = temp_dir("workspace");

    std::fs::create_dir_all(workspace.join("target")).unwrap();
    std::fs::write(workspace.join("target/artifact"), "bits").unwrap();

    let saved = store
      .save("cargo-abc", &["target".to_string()], &workspace)
      .await
      .unwrap();
    assert!(saved);
    assert!(store.contains("cargo-abc"));

    let fresh = temp_dir("fresh");
    let restored = store
      .restore("cargo-abc", &[], &["target".to_string()], &fresh)
      .await
      .unwrap();

    assert_eq!(restored, Some("cargo-abc".to_string()));
    assert_eq!(
      std::fs::read_to_string(fresh.join("target/artifact")).unwrap(),
      "bits"
    );
  }

  #[tokio::test]
  async fn test_save_does_not_overwrite() {
    let store = LocalCacheStore::new(temp_dir("store"));
    let workspace = temp_dir("workspace");

    std::fs::write(workspace.join("file"), "first").unwrap();
    assert!(store
      .save("key", &["file".to_string()], &workspace)
      .await
      .unwrap());

    std::fs::write(workspace.join("file"), "second").unwrap();
    assert!(!store
      .save("key", &["file".to_string()], &workspace)
      .await
      .unwrap());

    let fresh = temp_dir("fresh");
    store
      .restore("key", &[], &["file".to_string()], &fresh)
      .await
      .unwrap();
    assert_eq!(std::fs::read_to_string(fresh.join("file")).unwrap(), "first");
  }

  #[tokio::test]
  async fn test_restore_miss_is_not_an_error() {
    let store = LocalCacheStore::new(temp_dir("store"));
    let workspace = temp_dir("workspace");

    let restored = store
      .restore("missing", &["missing-".to_string()], &["target".to_string()], &workspace)
      .await
      .unwrap();

    assert_eq!(restored, None);
  }

  #[tokio::test]
  async fn test_restore_key_prefix_fallback() {
    let store = LocalCacheStore::new(temp_dir("store"));
    let workspace = temp_dir("workspace");

    std::fs::write(workspace.join("file"), "old").unwrap();
    store
      .save("cargo-v1", &["file".to_string()], &workspace)
      .await
      .unwrap();

    let fresh = temp_dir("fresh");
    let restored = store
      .restore(
        "cargo-v2",
        &["cargo-".to_string()],
        &["file".to_string()],
        &fresh,
      )
      .await
      .unwrap();

    assert_eq!(restored, Some("cargo-v1".to_string()));
    assert_eq!(std::fs::read_to_string(fresh.join("file")).unwrap(), "old");
  }

  #[tokio::test]
  async fn test_restore_skips_missing_paths() {
    let store = LocalCacheStore::new(temp_dir("store"));
    let workspace = temp_dir("workspace");

    std::fs::write(workspace.join("present"), "here").unwrap();
    store
      .save(
        "key",
        &["present".to_string(), "absent".to_string()],
        &workspace,
      )
      .await
      .unwrap();

    let fresh = temp_dir("fresh");
    let restored = store
      .restore(
        "key",
        &[],
        &["present".to_string(), "absent".to_string()],
        &fresh,
      )
      .await
      .unwrap();

    assert_eq!(restored, Some("key".to_string()));
    assert!(fresh.join("present").exists());
    assert!(!fresh.join("absent").exists());
  }
}
