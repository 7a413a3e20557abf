use cirro_run::{Error, Result};
use std::path::{Path, PathBuf};

pub trait PathBufTryToString {
  fn to_string(&self) -> Result<String>;
}

impl PathBufTryToString for PathBuf {
  fn to_string(&self) -> Result<String> {
    self
      .to_str()
      .map(|s| s.to_string())
      .ok_or_else(|| Error::internal_runtime_error("PathBuf to string error"))
  }
}

pub fn copy_recursively(source: &Path, target: &Path) -> std::io::Result<()> {
  if source.is_dir() {
    std::fs::create_dir_all(target)?;
    for entry in std::fs::read_dir(source)? {
      let entry = entry?;
      copy_recursively(&entry.path(), &target.join(entry.file_name()))?;
    }
  } else {
    if let Some(parent) = target.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(source, target)?;
  }

  Ok(())
}
