use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TriggerEvent {
  /// push / pull_request
  pub event: String,
  /// Local path or clone URL of the repository the event belongs to
  pub repository: String,
  pub branch: String,
  pub sha: String,
  /// refs/heads/master / refs/tags/v1.0.0 / refs/pull/1/merge
  pub ref_name: String,
  pub pr_number: Option<u64>,
  /// Files touched by the triggering commit / pull request
  #[serde(default)]
  pub changed_files: Vec<String>,
}

impl TriggerEvent {
  pub fn is_push(&self) -> bool {
    self.event == "push"
  }

  pub fn is_pull_request(&self) -> bool {
    self.event == "pull_request"
  }
}

impl Default for TriggerEvent {
  fn default() -> Self {
    Self {
      event: "push".to_string(),
      repository: "cirro-ci/cirro-run".to_string(),
      ref_name: "refs/heads/main".to_string(),
      branch: "main".to_string(),
      sha: "123456".to_string(),
      pr_number: None,
      changed_files: vec![],
    }
  }
}
