use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
  Pending,
  Queued,
  InProgress,
  Succeeded,
  Failed,
  TimedOut,
  Cancelled,
  Skipped,
}

impl WorkflowState {
  pub fn is_terminal(&self) -> bool {
    matches!(
      self,
      WorkflowState::Succeeded
        | WorkflowState::Failed
        | WorkflowState::TimedOut
        | WorkflowState::Cancelled
        | WorkflowState::Skipped
    )
  }

  pub fn is_in_progress(&self) -> bool {
    matches!(self, WorkflowState::InProgress)
  }

  pub fn is_queued(&self) -> bool {
    matches!(self, WorkflowState::Queued)
  }

  pub fn is_succeeded(&self) -> bool {
    matches!(self, WorkflowState::Succeeded)
  }
}
