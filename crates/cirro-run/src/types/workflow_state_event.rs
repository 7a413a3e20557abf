use crate::{JobId, StepId, WorkflowId, WorkflowState};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum WorkflowStateEvent {
  WorkflowStateUpdated {
    id: WorkflowId,
    state: WorkflowState,
  },
  JobStateUpdated {
    id: JobId,
    state: WorkflowState,
  },
  StepStateUpdated {
    id: StepId,
    state: WorkflowState,
  },
}
