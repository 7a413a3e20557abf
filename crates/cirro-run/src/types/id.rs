use crate::Error;
use serde::{Deserialize, Serialize};

pub type Id = String;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Hash, Eq, Default)]
pub struct WorkflowId(Id);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Hash, Eq, Default)]
pub struct JobId(Id, Id);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Hash, Eq, Default)]
pub struct StepId(Id, Id, usize);

impl WorkflowId {
  pub fn new(id: impl Into<String>) -> Self {
    WorkflowId(id.into())
  }

  pub fn inner(&self) -> Id {
    self.0.clone()
  }
}

impl JobId {
  pub fn new(workflow_id: impl Into<String>, job_key: impl Into<String>) -> Self {
    JobId(workflow_id.into(), job_key.into())
  }

  pub fn workflow_id(&self) -> WorkflowId {
    WorkflowId(self.0.clone())
  }

  pub fn job_key(&self) -> Id {
    self.1.clone()
  }
}

impl StepId {
  pub fn new(workflow_id: impl Into<String>, job_key: impl Into<String>, step_number: usize) -> Self {
    StepId(workflow_id.into(), job_key.into(), step_number)
  }

  pub fn workflow_id(&self) -> WorkflowId {
    WorkflowId(self.0.clone())
  }

  pub fn job_id(&self) -> JobId {
    JobId(self.0.clone(), self.1.clone())
  }

  pub fn job_key(&self) -> Id {
    self.1.clone()
  }

  pub fn step_number(&self) -> usize {
    self.2
  }
}

impl ToString for WorkflowId {
  fn to_string(&self) -> String {
    self.0.clone()
  }
}

impl ToString for JobId {
  fn to_string(&self) -> String {
    format!("{}/{}", self.0, self.1)
  }
}

impl ToString for StepId {
  fn to_string(&self) -> String {
    format!("{}/{}/{}", self.0, self.1, self.2)
  }
}

impl TryFrom<&str> for WorkflowId {
  type Error = Error;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    if value.is_empty() {
      Err(Error::internal_runtime_error("WorkflowId cannot be empty"))
    } else {
      Ok(WorkflowId(value.to_string()))
    }
  }
}

impl TryFrom<&str> for JobId {
  type Error = Error;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 2 {
      Err(Error::internal_runtime_error(
        "JobId must be in the format of <workflow_id>/<job_key>",
      ))
    } else {
      Ok(JobId(parts[0].to_string(), parts[1].to_string()))
    }
  }
}

impl TryFrom<&str> for StepId {
  type Error = Error;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 3 {
      Err(Error::internal_runtime_error(
        "StepId must be in the format of <workflow_id>/<job_key>/<step_number>",
      ))
    } else {
      let step_number = parts[2]
        .parse::<usize>()
        .map_err(|_| Error::internal_runtime_error("Step number must be a number"))?;
      Ok(StepId(
        parts[0].to_string(),
        parts[1].to_string(),
        step_number,
      ))
    }
  }
}
