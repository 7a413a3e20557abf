use cirro_run::StepId;
use std::path::PathBuf;

/// Directory layout of a step run inside the runner's working directory.
///
/// All steps of one job share `job_data_directory`; the workflow's whole
/// directory is removed when the workflow completes.
#[derive(Clone)]
pub struct Metadata {
  pub job_data_directory: PathBuf,
}

impl Metadata {
  pub fn builder() -> MetadataBuilder {
    MetadataBuilder::new()
  }
}

pub struct MetadataBuilder {
  pub runner_working_directory: Option<PathBuf>,
  pub step_id: Option<StepId>,
}

impl MetadataBuilder {
  pub fn new() -> Self {
    Self {
      runner_working_directory: None,
      step_id: None,
    }
  }

  pub fn runner_working_directory(mut self, runner_working_directory: PathBuf) -> Self {
    self.runner_working_directory = Some(runner_working_directory);
    self
  }

  pub fn step_id(mut self, step_id: StepId) -> Self {
    self.step_id = Some(step_id);
    self
  }

  pub fn build(self) -> Metadata {
    let runner_working_directory = self.runner_working_directory.unwrap();
    let step_id = self.step_id.unwrap();

    let workflow_id = step_id.workflow_id().inner();
    let job_key = step_id.job_key();

    let job_data_directory = runner_working_directory
      .join(workflow_id)
      .join(job_key)
      .join("data");

    Metadata { job_data_directory }
  }
}

impl Default for MetadataBuilder {
  fn default() -> Self {
    Self::new()
  }
}
