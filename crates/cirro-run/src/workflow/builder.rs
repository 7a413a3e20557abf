use super::{parser::WorkflowParser, Workflow};
use crate::{CirroRun, Error, Id, Result};

pub struct WorkflowBuilder {
  id: Option<Id>,
  config: Option<String>,
}

impl WorkflowBuilder {
  pub fn new() -> Self {
    Self {
      id: None,
      config: None,
    }
  }

  pub fn id(mut self, id: impl Into<Id>) -> Self {
    self.id = Some(id.into());
    self
  }

  pub fn config(mut self, config: impl Into<String>) -> Self {
    self.config = Some(config.into());
    self
  }

  pub fn build(self, cirro_run: &CirroRun) -> Result<Workflow> {
    let config = self
      .config
      .ok_or_else(|| Error::init_error("Workflow config is required".to_string()))?;

    let user_workflow = config.try_into()?;
    let id = self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let parser = WorkflowParser {
      id,
      user_workflow,
      actions: cirro_run.shared_state.actions(),
    };

    parser.parse()
  }
}

impl Default for WorkflowBuilder {
  fn default() -> Self {
    Self::new()
  }
}
