use crate::{
  Action, CirroRunSharedState, ExecutionContextBuilder, JobId, Plugin, Result, Runner,
};
use std::sync::Arc;

pub struct CirroRun {
  runner: Arc<Box<dyn Runner>>,
  pub(crate) shared_state: CirroRunSharedState,
}

impl CirroRun {
  pub fn builder() -> CirroRunBuilder {
    CirroRunBuilder::new()
  }

  pub fn register_plugin<P: Plugin + 'static>(&self, plugin: P) {
    self.shared_state.register_plugin(plugin);
  }

  pub fn unregister_plugin(&self, plugin_name: &'static str) {
    self.shared_state.unregister_plugin(plugin_name);
  }

  pub fn register_action<T>(&self, name: impl Into<String>, action: T)
  where
    T: Action + 'static,
  {
    self.shared_state.register_action(name, action);
  }

  pub fn unregister_action(&self, name: &str) {
    self.shared_state.unregister_action(name);
  }

  pub fn execution_context(&self) -> ExecutionContextBuilder {
    ExecutionContextBuilder::new(self.runner.clone(), self.shared_state.clone())
  }

  /// Cancel a running job. The job's current step receives the cancel signal
  /// and the remaining steps are abandoned.
  pub fn cancel(&self, job_id: &JobId) -> Result<()> {
    self.shared_state.cancel(job_id)
  }
}

pub struct CirroRunBuilder {
  runner: Option<Box<dyn Runner>>,
  shared_state: CirroRunSharedState,
}

impl CirroRunBuilder {
  pub fn new() -> Self {
    Self {
      runner: None,
      shared_state: CirroRunSharedState::new(),
    }
  }

  pub fn runner<T>(mut self, runner: T) -> Self
  where
    T: Runner + 'static,
  {
    self.runner = Some(Box::new(runner));
    self
  }

  pub fn plugin<P>(self, plugin: P) -> Self
  where
    P: Plugin + 'static,
  {
    self.shared_state.register_plugin(plugin);
    self
  }

  pub fn action<T>(self, name: impl Into<String>, action: T) -> Self
  where
    T: Action + 'static,
  {
    self.shared_state.register_action(name, action);
    self
  }

  pub fn build(self) -> CirroRun {
    let runner = self
      .runner
      .expect("CirroRun requires a runner. Call `.runner()` before `.build()`");

    CirroRun {
      runner: Arc::new(runner),
      shared_state: self.shared_state,
    }
  }
}

impl Default for CirroRunBuilder {
  fn default() -> Self {
    Self::new()
  }
}
