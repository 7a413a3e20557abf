use crate::{Actions, CirroRunSignal, Error, JobId, Plugin, PluginManager, Result};
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};

#[derive(Clone)]
struct SharedState {
  plugins: PluginManager,
  actions: Actions,
  signals: HashMap<JobId, CirroRunSignal>,
}

impl SharedState {
  pub fn new() -> Self {
    SharedState {
      plugins: PluginManager::new(),
      actions: Actions::new(),
      signals: HashMap::new(),
    }
  }
}

#[derive(Clone)]
pub struct CirroRunSharedState(Arc<Mutex<SharedState>>);

impl CirroRunSharedState {
  pub fn new() -> Self {
    CirroRunSharedState(Arc::new(Mutex::new(SharedState::new())))
  }

  pub fn register_plugin<P: Plugin + 'static>(&self, plugin: P) {
    self.0.lock().plugins.register(plugin);
  }

  pub fn unregister_plugin(&self, plugin_name: &'static str) {
    self.0.lock().plugins.unregister(plugin_name);
  }

  pub fn plugins(&self) -> PluginManager {
    self.0.lock().plugins.clone()
  }

  pub fn register_action<T>(&self, name: impl Into<String>, action: T)
  where
    T: crate::Action + 'static,
  {
    self.0.lock().actions.register(name, action);
  }

  pub fn unregister_action(&self, name: &str) {
    self.0.lock().actions.unregister(name);
  }

  pub fn actions(&self) -> Actions {
    self.0.lock().actions.clone()
  }

  pub fn add_signal(&self, job_id: JobId, signal: CirroRunSignal) {
    self.0.lock().signals.insert(job_id, signal);
  }

  pub fn get_signal(&self, job_id: &JobId) -> Option<CirroRunSignal> {
    self.0.lock().signals.get(job_id).cloned()
  }

  pub fn remove_signal(&self, job_id: &JobId) {
    self.0.lock().signals.remove(job_id);
  }

  pub fn cancel(&self, job_id: &JobId) -> Result<()> {
    let signal = self
      .get_signal(job_id)
      .ok_or_else(|| Error::error(format!("Job {} not found", job_id.to_string())))?;

    signal.cancel();

    Ok(())
  }
}

impl Default for CirroRunSharedState {
  fn default() -> Self {
    Self::new()
  }
}
