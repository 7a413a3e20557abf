use crate::{Result, UserActionStep, UserStep};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ActionSteps {
  pub pre: Option<UserStep>,
  pub run: UserStep,
  pub post: Option<UserStep>,
}

/// Rewrites a `uses:` step into concrete steps. `pre` runs in place before
/// `run`; `post` is deferred to the end of the job, after the last declared
/// step.
pub trait Action
where
  Self: Send + Sync,
{
  fn normalize(&self, step: UserActionStep) -> Result<ActionSteps>;
}

#[derive(Clone)]
pub struct Actions {
  actions: Arc<Mutex<HashMap<String, Box<dyn Action>>>>,
}

impl Actions {
  pub fn new() -> Self {
    let actions: HashMap<String, Box<dyn Action>> = HashMap::new();

    Self {
      actions: Arc::new(Mutex::new(actions)),
    }
  }

  pub fn register<T>(&self, name: impl Into<String>, action: T)
  where
    T: Action + 'static,
  {
    self.actions.lock().insert(name.into(), Box::new(action));
  }

  pub fn unregister(&self, name: &str) {
    self.actions.lock().remove(name);
  }

  pub fn try_normalize(&self, step: UserActionStep) -> Result<Option<ActionSteps>> {
    let actions = self.actions.lock();
    if let Some(action) = actions.get(step.action_name()) {
      let normalized = action.normalize(step)?;

      Ok(Some(normalized))
    } else {
      Ok(None)
    }
  }

  pub fn size(&self) -> usize {
    self.actions.lock().len()
  }
}

impl Default for Actions {
  fn default() -> Self {
    Self::new()
  }
}
