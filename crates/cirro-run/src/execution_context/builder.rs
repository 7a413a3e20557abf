use super::{condition_matcher::ConditionMatcher, ExecutionContext};
use crate::{CirroRunSharedState, Runner, TriggerEvent};
use std::sync::Arc;

pub struct ExecutionContextBuilder {
  runner: Arc<Box<dyn Runner>>,
  shared_state: CirroRunSharedState,
  event: Option<TriggerEvent>,
}

impl ExecutionContextBuilder {
  pub(crate) fn new(runner: Arc<Box<dyn Runner>>, shared_state: CirroRunSharedState) -> Self {
    Self {
      runner,
      shared_state,
      event: None,
    }
  }

  pub fn event(mut self, event: TriggerEvent) -> Self {
    self.event = Some(event);
    self
  }

  pub fn build(self) -> ExecutionContext {
    ExecutionContext {
      condition_matcher: ConditionMatcher::new(self.event),
      runner: self.runner,
      shared_state: self.shared_state,
    }
  }
}
