use crate::{Condition, ConditionPayload, TriggerEvent};

#[derive(Clone)]
pub struct ConditionMatcher {
  pub event: Option<TriggerEvent>,
}

impl ConditionMatcher {
  pub fn new(event: Option<TriggerEvent>) -> Self {
    Self { event }
  }

  pub fn is_match(&self, condition: &Condition) -> bool {
    let event = match &self.event {
      Some(event) => event,
      None => {
        // Runs triggered directly through the API carry no event and are
        // never filtered
        log::trace!("Event is not provided");
        return true;
      }
    };

    let payload = ConditionPayload {
      event: event.event.clone(),
      branch: event.branch.clone(),
      paths: event.changed_files.clone(),
    };

    condition.is_match(&payload)
  }
}
