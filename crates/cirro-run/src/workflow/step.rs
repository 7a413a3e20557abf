use crate::{Command, Condition, EnvironmentVariables, ExecutionContext, StepId, StepPayload};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Step {
  pub id: StepId,
  pub name: Option<String>,
  pub on: Option<Condition>,
  pub runs_on: Option<String>,
  pub payload: StepPayload,
  pub continue_on_error: bool,
  pub env: EnvironmentVariables,
  pub timeout: Duration,
}

impl Step {
  pub fn should_skip(&self, ctx: &ExecutionContext) -> bool {
    if let Some(on) = &self.on {
      !ctx.is_match(on)
    } else {
      false
    }
  }
}

impl From<Step> for Command {
  fn from(val: Step) -> Self {
    Command {
      id: val.id,
      name: val.name,
      runs_on: val.runs_on,
      payload: val.payload,
      continue_on_error: val.continue_on_error,
      env: val.env,
      timeout: val.timeout,
    }
  }
}
