use crate::{CacheOptions, CirroRunSignal, EnvironmentVariables, StepId, TriggerEvent};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Checkout options of a `uses: checkout` step.
///
/// `repository` falls back to the triggering event's repository when absent.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct CheckoutOptions {
  pub repository: Option<String>,
  #[serde(rename = "ref")]
  pub reference: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum StepPayload {
  /// Literal shell command
  Run(String),
  /// Materialize the repository into the job workspace
  Checkout(CheckoutOptions),
  /// Restore declared paths; saved back on successful job completion
  Cache(CacheOptions),
}

impl Default for StepPayload {
  fn default() -> Self {
    StepPayload::Run(String::new())
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Command {
  pub id: StepId,
  pub name: Option<String>,
  /// Execution environment class inherited from the job
  pub runs_on: Option<String>,
  pub payload: StepPayload,
  pub continue_on_error: bool,
  pub env: EnvironmentVariables,
  pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Context {
  pub command: Command,
  pub event: Option<TriggerEvent>,
  /// Fired on cancellation or timeout; runners must terminate the step
  pub signal: CirroRunSignal,
}
