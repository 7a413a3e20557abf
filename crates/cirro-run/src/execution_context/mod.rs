mod builder;
mod condition_matcher;

use self::condition_matcher::ConditionMatcher;
pub use builder::ExecutionContextBuilder;

use crate::{
  CirroRunSharedState, CirroRunSignal, Command, Condition, Context, Job, JobId, JobRunResult,
  RunEvent, Runner, Signal, Step, StepRunResult, StreamExt, TriggerEvent, Workflow, WorkflowLog,
  WorkflowRunResult, WorkflowState, WorkflowStateEvent,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct ExecutionContext {
  pub(crate) condition_matcher: ConditionMatcher,
  runner: Arc<Box<dyn Runner>>,
  shared_state: CirroRunSharedState,
}

impl ExecutionContext {
  pub fn event(&self) -> Option<TriggerEvent> {
    self.condition_matcher.event.clone()
  }

  pub fn is_match(&self, condition: &Condition) -> bool {
    self.condition_matcher.is_match(condition)
  }

  pub(crate) fn add_job_signal(&self, job_id: JobId, signal: CirroRunSignal) {
    self.shared_state.add_signal(job_id, signal);
  }

  pub(crate) fn remove_job_signal(&self, job_id: &JobId) {
    self.shared_state.remove_signal(job_id);
  }

  /// Run one step to completion, pumping its logs to plugins and the runner.
  ///
  /// The step gets its own signal. The job-level signal (cancellation or
  /// job timeout) is forwarded to it, and a step-level watchdog fires it
  /// when the step's own timeout elapses. Runner failures are reported as a
  /// failed step, never as a panic.
  pub async fn run(&self, step: Step) -> StepRunResult {
    let command: Command = step.clone().into();
    let step_id = command.id.clone();
    let job_id = step_id.job_id();

    let plugins = self.shared_state.plugins();

    let started_at = chrono::Utc::now();
    self
      .on_state_change(WorkflowStateEvent::StepStateUpdated {
        id: step_id.clone(),
        state: WorkflowState::InProgress,
      })
      .await;
    self.on_run_step(step).await;

    let job_signal = self
      .shared_state
      .get_signal(&job_id)
      .unwrap_or_default();
    let signal = CirroRunSignal::new();

    let timeout = command.timeout;
    let ctx = Context {
      command,
      event: self.condition_matcher.event.clone(),
      signal: signal.clone(),
    };

    let mut receiver = match self.runner.run(ctx).await {
      Ok(receiver) => receiver,
      Err(err) => {
        let completed_at = chrono::Utc::now();
        log::error!(
          "Step {} failed to start: {}",
          step_id.to_string(),
          err
        );

        self
          .on_state_change(WorkflowStateEvent::StepStateUpdated {
            id: step_id.clone(),
            state: WorkflowState::Failed,
          })
          .await;

        let result = StepRunResult {
          id: step_id,
          state: WorkflowState::Failed,
          exit_code: Some(1),
          started_at: Some(started_at),
          completed_at: Some(completed_at),
        };

        plugins.on_step_completed(result.clone());
        if let Err(err) = self.runner.on_step_completed(result.clone()).await {
          log::error!("Runner on_step_completed hook error: {}", err);
        }

        return result;
      }
    };

    let deadline = tokio::time::Instant::now() + timeout;
    let mut deadline_fired = false;
    let mut job_signal_seen = false;

    loop {
      tokio::select! {
        log = receiver.next() => {
          match log {
            Some(log) => {
              let log = WorkflowLog {
                step_id: step_id.clone(),
                log_type: log.log_type,
                message: log.message,
                time: chrono::Utc::now(),
              };

              plugins.on_log(log.clone());
              if let Err(err) = self.runner.on_log(log).await {
                log::error!("Runner on_log hook error: {}", err);
              }
            }
            None => break,
          }
        }
        _ = tokio::time::sleep_until(deadline), if !deadline_fired => {
          deadline_fired = true;
          log::warn!("Step {} exceeded its timeout", step_id.to_string());
          signal.timeout();
        }
        job_signal_value = job_signal.recv(), if !job_signal_seen => {
          job_signal_seen = true;
          match job_signal_value {
            Signal::Cancel => signal.cancel(),
            Signal::Timeout => signal.timeout(),
          }
        }
      }
    }

    let completed_at = chrono::Utc::now();
    let duration = completed_at - started_at;

    let state = match receiver.result() {
      Some(crate::RunResult::Succeeded) => WorkflowState::Succeeded,
      Some(crate::RunResult::Failed { exit_code }) => {
        return self
          .complete_step(StepRunResult {
            id: step_id,
            state: WorkflowState::Failed,
            exit_code: Some(exit_code),
            started_at: Some(started_at),
            completed_at: Some(completed_at),
          })
          .await;
      }
      Some(crate::RunResult::TimedOut) => WorkflowState::TimedOut,
      Some(crate::RunResult::Cancelled) => WorkflowState::Cancelled,
      None => {
        log::error!("Missing result from runner. This is a bug in the runner implementation.");
        WorkflowState::Failed
      }
    };

    log::info!(
      "Step {} finished with {:?} in {} seconds",
      step_id.to_string(),
      state,
      duration.num_seconds()
    );

    self
      .complete_step(StepRunResult {
        id: step_id,
        state,
        exit_code: None,
        started_at: Some(started_at),
        completed_at: Some(completed_at),
      })
      .await
  }

  async fn complete_step(&self, result: StepRunResult) -> StepRunResult {
    self
      .on_state_change(WorkflowStateEvent::StepStateUpdated {
        id: result.id.clone(),
        state: result.state.clone(),
      })
      .await;

    self.shared_state.plugins().on_step_completed(result.clone());
    if let Err(err) = self.runner.on_step_completed(result.clone()).await {
      log::error!("Runner on_step_completed hook error: {}", err);
    }

    result
  }

  pub async fn on_state_change(&self, event: WorkflowStateEvent) {
    self.shared_state.plugins().on_state_change(event.clone());
    if let Err(err) = self.runner.on_state_change(event).await {
      log::error!("Runner on_state_change hook error: {}", err);
    }
  }

  pub async fn on_run_workflow(&self, workflow: Workflow) {
    let event = RunEvent {
      payload: workflow,
      trigger_event: self.event(),
    };

    self.shared_state.plugins().on_run_workflow(event.clone());
    if let Err(err) = self.runner.on_run_workflow(event).await {
      log::error!("Runner on_run_workflow hook error: {}", err);
    }
  }

  pub async fn on_run_job(&self, job: Job) {
    let event = RunEvent {
      payload: job,
      trigger_event: self.event(),
    };

    self.shared_state.plugins().on_run_job(event.clone());
    if let Err(err) = self.runner.on_run_job(event).await {
      log::error!("Runner on_run_job hook error: {}", err);
    }
  }

  async fn on_run_step(&self, step: Step) {
    let event = RunEvent {
      payload: step,
      trigger_event: self.event(),
    };

    self.shared_state.plugins().on_run_step(event.clone());
    if let Err(err) = self.runner.on_run_step(event).await {
      log::error!("Runner on_run_step hook error: {}", err);
    }
  }

  pub async fn on_job_completed(&self, result: JobRunResult) {
    self.shared_state.plugins().on_job_completed(result.clone());
    if let Err(err) = self.runner.on_job_completed(result).await {
      log::error!("Runner on_job_completed hook error: {}", err);
    }
  }

  pub async fn on_workflow_completed(&self, result: WorkflowRunResult) {
    self
      .shared_state
      .plugins()
      .on_workflow_completed(result.clone());
    if let Err(err) = self.runner.on_workflow_completed(result).await {
      log::error!("Runner on_workflow_completed hook error: {}", err);
    }
  }
}
