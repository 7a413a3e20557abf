use super::Step;
use crate::{
  CirroRunSignal, Condition, ExecutionContext, JobId, JobRunResult, StepRunResult, WorkflowState,
  WorkflowStateEvent,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Job {
  pub id: JobId,
  pub name: Option<String>,
  pub on: Option<Condition>,
  /// Requested execution environment class
  pub runs_on: Option<String>,
  /// Wall-clock ceiling for the whole job
  pub timeout: Duration,
  pub steps: Vec<Step>,
  pub depends_on: Vec<String>,
}

impl Job {
  pub async fn run(&self, ctx: ExecutionContext) -> JobRunResult {
    if let Some(on) = &self.on {
      if !ctx.is_match(on) {
        ctx
          .on_state_change(WorkflowStateEvent::JobStateUpdated {
            id: self.id.clone(),
            state: WorkflowState::Skipped,
          })
          .await;

        return JobRunResult {
          id: self.id.clone(),
          state: WorkflowState::Skipped,
          started_at: None,
          completed_at: None,
          steps: vec![],
        };
      }
    }

    let started_at = chrono::Utc::now();
    let mut job_state = WorkflowState::InProgress;

    // The job signal is the single cancellation channel: external cancels and
    // the timeout watchdog both go through it, and every step forwards it to
    // its runner.
    let signal = CirroRunSignal::new();
    ctx.add_job_signal(self.id.clone(), signal.clone());

    let watchdog = tokio::spawn({
      let signal = signal.clone();
      let timeout = self.timeout;
      async move {
        tokio::time::sleep(timeout).await;
        log::warn!("Job exceeded its wall-clock ceiling, terminating");
        signal.timeout();
      }
    });

    ctx.on_run_job(self.clone()).await;
    ctx
      .on_state_change(WorkflowStateEvent::JobStateUpdated {
        id: self.id.clone(),
        state: job_state.clone(),
      })
      .await;

    let mut steps = Vec::new();

    for step in self.steps.iter().cloned() {
      // The signal may fire between steps, before any runner sees it
      if job_state.is_in_progress() {
        if signal.is_timeout() {
          job_state = WorkflowState::TimedOut;
        } else if signal.is_cancelled() {
          job_state = WorkflowState::Cancelled;
        }
      }

      // Fail fast: once the job left InProgress the remaining steps are
      // abandoned
      let mut skipped = !job_state.is_in_progress();

      if !skipped && step.should_skip(&ctx) {
        skipped = true;
      }

      if skipped {
        log::trace!("Step {} is skipped", step.id.to_string());

        ctx
          .on_state_change(WorkflowStateEvent::StepStateUpdated {
            id: step.id.clone(),
            state: WorkflowState::Skipped,
          })
          .await;

        steps.push(StepRunResult {
          id: step.id.clone(),
          state: WorkflowState::Skipped,
          exit_code: None,
          started_at: None,
          completed_at: None,
        });
        continue;
      }

      let continue_on_error = step.continue_on_error;
      let result = ctx.run(step).await;

      match result.state {
        WorkflowState::Failed => {
          if !continue_on_error {
            job_state = WorkflowState::Failed;
          }
        }
        WorkflowState::TimedOut => {
          if signal.is_timeout() {
            // The job ceiling fired, not the step's own timeout
            job_state = WorkflowState::TimedOut;
          } else if !continue_on_error {
            job_state = WorkflowState::Failed;
          }
        }
        WorkflowState::Cancelled => {
          job_state = WorkflowState::Cancelled;
        }
        _ => {}
      }

      steps.push(result);
    }

    watchdog.abort();
    ctx.remove_job_signal(&self.id);

    if job_state.is_in_progress() {
      job_state = WorkflowState::Succeeded;
    }

    let completed_at = chrono::Utc::now();

    ctx
      .on_state_change(WorkflowStateEvent::JobStateUpdated {
        id: self.id.clone(),
        state: job_state.clone(),
      })
      .await;

    let result = JobRunResult {
      id: self.id.clone(),
      state: job_state,
      started_at: Some(started_at),
      completed_at: Some(completed_at),
      steps,
    };

    ctx.on_job_completed(result.clone()).await;

    result
  }
}
