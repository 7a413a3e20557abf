mod builder;
mod job;
mod parser;
mod step;

pub use job::Job;
pub use step::Step;

use crate::{
  Condition, ExecutionContext, Id, JobRunResult, WorkflowId, WorkflowRunResult, WorkflowState,
  WorkflowStateEvent,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Workflow {
  pub id: WorkflowId,
  pub name: Option<String>,
  pub on: Option<Condition>,
  pub jobs: HashMap<Id, Job>,
}

impl Workflow {
  pub fn builder() -> builder::WorkflowBuilder {
    builder::WorkflowBuilder::new()
  }

  pub async fn run(&self, ctx: ExecutionContext) -> WorkflowRunResult {
    // A non-matching trigger is not an error: nothing is scheduled
    if let Some(on) = &self.on {
      if !ctx.is_match(on) {
        log::trace!("Workflow {} is skipped", self.id.to_string());

        ctx
          .on_state_change(WorkflowStateEvent::WorkflowStateUpdated {
            id: self.id.clone(),
            state: WorkflowState::Skipped,
          })
          .await;

        let result = WorkflowRunResult {
          id: self.id.clone(),
          state: WorkflowState::Skipped,
          started_at: None,
          completed_at: None,
          jobs: HashMap::new(),
        };

        ctx.on_workflow_completed(result.clone()).await;

        return result;
      }
    }

    let started_at = chrono::Utc::now();

    ctx.on_run_workflow(self.clone()).await;
    ctx
      .on_state_change(WorkflowStateEvent::WorkflowStateUpdated {
        id: self.id.clone(),
        state: WorkflowState::InProgress,
      })
      .await;

    let mut results: HashMap<Id, JobRunResult> = HashMap::new();

    // Jobs run sequentially in dependency order; dependents of a job that
    // did not succeed are skipped
    let mut remaining: Vec<Id> = self.jobs.keys().cloned().collect();
    remaining.sort();

    while !remaining.is_empty() {
      let position = remaining.iter().position(|key| {
        self.jobs[key]
          .depends_on
          .iter()
          .all(|dep| results.contains_key(dep))
      });

      let key = match position {
        Some(position) => remaining.remove(position),
        None => {
          // Config validation rejects fully cyclic graphs, but a cycle among
          // a subset of jobs still ends up here
          for key in remaining {
            let job = &self.jobs[&key];
            log::error!(
              "Job {} is stuck in a dependency cycle and will be skipped",
              job.id.to_string()
            );

            ctx
              .on_state_change(WorkflowStateEvent::JobStateUpdated {
                id: job.id.clone(),
                state: WorkflowState::Skipped,
              })
              .await;

            results.insert(key, skipped_result(job));
          }
          break;
        }
      };

      let job = &self.jobs[&key];

      let failed_dependency = job
        .depends_on
        .iter()
        .find(|dep| !results[*dep].state.is_succeeded());

      if let Some(dep) = failed_dependency {
        log::trace!(
          "Job {} is skipped because dependency {} did not succeed",
          job.id.to_string(),
          dep
        );

        ctx
          .on_state_change(WorkflowStateEvent::JobStateUpdated {
            id: job.id.clone(),
            state: WorkflowState::Skipped,
          })
          .await;

        results.insert(key, skipped_result(job));
        continue;
      }

      let result = job.run(ctx.clone()).await;
      results.insert(key, result);
    }

    let state = aggregate_state(&results);
    let completed_at = chrono::Utc::now();

    ctx
      .on_state_change(WorkflowStateEvent::WorkflowStateUpdated {
        id: self.id.clone(),
        state: state.clone(),
      })
      .await;

    let result = WorkflowRunResult {
      id: self.id.clone(),
      state,
      started_at: Some(started_at),
      completed_at: Some(completed_at),
      jobs: results,
    };

    ctx.on_workflow_completed(result.clone()).await;

    result
  }
}

fn skipped_result(job: &Job) -> JobRunResult {
  JobRunResult {
    id: job.id.clone(),
    state: WorkflowState::Skipped,
    started_at: None,
    completed_at: None,
    steps: vec![],
  }
}

fn aggregate_state(results: &HashMap<Id, JobRunResult>) -> WorkflowState {
  fn severity(state: &WorkflowState) -> u8 {
    match state {
      WorkflowState::Cancelled => 3,
      WorkflowState::TimedOut => 2,
      WorkflowState::Failed => 1,
      _ => 0,
    }
  }

  let mut state = WorkflowState::Succeeded;

  let mut all_skipped = !results.is_empty();
  for result in results.values() {
    if result.state != WorkflowState::Skipped {
      all_skipped = false;
    }

    if severity(&result.state) > severity(&state) {
      state = result.state.clone();
    }
  }

  if all_skipped {
    WorkflowState::Skipped
  } else {
    state
  }
}
