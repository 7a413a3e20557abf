use super::{job::Job, Step, Workflow};
use crate::{
  Actions, CacheOptions, CheckoutOptions, EnvironmentVariables, Error, Id, JobId, Result, StepId,
  StepPayload, UserActionStep, UserCommandStep, UserStep, UserWorkflow, WorkflowId,
};
use std::collections::HashMap;
use std::time::Duration;

// GitHub-style default ceilings: six hours per job, one hour per step
const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(6 * 60 * 60);
const DEFAULT_STEP_TIMEOUT: &str = "60m";

pub struct WorkflowParser {
  pub id: Id,
  pub user_workflow: UserWorkflow,
  pub actions: Actions,
}

impl WorkflowParser {
  pub fn parse(self) -> Result<Workflow> {
    let id = self.id;
    let actions = self.actions;
    let user_workflow = self.user_workflow;

    let mut jobs = HashMap::new();
    for (key, job) in user_workflow.jobs {
      let job_env = job.env;
      let job_runs_on = job.runs_on;
      let job_timeout = Self::parse_job_timeout(job.timeout_minutes, job.timeout)?;

      let user_steps = Self::normalize_steps(&actions, job.steps)?;

      let mut steps = Vec::new();
      for (idx, step) in user_steps.into_iter().enumerate() {
        let (name, on, continue_on_error, env, timeout, payload) = match step {
          UserStep::Command(UserCommandStep {
            name,
            run,
            on,
            continue_on_error,
            env,
            timeout,
          }) => (name, on, continue_on_error, env, timeout, StepPayload::Run(run)),
          UserStep::Action(action_step) => {
            let payload = Self::builtin_payload(&action_step)?;
            let UserActionStep {
              name,
              on,
              continue_on_error,
              env,
              timeout,
              ..
            } = action_step;
            (name, on, continue_on_error, env, timeout, payload)
          }
        };

        steps.push(Step {
          id: StepId::new(id.clone(), key.clone(), idx),
          name,
          on,
          runs_on: job_runs_on.clone(),
          payload,
          continue_on_error: continue_on_error.unwrap_or(false),
          env: Self::merge_env(&job_env, env),
          timeout: Self::parse_step_timeout(timeout)?,
        });
      }

      jobs.insert(
        key.clone(),
        Job {
          id: JobId::new(id.clone(), key.clone()),
          name: job.name,
          on: job.on,
          runs_on: job_runs_on,
          timeout: job_timeout,
          steps,
          depends_on: job.depends_on.unwrap_or_default(),
        },
      );
    }

    Ok(Workflow {
      id: WorkflowId::new(id),
      name: user_workflow.name,
      on: user_workflow.on,
      jobs,
    })
  }

  /// Resolve `uses:` steps through the action registry. Registered actions
  /// expand into pre/run/post steps; `post` steps are deferred to the end of
  /// the job, in reverse declaration order. Unresolved action steps fall
  /// through to the built-in `checkout` / `cache` payloads.
  fn normalize_steps(actions: &Actions, steps: Vec<UserStep>) -> Result<Vec<UserStep>> {
    let mut user_steps = Vec::new();
    let mut post_steps = Vec::new();

    for step in steps {
      match step {
        UserStep::Command(_) => user_steps.push(step),
        UserStep::Action(action_step) => {
          if let Some(normalized) = actions.try_normalize(action_step.clone())? {
            if let Some(pre) = normalized.pre {
              user_steps.push(pre);
            }
            user_steps.push(normalized.run);
            if let Some(post) = normalized.post {
              post_steps.push(post);
            }
          } else {
            user_steps.push(UserStep::Action(action_step));
          }
        }
      }
    }

    user_steps.extend(post_steps.into_iter().rev());

    Ok(user_steps)
  }

  fn builtin_payload(step: &UserActionStep) -> Result<StepPayload> {
    match step.action_name() {
      "checkout" => {
        let options: CheckoutOptions = match &step.with {
          Some(with) => serde_yaml::from_value(with.clone()).map_err(|err| {
            Error::workflow_config_error(format!("Invalid checkout parameters: {}", err))
          })?,
          None => CheckoutOptions::default(),
        };

        Ok(StepPayload::Checkout(options))
      }
      "cache" => {
        let with = step.with.clone().ok_or_else(|| {
          Error::workflow_config_error("The cache action requires `with` parameters")
        })?;

        let options: CacheOptions = serde_yaml::from_value(with).map_err(|err| {
          Error::workflow_config_error(format!("Invalid cache parameters: {}", err))
        })?;

        if options.path.is_empty() {
          return Err(Error::workflow_config_error(
            "The cache action requires at least one path",
          ));
        }

        if options.key.prefix.is_empty() {
          return Err(Error::workflow_config_error(
            "The cache action requires a non-empty key prefix",
          ));
        }

        Ok(StepPayload::Cache(options))
      }
      name => Err(Error::unsupported_feature(format!(
        "Action `{}` is not registered",
        name
      ))),
    }
  }

  fn parse_job_timeout(minutes: Option<u64>, timeout: Option<String>) -> Result<Duration> {
    if let Some(minutes) = minutes {
      return Ok(Duration::from_secs(minutes * 60));
    }

    match timeout {
      Some(timeout) => humantime::parse_duration(&timeout).map_err(|err| {
        log::error!("Invalid timeout format: {}", err);
        Error::workflow_config_error("Invalid timeout format. The format should like `60m` or `1h`.")
      }),
      None => Ok(DEFAULT_JOB_TIMEOUT),
    }
  }

  fn parse_step_timeout(timeout: Option<String>) -> Result<Duration> {
    let timeout = timeout.unwrap_or_else(|| DEFAULT_STEP_TIMEOUT.to_string());

    humantime::parse_duration(&timeout).map_err(|err| {
      log::error!("Invalid timeout format: {}", err);
      Error::workflow_config_error("Invalid timeout format. The format should like `60m` or `1h`.")
    })
  }

  fn merge_env(
    job_env: &EnvironmentVariables,
    step_env: EnvironmentVariables,
  ) -> EnvironmentVariables {
    let mut env = job_env.clone();
    env.extend(step_env);
    env
  }
}
