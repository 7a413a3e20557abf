use crate::{Condition, EnvironmentVariables, Error, Id, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UserCommandStep {
  pub name: Option<String>,
  pub run: String,
  pub on: Option<Condition>,
  #[serde(rename = "continue-on-error")]
  pub continue_on_error: Option<bool>,
  #[serde(default)]
  pub env: EnvironmentVariables,
  pub timeout: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UserActionStep {
  pub name: Option<String>,
  /// Action reference, optionally version-pinned: `checkout`, `cache@v1`
  pub uses: String,
  pub with: Option<serde_yaml::Value>,
  pub on: Option<Condition>,
  #[serde(rename = "continue-on-error")]
  pub continue_on_error: Option<bool>,
  #[serde(default)]
  pub env: EnvironmentVariables,
  pub timeout: Option<String>,
}

impl UserActionStep {
  /// Action name with the `@version` pin stripped
  pub fn action_name(&self) -> &str {
    self.uses.split('@').next().unwrap_or(&self.uses)
  }

  pub fn action_version(&self) -> Option<&str> {
    self.uses.split_once('@').map(|(_, version)| version)
  }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum UserStep {
  Command(UserCommandStep),
  Action(UserActionStep),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserJob {
  pub name: Option<String>,
  /// Requested execution environment class
  #[serde(rename = "runs-on")]
  pub runs_on: Option<String>,
  #[serde(rename = "timeout-minutes")]
  pub timeout_minutes: Option<u64>,
  pub timeout: Option<String>,
  #[serde(default)]
  pub env: EnvironmentVariables,
  pub steps: Vec<UserStep>,
  pub on: Option<Condition>,
  #[serde(rename = "depends-on")]
  pub depends_on: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserWorkflow {
  pub name: Option<String>,
  pub on: Option<Condition>,
  pub jobs: HashMap<Id, UserJob>,
}

impl UserWorkflow {
  fn validate(workflow: &UserWorkflow) -> Result<()> {
    if workflow.jobs.is_empty() {
      return Err(Error::workflow_config_error(
        "Workflow must have at least one job",
      ));
    }

    let mut is_all_jobs_has_dependencies = true;
    // Validate dependencies key in jobs
    for (job_name, job) in &workflow.jobs {
      if let Some(depends_on) = &job.depends_on {
        if !depends_on.is_empty() {
          for depend_job_key in depends_on {
            if !workflow.jobs.contains_key(depend_job_key) {
              return Err(Error::workflow_config_error(format!(
                "Job {} depends on job {}, but job {} is not defined",
                job_name, depend_job_key, depend_job_key
              )));
            }
          }
        } else {
          is_all_jobs_has_dependencies = false;
        }
      } else {
        is_all_jobs_has_dependencies = false;
      }

      if job.steps.is_empty() {
        return Err(Error::workflow_config_error(format!(
          "Job `{}` must have at least one step",
          job_name
        )));
      }

      if job.timeout_minutes.is_some() && job.timeout.is_some() {
        return Err(Error::workflow_config_error(format!(
          "Job `{}` declares both `timeout-minutes` and `timeout`",
          job_name
        )));
      }

      if job.timeout_minutes == Some(0) {
        return Err(Error::workflow_config_error(format!(
          "Job `{}` declares a zero `timeout-minutes`",
          job_name
        )));
      }
    }

    if is_all_jobs_has_dependencies {
      return Err(Error::workflow_config_error(
        "Cannot have all jobs has dependencies",
      ));
    }

    Ok(())
  }
}

impl TryFrom<&str> for UserWorkflow {
  type Error = Error;

  fn try_from(value: &str) -> Result<Self> {
    let workflow = serde_yaml::from_str(value)
      .map_err(|e| Error::workflow_config_error(format!("Failed to parse workflow: {}", e)))?;

    Self::validate(&workflow)?;

    Ok(workflow)
  }
}

impl TryFrom<String> for UserWorkflow {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> {
    Self::try_from(value.as_str())
  }
}
