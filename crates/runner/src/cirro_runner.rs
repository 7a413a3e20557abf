use crate::{
  cache::LocalCacheStore,
  executors::{Executor, HostExecutor},
};
use cirro_run::{
  stream, Context, Error, HookNoopResult, JobId, JobRunResult, Result, RunResponse, RunResult,
  Runner, WorkflowRunResult, WorkflowState,
};
use parking_lot::Mutex;
use std::{collections::HashMap, env, path::PathBuf, sync::Arc};

/// A cache restore that ran during the job; saved back on successful
/// completion if the exact key is still absent.
pub(crate) struct PendingCache {
  pub key: String,
  pub paths: Vec<String>,
  pub workspace: PathBuf,
}

pub(crate) type SharedPendingCaches = Arc<Mutex<HashMap<JobId, Vec<PendingCache>>>>;

#[derive(Clone)]
pub struct CirroRunner {
  working_directory: PathBuf,
  labels: Vec<String>,
  cache_store: LocalCacheStore,
  pending_caches: SharedPendingCaches,
}

impl CirroRunner {
  pub fn builder() -> CirroRunnerBuilder {
    CirroRunnerBuilder::new()
  }
}

#[cirro_run::async_trait]
impl Runner for CirroRunner {
  async fn run(&self, ctx: Context) -> RunResponse {
    // Provisioning check: a job may only run on an environment class this
    // runner carries as a label
    if let Some(runs_on) = &ctx.command.runs_on {
      if !self.labels.iter().any(|label| label == runs_on) {
        return Err(Error::unsupported_feature(format!(
          "This runner does not provide the `{}` environment. Available labels: {}",
          runs_on,
          self.labels.join(", ")
        )));
      }
    }

    let (sender, receiver) = stream();

    let executor = HostExecutor {
      working_directory: self.working_directory.clone(),
      cache_store: self.cache_store.clone(),
      pending_caches: Arc::clone(&self.pending_caches),
    };

    let event = ctx.event.clone();

    tokio::spawn(async move {
      if let Err(err) = executor.execute(ctx, sender.clone(), event).await {
        log::error!("CirroRunner: execute error: {}", err);
        sender.error(err.to_string());
      }

      if !sender.is_ended() {
        sender.end(RunResult::Failed { exit_code: 1 });
      }
    });

    Ok(receiver)
  }

  async fn on_job_completed(&self, result: JobRunResult) -> HookNoopResult {
    let pending = self.pending_caches.lock().remove(&result.id);

    let pending = match pending {
      Some(pending) => pending,
      None => return Ok(()),
    };

    // A failed, cancelled or timed-out build must not publish partial
    // artifacts into the shared store
    if result.state != WorkflowState::Succeeded {
      log::trace!(
        "Skipping cache save for job {} in state {:?}",
        result.id.to_string(),
        result.state
      );
      return Ok(());
    }

    for cache in pending {
      match self
        .cache_store
        .save(&cache.key, &cache.paths, &cache.workspace)
        .await
      {
        Ok(true) => log::info!("Saved cache entry {}", cache.key),
        Ok(false) => log::trace!("Cache entry {} already exists", cache.key),
        Err(err) => log::error!("Failed to save cache entry {}: {}", cache.key, err),
      }
    }

    Ok(())
  }

  async fn on_workflow_completed(&self, result: WorkflowRunResult) -> HookNoopResult {
    if let Err(err) = self.cleanup_workflow_working_directory(&result) {
      log::error!("CirroRunner: cleanup error: {}", err);
    }

    Ok(())
  }
}

impl CirroRunner {
  fn cleanup_workflow_working_directory(&self, result: &WorkflowRunResult) -> Result<()> {
    let directory = self.working_directory.join(result.id.inner());

    if directory.exists() {
      std::fs::remove_dir_all(directory)?;
    }

    Ok(())
  }
}

pub struct CirroRunnerBuilder {
  working_directory: Option<PathBuf>,
  labels: Vec<String>,
}

impl CirroRunnerBuilder {
  pub fn new() -> Self {
    Self {
      working_directory: None,
      labels: vec![],
    }
  }

  pub fn working_directory(mut self, working_directory: PathBuf) -> Self {
    self.working_directory = Some(working_directory);
    self
  }

  /// Additional environment-class label this runner serves, on top of the
  /// built-in `host`, `host/<os>` and `host/<os>-<arch>` labels
  pub fn label(mut self, label: impl Into<String>) -> Self {
    self.labels.push(label.into());
    self
  }

  pub fn build(self) -> Result<CirroRunner> {
    let working_directory = self.working_directory.map(Ok).unwrap_or_else(|| {
      #[allow(deprecated)]
      env::home_dir()
        .map(|home| home.join("cirro-run"))
        .ok_or_else(|| Error::init_error("CirroRunnerBuilder: working_directory is required"))
    })?;

    let os_name = std::env::consts::OS;
    let architecture = std::env::consts::ARCH;

    let mut labels = vec![
      "host".to_string(),
      format!("host/{}", os_name),
      format!("host/{}-{}", os_name, architecture),
    ];
    labels.extend(self.labels);

    let cache_store = LocalCacheStore::new(working_directory.join("caches"));

    let runner = CirroRunner {
      working_directory,
      labels,
      cache_store,
      pending_caches: Arc::new(Mutex::new(HashMap::new())),
    };

    Ok(runner)
  }
}

impl Default for CirroRunnerBuilder {
  fn default() -> Self {
    Self::new()
  }
}
