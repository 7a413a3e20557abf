use crate::{
  cache::LocalCacheStore,
  cirro_runner::{PendingCache, SharedPendingCaches},
  command::Command,
  executors::Executor,
  metadata::Metadata,
  utils::{copy_recursively, PathBufTryToString},
};
use cirro_run::{
  CacheOptions, CheckoutOptions, Context, Error, Result, StepPayload, StreamSender, TriggerEvent,
};
use std::path::PathBuf;
use tokio::fs;

pub struct HostExecutor {
  pub(crate) working_directory: PathBuf,
  pub(crate) cache_store: LocalCacheStore,
  pub(crate) pending_caches: SharedPendingCaches,
}

#[cirro_run::async_trait]
impl Executor for HostExecutor {
  async fn execute(
    &self,
    ctx: Context,
    sender: StreamSender,
    event: Option<TriggerEvent>,
  ) -> Result<()> {
    if ctx.signal.is_cancelled() || ctx.signal.is_timeout() {
      log::trace!("Step run has been completed before it started");
      return Ok(());
    }

    let metadata = Metadata::builder()
      .runner_working_directory(self.working_directory.clone())
      .step_id(ctx.command.id.clone())
      .build();

    fs::create_dir_all(&metadata.job_data_directory).await?;

    match ctx.command.payload.clone() {
      StepPayload::Run(run) => self.run_command(run, &ctx, &sender, &metadata).await?,
      StepPayload::Checkout(options) => {
        self
          .checkout(options, event.as_ref(), &sender, &metadata)
          .await?
      }
      StepPayload::Cache(options) => {
        self.restore_cache(options, &ctx, &sender, &metadata).await?
      }
    }

    log::trace!("Step run finished");

    Ok(())
  }
}

impl HostExecutor {
  async fn run_command(
    &self,
    run: String,
    ctx: &Context,
    sender: &StreamSender,
    metadata: &Metadata,
  ) -> Result<()> {
    let mut command = Command::new(run);

    command.dir(&metadata.job_data_directory);

    for (key, value) in &ctx.command.env {
      command.env(key, value.to_string());
    }

    command.run(sender.clone(), ctx.signal.clone()).await
  }

  /// Materialize the repository into the job workspace. Local paths are
  /// copied; anything else goes through `git clone`.
  async fn checkout(
    &self,
    options: CheckoutOptions,
    event: Option<&TriggerEvent>,
    sender: &StreamSender,
    metadata: &Metadata,
  ) -> Result<()> {
    let repository = options
      .repository
      .or_else(|| event.map(|event| event.repository.clone()))
      .ok_or_else(|| {
        Error::workflow_config_error(
          "Checkout requires a repository, and the run has no trigger event to take one from",
        )
      })?;

    let source = PathBuf::from(&repository);
    let target = metadata.job_data_directory.clone();

    if source.is_dir() {
      tokio::task::spawn_blocking(move || copy_recursively(&source, &target))
        .await
        .map_err(|err| Error::internal_runtime_error(format!("Checkout task failed: {}", err)))??;
    } else {
      let target = target.to_string()?;

      Command::new(format!("git clone {} {}", repository, target))
        .exec()
        .await?;

      if let Some(reference) = &options.reference {
        Command::new(format!("git -C {} checkout {}", target, reference))
          .exec()
          .await?;
      }
    }

    sender.log(format!("Checked out {}", repository));
    sender.succeeded();

    Ok(())
  }

  /// Restore the declared paths and queue the save that runs when the job
  /// completes successfully. A cold cache logs the miss and proceeds.
  async fn restore_cache(
    &self,
    options: CacheOptions,
    ctx: &Context,
    sender: &StreamSender,
    metadata: &Metadata,
  ) -> Result<()> {
    let key = options.key.resolve(&metadata.job_data_directory)?;

    let restored = self
      .cache_store
      .restore(
        &key,
        &options.restore_keys,
        &options.path,
        &metadata.job_data_directory,
      )
      .await?;

    match restored {
      Some(matched_key) => {
        sender.log(format!("Cache restored from key {}", matched_key));
      }
      None => {
        sender.log(format!(
          "Cache not found for key {}, continuing without it",
          key
        ));
      }
    }

    let job_id = ctx.command.id.job_id();
    self
      .pending_caches
      .lock()
      .entry(job_id)
      .or_default()
      .push(PendingCache {
        key,
        paths: options.path.clone(),
        workspace: metadata.job_data_directory.clone(),
      });

    sender.succeeded();

    Ok(())
  }
}
