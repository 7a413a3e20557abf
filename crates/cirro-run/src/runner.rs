use crate::{
  stream::StreamReceiver, Context, JobRunResult, RunJobEvent, RunStepEvent, RunWorkflowEvent,
  StepRunResult, WorkflowLog, WorkflowLogType, WorkflowRunResult, WorkflowStateEvent,
};
pub use tokio_stream::{Stream, StreamExt};

#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
  Succeeded,
  Failed { exit_code: i32 },
  /// The step exceeded a wall-clock ceiling and was terminated; reported
  /// distinctly from a plain failure
  TimedOut,
  Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Log {
  pub log_type: WorkflowLogType,
  pub message: String,
}

impl Log {
  pub fn log(message: impl Into<String>) -> Self {
    Self {
      log_type: WorkflowLogType::Log,
      message: message.into(),
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      log_type: WorkflowLogType::Error,
      message: message.into(),
    }
  }

  pub fn is_error(&self) -> bool {
    self.log_type == WorkflowLogType::Error
  }
}

pub type RunResponse = crate::Result<StreamReceiver>;

pub type HookNoopResult = crate::Result<()>;

/// # Runner
/// The `Runner` trait is the seam between the engine and whatever actually
/// executes steps. Implement `run` to execute one step and return a stream of
/// its logs; the stream ends with a [`RunResult`].
///
/// The engine fires `ctx.signal` on cancellation or when a timeout elapses;
/// a runner must terminate the in-flight step and end the stream with
/// `RunResult::Cancelled` or `RunResult::TimedOut` accordingly.
///
/// ## Example
///
/// ```rust
/// struct Runner;
///
/// #[cirro_run::async_trait]
/// impl cirro_run::Runner for Runner {
///   async fn run(&self, ctx: cirro_run::Context) -> cirro_run::RunResponse {
///     let (tx, rx) = cirro_run::stream();
///
///     tokio::task::spawn(async move {
///       if let cirro_run::StepPayload::Run(run) = ctx.command.payload {
///         tx.log(run);
///       }
///
///       tx.end(cirro_run::RunResult::Succeeded);
///     });
///
///     Ok(rx)
///   }
/// }
/// ```
#[async_trait::async_trait]
pub trait Runner: Send + Sync {
  async fn on_run_workflow(&self, _event: RunWorkflowEvent) -> HookNoopResult {
    Ok(())
  }
  async fn on_run_job(&self, _event: RunJobEvent) -> HookNoopResult {
    Ok(())
  }
  async fn on_run_step(&self, _event: RunStepEvent) -> HookNoopResult {
    Ok(())
  }
  async fn on_step_completed(&self, _result: StepRunResult) -> HookNoopResult {
    Ok(())
  }
  async fn on_job_completed(&self, _result: JobRunResult) -> HookNoopResult {
    Ok(())
  }
  async fn on_workflow_completed(&self, _result: WorkflowRunResult) -> HookNoopResult {
    Ok(())
  }
  async fn on_state_change(&self, _event: WorkflowStateEvent) -> HookNoopResult {
    Ok(())
  }
  async fn on_log(&self, _log: WorkflowLog) -> HookNoopResult {
    Ok(())
  }
  async fn run(&self, ctx: Context) -> RunResponse;
}
