mod host;

pub use host::HostExecutor;

use cirro_run::{Context, Result, StreamSender, TriggerEvent};

#[cirro_run::async_trait]
pub trait Executor: Send + Sync {
  async fn execute(
    &self,
    ctx: Context,
    sender: StreamSender,
    event: Option<TriggerEvent>,
  ) -> Result<()>;
}
