mod cache;
mod cirro_runner;
mod command;
mod executors;
mod metadata;
mod utils;

pub use cache::LocalCacheStore;
pub use cirro_runner::{CirroRunner, CirroRunnerBuilder};
pub use command::Command;
pub use executors::{Executor, HostExecutor};
