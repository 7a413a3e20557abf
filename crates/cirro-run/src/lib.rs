mod actions;
mod cirro_run;
mod execution_context;
mod plugin;
mod runner;
mod shared_state;
mod signal;
mod stream;
mod types;
mod user_config;
mod workflow;

pub use crate::cirro_run::*;
pub use actions::*;
pub use async_trait::async_trait;
pub use execution_context::*;
pub use plugin::*;
pub use runner::*;
pub use shared_state::*;
pub use signal::*;
pub use stream::*;
pub use types::*;
pub use user_config::*;
pub use workflow::*;

pub type Result<T> = std::result::Result<T, Error>;
