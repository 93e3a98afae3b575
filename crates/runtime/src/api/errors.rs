//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from repositories, worker coordination, configuration and
//! telemetry so clients can bubble them up with consistent context.

use thiserror::Error;

use playtest_core::ConfigError;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("episode worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("level '{level}' has no completion goal")]
    MissingCompletionGoal { level: String },

    #[error("invalid simulation config")]
    Config(#[from] ConfigError),

    #[error("batch needs at least one agent")]
    EmptyBatch,

    #[error("heatmap tile width {0} is not positive or makes the grid too large")]
    InvalidTileWidth(f32),
}
