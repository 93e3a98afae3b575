//! Episode and batch orchestration for synthetic playtesters.
//!
//! This crate drives `playtest-core` agents through levels: it supplies the
//! concrete oracles, runs each agent's tick loop, records what happens and
//! reads the recordings back for analysis. Consumers build a [`BatchRunner`]
//! and call [`BatchRunner::run`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the batch orchestrator and builder
//! - [`api`] exposes the error types downstream clients interact with
//! - [`events`] defines log records and the sinks/bus they flow through
//! - [`workers`] keeps the per-episode tick loop internal to the crate
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
//! - [`telemetry`] loads finished logs and aggregates heatmaps
pub mod api;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod telemetry;

mod workers;

pub use api::{Result, RuntimeError};
pub use events::{EpisodeHeader, LogRecord, LogSink, NavCommand, NullSink, RecordBus, RecordKind, RecordPayload};
pub use oracle::{GridNavMesh, OracleManager};
pub use repository::{FileEventLog, FileRepository, InMemoryLog, RecordReader, RepositoryError};
pub use runtime::{BatchBuilder, BatchReport, BatchRunner, MAX_SIMULTANEOUS_AGENTS, RuntimeConfig};
pub use telemetry::{Heatmap, LogKey, PathPoint, PlayerLog, TelemetryReader};
pub use workers::{AbortSignal, Episode, EpisodeOutcome, EpisodeSetup, EpisodeSummary};
