//! Repository layer for episode logs.
//!
//! Repositories hold data produced while agents play:
//! - Append-only event logs, one file per episode
//! - In-memory logs for tests and live inspection
//!
//! Authored content (levels, weights, populations) comes from
//! `playtest-content`, not from repositories.

mod error;
mod file;
mod memory;

pub use error::{RepositoryError, Result};
pub use file::{FileEventLog, FileRepository, RecordReader};
pub use memory::InMemoryLog;
