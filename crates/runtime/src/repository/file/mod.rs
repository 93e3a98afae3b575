//! File-based repository implementations.

mod log;
mod reader;

// Append-only log repository (generic implementation)
pub use log::FileRepository;
pub use reader::RecordReader;

use crate::events::LogRecord;

/// File-based episode event log.
pub type FileEventLog = FileRepository<LogRecord>;
