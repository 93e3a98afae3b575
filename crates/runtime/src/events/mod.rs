//! Episode event log: record types, sinks and a live broadcast bus.

mod bus;
mod sink;
mod types;

pub use bus::RecordBus;
pub use sink::{LogSink, NullSink};
pub use types::{EpisodeHeader, LogRecord, NavCommand, RecordKind, RecordPayload};
