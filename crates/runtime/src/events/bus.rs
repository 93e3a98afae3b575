//! Kind-based broadcast of log records to live observers.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::sink::LogSink;
use super::types::{LogRecord, RecordKind};
use crate::repository::Result;

/// Broadcasts records to subscribers of their [`RecordKind`].
///
/// Delivery is best-effort: a kind without subscribers drops its records,
/// and slow subscribers see `Lagged` from their receiver.
#[derive(Clone)]
pub struct RecordBus {
    channels: Arc<[broadcast::Sender<LogRecord>; RecordKind::COUNT]>,
}

impl RecordBus {
    /// Creates a bus with default capacity for each kind.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a bus with the given capacity per kind.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RecordKind::ALL.map(|_| broadcast::channel(capacity).0)),
        }
    }

    pub fn publish(&self, record: LogRecord) {
        let kind = record.kind();
        if self.channels[kind.as_index()].send(record).is_err() {
            tracing::trace!(%kind, "no subscribers");
        }
    }

    /// Receiver for records of one kind only.
    pub fn subscribe(&self, kind: RecordKind) -> broadcast::Receiver<LogRecord> {
        self.channels[kind.as_index()].subscribe()
    }
}

impl Default for RecordBus {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for RecordBus {
    fn record(&mut self, record: &LogRecord) -> Result<()> {
        self.publish(record.clone());
        Ok(())
    }
}
