//! In-memory event log implementation.

use std::sync::{Arc, RwLock};

use crate::events::{LogRecord, LogSink, RecordKind};
use crate::repository::{RepositoryError, Result};

/// In-memory event log for tests and live inspection.
///
/// Clones share the same storage, so one clone can be handed to an episode
/// while another reads the records afterwards.
#[derive(Clone, Default)]
pub struct InMemoryLog {
    records: Arc<RwLock<Vec<LogRecord>>>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record so far.
    pub fn records(&self) -> Result<Vec<LogRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.clone())
    }

    pub fn of_kind(&self, kind: RecordKind) -> Result<Vec<LogRecord>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|record| record.kind() == kind)
            .collect())
    }
}

impl LogSink for InMemoryLog {
    fn record(&mut self, record: &LogRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.push(record.clone());
        Ok(())
    }
}
