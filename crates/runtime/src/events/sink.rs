//! Destinations for event-log records.

use crate::events::LogRecord;
use crate::repository::Result;

/// Anything that wants to observe an episode's records.
///
/// The episode runner writes every record to exactly one sink; combine sinks
/// with a tuple `(a, b)` to fan out.
pub trait LogSink: Send {
    fn record(&mut self, record: &LogRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn record(&mut self, _record: &LogRecord) -> Result<()> {
        Ok(())
    }
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn record(&mut self, record: &LogRecord) -> Result<()> {
        (**self).record(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn record(&mut self, record: &LogRecord) -> Result<()> {
        (**self).record(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<A: LogSink, B: LogSink> LogSink for (A, B) {
    fn record(&mut self, record: &LogRecord) -> Result<()> {
        self.0.record(record)?;
        self.1.record(record)
    }

    fn flush(&mut self) -> Result<()> {
        self.0.flush()?;
        self.1.flush()
    }
}
