//! In-memory repository implementations for testing and development.

mod log;

pub use log::InMemoryLog;
