//! Per-agent memory: time-decayed entity memories plus explored directions.
mod entity;
mod explore;
mod store;

pub use entity::EntityMemory;
pub use explore::ExploreMemory;
pub use store::{IngestReport, MemoryStore};
