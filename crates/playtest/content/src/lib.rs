//! Data-driven level content and loaders.
//!
//! This crate describes what a designer authors for a playtest batch and
//! reads it from RON/TOML files:
//! - Levels: entity placement, walkable geometry and the start pose (RON)
//! - Heuristic weight tables (RON)
//! - Agent populations: profile mode and experience (RON)
//! - Simulation tunables (TOML)
//!
//! Content is consumed by the runtime and never mutated by agents.

pub mod level;
pub mod population;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use level::LevelDefinition;
pub use population::PopulationSpec;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, LevelLoader, LoadResult, PopulationLoader, WeightsLoader,
};
