//! Content loaders for reading playtest data from files.
//!
//! Each loader turns one RON/TOML file into the `playtest-core` (or
//! [`crate::level`]) type the runtime consumes.

pub mod config;
pub mod factory;
pub mod level;
pub mod population;
pub mod weights;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use level::LevelLoader;
pub use population::PopulationLoader;
pub use weights::WeightsLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
