//! Content factory for loading a playtest batch from a data directory.

use std::path::{Path, PathBuf};

use playtest_core::{SimConfig, WeightTable};

use crate::level::LevelDefinition;
use crate::loaders::{ConfigLoader, LevelLoader, LoadResult, PopulationLoader, WeightsLoader};
use crate::population::PopulationSpec;

/// Content factory that loads all playtest content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── weights.ron
/// ├── population.ron
/// └── levels/
///     ├── demo.ron
///     └── corridor.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load simulation tunables from `config.toml`.
    ///
    /// A missing file means "all defaults"; a present but invalid file is an
    /// error.
    pub fn load_config(&self) -> LoadResult<SimConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(SimConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the heuristic weight table from `weights.ron`.
    pub fn load_weights(&self) -> LoadResult<WeightTable> {
        let path = self.data_dir.join("weights.ron");
        WeightsLoader::load(&path)
    }

    /// Load the agent population from `population.ron`, falling back to the
    /// default population when the file is absent.
    pub fn load_population(&self) -> LoadResult<PopulationSpec> {
        let path = self.data_dir.join("population.ron");
        if !path.exists() {
            return Ok(PopulationSpec::default());
        }
        PopulationLoader::load(&path)
    }

    /// Load a level from `levels/{level_name}.ron`.
    pub fn load_level(&self, level_name: &str) -> LoadResult<LevelDefinition> {
        let path = self
            .data_dir
            .join("levels")
            .join(format!("{}.ron", level_name));
        LevelLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
