//! Agent population loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::population::PopulationSpec;

/// Loader for [`PopulationSpec`] RON files.
pub struct PopulationLoader;

impl PopulationLoader {
    pub fn load(path: &Path) -> LoadResult<PopulationSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<PopulationSpec> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse population RON: {}", e))
    }
}
