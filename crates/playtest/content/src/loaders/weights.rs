//! Heuristic weight table loader.

use std::path::Path;

use playtest_core::WeightTable;

use crate::loaders::{LoadResult, read_file};

/// Loader for the `heuristic x entity type` weight table.
///
/// The file is a list of weight sets, one per heuristic. A list that does
/// not cover every heuristic exactly once loads as an all-zero table (with a
/// warning) instead of failing.
pub struct WeightsLoader;

impl WeightsLoader {
    pub fn load(path: &Path) -> LoadResult<WeightTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<WeightTable> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse weights RON: {}", e))
    }
}
