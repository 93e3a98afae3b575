//! Simulation configuration loader.

use std::path::Path;

use playtest_core::SimConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for simulation tunables from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`SimConfig`] from a TOML file.
    ///
    /// Fields the file leaves out keep their defaults. The result is validated
    /// before it is returned.
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<SimConfig> {
        let config: SimConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("perception_range = 35.0\nmax_ticks = 100\n").unwrap();
        assert_eq!(config.perception_range, 35.0);
        assert_eq!(config.max_ticks, 100);
        assert_eq!(config.impression_convert_ltm, SimConfig::IMPRESSION_CONVERT_LTM);
        assert_eq!(config.final_goal_bonus_factor, SimConfig::FINAL_GOAL_BONUS_FACTOR);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = ConfigLoader::parse("forget_time_min = 40.0\nforget_time_max = 10.0\n").unwrap_err();
        assert!(err.to_string().contains("forget_time"));
    }
}
