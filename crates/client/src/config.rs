//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Defaults for the `playtest` commands; command-line flags override them.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub level: String,
    pub session_id: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub agents: u32,
    pub simultaneous: bool,
    pub seed: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            level: "demo".to_string(),
            session_id: None,
            output_dir: None,
            agents: 1,
            simultaneous: false,
            seed: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PLAYTEST_DATA_DIR` - Content directory (default: `data`)
    /// - `PLAYTEST_LEVEL` - Level name under `levels/` (default: `demo`)
    /// - `PLAYTEST_SESSION_ID` - Session identifier (default: timestamp)
    /// - `PLAYTEST_OUTPUT_DIR` - Episode log directory (default: platform data dir)
    /// - `PLAYTEST_AGENTS` - Agents per batch (default: 1)
    /// - `PLAYTEST_SIMULTANEOUS` - Run agents concurrently (default: false)
    /// - `PLAYTEST_SEED` - Batch seed (default: random)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("PLAYTEST_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(level) = env::var("PLAYTEST_LEVEL") {
            config.level = level;
        }
        config.session_id = env::var("PLAYTEST_SESSION_ID").ok();
        config.output_dir = env::var("PLAYTEST_OUTPUT_DIR").ok().map(PathBuf::from);

        if let Some(agents) = read_env::<u32>("PLAYTEST_AGENTS") {
            config.agents = agents.max(1);
        }
        if let Some(simultaneous) = read_env::<bool>("PLAYTEST_SIMULTANEOUS") {
            config.simultaneous = simultaneous;
        } else if env::var("PLAYTEST_SIMULTANEOUS").is_ok() {
            // set without a value
            config.simultaneous = true;
        }
        config.seed = read_env::<u64>("PLAYTEST_SEED");

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
