//! `playtest` binary.
//!
//! Composition root for batch playtesting: reads configuration from the
//! environment (and a `.env` file), installs logging, then runs one of:
//!
//! - `run`: simulate a batch of agents on a level and print their summaries
//! - `heatmap`: aggregate a recorded session into tile counts
//!
//! ```bash
//! playtest run --level demo --agents 8 --simultaneous --format json
//! playtest heatmap --session session_1762685005 --tile-width 2
//! ```

mod commands;
mod config;
mod dirs;
mod logging;

use anyhow::Result;
use clap::Parser;

use commands::{HeatmapCmd, Run};
use config::CliConfig;

/// Synthetic playtesting for level designs
#[derive(Parser)]
#[command(name = "playtest")]
#[command(about = "Run heuristic playtester agents through levels", long_about = None)]
#[command(version)]
struct Cli {
    /// Session identifier for logs and recordings (default: timestamp)
    #[arg(long, global = true, value_name = "SESSION_ID")]
    session_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a batch of agents
    Run(Run),

    /// Aggregate recorded paths into a heatmap
    Heatmap(HeatmapCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = CliConfig::from_env();
    if cli.session_id.is_some() {
        config.session_id = cli.session_id;
    }
    let session_id = config
        .session_id
        .clone()
        .unwrap_or_else(dirs::new_session_id);

    let _guard = logging::setup_logging(&session_id)?;

    match cli.command {
        Command::Run(cmd) => cmd.execute(config, session_id).await,
        Command::Heatmap(cmd) => cmd.execute(config),
    }
}
