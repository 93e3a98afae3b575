//! Run a batch of synthetic playtesters over one level.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use playtest_content::ContentFactory;
use playtest_runtime::{BatchReport, BatchRunner, RuntimeConfig};

use super::OutputFormat;
use crate::config::CliConfig;
use crate::dirs;

/// Run a batch of agents and print their episode summaries
#[derive(Parser)]
pub struct Run {
    /// Level name, loaded from `<data-dir>/levels/<LEVEL>.ron`
    #[arg(short, long, value_name = "LEVEL")]
    level: Option<String>,

    /// Content directory holding config, weights, population and levels
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Number of agents (one episode each)
    #[arg(short = 'n', long)]
    agents: Option<u32>,

    /// Run agents concurrently (at most 8 at a time)
    #[arg(short, long)]
    simultaneous: bool,

    /// Batch seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Root directory for episode logs (defaults to platform-specific location)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Skip writing episode logs
    #[arg(long)]
    no_logs: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Run {
    pub async fn execute(self, config: CliConfig, session_id: String) -> Result<()> {
        let data_dir = self.data_dir.unwrap_or(config.data_dir);
        let level_name = self.level.unwrap_or(config.level);
        let factory = ContentFactory::new(&data_dir);

        let sim = factory.load_config()?;
        let weights = factory.load_weights()?;
        let population = factory.load_population()?;
        let level = factory.load_level(&level_name)?;

        let output_dir = if self.no_logs {
            None
        } else {
            Some(
                self.output_dir
                    .or(config.output_dir)
                    .unwrap_or_else(dirs::recordings_dir),
            )
        };

        let runtime = RuntimeConfig {
            num_agents: self.agents.unwrap_or(config.agents),
            simultaneous: self.simultaneous || config.simultaneous,
            batch_seed: self.seed.or(config.seed),
            output_dir,
            session_id,
            ..RuntimeConfig::default()
        };
        info!(
            level = %level_name,
            data_dir = %data_dir.display(),
            agents = runtime.num_agents,
            simultaneous = runtime.simultaneous,
            "Starting batch"
        );

        let runner = BatchRunner::builder(level)
            .config(runtime)
            .sim_config(sim)
            .weights(weights)
            .population(population)
            .build()
            .context("invalid batch setup")?;

        let abort = runner.abort_signal();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; stopping episodes");
                abort.abort();
            }
        });

        let report = runner.run().await?;
        if let Some(dir) = runner.config().session_dir() {
            info!("Episode logs: {}", dir.display());
        }

        match self.format {
            OutputFormat::Summary => print_summary(&report),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }
        Ok(())
    }
}

fn print_summary(report: &BatchReport) {
    println!(
        "session {} | level {} | seed {}",
        report.session_id, report.level, report.batch_seed
    );
    println!(
        "{:>7}  {:>6}  {:<16}  {:>6}  {:>8}  {:>8}  {:>7}",
        "episode", "agent", "outcome", "ticks", "time", "distance", "visited"
    );
    for episode in &report.episodes {
        println!(
            "{:>7}  {:>6}  {:<16}  {:>6}  {:>7.1}s  {:>8.1}  {:>7}",
            episode.episode,
            episode.agent.0,
            episode.outcome.as_ref(),
            episode.ticks,
            episode.sim_time,
            episode.distance,
            episode.visited.len()
        );
    }
    println!(
        "completed {}/{} ({:.0}%)",
        report.completed(),
        report.episodes.len(),
        report.completion_rate() * 100.0
    );
}
