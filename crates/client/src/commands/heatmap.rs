//! Aggregate recorded episode paths into a tile heatmap.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use playtest_content::ContentFactory;
use playtest_runtime::{Heatmap, TelemetryReader};

use super::OutputFormat;
use crate::config::CliConfig;
use crate::dirs;

/// Bin recorded agent positions over the level
#[derive(Parser)]
pub struct HeatmapCmd {
    /// Session to read (a directory under the recordings root)
    #[arg(short, long, value_name = "SESSION")]
    session: Option<String>,

    /// Read logs from this directory instead of a session
    #[arg(long, value_name = "DIR", conflicts_with = "session")]
    logs: Option<PathBuf>,

    /// Recordings root (defaults to platform-specific location)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Level whose bounds define the grid
    #[arg(short, long, value_name = "LEVEL")]
    level: Option<String>,

    /// Content directory holding the level files
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Tile edge length in level units
    #[arg(short, long, default_value = "1.0")]
    tile_width: f32,

    /// Only count samples at or after this many simulated seconds
    #[arg(long, value_name = "SECONDS")]
    from: Option<f32>,

    /// Only count samples at or before this many simulated seconds
    #[arg(long, value_name = "SECONDS")]
    to: Option<f32>,

    /// Leave these episodes out of the counts
    #[arg(long, value_name = "EPISODE", value_delimiter = ',')]
    exclude: Vec<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct HeatmapReport<'a> {
    logs: usize,
    included: usize,
    max_count: u32,
    levels: u32,
    heatmap: &'a Heatmap,
}

impl HeatmapCmd {
    pub fn execute(self, config: CliConfig) -> Result<()> {
        let log_dir = match (self.logs, self.session.or(config.session_id)) {
            (Some(dir), _) => dir,
            (None, Some(session)) => self
                .output_dir
                .or(config.output_dir)
                .unwrap_or_else(dirs::recordings_dir)
                .join(session),
            (None, None) => bail!("pass --session or --logs (or set PLAYTEST_SESSION_ID)"),
        };

        let mut logs = TelemetryReader::load_dir(&log_dir)
            .with_context(|| format!("failed to read logs in {}", log_dir.display()))?;
        if logs.is_empty() {
            bail!("no episode logs in {}", log_dir.display());
        }

        let level_name = self
            .level
            .or_else(|| logs.first().map(|log| log.level.clone()))
            .unwrap_or(config.level);
        let level = ContentFactory::new(self.data_dir.unwrap_or(config.data_dir))
            .load_level(&level_name)?;

        let window = self.from.is_some() || self.to.is_some();
        for log in &mut logs {
            log.include = !self.exclude.contains(&log.key.episode);
            if window {
                log.set_time_window(self.from.unwrap_or(0.0), self.to.unwrap_or(f32::INFINITY));
            }
        }

        let mut heatmap = Heatmap::new(level.extents(), self.tile_width)?;
        heatmap.accumulate(&logs, true, window);
        info!(
            logs = logs.len(),
            level = %level_name,
            max_count = heatmap.max_count(),
            "Heatmap aggregated"
        );

        match self.format {
            OutputFormat::Json => {
                let report = HeatmapReport {
                    logs: logs.len(),
                    included: logs.iter().filter(|log| log.include).count(),
                    max_count: heatmap.max_count(),
                    levels: heatmap.levels(),
                    heatmap: &heatmap,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Summary => print_grid(&heatmap),
        }
        Ok(())
    }
}

/// One character per tile, highest `z` row first; `.` is unvisited.
fn print_grid(heatmap: &Heatmap) {
    let (cols, rows) = heatmap.dimensions();
    println!(
        "{cols}x{rows} tiles of {} | max count {} | {} levels",
        heatmap.tile_width(),
        heatmap.max_count(),
        heatmap.levels()
    );
    for z in (0..rows).rev() {
        let line: String = (0..cols)
            .map(|x| match heatmap.count(x, z) {
                0 => '.',
                count => match heatmap.level_of(count) {
                    level @ 0..=9 => char::from(b'0' + level as u8),
                    _ => '#',
                },
            })
            .collect();
        println!("{line}");
    }
}
