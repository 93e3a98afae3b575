mod heatmap;
mod run;

pub use heatmap::HeatmapCmd;
pub use run::Run;

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Summary,
    /// Full JSON output
    Json,
}
