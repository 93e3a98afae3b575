//! Post-hoc analysis of recorded episodes.
//!
//! [`TelemetryReader`] turns episode logs back into [`PlayerLog`] paths and
//! [`Heatmap`] bins them over the level.

mod heatmap;
mod reader;

pub use heatmap::{Heatmap, MAX_LEVELS, MAX_TILES};
pub use reader::{InteractionPoint, LogKey, PathPoint, PlayerLog, TelemetryReader};
