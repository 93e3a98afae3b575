//! Visitation counts over a tile grid.

use playtest_core::{Aabb, Vec3};
use serde::Serialize;

use super::reader::PlayerLog;
use crate::api::{Result, RuntimeError};

/// Upper bound on distinct intensity levels.
pub const MAX_LEVELS: u32 = 10;

/// Largest grid accepted; finer tilings are rejected.
pub const MAX_TILES: usize = 1 << 22;

/// Path-point counts binned over the ground plane.
///
/// The grid is centred on the level extents and has an even number of tiles
/// along each axis, so it stays symmetric about that centre.
#[derive(Debug, Clone, Serialize)]
pub struct Heatmap {
    origin: Vec3,
    tile_width: f32,
    cols: usize,
    rows: usize,
    /// Row-major (`z` rows, `x` columns).
    counts: Vec<u32>,
}

impl Heatmap {
    pub fn new(extents: Aabb, tile_width: f32) -> Result<Self> {
        if tile_width.is_nan() || tile_width <= 0.0 {
            return Err(RuntimeError::InvalidTileWidth(tile_width));
        }
        let half = extents.extents();
        let (Some(cols), Some(rows)) = (
            tiles_across(half.x, tile_width),
            tiles_across(half.z, tile_width),
        ) else {
            return Err(RuntimeError::InvalidTileWidth(tile_width));
        };
        if cols.checked_mul(rows).is_none_or(|total| total > MAX_TILES) {
            return Err(RuntimeError::InvalidTileWidth(tile_width));
        }
        Ok(Self {
            origin: extents.center(),
            tile_width,
            cols,
            rows,
            counts: vec![0; cols * rows],
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    /// World-space corner of tile `(0, 0)`.
    pub fn min_corner(&self) -> Vec3 {
        let half_width = 0.5 * self.tile_width;
        Vec3::new(
            self.origin.x - self.cols as f32 * half_width,
            0.0,
            self.origin.z - self.rows as f32 * half_width,
        )
    }

    /// Tile containing `point`, if it falls on the grid.
    pub fn tile_of(&self, point: Vec3) -> Option<(usize, usize)> {
        let min = self.min_corner();
        let x = ((point.x - min.x) / self.tile_width).floor();
        let z = ((point.z - min.z) / self.tile_width).floor();
        if x < 0.0 || z < 0.0 {
            return None;
        }
        let (x, z) = (x as usize, z as usize);
        (x < self.cols && z < self.rows).then_some((x, z))
    }

    /// Recounts from scratch over `logs`.
    ///
    /// `included_only` skips logs whose `include` flag is off; `window_only`
    /// counts only samples inside each log's display window.
    pub fn accumulate(&mut self, logs: &[PlayerLog], included_only: bool, window_only: bool) {
        self.counts.fill(0);
        for log in logs {
            if included_only && !log.include {
                continue;
            }
            let points = if window_only { log.windowed() } else { &log.path[..] };
            for point in points {
                if let Some((x, z)) = self.tile_of(point.position) {
                    self.counts[z * self.cols + x] += 1;
                }
            }
        }
    }

    pub fn count(&self, x: usize, z: usize) -> u32 {
        if x >= self.cols || z >= self.rows {
            return 0;
        }
        self.counts[z * self.cols + x]
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Number of intensity levels: `min(10, max(max_count, 2))`.
    pub fn levels(&self) -> u32 {
        self.max_count().max(2).min(MAX_LEVELS)
    }

    /// Intensity level of `count`, in `0..=levels()`.
    pub fn level_of(&self, count: u32) -> u32 {
        let max = self.max_count();
        if max == 0 {
            return 0;
        }
        let levels = self.levels();
        let level = (count as f32 * levels as f32 / max as f32).round() as u32;
        level.min(levels)
    }
}

/// Even tile count covering `2 * half` along one axis.
fn tiles_across(half: f32, tile_width: f32) -> Option<usize> {
    let per_side = (f64::from(half) / f64::from(tile_width)).ceil();
    if !per_side.is_finite() || per_side > (MAX_TILES / 2) as f64 {
        return None;
    }
    (per_side as usize).checked_mul(2)
}
