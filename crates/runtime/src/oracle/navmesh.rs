//! Uniform-grid navigation mesh over [`LevelGeometry`].
use std::f32::consts::SQRT_2;
use std::sync::Arc;

use playtest_core::{
    LevelGeometry, NavMeshOracle, NavigationError, SearchFailure, Vec3, astar,
};
use tracing::trace;

/// Walkable cells of the level baked into a grid, searched with A*.
///
/// A straight, unobstructed request skips the search. Otherwise the cell
/// path is string-pulled so agents walk straight lines between corners.
pub struct GridNavMesh {
    geometry: Arc<LevelGeometry>,
    cell: f32,
    origin: Vec3,
    cols: usize,
    rows: usize,
    walkable: Vec<bool>,
}

const STEPS: [(isize, isize); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

impl GridNavMesh {
    pub const DEFAULT_CELL_SIZE: f32 = 1.0;

    pub fn new(geometry: Arc<LevelGeometry>, cell_size: f32) -> Self {
        let cell = if cell_size > 0.0 { cell_size } else { Self::DEFAULT_CELL_SIZE };
        let bounds = geometry.bounds;
        let span = bounds.max - bounds.min;
        let cols = ((span.x / cell).ceil() as usize).max(1);
        let rows = ((span.z / cell).ceil() as usize).max(1);

        let mut mesh = Self {
            origin: bounds.min,
            geometry,
            cell,
            cols,
            rows,
            walkable: Vec::new(),
        };
        mesh.walkable = (0..cols * rows)
            .map(|index| mesh.geometry.is_walkable(mesh.center(index)))
            .collect();
        trace!(cols, rows, cell, "baked grid navmesh");
        mesh
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn cell_of(&self, point: Vec3) -> Option<usize> {
        if !self.geometry.bounds.contains(point) {
            return None;
        }
        let col = (((point.x - self.origin.x) / self.cell) as usize).min(self.cols - 1);
        let row = (((point.z - self.origin.z) / self.cell) as usize).min(self.rows - 1);
        Some(row * self.cols + col)
    }

    fn center(&self, index: usize) -> Vec3 {
        let col = (index % self.cols) as f32;
        let row = (index / self.cols) as f32;
        Vec3::new(
            self.origin.x + (col + 0.5) * self.cell,
            0.0,
            self.origin.z + (row + 0.5) * self.cell,
        )
    }

    fn offset(&self, index: usize, dc: isize, dr: isize) -> Option<usize> {
        let col = (index % self.cols).checked_add_signed(dc)?;
        let row = (index / self.cols).checked_add_signed(dr)?;
        (col < self.cols && row < self.rows).then_some(row * self.cols + col)
    }

    /// 8-connected walkable neighbours; diagonals may not cut corners.
    fn neighbors(&self, index: usize, goal: usize) -> Vec<(usize, f32)> {
        let open = |cell: usize| cell == goal || self.walkable[cell];
        STEPS
            .iter()
            .filter_map(|&(dc, dr)| {
                let next = self.offset(index, dc, dr)?;
                if !open(next) {
                    return None;
                }
                if dc != 0 && dr != 0 {
                    let side_a = self.offset(index, dc, 0)?;
                    let side_b = self.offset(index, 0, dr)?;
                    if !(self.walkable[side_a] && self.walkable[side_b]) {
                        return None;
                    }
                    return Some((next, self.cell * SQRT_2));
                }
                Some((next, self.cell))
            })
            .collect()
    }

    /// Drops every intermediate point the agent can skip in a straight line.
    fn string_pull(&self, points: &[Vec3]) -> Vec<Vec3> {
        let mut pulled = Vec::new();
        let mut anchor = 0;
        while anchor + 1 < points.len() {
            let furthest = (anchor + 1..points.len())
                .rev()
                .find(|&candidate| self.geometry.is_clear(points[anchor], points[candidate]))
                .unwrap_or(anchor + 1);
            pulled.push(points[furthest]);
            anchor = furthest;
        }
        pulled
    }
}

impl NavMeshOracle for GridNavMesh {
    fn find_path(&self, from: Vec3, to: Vec3) -> Result<Vec<Vec3>, NavigationError> {
        if !self.geometry.is_walkable(from) {
            return Err(NavigationError::OffMesh(from));
        }
        if !self.geometry.is_walkable(to) {
            return Err(NavigationError::OffMesh(to));
        }
        if self.geometry.is_clear(from, to) {
            return Ok(vec![to]);
        }

        let start = self.cell_of(from).ok_or(NavigationError::OffMesh(from))?;
        let goal = self.cell_of(to).ok_or(NavigationError::OffMesh(to))?;
        let goal_center = self.center(goal);

        let path = astar(
            start,
            goal,
            |index| self.neighbors(index, goal),
            |index| self.center(index).distance(goal_center),
            self.walkable.len(),
        )
        .map_err(|failure| match failure {
            SearchFailure::Unreachable => NavigationError::NoPath { from, to },
            SearchFailure::Exhausted { limit } => NavigationError::SearchExhausted { limit },
        })?;

        let mut points = Vec::with_capacity(path.nodes.len() + 1);
        points.push(from);
        if let Some(inner) = path.nodes.get(1..path.nodes.len().saturating_sub(1)) {
            points.extend(inner.iter().map(|&index| self.center(index)));
        }
        points.push(to);

        let waypoints = self.string_pull(&points);
        trace!(cells = path.nodes.len(), waypoints = waypoints.len(), "navmesh path");
        Ok(waypoints)
    }
}
