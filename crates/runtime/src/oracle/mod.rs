//! Runtime implementations of the `playtest-core` oracle traits.
//!
//! Level geometry answers visibility and reachability directly; path queries
//! go through a [`GridNavMesh`] baked from the same geometry. Both are
//! immutable for the life of a batch and shared by every episode.
mod navmesh;

use std::sync::Arc;

use playtest_content::LevelDefinition;
use playtest_core::{Env, LevelGeometry};

pub use navmesh::GridNavMesh;

/// Bundles the level's oracles and hands out [`Env`] views to agents.
#[derive(Clone)]
pub struct OracleManager {
    geometry: Arc<LevelGeometry>,
    navmesh: Arc<GridNavMesh>,
}

impl OracleManager {
    pub fn new(geometry: Arc<LevelGeometry>, cell_size: f32) -> Self {
        let navmesh = Arc::new(GridNavMesh::new(Arc::clone(&geometry), cell_size));
        Self { geometry, navmesh }
    }

    pub fn from_level(level: &LevelDefinition, cell_size: f32) -> Self {
        Self::new(Arc::new(level.geometry.clone()), cell_size)
    }

    pub fn as_env(&self) -> Env<'_, LevelGeometry, GridNavMesh> {
        Env::new(self.geometry.as_ref(), self.navmesh.as_ref())
    }

    pub fn geometry(&self) -> &LevelGeometry {
        &self.geometry
    }

    pub fn navmesh(&self) -> &GridNavMesh {
        &self.navmesh
    }
}
