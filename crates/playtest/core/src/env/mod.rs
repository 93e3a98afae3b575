//! Boundary with the external collaborators.
//!
//! The core never inspects level geometry directly. Visibility, reachability
//! and path queries go through the oracle traits here; [`Env`] bundles them so
//! the agent pipeline can be driven by any implementation (the runtime's grid
//! world, or a stub in tests).
mod level;
mod rng;
mod spatial;

pub use level::{Aabb, LevelGeometry};
pub use rng::{PcgRng, RandomSource, compute_seed};
pub use spatial::{COMPASS, NavMeshOracle, SpatialOracle};

/// Read-only oracles required by one agent step.
pub struct Env<'a, S, N>
where
    S: SpatialOracle + ?Sized,
    N: NavMeshOracle + ?Sized,
{
    spatial: &'a S,
    navmesh: &'a N,
}

pub type SimEnv<'a> = Env<'a, dyn SpatialOracle + 'a, dyn NavMeshOracle + 'a>;

impl<'a, S, N> Env<'a, S, N>
where
    S: SpatialOracle + ?Sized,
    N: NavMeshOracle + ?Sized,
{
    pub fn new(spatial: &'a S, navmesh: &'a N) -> Self {
        Self { spatial, navmesh }
    }

    pub fn spatial(&self) -> &'a S {
        self.spatial
    }

    pub fn navmesh(&self) -> &'a N {
        self.navmesh
    }
}

impl<S, N> Clone for Env<'_, S, N>
where
    S: SpatialOracle + ?Sized,
    N: NavMeshOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, N> Copy for Env<'_, S, N>
where
    S: SpatialOracle + ?Sized,
    N: NavMeshOracle + ?Sized,
{
}
