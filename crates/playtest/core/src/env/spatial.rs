use crate::error::NavigationError;
use crate::state::Vec3;

/// Line-of-sight and reachability predicates over the level.
pub trait SpatialOracle: Send + Sync {
    /// Whether `to` can be seen from `from` (nothing solid in between).
    fn is_visible(&self, from: Vec3, to: Vec3) -> bool;

    /// Whether an agent at `from` can walk straight to `to`.
    fn is_reachable(&self, from: Vec3, to: Vec3) -> bool;

    /// Unit directions the agent can travel at least `probe` units along.
    ///
    /// Defaults to the eight compass directions probed for reachability.
    fn nav_directions(&self, from: Vec3, probe: f32) -> Vec<Vec3> {
        COMPASS
            .iter()
            .copied()
            .filter(|dir| self.is_reachable(from, from + *dir * probe))
            .collect()
    }
}

/// Path queries through the level's navigation mesh.
pub trait NavMeshOracle: Send + Sync {
    /// Ordered waypoints from `from` to `to`, ending at `to`.
    ///
    /// # Errors
    ///
    /// [`NavigationError`] when no path exists or either endpoint is off the mesh.
    fn find_path(&self, from: Vec3, to: Vec3) -> Result<Vec<Vec3>, NavigationError>;
}

const DIAG: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// The eight compass directions on the ground plane, clockwise from +z.
pub const COMPASS: [Vec3; 8] = [
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(DIAG, 0.0, DIAG),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(DIAG, 0.0, -DIAG),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(-DIAG, 0.0, -DIAG),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(-DIAG, 0.0, DIAG),
];
