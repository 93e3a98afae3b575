//! Static walkable-space description of a level.

use super::SpatialOracle;
use crate::state::Vec3;

/// Axis-aligned box on the ground plane (`y` ignored).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: Vec3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Vec3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    pub fn extents(&self) -> Vec3 {
        Vec3::new(
            (self.max.x - self.min.x) * 0.5,
            (self.max.y - self.min.y) * 0.5,
            (self.max.z - self.min.z) * 0.5,
        )
    }

    /// Whether the ground-plane segment `a -> b` touches the box (slab test).
    pub fn intersects_segment(&self, a: Vec3, b: Vec3) -> bool {
        let mut t_min = 0.0f32;
        let mut t_max = 1.0f32;
        for (start, delta, lo, hi) in [
            (a.x, b.x - a.x, self.min.x, self.max.x),
            (a.z, b.z - a.z, self.min.z, self.max.z),
        ] {
            if delta.abs() <= f32::EPSILON {
                if start < lo || start > hi {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / delta;
            let (t0, t1) = {
                let t0 = (lo - start) * inv;
                let t1 = (hi - start) * inv;
                if t0 <= t1 { (t0, t1) } else { (t1, t0) }
            };
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

/// Level bounds plus solid obstacles.
///
/// Anything inside `bounds` and outside every obstacle is walkable and
/// visible.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelGeometry {
    pub bounds: Aabb,
    #[cfg_attr(feature = "serde", serde(default))]
    pub obstacles: Vec<Aabb>,
}

impl LevelGeometry {
    pub fn new(bounds: Aabb, obstacles: Vec<Aabb>) -> Self {
        Self { bounds, obstacles }
    }

    /// An open rectangle with no obstacles.
    pub fn open(bounds: Aabb) -> Self {
        Self::new(bounds, Vec::new())
    }

    pub fn is_walkable(&self, point: Vec3) -> bool {
        self.bounds.contains(point) && !self.obstacles.iter().any(|o| o.contains(point))
    }

    /// Straight segment stays inside bounds and misses every obstacle.
    pub fn is_clear(&self, from: Vec3, to: Vec3) -> bool {
        self.bounds.contains(from)
            && self.bounds.contains(to)
            && !self.obstacles.iter().any(|o| o.intersects_segment(from, to))
    }
}

impl SpatialOracle for LevelGeometry {
    fn is_visible(&self, from: Vec3, to: Vec3) -> bool {
        !self.obstacles.iter().any(|o| o.intersects_segment(from, to))
    }

    fn is_reachable(&self, from: Vec3, to: Vec3) -> bool {
        self.is_clear(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> Aabb {
        Aabb::new(Vec3::new(4.0, 0.0, -5.0), Vec3::new(5.0, 2.0, 5.0))
    }

    #[test]
    fn segment_through_box_is_blocked() {
        assert!(wall().intersects_segment(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn segment_beside_box_is_clear() {
        assert!(!wall().intersects_segment(Vec3::new(0.0, 0.0, 6.0), Vec3::new(10.0, 0.0, 6.0)));
        assert!(!wall().intersects_segment(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn geometry_clear_respects_bounds() {
        let geometry = LevelGeometry::new(
            Aabb::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 0.0, 10.0)),
            vec![wall()],
        );
        assert!(geometry.is_clear(Vec3::ZERO, Vec3::new(0.0, 0.0, 8.0)));
        assert!(!geometry.is_clear(Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0)));
        assert!(!geometry.is_clear(Vec3::ZERO, Vec3::new(0.0, 0.0, 20.0)));
    }

    #[test]
    fn walls_trim_compass_directions() {
        let geometry = LevelGeometry::new(
            Aabb::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 0.0, 10.0)),
            vec![wall()],
        );
        let dirs = geometry.nav_directions(Vec3::ZERO, 6.0);
        // east plus both eastern diagonals cross the wall
        assert_eq!(dirs.len(), 5);
        assert!(!dirs.contains(&Vec3::new(1.0, 0.0, 0.0)));
        assert!(dirs.contains(&Vec3::new(-1.0, 0.0, 0.0)));
    }
}
