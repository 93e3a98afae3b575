use crate::state::{EntityId, Vec3};

/// What the movement executor should follow.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavigationTarget {
    /// Stay where you are until the next plan.
    Hold,
    /// Navmesh-routed destination with the mesh path still ahead, destination last.
    Point { destination: Vec3, path: Vec<Vec3> },
    /// Memory-routed waypoints still ahead, destination last.
    Waypoints(Vec<Vec3>),
}

impl NavigationTarget {
    /// Next point to steer toward, if any.
    pub fn next_point(&self) -> Option<Vec3> {
        match self {
            NavigationTarget::Hold => None,
            NavigationTarget::Point { destination, path } => path.first().copied().or(Some(*destination)),
            NavigationTarget::Waypoints(points) => points.first().copied(),
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self, NavigationTarget::Hold)
    }
}

/// How a route was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RouteKind {
    /// Chain of remembered places.
    Memory,
    /// Fresh navmesh query toward a scored entity.
    NavMesh,
    /// Explore pseudo-target.
    Explore,
}

/// A committed route with a cursor over its waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub kind: RouteKind,
    /// Entity being pursued, `None` for explore legs.
    pub target: Option<EntityId>,
    pub goal: Vec3,
    waypoints: Vec<Vec3>,
    cursor: usize,
}

impl Route {
    pub fn new(kind: RouteKind, target: Option<EntityId>, goal: Vec3, waypoints: Vec<Vec3>) -> Self {
        let waypoints = if waypoints.is_empty() { vec![goal] } else { waypoints };
        Self {
            kind,
            target,
            goal,
            waypoints,
            cursor: 0,
        }
    }

    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.cursor).copied()
    }

    pub fn remaining(&self) -> &[Vec3] {
        &self.waypoints[self.cursor.min(self.waypoints.len())..]
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.waypoints.len()
    }

    /// Crosses every waypoint within `epsilon_sqr` of `position`, in order.
    ///
    /// Returns the number of waypoints crossed.
    pub fn advance(&mut self, position: Vec3, epsilon_sqr: f32) -> usize {
        let start = self.cursor;
        while let Some(point) = self.current() {
            if position.ground_distance_squared(point) > epsilon_sqr {
                break;
            }
            self.cursor += 1;
        }
        self.cursor - start
    }

    /// Two destinations closer than `epsilon_sqr` are the same.
    pub fn leads_to(&self, goal: Vec3, epsilon_sqr: f32) -> bool {
        self.goal.ground_distance_squared(goal) <= epsilon_sqr
    }

    pub fn as_target(&self) -> NavigationTarget {
        if self.is_finished() {
            return NavigationTarget::Hold;
        }
        match self.kind {
            RouteKind::Memory => NavigationTarget::Waypoints(self.remaining().to_vec()),
            RouteKind::NavMesh | RouteKind::Explore => NavigationTarget::Point {
                destination: self.goal,
                path: self.remaining().to_vec(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waypoints_cross_within_epsilon() {
        let mut route = Route::new(
            RouteKind::Memory,
            None,
            Vec3::new(0.0, 0.0, 10.0),
            vec![Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 10.0)],
        );
        assert_eq!(route.advance(Vec3::new(0.0, 0.0, 3.0), 1.0), 0);
        assert_eq!(route.advance(Vec3::new(0.0, 0.0, 4.5), 1.0), 1);
        assert_eq!(route.current(), Some(Vec3::new(0.0, 0.0, 10.0)));
        assert_eq!(route.advance(Vec3::new(0.0, 0.0, 9.9), 1.0), 1);
        assert!(route.is_finished());
        assert!(route.as_target().is_hold());
    }

    #[test]
    fn raised_waypoints_cross_on_the_ground_plane() {
        let mut route = Route::new(
            RouteKind::Memory,
            None,
            Vec3::new(0.0, 3.0, 10.0),
            vec![Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 3.0, 10.0)],
        );
        assert_eq!(route.advance(Vec3::new(0.0, 0.0, 5.0), 1.0), 1);
        assert_eq!(route.advance(Vec3::new(0.0, 0.0, 10.0), 1.0), 1);
        assert!(route.is_finished());
        assert!(route.leads_to(Vec3::new(0.0, 0.0, 10.0), 0.1));
    }

    #[test]
    fn empty_waypoints_fall_back_to_goal() {
        let route = Route::new(RouteKind::NavMesh, None, Vec3::FORWARD, Vec::new());
        assert_eq!(route.current(), Some(Vec3::FORWARD));
    }

    #[test]
    fn near_goals_are_the_same_destination() {
        let route = Route::new(RouteKind::NavMesh, None, Vec3::ZERO, Vec::new());
        assert!(route.leads_to(Vec3::new(0.2, 0.0, 0.2), 0.1));
        assert!(!route.leads_to(Vec3::new(0.5, 0.0, 0.0), 0.1));
    }
}
