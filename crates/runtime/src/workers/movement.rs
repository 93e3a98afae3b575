//! Moves an agent along its navigation target.

use playtest_core::{AgentPose, NavigationTarget};

/// Constant-speed steering toward the next point of a [`NavigationTarget`].
///
/// The agent never overshoots: a tick that would pass the next point stops on
/// it, and the planner crosses the waypoint on the following step.
#[derive(Debug, Clone, Copy)]
pub struct MovementExecutor {
    speed: f32,
}

impl MovementExecutor {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Advances `pose` for `dt` seconds and returns the distance covered.
    pub fn step(&self, pose: &mut AgentPose, target: &NavigationTarget, dt: f32) -> f32 {
        let Some(next) = target.next_point() else {
            return 0.0;
        };
        let offset = (next - pose.position).flat();
        let remaining = offset.length();
        let Some(direction) = offset.normalized() else {
            return 0.0;
        };

        let travelled = (self.speed * dt).min(remaining);
        pose.position = pose.position + direction * travelled;
        pose.facing = direction;
        travelled
    }
}

#[cfg(test)]
mod tests {
    use playtest_core::Vec3;

    use super::*;

    #[test]
    fn walks_at_speed_and_faces_the_target() {
        let mover = MovementExecutor::new(4.0);
        let mut pose = AgentPose::at(Vec3::ZERO);
        let target = NavigationTarget::Waypoints(vec![Vec3::new(10.0, 0.0, 0.0)]);

        let travelled = mover.step(&mut pose, &target, 0.5);
        assert!((travelled - 2.0).abs() < 1e-5);
        assert!((pose.position.x - 2.0).abs() < 1e-5);
        assert!(pose.facing.distance(Vec3::new(1.0, 0.0, 0.0)) < 1e-6);
    }

    #[test]
    fn stops_on_the_waypoint() {
        let mover = MovementExecutor::new(4.0);
        let mut pose = AgentPose::at(Vec3::ZERO);
        let destination = Vec3::new(0.0, 0.0, 1.0);
        let target = NavigationTarget::Point {
            destination,
            path: vec![destination],
        };

        let travelled = mover.step(&mut pose, &target, 1.0);
        assert!((travelled - 1.0).abs() < 1e-5);
        assert!(pose.position.distance(destination) < 1e-5);
    }

    #[test]
    fn hold_keeps_the_pose() {
        let mover = MovementExecutor::new(4.0);
        let mut pose = AgentPose::at(Vec3::new(3.0, 0.0, 3.0));
        assert_eq!(mover.step(&mut pose, &NavigationTarget::Hold, 1.0), 0.0);
        assert_eq!(pose, AgentPose::at(Vec3::new(3.0, 0.0, 3.0)));
    }
}
