//! Graph of remembered places for memory-routed paths.

use super::astar::{SearchPath, astar};
use crate::env::SpatialOracle;
use crate::memory::MemoryStore;
use crate::state::Vec3;

const START: usize = 0;
const GOAL: usize = 1;

/// Start, goal and every remembered position. Two nodes are linked when they
/// are within `link_radius` and mutually reachable.
pub struct MemoryGraph<'a, S: SpatialOracle + ?Sized> {
    nodes: Vec<Vec3>,
    link_radius_sqr: f32,
    spatial: &'a S,
}

impl<'a, S: SpatialOracle + ?Sized> MemoryGraph<'a, S> {
    pub fn build(memory: &MemoryStore, start: Vec3, goal: Vec3, link_radius: f32, spatial: &'a S) -> Self {
        let mut nodes = vec![start, goal];
        let remembered = memory
            .entities()
            .iter()
            .filter(|record| !record.entity.bearing_only)
            .map(|record| record.position())
            .chain(
                memory
                    .explores()
                    .iter()
                    .flat_map(|explore| [explore.origin, explore.endpoint()]),
            );
        for position in remembered {
            // collapse duplicates so a place reinforced twice is one node
            if !nodes.iter().any(|node| node.distance_squared(position) <= 1e-4) {
                nodes.push(position);
            }
        }
        Self {
            nodes,
            link_radius_sqr: link_radius * link_radius,
            spatial,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn neighbors(&self, node: usize) -> Vec<(usize, f32)> {
        let here = self.nodes[node];
        self.nodes
            .iter()
            .enumerate()
            .filter(|&(other, &there)| {
                other != node
                    && here.ground_distance_squared(there) <= self.link_radius_sqr
                    && self.spatial.is_reachable(here, there)
            })
            .map(|(other, &there)| (other, here.distance(there)))
            .collect()
    }

    /// Remembered waypoints from start to goal (start excluded, goal last)
    /// and the hop count, or `None` when memory does not connect them.
    pub fn shortest_path(&self) -> Option<(Vec<Vec3>, usize)> {
        let goal = self.nodes[GOAL];
        let path: SearchPath = astar(
            START,
            GOAL,
            |node| self.neighbors(node),
            |node| self.nodes[node].distance(goal),
            self.nodes.len() * self.nodes.len(),
        )
        .ok()?;
        let hops = path.hops();
        let waypoints = path.nodes.iter().skip(1).map(|&index| self.nodes[index]).collect();
        Some((waypoints, hops))
    }
}
