//! Generic A* over integer-indexed graphs.
//!
//! Shared by the remembered-path search and the runtime's grid navmesh.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

/// Open-set entry ordered by `(f ASC, node ASC)`; wrapped in `Reverse` so the
/// heap pops the smallest first.
#[derive(Clone, Copy, Debug, PartialEq)]
struct OpenNode {
    f: f32,
    node: usize,
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Result of a successful search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchPath {
    /// Nodes from start to goal, both included.
    pub nodes: Vec<usize>,
    pub cost: f32,
}

impl SearchPath {
    /// Number of edges on the path.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Why a search returned nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchFailure {
    Unreachable,
    Exhausted { limit: usize },
}

/// A* from `start` to `goal`.
///
/// `neighbors(n)` yields `(next, edge_cost)`; `heuristic(n)` must not
/// overestimate the remaining cost. Gives up after `max_expansions` pops.
pub fn astar<FN, FH, I>(
    start: usize,
    goal: usize,
    mut neighbors: FN,
    heuristic: FH,
    max_expansions: usize,
) -> Result<SearchPath, SearchFailure>
where
    FN: FnMut(usize) -> I,
    I: IntoIterator<Item = (usize, f32)>,
    FH: Fn(usize) -> f32,
{
    let mut open = BinaryHeap::new();
    let mut g_score: HashMap<usize, f32> = HashMap::new();
    let mut came_from: HashMap<usize, usize> = HashMap::new();

    g_score.insert(start, 0.0);
    open.push(Reverse(OpenNode {
        f: heuristic(start),
        node: start,
    }));

    let mut expansions = 0;
    while let Some(Reverse(OpenNode { f, node })) = open.pop() {
        let g = g_score.get(&node).copied().unwrap_or(f32::INFINITY);
        // stale entry, a cheaper route was queued later
        if f > g + heuristic(node) + 1e-4 {
            continue;
        }
        if node == goal {
            let mut nodes = vec![goal];
            let mut cursor = goal;
            while let Some(&prev) = came_from.get(&cursor) {
                nodes.push(prev);
                cursor = prev;
            }
            nodes.reverse();
            return Ok(SearchPath { nodes, cost: g });
        }

        expansions += 1;
        if expansions > max_expansions {
            return Err(SearchFailure::Exhausted {
                limit: max_expansions,
            });
        }

        for (next, cost) in neighbors(node) {
            let tentative = g + cost;
            if tentative < g_score.get(&next).copied().unwrap_or(f32::INFINITY) {
                g_score.insert(next, tentative);
                came_from.insert(next, node);
                open.push(Reverse(OpenNode {
                    f: tentative + heuristic(next),
                    node: next,
                }));
            }
        }
    }

    Err(SearchFailure::Unreachable)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 - 1 - 2 - 3, plus a costly shortcut 0 - 3
    fn line(node: usize) -> Vec<(usize, f32)> {
        match node {
            0 => vec![(1, 1.0), (3, 10.0)],
            1 => vec![(0, 1.0), (2, 1.0)],
            2 => vec![(1, 1.0), (3, 1.0)],
            3 => vec![(2, 1.0), (0, 10.0)],
            _ => vec![],
        }
    }

    #[test]
    fn finds_cheapest_route() {
        let path = astar(0, 3, line, |_| 0.0, 100).unwrap();
        assert_eq!(path.nodes, vec![0, 1, 2, 3]);
        assert_eq!(path.hops(), 3);
        assert!((path.cost - 3.0).abs() < 1e-6);
    }

    #[test]
    fn start_equals_goal_is_zero_hops() {
        let path = astar(2, 2, line, |_| 0.0, 100).unwrap();
        assert_eq!(path.hops(), 0);
    }

    #[test]
    fn disconnected_goal_is_unreachable() {
        assert_eq!(astar(0, 9, line, |_| 0.0, 100), Err(SearchFailure::Unreachable));
    }

    #[test]
    fn expansion_limit_is_reported() {
        assert_eq!(
            astar(0, 3, line, |_| 0.0, 1),
            Err(SearchFailure::Exhausted { limit: 1 })
        );
    }
}
