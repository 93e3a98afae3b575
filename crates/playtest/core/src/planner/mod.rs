//! Navigation planner.
//!
//! Turns the selected candidate into a [`Route`]: a remembered chain of
//! places when memory connects the agent to the goal (and the coin flip
//! agrees), otherwise a fresh navmesh query. Without a candidate, or when the
//! navmesh fails twice, the agent explores.
//!
//! Phases cycle `Idle -> Perceiving -> Scoring -> {MemoryRouting | LiveRouting}
//! -> Arriving -> Idle`; `EpisodeComplete` is terminal.
mod astar;
mod graph;
mod route;

pub use astar::{SearchFailure, SearchPath, astar};
pub use graph::MemoryGraph;
pub use route::{NavigationTarget, Route, RouteKind};

use tracing::{debug, warn};

use crate::config::SimConfig;
use crate::env::{Env, NavMeshOracle, RandomSource, SpatialOracle};
use crate::error::{NavigationError, PlaytestError};
use crate::memory::MemoryStore;
use crate::scoring::ScoredCandidate;
use crate::state::{EntityId, Vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PlannerPhase {
    #[default]
    Idle,
    Perceiving,
    Scoring,
    MemoryRouting,
    LiveRouting,
    Arriving,
    EpisodeComplete,
}

/// Inputs that stay fixed for one planning pass.
#[derive(Clone, Copy, Debug)]
pub struct PlanRequest<'a> {
    pub config: &'a SimConfig,
    pub now: f32,
    pub position: Vec3,
    pub facing: Vec3,
    /// Probability of taking a qualifying remembered path.
    pub memory_nav_chance: f32,
    pub nav_directions: &'a [Vec3],
}

#[derive(Clone, Debug, Default)]
pub struct NavigationPlanner {
    phase: PlannerPhase,
    route: Option<Route>,
    last_plan: Option<f32>,
    previous_target: Option<EntityId>,
}

impl NavigationPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PlannerPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: PlannerPhase) {
        if self.phase != PlannerPhase::EpisodeComplete {
            self.phase = phase;
        }
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn previous_target(&self) -> Option<EntityId> {
        self.previous_target
    }

    pub fn target(&self) -> NavigationTarget {
        self.route
            .as_ref()
            .map_or(NavigationTarget::Hold, Route::as_target)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == PlannerPhase::EpisodeComplete
    }

    /// Ends the episode; the planner drops its route and stays terminal.
    pub fn complete(&mut self) {
        self.route = None;
        self.phase = PlannerPhase::EpisodeComplete;
    }

    /// Crosses reached waypoints. A finished route passes through `Arriving`
    /// and is dropped so the next step plans again.
    pub fn advance(&mut self, position: Vec3, config: &SimConfig) -> bool {
        let Some(route) = self.route.as_mut() else {
            return false;
        };
        route.advance(position, config.waypoint_epsilon_sqr);
        if route.is_finished() {
            debug!(kind = %route.kind, target = ?route.target, "route finished");
            self.route = None;
            self.last_plan = None;
            self.set_phase(PlannerPhase::Arriving);
            return true;
        }
        false
    }

    /// Whether a new plan is due: no route, or the planning interval elapsed.
    pub fn should_plan(&self, now: f32, config: &SimConfig) -> bool {
        match (&self.route, self.last_plan) {
            (None, _) | (_, None) => true,
            (Some(_), Some(last)) => now - last >= config.planning_interval,
        }
    }

    /// Phase that matches the current route, used between plans.
    pub fn routing_phase(&self) -> PlannerPhase {
        match self.route.as_ref().map(|route| route.kind) {
            Some(RouteKind::Memory) => PlannerPhase::MemoryRouting,
            Some(RouteKind::NavMesh | RouteKind::Explore) => PlannerPhase::LiveRouting,
            None => PlannerPhase::Idle,
        }
    }

    /// Chooses and commits a route for the selected candidate.
    pub fn plan<S, N, R>(
        &mut self,
        request: PlanRequest<'_>,
        selection: Option<ScoredCandidate>,
        memory: &mut MemoryStore,
        env: Env<'_, S, N>,
        rng: &mut R,
    ) -> NavigationTarget
    where
        S: SpatialOracle + ?Sized,
        N: NavMeshOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.last_plan = Some(request.now);

        let committed = match selection {
            Some(selected) => self.route_to(request, selected, memory, env, rng),
            None => None,
        };

        match committed {
            Some(route) => self.commit(request, route, memory, rng),
            None => {
                self.previous_target = None;
                match self.explore(request, memory, env) {
                    Some(route) => self.commit(request, route, memory, rng),
                    None => {
                        debug!("nothing to pursue or explore; holding");
                        self.route = None;
                        self.set_phase(PlannerPhase::Idle);
                    }
                }
            }
        }

        self.target()
    }

    fn route_to<S, N, R>(
        &mut self,
        request: PlanRequest<'_>,
        selected: ScoredCandidate,
        memory: &MemoryStore,
        env: Env<'_, S, N>,
        rng: &mut R,
    ) -> Option<Route>
    where
        S: SpatialOracle + ?Sized,
        N: NavMeshOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        let config = request.config;
        let goal = selected.position();
        let target = Some(selected.id());

        let same_destination = self
            .route
            .as_ref()
            .filter(|current| current.target == target && current.leads_to(goal, config.goal_epsilon_sqr))
            .cloned();
        if same_destination.is_some() {
            self.previous_target = target;
            return same_destination;
        }

        let remembered = MemoryGraph::build(memory, request.position, goal, config.memory_link_radius, env.spatial())
            .shortest_path()
            .filter(|(_, hops)| *hops >= config.min_memory_path_length)
            .filter(|_| rng.chance(request.memory_nav_chance));
        if let Some((waypoints, hops)) = remembered {
            debug!(id = %selected.id(), hops, utility = selected.utility, "routing from memory");
            self.previous_target = target;
            return Some(Route::new(RouteKind::Memory, target, goal, waypoints));
        }

        match query_navmesh(env.navmesh(), request.position, goal) {
            Ok(path) => {
                debug!(id = %selected.id(), waypoints = path.len(), utility = selected.utility, "routing via navmesh");
                self.previous_target = target;
                Some(Route::new(RouteKind::NavMesh, target, goal, path))
            }
            Err(err) => {
                warn!(id = %selected.id(), error = %err, code = err.error_code(), "navmesh gave no route; exploring instead");
                None
            }
        }
    }

    /// Explore pseudo-target: an unexplored navigable direction closest to the
    /// current facing, else the stalest explore memory's endpoint.
    fn explore<S, N>(&self, request: PlanRequest<'_>, memory: &MemoryStore, env: Env<'_, S, N>) -> Option<Route>
    where
        S: SpatialOracle + ?Sized,
        N: NavMeshOracle + ?Sized,
    {
        let config = request.config;
        let here = request.position;
        let near_sqr = config.explore_probe_distance * config.explore_probe_distance;

        let explored = |direction: Vec3| {
            memory.explores().iter().any(|explore| {
                explore.origin.distance_squared(here) <= near_sqr
                    && explore.direction.angle_deg(direction) <= config.explore_deg_threshold
            })
        };
        let fresh = request
            .nav_directions
            .iter()
            .copied()
            .filter(|&direction| !explored(direction))
            .min_by(|a, b| {
                a.angle_deg(request.facing)
                    .total_cmp(&b.angle_deg(request.facing))
            });
        if let Some(direction) = fresh {
            let goal = here + direction * config.explore_probe_distance;
            debug!(%direction, "exploring new direction");
            return Some(Route::new(RouteKind::Explore, None, goal, vec![goal]));
        }

        let stalest = memory.stalest_explore()?;
        let goal = stalest.endpoint();
        match query_navmesh(env.navmesh(), here, goal) {
            Ok(path) => {
                debug!(%goal, "revisiting stalest explored leg");
                Some(Route::new(RouteKind::Explore, None, goal, path))
            }
            Err(err) => {
                debug!(error = %err, "stalest explore endpoint unreachable");
                None
            }
        }
    }

    fn commit<R>(&mut self, request: PlanRequest<'_>, route: Route, memory: &mut MemoryStore, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        let unchanged = self.route.as_ref() == Some(&route);
        if !unchanged {
            let leg = route.goal - request.position;
            memory.ingest_explore(request.position, leg, leg.flat().length(), request.config, rng);
        }
        self.phase = match route.kind {
            RouteKind::Memory => PlannerPhase::MemoryRouting,
            RouteKind::NavMesh | RouteKind::Explore => PlannerPhase::LiveRouting,
        };
        self.route = Some(route);
    }
}

/// One navmesh query plus a single retry when the failure is recoverable.
fn query_navmesh<N>(navmesh: &N, from: Vec3, to: Vec3) -> Result<Vec<Vec3>, NavigationError>
where
    N: NavMeshOracle + ?Sized,
{
    navmesh.find_path(from, to).or_else(|first| {
        if !first.severity().is_recoverable() {
            return Err(first);
        }
        debug!(error = %first, code = first.error_code(), "navmesh query failed; retrying once");
        navmesh.find_path(from, to)
    })
}
