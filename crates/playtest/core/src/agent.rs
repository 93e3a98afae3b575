//! One synthetic playtester and its per-tick pipeline.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::SimConfig;
use crate::context::SimContext;
use crate::env::{Env, NavMeshOracle, RandomSource, SpatialOracle};
use crate::heuristics::HeuristicProfile;
use crate::memory::MemoryStore;
use crate::perception::perceive;
use crate::planner::{NavigationPlanner, NavigationTarget, PlanRequest, PlannerPhase};
use crate::scoring::{EndgameStatus, ScoredCandidate, UtilityEngine, gather_candidates, select_target};
use crate::state::{AgentId, AgentPose, EntityId};

/// Per-agent knobs fixed at spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentTuning {
    pub perception_range: f32,
    /// Short-term memory capacity.
    pub memory_capacity: usize,
    pub memory_nav_chance: f32,
}

impl AgentTuning {
    /// Draws the memory capacity and maps `experience` onto the
    /// memory-navigation chance.
    pub fn sample<R: RandomSource + ?Sized>(config: &SimConfig, experience: f32, rng: &mut R) -> Self {
        Self {
            perception_range: config.perception_range,
            memory_capacity: rng.range_usize(config.mem_capacity_min, config.mem_capacity_max),
            memory_nav_chance: config.memory_nav_chance_for(experience),
        }
    }
}

impl From<&SimConfig> for AgentTuning {
    fn from(config: &SimConfig) -> Self {
        Self {
            perception_range: config.perception_range,
            memory_capacity: config.mem_capacity_max,
            memory_nav_chance: config.memory_nav_chance,
        }
    }
}

/// Result of one [`Agent::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub phase: PlannerPhase,
    pub target: NavigationTarget,
    /// Candidate chosen this step, when a plan ran and something scored positive.
    pub selected: Option<ScoredCandidate>,
    /// Whether the planner ran this step (it is throttled while routing).
    pub planned: bool,
    pub newly_visited: Vec<EntityId>,
    pub completion_reached: bool,
}

#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    pub pose: AgentPose,
    profile: HeuristicProfile,
    tuning: AgentTuning,
    memory: MemoryStore,
    planner: NavigationPlanner,
    visited: BTreeSet<EntityId>,
}

impl Agent {
    pub fn new(id: AgentId, pose: AgentPose, profile: HeuristicProfile, tuning: AgentTuning) -> Self {
        Self {
            id,
            pose,
            profile,
            memory: MemoryStore::new(tuning.memory_capacity),
            tuning,
            planner: NavigationPlanner::new(),
            visited: BTreeSet::new(),
        }
    }

    /// Starts from previously gathered knowledge instead of an empty store.
    #[must_use]
    pub fn with_memory(mut self, memory: MemoryStore) -> Self {
        self.memory = memory;
        self
    }

    pub fn profile(&self) -> &HeuristicProfile {
        &self.profile
    }

    pub fn tuning(&self) -> &AgentTuning {
        &self.tuning
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn planner(&self) -> &NavigationPlanner {
        &self.planner
    }

    /// Every entity this agent has passed close to, including forgotten ones.
    pub fn visited(&self) -> &BTreeSet<EntityId> {
        &self.visited
    }

    pub fn is_done(&self) -> bool {
        self.planner.is_complete()
    }

    /// Marks the episode finished (budget exhausted or aborted).
    pub fn finish(&mut self) {
        self.planner.complete();
    }

    /// Perception, memory ingestion, utility scoring and planning, in that
    /// order. The clock in `ctx` must already be advanced for this tick.
    pub fn step<S, N, R>(&mut self, ctx: &SimContext, env: Env<'_, S, N>, rng: &mut R) -> StepOutcome
    where
        S: SpatialOracle + ?Sized,
        N: NavMeshOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        if self.planner.is_complete() {
            return self.outcome(None, false, Vec::new(), true);
        }
        let config = ctx.config();
        let position = self.pose.position;

        self.planner.set_phase(PlannerPhase::Perceiving);
        let perceived = perceive(ctx, self.pose, self.tuning.perception_range, env.spatial());

        let report = self
            .memory
            .ingest(&perceived.entities, position, ctx.dt(), config, rng);
        self.visited.extend(report.newly_visited.iter().copied());

        let completion_reached = ctx.catalog().completion_goal().is_some_and(|goal| {
            position.ground_distance_squared(goal.position) <= config.visit_threshold_sqr
        });
        if completion_reached {
            if let Some(goal) = ctx.catalog().completion_goal() {
                self.visited.insert(goal.id);
            }
            info!(agent = %self.id, tick = ctx.clock.tick, time = ctx.now(), "completion goal reached");
            self.planner.complete();
            return self.outcome(None, false, report.newly_visited, true);
        }

        self.planner.advance(position, config);
        if !self.planner.should_plan(ctx.now(), config) {
            let phase = self.planner.routing_phase();
            self.planner.set_phase(phase);
            return self.outcome(None, false, report.newly_visited, false);
        }

        self.planner.set_phase(PlannerPhase::Scoring);
        let candidates = gather_candidates(&perceived, &self.memory, &self.visited);
        let endgame = EndgameStatus::evaluate(ctx.catalog(), &self.visited, &candidates);
        let engine = UtilityEngine::new(&self.profile, ctx.weights(), config);
        let scored = engine.rank(&candidates, &endgame);
        let selected = select_target(
            &scored,
            position,
            self.planner.previous_target(),
            config.heuristic_epsilon,
        );
        debug!(
            agent = %self.id,
            tick = ctx.clock.tick,
            candidates = candidates.len(),
            selected = ?selected.map(|s| s.id()),
            utility = selected.map(|s| s.utility),
            "scored"
        );

        let request = PlanRequest {
            config,
            now: ctx.now(),
            position,
            facing: self.pose.facing,
            memory_nav_chance: self.tuning.memory_nav_chance,
            nav_directions: &perceived.nav_directions,
        };
        self.planner
            .plan(request, selected, &mut self.memory, env, rng);

        self.outcome(selected, true, report.newly_visited, false)
    }

    fn outcome(
        &self,
        selected: Option<ScoredCandidate>,
        planned: bool,
        newly_visited: Vec<EntityId>,
        completion_reached: bool,
    ) -> StepOutcome {
        StepOutcome {
            phase: self.planner.phase(),
            target: self.planner.target(),
            selected,
            planned,
            newly_visited,
            completion_reached,
        }
    }
}
