//! Perception, memory and heuristic decision engine for synthetic playtesters.
//!
//! `playtest-core` is pure and synchronous. Each [`Agent::step`] runs
//! perception, memory ingestion, utility scoring and navigation planning in a
//! fixed order against a [`SimContext`] (clock, config, shared catalog and
//! weight table) and an [`Env`] of oracles supplied by the caller. Randomness
//! comes from an injected [`RandomSource`], so a seed reproduces a run.
pub mod agent;
pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod heuristics;
pub mod memory;
pub mod perception;
pub mod planner;
pub mod scoring;
pub mod state;

pub use agent::{Agent, AgentTuning, StepOutcome};
pub use config::SimConfig;
pub use context::{SimClock, SimContext};
pub use env::{
    Aabb, COMPASS, Env, LevelGeometry, NavMeshOracle, PcgRng, RandomSource, SimEnv, SpatialOracle,
    compute_seed,
};
pub use error::{ConfigError, ErrorSeverity, NavigationError, PlaytestError};
pub use heuristics::{
    EntityWeight, ExperienceMode, Heuristic, HeuristicProfile, HeuristicRange, HeuristicScale,
    HeuristicWeightSet, ProfileMode, WeightTable,
};
pub use memory::{EntityMemory, ExploreMemory, IngestReport, MemoryStore};
pub use perception::perceive;
pub use planner::{
    MemoryGraph, NavigationPlanner, NavigationTarget, PlanRequest, PlannerPhase, Route, RouteKind,
    SearchFailure, SearchPath, astar,
};
pub use scoring::{
    Candidate, CandidateSource, EndgameStatus, ScoredCandidate, UtilityEngine, gather_candidates,
    select_target,
};
pub use state::{
    AgentId, AgentPose, EntityCatalog, EntityId, EntityType, LevelEntity, Omniscience,
    PerceivedEntity, PerceivedInfo, Vec3,
};
