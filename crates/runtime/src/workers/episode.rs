//! Single-agent episode: the tick loop from spawn to completion, budget or abort.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use playtest_core::{
    Agent, AgentId, AgentPose, AgentTuning, EntityId, Env, HeuristicProfile, NavMeshOracle,
    PcgRng, SimContext, SpatialOracle, Vec3,
};
use serde::Serialize;
use tracing::{debug, info, info_span};

use super::movement::MovementExecutor;
use crate::api::Result;
use crate::events::{EpisodeHeader, LogRecord, LogSink, NavCommand, RecordPayload};

/// Cooperative cancellation shared between a batch and its episodes.
///
/// Episodes check it once per tick, before doing any work for that tick.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EpisodeOutcome {
    /// The agent reached the completion goal.
    Completed,
    BudgetExhausted,
    Aborted,
}

/// Everything needed to spawn one agent.
#[derive(Debug, Clone)]
pub struct EpisodeSetup {
    pub level: String,
    pub episode: u32,
    pub seed: u64,
    pub agent: AgentId,
    pub start: AgentPose,
    pub profile: HeuristicProfile,
    pub tuning: AgentTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub agent: AgentId,
    pub seed: u64,
    pub outcome: EpisodeOutcome,
    pub ticks: u64,
    /// Simulated seconds.
    pub sim_time: f32,
    /// Entities passed close by, in id order.
    pub visited: Vec<EntityId>,
    pub distance: f32,
    pub final_position: Vec3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<PathBuf>,
}

/// One agent playing one level.
pub struct Episode {
    setup: EpisodeSetup,
    ctx: SimContext,
    agent: Agent,
    rng: PcgRng,
    movement: MovementExecutor,
    next_sample: f32,
    last_command: Option<NavCommand>,
    distance: f32,
}

impl Episode {
    pub fn new(setup: EpisodeSetup, ctx: SimContext) -> Self {
        let agent = Agent::new(setup.agent, setup.start, setup.profile.clone(), setup.tuning);
        let movement = MovementExecutor::new(ctx.config().agent_speed);
        Self {
            rng: PcgRng::seeded(setup.seed),
            setup,
            ctx,
            agent,
            movement,
            next_sample: 0.0,
            last_command: None,
            distance: 0.0,
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Runs ticks until the agent completes the level, the tick budget runs
    /// out or `abort` fires, writing every record to `sink`.
    pub fn run<S, N, K>(mut self, env: Env<'_, S, N>, sink: &mut K, abort: &AbortSignal) -> Result<EpisodeSummary>
    where
        S: SpatialOracle + ?Sized,
        N: NavMeshOracle + ?Sized,
        K: LogSink + ?Sized,
    {
        let span = info_span!(
            target: "runtime::episode",
            "episode",
            episode = self.setup.episode,
            agent = %self.agent.id
        );
        let _guard = span.enter();
        info!(target: "runtime::episode", seed = self.setup.seed, level = %self.setup.level, "episode started");

        let header = EpisodeHeader {
            level: self.setup.level.clone(),
            episode: self.setup.episode,
            seed: self.setup.seed,
            start: self.setup.start,
            profile: self.setup.profile.clone(),
            tuning: self.setup.tuning,
        };
        self.emit(sink, RecordPayload::Header(header))?;
        self.sample(sink)?;

        let outcome = loop {
            if abort.is_aborted() {
                break EpisodeOutcome::Aborted;
            }
            let dt = self.ctx.advance();
            let step = self.agent.step(&self.ctx, env, &mut self.rng);

            for &id in &step.newly_visited {
                self.interaction(sink, id)?;
            }
            if step.completion_reached {
                let goal = self
                    .ctx
                    .catalog()
                    .completion_goal()
                    .map(|goal| goal.id)
                    .filter(|id| !step.newly_visited.contains(id));
                if let Some(goal) = goal {
                    self.interaction(sink, goal)?;
                }
                break EpisodeOutcome::Completed;
            }

            let command = NavCommand::from(&step.target);
            if self.last_command != Some(command) {
                debug!(target: "runtime::episode", tick = self.ctx.clock.tick, ?command, phase = %step.phase, "new command");
                self.emit(
                    sink,
                    RecordPayload::Input {
                        command,
                        position: self.agent.pose.position,
                    },
                )?;
                self.last_command = Some(command);
            }

            self.distance += self.movement.step(&mut self.agent.pose, &step.target, dt);

            if self.ctx.now() >= self.next_sample {
                self.sample(sink)?;
            }
            if self.ctx.budget_exhausted() {
                break EpisodeOutcome::BudgetExhausted;
            }
        };

        self.agent.finish();
        self.emit(
            sink,
            RecordPayload::GameEvent {
                key: outcome.as_ref().to_string(),
                position: self.agent.pose.position,
            },
        )?;
        self.sample(sink)?;
        sink.flush()?;

        info!(
            target: "runtime::episode",
            %outcome,
            ticks = self.ctx.clock.tick,
            time = self.ctx.now(),
            visited = self.agent.visited().len(),
            distance = self.distance,
            "episode finished"
        );

        Ok(EpisodeSummary {
            episode: self.setup.episode,
            agent: self.agent.id,
            seed: self.setup.seed,
            outcome,
            ticks: self.ctx.clock.tick,
            sim_time: self.ctx.now(),
            visited: self.agent.visited().iter().copied().collect(),
            distance: self.distance,
            final_position: self.agent.pose.position,
            log: None,
        })
    }

    fn emit<K: LogSink + ?Sized>(&self, sink: &mut K, payload: RecordPayload) -> Result<()> {
        sink.record(&LogRecord::new(self.ctx.now(), self.agent.id, payload))?;
        Ok(())
    }

    fn sample<K: LogSink + ?Sized>(&mut self, sink: &mut K) -> Result<()> {
        self.next_sample = self.ctx.now() + self.ctx.config().sample_interval;
        self.emit(
            sink,
            RecordPayload::Position {
                position: self.agent.pose.position,
                facing: self.agent.pose.facing,
            },
        )
    }

    fn interaction<K: LogSink + ?Sized>(&self, sink: &mut K, id: EntityId) -> Result<()> {
        let Some(entity) = self.ctx.catalog().get(id) else {
            return Ok(());
        };
        info!(target: "runtime::episode", %id, name = %entity.name, kind = %entity.entity_type, "visited");
        self.emit(
            sink,
            RecordPayload::Interaction {
                entity: id,
                name: entity.name.clone(),
                location: entity.position,
            },
        )
    }
}
