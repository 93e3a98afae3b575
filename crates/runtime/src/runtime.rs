//! Batch orchestrator.
//!
//! A batch spawns `num_agents` agents at the level's start pose and runs one
//! episode per agent, either one after another or several at once on tokio's
//! blocking pool. Agents never share mutable state; the catalog, weight table,
//! config and oracles are shared read-only behind `Arc`s.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use playtest_content::{LevelDefinition, PopulationSpec};
use playtest_core::{
    AgentId, EntityCatalog, PcgRng, SimConfig, SimContext, WeightTable, compute_seed,
};

use crate::api::{Result, RuntimeError};
use crate::events::{LogRecord, LogSink, NullSink, RecordBus};
use crate::oracle::{GridNavMesh, OracleManager};
use crate::repository::FileRepository;
use crate::workers::{AbortSignal, Episode, EpisodeOutcome, EpisodeSetup, EpisodeSummary};

/// Upper bound on episodes running at the same time.
pub const MAX_SIMULTANEOUS_AGENTS: usize = 8;

/// Seed contexts, so per-agent streams never overlap.
const AGENT_STREAM: u32 = 0;
const POPULATION_STREAM: u32 = 1;

/// Batch configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub num_agents: u32,
    /// Run episodes concurrently instead of one after another.
    pub simultaneous: bool,
    /// Concurrency limit for simultaneous batches, clamped to
    /// `1..=MAX_SIMULTANEOUS_AGENTS`.
    pub max_concurrent: usize,
    /// Fixed batch seed; a random one is drawn when `None`.
    pub batch_seed: Option<u64>,
    /// Where episode logs go (`{output_dir}/{session_id}/episode-NNN.log`).
    /// No logs are written when `None`.
    pub output_dir: Option<PathBuf>,
    pub session_id: String,
    /// Grid resolution of the navmesh.
    pub nav_cell_size: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            num_agents: 1,
            simultaneous: false,
            max_concurrent: MAX_SIMULTANEOUS_AGENTS,
            batch_seed: None,
            output_dir: None,
            session_id: "session".to_string(),
            nav_cell_size: GridNavMesh::DEFAULT_CELL_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Directory holding this session's episode logs.
    pub fn session_dir(&self) -> Option<PathBuf> {
        self.output_dir
            .as_ref()
            .map(|dir| dir.join(&self.session_id))
    }
}

/// Results of one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub session_id: String,
    pub level: String,
    pub batch_seed: u64,
    /// One summary per agent, in episode order.
    pub episodes: Vec<EpisodeSummary>,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.episodes
            .iter()
            .filter(|summary| summary.outcome == EpisodeOutcome::Completed)
            .count()
    }

    /// Fraction of agents that reached the completion goal.
    pub fn completion_rate(&self) -> f32 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.completed() as f32 / self.episodes.len() as f32
    }
}

/// Runs batches of episodes over one level.
pub struct BatchRunner {
    config: RuntimeConfig,
    level: Arc<LevelDefinition>,
    sim: Arc<SimConfig>,
    catalog: Arc<EntityCatalog>,
    weights: Arc<WeightTable>,
    population: PopulationSpec,
    oracles: OracleManager,
    abort: AbortSignal,
    bus: Option<RecordBus>,
}

/// Everything one blocking task needs, owned.
struct EpisodeJob {
    setup: EpisodeSetup,
    ctx: SimContext,
    oracles: OracleManager,
    abort: AbortSignal,
    bus: Option<RecordBus>,
    session_dir: Option<PathBuf>,
}

impl BatchRunner {
    /// Create a new batch builder for `level`.
    pub fn builder(level: LevelDefinition) -> BatchBuilder {
        BatchBuilder::new(level)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Handle that stops every running episode at its next tick.
    pub fn abort_signal(&self) -> AbortSignal {
        self.abort.clone()
    }

    /// Runs every episode of the batch.
    ///
    /// Episodes cut short by the abort signal still produce a summary with
    /// [`EpisodeOutcome::Aborted`].
    pub async fn run(&self) -> Result<BatchReport> {
        let batch_seed = self.config.batch_seed.unwrap_or_else(rand::random);
        let jobs: Vec<EpisodeJob> = (0..self.config.num_agents)
            .map(|index| self.job(batch_seed, index))
            .collect();

        info!(
            target: "runtime::batch",
            session = %self.config.session_id,
            level = %self.level.name,
            agents = jobs.len(),
            simultaneous = self.config.simultaneous,
            batch_seed,
            "batch started"
        );

        let mut episodes = if self.config.simultaneous {
            self.run_simultaneous(jobs).await?
        } else {
            let mut episodes = Vec::with_capacity(jobs.len());
            for job in jobs {
                let summary = tokio::task::spawn_blocking(move || job.run())
                    .await
                    .map_err(RuntimeError::WorkerJoin)??;
                episodes.push(summary);
            }
            episodes
        };
        episodes.sort_by_key(|summary| summary.episode);

        let report = BatchReport {
            session_id: self.config.session_id.clone(),
            level: self.level.name.clone(),
            batch_seed,
            episodes,
        };
        info!(
            target: "runtime::batch",
            completed = report.completed(),
            agents = report.episodes.len(),
            "batch finished"
        );
        Ok(report)
    }

    async fn run_simultaneous(&self, jobs: Vec<EpisodeJob>) -> Result<Vec<EpisodeSummary>> {
        let limit = self.config.max_concurrent.clamp(1, MAX_SIMULTANEOUS_AGENTS);
        let permits = Arc::new(Semaphore::new(limit));
        let mut tasks = JoinSet::new();

        for job in jobs {
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                tokio::task::spawn_blocking(move || job.run()).await
            });
        }

        let mut episodes = Vec::new();
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(RuntimeError::WorkerJoin)
                .and_then(|inner| inner.map_err(RuntimeError::WorkerJoin))
                .and_then(|result| result);
            match outcome {
                Ok(summary) => episodes.push(summary),
                Err(err) => {
                    warn!(target: "runtime::batch", error = %err, "episode failed; stopping batch");
                    self.abort.abort();
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(episodes),
        }
    }

    fn job(&self, batch_seed: u64, index: u32) -> EpisodeJob {
        let episode = u64::from(index);
        let mut population_rng =
            PcgRng::seeded(compute_seed(batch_seed, episode, index, POPULATION_STREAM));
        let (profile, tuning) = self
            .population
            .draw(index as usize, &self.sim, &mut population_rng);

        EpisodeJob {
            setup: EpisodeSetup {
                level: self.level.name.clone(),
                episode: index,
                seed: compute_seed(batch_seed, episode, index, AGENT_STREAM),
                agent: AgentId(index),
                start: self.level.start,
                profile,
                tuning,
            },
            ctx: SimContext::new(
                Arc::clone(&self.sim),
                Arc::clone(&self.catalog),
                Arc::clone(&self.weights),
            ),
            oracles: self.oracles.clone(),
            abort: self.abort.clone(),
            bus: self.bus.clone(),
            session_dir: self.config.session_dir(),
        }
    }
}

impl EpisodeJob {
    fn run(self) -> Result<EpisodeSummary> {
        let episode = Episode::new(self.setup.clone(), self.ctx);
        let env = self.oracles.as_env();

        let file = match &self.session_dir {
            Some(dir) => Some(FileRepository::<LogRecord>::create(
                dir,
                format!("episode-{:03}.log", self.setup.episode),
            )?),
            None => None,
        };
        let log = file.as_ref().map(|repo| repo.path().to_path_buf());

        let mut sink: Box<dyn LogSink> = match (file, self.bus) {
            (Some(file), Some(bus)) => Box::new((file, bus)),
            (Some(file), None) => Box::new(file),
            (None, Some(bus)) => Box::new(bus),
            (None, None) => Box::new(NullSink),
        };

        let mut summary = episode.run(env, &mut sink, &self.abort)?;
        summary.log = log;
        Ok(summary)
    }
}

/// Builder for [`BatchRunner`].
pub struct BatchBuilder {
    config: RuntimeConfig,
    level: LevelDefinition,
    sim: SimConfig,
    weights: Option<WeightTable>,
    population: PopulationSpec,
    bus: Option<RecordBus>,
}

impl BatchBuilder {
    pub fn new(level: LevelDefinition) -> Self {
        Self {
            config: RuntimeConfig::default(),
            level,
            sim: SimConfig::default(),
            weights: None,
            population: PopulationSpec::default(),
            bus: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn sim_config(mut self, sim: SimConfig) -> Self {
        self.sim = sim;
        self
    }

    pub fn weights(mut self, weights: WeightTable) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn population(mut self, population: PopulationSpec) -> Self {
        self.population = population;
        self
    }

    /// Also publish every record on `bus`.
    pub fn bus(mut self, bus: RecordBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Validates the inputs and bakes the navmesh.
    ///
    /// # Errors
    ///
    /// An invalid [`SimConfig`], a level without a completion goal, or a batch
    /// of zero agents.
    pub fn build(self) -> Result<BatchRunner> {
        self.sim.validate()?;
        if self.config.num_agents == 0 {
            return Err(RuntimeError::EmptyBatch);
        }
        let level = self.level;
        if level.catalog.completion_goal().is_none() {
            return Err(RuntimeError::MissingCompletionGoal { level: level.name });
        }
        let weights = self.weights.unwrap_or_else(|| {
            warn!("no weight table configured; every utility will be zero");
            WeightTable::zeroed()
        });

        let oracles = OracleManager::from_level(&level, self.config.nav_cell_size);
        Ok(BatchRunner {
            catalog: Arc::new(level.catalog.clone()),
            level: Arc::new(level),
            sim: Arc::new(self.sim),
            weights: Arc::new(weights),
            population: self.population,
            oracles,
            abort: AbortSignal::new(),
            bus: self.bus,
            config: self.config,
        })
    }
}
