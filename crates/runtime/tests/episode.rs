use std::sync::Arc;

use playtest_core::{
    Aabb, AgentId, AgentPose, AgentTuning, EntityCatalog, EntityId, EntityType, Heuristic,
    HeuristicProfile, LevelEntity, LevelGeometry, PcgRng, SimConfig, SimContext, Vec3,
    WeightTable,
};
use playtest_runtime::{
    AbortSignal, Episode, EpisodeOutcome, EpisodeSetup, FileEventLog, InMemoryLog, LogRecord,
    LogSink, NavCommand, NullSink, OracleManager, RecordKind, RecordPayload, RecordReader,
    RepositoryError,
};
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

const EXIT: EntityId = EntityId(1);
const CHEST: EntityId = EntityId(2);

fn oracles() -> OracleManager {
    OracleManager::new(
        Arc::new(LevelGeometry::new(
            Aabb::new(Vec3::new(-15.0, 0.0, -15.0), Vec3::new(15.0, 0.0, 15.0)),
            vec![],
        )),
        1.0,
    )
}

fn episode(config: SimConfig) -> Episode {
    let catalog = EntityCatalog::new(vec![
        LevelEntity::new(EXIT, EntityType::GoalCompletion, Vec3::new(0.0, 0.0, 10.0))
            .with_name("exit"),
        // on the way to the exit
        LevelEntity::new(CHEST, EntityType::ResourceAchievement, Vec3::new(0.0, 0.0, 5.0))
            .with_name("chest"),
    ]);
    let weights = WeightTable::zeroed()
        .with_weight(Heuristic::Completion, EntityType::GoalCompletion, 1.0);
    let tuning = AgentTuning::sample(&config, 0.5, &mut PcgRng::seeded(3));
    let ctx = SimContext::new(Arc::new(config), Arc::new(catalog), Arc::new(weights));

    Episode::new(
        EpisodeSetup {
            level: "corridor".into(),
            episode: 0,
            seed: 99,
            agent: AgentId(0),
            start: AgentPose::at(Vec3::ZERO),
            profile: HeuristicProfile::zeroed().with(Heuristic::Completion, 1.0),
            tuning,
        },
        ctx,
    )
}

/// Trips the abort signal once it has seen `after` records.
struct AbortAfter {
    seen: usize,
    after: usize,
    abort: AbortSignal,
}

impl LogSink for AbortAfter {
    fn record(&mut self, _record: &LogRecord) -> Result<(), RepositoryError> {
        self.seen += 1;
        if self.seen == self.after {
            self.abort.abort();
        }
        Ok(())
    }
}

// ============================================================================
// Record stream
// ============================================================================

#[test]
fn completed_episode_writes_a_well_formed_log() {
    let oracles = oracles();
    let mut log = InMemoryLog::new();
    let summary = episode(SimConfig::default())
        .run(oracles.as_env(), &mut log, &AbortSignal::new())
        .unwrap();

    assert_eq!(summary.outcome, EpisodeOutcome::Completed);
    assert_eq!(summary.visited, vec![EXIT, CHEST]);

    let records = log.records().unwrap();
    assert_eq!(records[0].kind(), RecordKind::Header);
    assert!(matches!(
        records[1].payload,
        RecordPayload::Position { position, .. } if position == Vec3::ZERO
    ));

    let n = records.len();
    assert!(matches!(
        &records[n - 2].payload,
        RecordPayload::GameEvent { key, .. } if key == "completed"
    ));
    assert_eq!(records[n - 1].kind(), RecordKind::Position);

    let visited: Vec<EntityId> = records
        .iter()
        .filter_map(|record| match &record.payload {
            RecordPayload::Interaction { entity, .. } => Some(*entity),
            _ => None,
        })
        .collect();
    assert_eq!(visited, vec![CHEST, EXIT]);

    assert!(records.windows(2).all(|pair| pair[0].time <= pair[1].time));
}

#[test]
fn raised_exit_is_reached_from_the_ground() {
    let config = SimConfig::default();
    let catalog = EntityCatalog::new(vec![
        // a landing above the walkable floor
        LevelEntity::new(EXIT, EntityType::GoalCompletion, Vec3::new(0.0, 1.5, 10.0))
            .with_name("exit"),
    ]);
    let weights = WeightTable::zeroed()
        .with_weight(Heuristic::Completion, EntityType::GoalCompletion, 1.0);
    let tuning = AgentTuning::sample(&config, 0.5, &mut PcgRng::seeded(3));
    let ctx = SimContext::new(Arc::new(config), Arc::new(catalog), Arc::new(weights));
    let episode = Episode::new(
        EpisodeSetup {
            level: "landing".into(),
            episode: 0,
            seed: 99,
            agent: AgentId(0),
            start: AgentPose::at(Vec3::ZERO),
            profile: HeuristicProfile::zeroed().with(Heuristic::Completion, 1.0),
            tuning,
        },
        ctx,
    );

    let oracles = oracles();
    let summary = episode
        .run(oracles.as_env(), &mut NullSink, &AbortSignal::new())
        .unwrap();

    assert_eq!(summary.outcome, EpisodeOutcome::Completed);
    assert_eq!(summary.visited, vec![EXIT]);
    assert!(summary.ticks < 100);
}

#[test]
fn input_records_only_mark_command_changes() {
    let oracles = oracles();
    let log = InMemoryLog::new();
    let mut sink = log.clone();
    episode(SimConfig::default())
        .run(oracles.as_env(), &mut sink, &AbortSignal::new())
        .unwrap();

    let commands: Vec<NavCommand> = log
        .of_kind(RecordKind::Input)
        .unwrap()
        .into_iter()
        .filter_map(|record| match record.payload {
            RecordPayload::Input { command, .. } => Some(command),
            _ => None,
        })
        .collect();
    assert!(!commands.is_empty());
    assert!(commands.windows(2).all(|pair| pair[0] != pair[1]));
}

#[test]
fn positions_are_sampled_at_the_configured_interval() {
    let config = SimConfig {
        sample_interval: 1.0,
        ..SimConfig::default()
    };
    let oracles = oracles();
    let mut log = InMemoryLog::new();
    episode(config)
        .run(oracles.as_env(), &mut log, &AbortSignal::new())
        .unwrap();

    let samples = log.of_kind(RecordKind::Position).unwrap();
    // the last sample is the end-of-episode snapshot
    let periodic = &samples[..samples.len() - 1];
    assert!(periodic.len() >= 2);
    assert!(periodic
        .windows(2)
        .all(|pair| pair[1].time - pair[0].time >= 1.0 - 1e-3));
}

// ============================================================================
// Termination
// ============================================================================

#[test]
fn abort_mid_episode_stops_at_the_next_tick() {
    let oracles = oracles();
    let abort = AbortSignal::new();
    let mut sink = AbortAfter {
        seen: 0,
        after: 4,
        abort: abort.clone(),
    };
    let summary = episode(SimConfig::default())
        .run(oracles.as_env(), &mut sink, &abort)
        .unwrap();

    assert_eq!(summary.outcome, EpisodeOutcome::Aborted);
    assert!(summary.ticks > 0);
    assert!(!summary.visited.contains(&EXIT));
}

#[test]
fn tick_budget_ends_the_episode() {
    let config = SimConfig {
        max_ticks: 5,
        ..SimConfig::default()
    };
    let oracles = oracles();
    let mut log = InMemoryLog::new();
    let summary = episode(config)
        .run(oracles.as_env(), &mut log, &AbortSignal::new())
        .unwrap();

    assert_eq!(summary.outcome, EpisodeOutcome::BudgetExhausted);
    assert_eq!(summary.ticks, 5);
    assert!((summary.sim_time - 0.5).abs() < 1e-4);
    let events = log.of_kind(RecordKind::GameEvent).unwrap();
    assert!(matches!(
        &events[0].payload,
        RecordPayload::GameEvent { key, .. } if key == "budget_exhausted"
    ));
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn file_log_matches_live_records() {
    let dir = TempDir::new().unwrap();
    let oracles = oracles();
    let file = FileEventLog::create(dir.path(), "episode-000.log").unwrap();
    let path = file.path().to_path_buf();
    let live = InMemoryLog::new();

    let mut sink = (file, live.clone());
    episode(SimConfig::default())
        .run(oracles.as_env(), &mut sink, &AbortSignal::new())
        .unwrap();
    drop(sink);

    let stored = RecordReader::<LogRecord>::open(&path)
        .unwrap()
        .read_all()
        .unwrap();
    assert_eq!(stored, live.records().unwrap());
}

#[test]
fn existing_log_is_never_overwritten() {
    let dir = TempDir::new().unwrap();
    let _first = FileEventLog::create(dir.path(), "episode-000.log").unwrap();
    let second = FileEventLog::create(dir.path(), "episode-000.log");
    assert!(matches!(second, Err(RepositoryError::LogAlreadyExists(_))));
}
