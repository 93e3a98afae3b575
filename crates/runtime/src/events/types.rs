//! Event-log record types.

use playtest_core::{AgentId, AgentPose, AgentTuning, EntityId, HeuristicProfile, NavigationTarget, Vec3};
use serde::{Deserialize, Serialize};

/// Record category, used to filter logs without matching on payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    Header,
    Position,
    Input,
    GameEvent,
    Interaction,
}

/// Episode metadata written once, before any other record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeHeader {
    pub level: String,
    pub episode: u32,
    pub seed: u64,
    pub start: AgentPose,
    pub profile: HeuristicProfile,
    pub tuning: AgentTuning,
}

/// Navigation command handed to the movement executor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NavCommand {
    Hold,
    MoveTo(Vec3),
}

impl RecordKind {
    pub const COUNT: usize = 5;

    pub const ALL: [RecordKind; Self::COUNT] = [
        RecordKind::Header,
        RecordKind::Position,
        RecordKind::Input,
        RecordKind::GameEvent,
        RecordKind::Interaction,
    ];

    pub const fn as_index(self) -> usize {
        self as usize
    }
}

impl From<&NavigationTarget> for NavCommand {
    fn from(target: &NavigationTarget) -> Self {
        target.next_point().map_or(NavCommand::Hold, NavCommand::MoveTo)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordPayload {
    Header(EpisodeHeader),
    /// Periodic pose sample.
    Position { position: Vec3, facing: Vec3 },
    /// A new navigation command, logged only when it changes.
    Input { command: NavCommand, position: Vec3 },
    /// Keyed custom event at the agent's position.
    GameEvent { key: String, position: Vec3 },
    /// The agent passed close enough to an entity to count it as visited.
    Interaction {
        entity: EntityId,
        name: String,
        location: Vec3,
    },
}

/// One line of an episode's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Simulated seconds since the episode started.
    pub time: f32,
    pub agent: AgentId,
    pub payload: RecordPayload,
}

impl LogRecord {
    pub fn new(time: f32, agent: AgentId, payload: RecordPayload) -> Self {
        Self { time, agent, payload }
    }

    pub fn kind(&self) -> RecordKind {
        match self.payload {
            RecordPayload::Header(_) => RecordKind::Header,
            RecordPayload::Position { .. } => RecordKind::Position,
            RecordPayload::Input { .. } => RecordKind::Input,
            RecordPayload::GameEvent { .. } => RecordKind::GameEvent,
            RecordPayload::Interaction { .. } => RecordKind::Interaction,
        }
    }
}
