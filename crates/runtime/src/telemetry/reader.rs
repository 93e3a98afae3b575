//! Loads finished episode logs back into per-player paths.

use std::ops::Range;
use std::path::{Path, PathBuf};

use playtest_core::{AgentId, EntityId, Vec3};
use serde::Serialize;
use tracing::{debug, warn};

use crate::events::{LogRecord, RecordPayload};
use crate::repository::{RecordReader, RepositoryError, Result};

/// Identity of one recorded playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LogKey {
    pub episode: u32,
    pub agent: AgentId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathPoint {
    pub time: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionPoint {
    pub time: f32,
    pub entity: EntityId,
    pub name: String,
    pub location: Vec3,
}

/// One player's recorded path plus the visualisation state around it.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerLog {
    pub key: LogKey,
    pub level: String,
    pub source: PathBuf,
    pub path: Vec<PathPoint>,
    pub interactions: Vec<InteractionPoint>,
    /// Whether aggregate views should count this log.
    pub include: bool,
    window: Range<usize>,
}

impl PlayerLog {
    /// Builds a log from its records in file order.
    ///
    /// # Errors
    ///
    /// `CorruptedData` when the first record is not a header.
    pub fn from_records(source: impl Into<PathBuf>, records: Vec<LogRecord>) -> Result<Self> {
        let source = source.into();
        let mut records = records.into_iter();

        let (header, agent) = match records.next() {
            Some(LogRecord {
                payload: RecordPayload::Header(header),
                agent,
                ..
            }) => (header, agent),
            _ => {
                return Err(RepositoryError::CorruptedData(format!(
                    "{} does not start with an episode header",
                    source.display()
                )));
            }
        };

        let mut path = Vec::new();
        let mut interactions = Vec::new();
        for record in records {
            match record.payload {
                RecordPayload::Position { position, .. } => path.push(PathPoint {
                    time: record.time,
                    position,
                }),
                RecordPayload::Interaction {
                    entity,
                    name,
                    location,
                } => interactions.push(InteractionPoint {
                    time: record.time,
                    entity,
                    name,
                    location,
                }),
                RecordPayload::Header(_) => {
                    warn!("{}: ignoring repeated header", source.display());
                }
                RecordPayload::Input { .. } | RecordPayload::GameEvent { .. } => {}
            }
        }

        let window = 0..path.len();
        Ok(Self {
            key: LogKey {
                episode: header.episode,
                agent,
            },
            level: header.level,
            source,
            path,
            interactions,
            include: true,
            window,
        })
    }

    /// Simulated seconds covered by the path.
    pub fn duration(&self) -> f32 {
        self.path.last().map_or(0.0, |point| point.time)
    }

    /// Restricts the display window to samples with `start <= time <= end`.
    pub fn set_time_window(&mut self, start: f32, end: f32) {
        let first = self.path.partition_point(|point| point.time < start);
        let last = self.path.partition_point(|point| point.time <= end);
        self.window = first..last.max(first);
    }

    pub fn reset_window(&mut self) {
        self.window = 0..self.path.len();
    }

    /// Path samples inside the display window.
    pub fn windowed(&self) -> &[PathPoint] {
        &self.path[self.window.clone()]
    }
}

/// Reads `FileRepository<LogRecord>` files written by the episode runner.
pub struct TelemetryReader;

impl TelemetryReader {
    pub fn load_file(path: impl AsRef<Path>) -> Result<PlayerLog> {
        let path = path.as_ref();
        let records = RecordReader::<LogRecord>::open(path)?.read_all()?;
        PlayerLog::from_records(path, records)
    }

    /// Every `*.log` file in `dir`, ordered by episode then agent.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<PlayerLog>> {
        let dir = dir.as_ref();
        let mut logs = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "log") {
                logs.push(Self::load_file(&path)?);
            }
        }
        logs.sort_by_key(|log| log.key);
        debug!("Loaded {} logs from {}", logs.len(), dir.display());
        Ok(logs)
    }
}
