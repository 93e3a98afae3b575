use tracing::{debug, trace};

use super::{EntityMemory, ExploreMemory};
use crate::config::SimConfig;
use crate::env::RandomSource;
use crate::state::{EntityId, PerceivedEntity, Vec3};

/// What changed during one [`MemoryStore::ingest`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub added: Vec<EntityId>,
    pub promoted: Vec<EntityId>,
    pub newly_visited: Vec<EntityId>,
    pub forgotten: Vec<EntityId>,
    pub evicted: Vec<EntityId>,
}

/// One agent's retained knowledge: entity memories in insertion order and
/// explore memories.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryStore {
    entities: Vec<EntityMemory>,
    explores: Vec<ExploreMemory>,
    capacity: usize,
    stamp: u64,
    next_seq: u64,
}

impl MemoryStore {
    /// Empty store holding at most `capacity` short-term entity memories.
    pub fn new(capacity: usize) -> Self {
        Self {
            entities: Vec::new(),
            explores: Vec::new(),
            capacity,
            stamp: 0,
            next_seq: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entities(&self) -> &[EntityMemory] {
        &self.entities
    }

    pub fn explores(&self) -> &[ExploreMemory] {
        &self.explores
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityMemory> {
        self.entities.iter().find(|memory| memory.id() == id)
    }

    pub fn is_visited(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|memory| memory.visited)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.explores.is_empty()
    }

    pub fn short_term_len(&self) -> usize {
        self.entities.iter().filter(|memory| !memory.long_term).count()
    }

    /// Merges one tick of perception and advances every record by `dt`.
    ///
    /// Records are matched by entity id only. Bearing-only observations carry
    /// no usable position and are not stored. Ingesting the same snapshot
    /// twice with `dt == 0` changes nothing.
    pub fn ingest<R: RandomSource + ?Sized>(
        &mut self,
        perceived: &[PerceivedEntity],
        agent_position: Vec3,
        dt: f32,
        config: &SimConfig,
        rng: &mut R,
    ) -> IngestReport {
        let mut report = IngestReport::default();
        self.stamp += 1;
        let stamp = self.stamp;

        let mut seen = Vec::with_capacity(perceived.len());
        for observation in perceived.iter().filter(|entity| !entity.bearing_only) {
            seen.push(observation.id);
            match self.entities.iter_mut().find(|memory| memory.id() == observation.id) {
                Some(memory) => {
                    memory.entity = *observation;
                    memory.impression_time += dt;
                    memory.unseen_time = 0.0;
                    memory.reinforced_at = stamp;
                }
                None => {
                    let forget_time = rng.range_f32(config.forget_time_min, config.forget_time_max);
                    let seq = self.next_seq;
                    self.next_seq += 1;
                    self.entities
                        .push(EntityMemory::new(*observation, forget_time, stamp, seq));
                    report.added.push(observation.id);
                }
            }
        }

        for memory in &mut self.entities {
            if !seen.contains(&memory.id()) {
                memory.unseen_time += dt;
            }
            if !memory.long_term && memory.impression_time >= config.impression_convert_ltm {
                memory.long_term = true;
                report.promoted.push(memory.id());
            }
            if !memory.visited
                && agent_position.ground_distance_squared(memory.position()) <= config.visit_threshold_sqr
            {
                memory.visited = true;
                report.newly_visited.push(memory.id());
            }
        }

        self.entities.retain(|memory| {
            let forgotten = memory.is_forgotten();
            if forgotten {
                report.forgotten.push(memory.id());
            }
            !forgotten
        });

        while self.short_term_len() > self.capacity {
            let Some(index) = self
                .entities
                .iter()
                .enumerate()
                .filter(|(_, memory)| !memory.long_term)
                .min_by_key(|(_, memory)| (memory.reinforced_at, memory.seq))
                .map(|(index, _)| index)
            else {
                break;
            };
            let evicted = self.entities.remove(index);
            report.evicted.push(evicted.id());
        }

        for explore in &mut self.explores {
            explore.impression_time += dt;
        }
        self.explores.retain(|explore| !explore.is_forgotten());

        if !report.promoted.is_empty() || !report.forgotten.is_empty() || !report.evicted.is_empty() {
            debug!(
                promoted = ?report.promoted,
                forgotten = ?report.forgotten,
                evicted = ?report.evicted,
                "memory updated"
            );
        }
        trace!(entities = self.entities.len(), explores = self.explores.len(), "ingested");

        report
    }

    /// Records an explored leg; merges into a similar memory when one exists.
    ///
    /// Returns `true` when a new memory was appended. A zero-length direction
    /// is ignored.
    pub fn ingest_explore<R: RandomSource + ?Sized>(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        distance: f32,
        config: &SimConfig,
        rng: &mut R,
    ) -> bool {
        let Some(direction) = direction.flat().normalized() else {
            return false;
        };

        if let Some(existing) = self.explores.iter_mut().find(|explore| {
            explore.is_similar(
                origin,
                direction,
                config.explore_pos_threshold,
                config.explore_deg_threshold,
            )
        }) {
            existing.distance = distance;
            existing.impression_time = 0.0;
            return false;
        }

        let forget_time = rng.range_f32(config.forget_time_min, config.forget_time_max);
        self.explores
            .push(ExploreMemory::new(origin, direction, distance, forget_time));
        true
    }

    /// Explore memory that has gone longest without reinforcement.
    pub fn stalest_explore(&self) -> Option<&ExploreMemory> {
        self.explores
            .iter()
            .max_by(|a, b| a.impression_time.total_cmp(&b.impression_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;
    use crate::state::EntityType;

    fn poi(id: u32, x: f32) -> PerceivedEntity {
        PerceivedEntity::new(EntityId(id), EntityType::Poi, Vec3::new(x, 0.0, 10.0))
    }

    #[test]
    fn zero_dt_ingest_is_idempotent() {
        let config = SimConfig::default();
        let mut rng = PcgRng::seeded(1);
        let mut store = MemoryStore::new(5);
        let snapshot = [poi(1, 0.0), poi(2, 3.0)];

        store.ingest(&snapshot, Vec3::ZERO, 0.5, &config, &mut rng);
        let before: Vec<_> = store.entities().iter().map(|m| m.impression_time).collect();

        store.ingest(&snapshot, Vec3::ZERO, 0.0, &config, &mut rng);
        store.ingest(&snapshot, Vec3::ZERO, 0.0, &config, &mut rng);
        let after: Vec<_> = store.entities().iter().map(|m| m.impression_time).collect();

        assert_eq!(store.len(), 2);
        assert_eq!(before, after);
    }

    #[test]
    fn unseen_short_term_record_is_forgotten() {
        let config = SimConfig::default();
        let mut rng = PcgRng::seeded(2);
        let mut store = MemoryStore::new(5);

        store.ingest(&[poi(1, 0.0)], Vec3::ZERO, 0.1, &config, &mut rng);
        let forget_time = store.entities()[0].forget_time;
        assert!((SimConfig::FORGET_TIME_MIN..=SimConfig::FORGET_TIME_MAX).contains(&forget_time));

        let report = store.ingest(&[], Vec3::ZERO, forget_time + 0.01, &config, &mut rng);
        assert_eq!(report.forgotten, vec![EntityId(1)]);
        assert!(store.get(EntityId(1)).is_none());
    }

    #[test]
    fn passing_close_marks_visited() {
        let config = SimConfig::default();
        let mut rng = PcgRng::seeded(3);
        let mut store = MemoryStore::new(5);
        store.ingest(&[poi(1, 0.0)], Vec3::ZERO, 0.1, &config, &mut rng);
        assert!(!store.is_visited(EntityId(1)));

        let report = store.ingest(&[poi(1, 0.0)], Vec3::new(0.0, 0.0, 9.5), 0.1, &config, &mut rng);
        assert_eq!(report.newly_visited, vec![EntityId(1)]);
        assert!(store.is_visited(EntityId(1)));
    }

    #[test]
    fn bearing_only_observations_are_not_stored() {
        let config = SimConfig::default();
        let mut rng = PcgRng::seeded(4);
        let mut store = MemoryStore::new(5);
        let bearing = PerceivedEntity::bearing(EntityId(9), EntityType::GoalCompletion, Vec3::FORWARD);
        store.ingest(&[bearing], Vec3::ZERO, 0.1, &config, &mut rng);
        assert!(store.get(EntityId(9)).is_none());
    }

    #[test]
    fn capacity_eviction_prefers_least_recently_reinforced() {
        let config = SimConfig::default();
        let mut rng = PcgRng::seeded(5);
        let mut store = MemoryStore::new(3);

        store.ingest(&[poi(1, 0.0), poi(2, 2.0), poi(3, 4.0)], Vec3::ZERO, 0.1, &config, &mut rng);
        // reinforce 1 so that 2 becomes the least recently reinforced
        store.ingest(&[poi(1, 0.0)], Vec3::ZERO, 0.1, &config, &mut rng);
        let report = store.ingest(&[poi(4, 6.0)], Vec3::ZERO, 0.1, &config, &mut rng);

        assert_eq!(report.evicted, vec![EntityId(2)]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn explore_merges_similar_and_keeps_distinct() {
        let config = SimConfig::default();
        let mut rng = PcgRng::seeded(6);
        let mut store = MemoryStore::new(3);

        assert!(store.ingest_explore(Vec3::ZERO, Vec3::FORWARD, 5.0, &config, &mut rng));
        assert!(!store.ingest_explore(Vec3::new(1.0, 0.0, 0.0), Vec3::FORWARD, 7.0, &config, &mut rng));
        assert_eq!(store.explores().len(), 1);
        assert_eq!(store.explores()[0].distance, 7.0);

        assert!(store.ingest_explore(Vec3::new(10.0, 0.0, 0.0), Vec3::FORWARD, 5.0, &config, &mut rng));
        assert_eq!(store.explores().len(), 2);
    }

    #[test]
    fn explore_memories_age_out() {
        let config = SimConfig::default();
        let mut rng = PcgRng::seeded(7);
        let mut store = MemoryStore::new(3);
        store.ingest_explore(Vec3::ZERO, Vec3::FORWARD, 5.0, &config, &mut rng);

        store.ingest(&[], Vec3::ZERO, SimConfig::FORGET_TIME_MAX + 1.0, &config, &mut rng);
        assert!(store.explores().is_empty());
    }
}
