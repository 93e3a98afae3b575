use crate::state::{EntityId, EntityType, PerceivedEntity, Vec3};

/// A remembered perception.
///
/// Two clocks drive its lifetime:
/// - `impression_time` accumulates while the entity is observed and promotes
///   the record to long-term once it reaches the conversion threshold;
/// - `unseen_time` restarts on every reinforcement and evicts a short-term
///   record once it passes the record's own `forget_time`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityMemory {
    pub entity: PerceivedEntity,
    pub visited: bool,
    pub impression_time: f32,
    pub unseen_time: f32,
    pub forget_time: f32,
    pub long_term: bool,
    /// Store stamp of the last reinforcement, for least-recently-reinforced eviction.
    pub(crate) reinforced_at: u64,
    /// Insertion order inside the store.
    pub(crate) seq: u64,
}

impl EntityMemory {
    pub(crate) fn new(entity: PerceivedEntity, forget_time: f32, stamp: u64, seq: u64) -> Self {
        Self {
            entity,
            visited: false,
            impression_time: 0.0,
            unseen_time: 0.0,
            forget_time,
            long_term: false,
            reinforced_at: stamp,
            seq,
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    #[inline]
    pub fn entity_type(&self) -> EntityType {
        self.entity.entity_type
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.entity.position
    }

    /// Short-term and unreinforced for longer than its forget threshold.
    pub fn is_forgotten(&self) -> bool {
        !self.long_term && self.unseen_time > self.forget_time
    }
}

impl PartialEq for EntityMemory {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
    }
}

impl Eq for EntityMemory {}
