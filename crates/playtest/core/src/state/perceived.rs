//! What an agent observes during a single tick.

use std::hash::{Hash, Hasher};

use super::{EntityId, EntityType, Vec3};

/// An entity currently or previously observed by an agent.
///
/// Equality and hashing use [`EntityId`] only: two observations of the same
/// object at different positions are the same entity.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerceivedEntity {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub position: Vec3,
    /// Only the bearing is known (compass override); the distance is not.
    pub bearing_only: bool,
}

impl PerceivedEntity {
    pub fn new(id: EntityId, entity_type: EntityType, position: Vec3) -> Self {
        Self {
            id,
            entity_type,
            position,
            bearing_only: false,
        }
    }

    pub fn bearing(id: EntityId, entity_type: EntityType, position: Vec3) -> Self {
        Self {
            id,
            entity_type,
            position,
            bearing_only: true,
        }
    }
}

impl PartialEq for PerceivedEntity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PerceivedEntity {}

impl Hash for PerceivedEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// One tick's perception snapshot. Rebuilt every tick and never retained.
#[derive(Clone, Debug, Default)]
pub struct PerceivedInfo {
    pub entities: Vec<PerceivedEntity>,
    /// Unit directions the environment allows the agent to travel.
    pub nav_directions: Vec<Vec3>,
}

impl PerceivedInfo {
    pub fn new(entities: Vec<PerceivedEntity>, nav_directions: Vec<Vec3>) -> Self {
        Self {
            entities,
            nav_directions,
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.iter().any(|entity| entity.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.nav_directions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_position_and_type() {
        let a = PerceivedEntity::new(EntityId(4), EntityType::Poi, Vec3::ZERO);
        let b = PerceivedEntity::new(EntityId(4), EntityType::HazardEnemy, Vec3::new(9.0, 0.0, 1.0));
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn distinct_ids_are_distinct_entities() {
        let a = PerceivedEntity::new(EntityId(1), EntityType::Poi, Vec3::ZERO);
        let b = PerceivedEntity::new(EntityId(2), EntityType::Poi, Vec3::ZERO);
        assert_ne!(a, b);
    }
}
