//! Level entities as authored by the designer.

use bitflags::bitflags;

use super::{EntityId, Vec3};

/// Tagged category of a level object.
///
/// This is a closed set: weight tables carry exactly one entry per variant,
/// so adding a variant touches every table.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum EntityType {
    /// Goal the player may skip.
    GoalOptional = 0,
    /// Goal required before the level can be completed.
    GoalMandatory = 1,
    /// The goal that ends the level.
    GoalCompletion = 2,
    /// Collectible that rewards progress (points, trophies).
    ResourceAchievement = 3,
    /// Collectible that sustains the player (health, ammo).
    ResourcePreservation = 4,
    HazardEnemy = 5,
    HazardEnvironment = 6,
    /// Point of interest.
    Poi = 7,
    /// Non-player character acting as a point of interest.
    PoiNpc = 8,
}

impl EntityType {
    pub const COUNT: usize = 9;

    pub const fn all() -> [EntityType; Self::COUNT] {
        [
            EntityType::GoalOptional,
            EntityType::GoalMandatory,
            EntityType::GoalCompletion,
            EntityType::ResourceAchievement,
            EntityType::ResourcePreservation,
            EntityType::HazardEnemy,
            EntityType::HazardEnvironment,
            EntityType::Poi,
            EntityType::PoiNpc,
        ]
    }

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    pub const fn is_goal(self) -> bool {
        matches!(
            self,
            EntityType::GoalOptional | EntityType::GoalMandatory | EntityType::GoalCompletion
        )
    }

    pub const fn is_hazard(self) -> bool {
        matches!(
            self,
            EntityType::HazardEnemy | EntityType::HazardEnvironment
        )
    }
}

bitflags! {
    /// Authoring-time overrides that make part of an entity known without sight.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Omniscience: u8 {
        /// The agent always knows which way the entity lies (compass).
        const DIRECTION = 1 << 0;
        /// The agent always knows where the entity is (map).
        const POSITION  = 1 << 1;
    }
}

/// Authoring-time record of a placed object.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelEntity {
    pub id: EntityId,
    /// Designer-facing label, used in interaction logs.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub entity_type: EntityType,
    pub position: Vec3,
    #[cfg_attr(feature = "serde", serde(default))]
    pub omniscience: Omniscience,
}

impl LevelEntity {
    pub fn new(id: EntityId, entity_type: EntityType, position: Vec3) -> Self {
        Self {
            id,
            name: String::new(),
            entity_type,
            position,
            omniscience: Omniscience::empty(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_omniscience(mut self, omniscience: Omniscience) -> Self {
        self.omniscience = omniscience;
        self
    }

    pub fn position_known(&self) -> bool {
        self.omniscience.contains(Omniscience::POSITION)
    }

    pub fn direction_known(&self) -> bool {
        self.omniscience.contains(Omniscience::DIRECTION)
    }
}

/// Static, ordered list of level entities for one episode.
///
/// Read-only once built; agents share it behind an `Arc`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityCatalog {
    entities: Vec<LevelEntity>,
}

impl EntityCatalog {
    pub fn new(entities: Vec<LevelEntity>) -> Self {
        Self { entities }
    }

    pub fn entities(&self) -> &[LevelEntity] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelEntity> {
        self.entities.iter()
    }

    pub fn get(&self, id: EntityId) -> Option<&LevelEntity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities of one type, in catalog order.
    pub fn of_type(&self, entity_type: EntityType) -> impl Iterator<Item = &LevelEntity> {
        self.entities
            .iter()
            .filter(move |entity| entity.entity_type == entity_type)
    }

    pub fn completion_goal(&self) -> Option<&LevelEntity> {
        self.of_type(EntityType::GoalCompletion).next()
    }
}

impl FromIterator<LevelEntity> for EntityCatalog {
    fn from_iter<I: IntoIterator<Item = LevelEntity>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
