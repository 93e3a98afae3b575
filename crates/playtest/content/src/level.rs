//! Authored level: what agents can find, where they can walk, where they start.

use std::collections::BTreeSet;
use std::fmt;

use playtest_core::{Aabb, AgentPose, EntityCatalog, EntityId, EntityType, LevelGeometry};

/// One level ready to be simulated.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelDefinition {
    pub name: String,
    pub catalog: EntityCatalog,
    pub geometry: LevelGeometry,
    /// Common spawn pose for every agent of a batch.
    pub start: AgentPose,
}

/// Authoring mistake found by [`LevelDefinition::issues`].
#[derive(Clone, Debug, PartialEq)]
pub enum LevelIssue {
    DuplicateId(EntityId),
    MissingCompletionGoal,
    /// More than one completion goal; only the first ends the episode.
    ExtraCompletionGoal(EntityId),
    OutOfBounds(EntityId),
    StartNotWalkable,
}

impl fmt::Display for LevelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelIssue::DuplicateId(id) => write!(f, "entity id {id} is used more than once"),
            LevelIssue::MissingCompletionGoal => f.write_str("level has no completion goal"),
            LevelIssue::ExtraCompletionGoal(id) => {
                write!(f, "completion goal {id} is ignored; only the first one counts")
            }
            LevelIssue::OutOfBounds(id) => write!(f, "entity {id} lies outside the level bounds"),
            LevelIssue::StartNotWalkable => f.write_str("start position is not walkable"),
        }
    }
}

impl LevelDefinition {
    pub fn new(
        name: impl Into<String>,
        catalog: EntityCatalog,
        geometry: LevelGeometry,
        start: AgentPose,
    ) -> Self {
        Self {
            name: name.into(),
            catalog,
            geometry,
            start,
        }
    }

    /// Extents used to lay out heatmap tiles.
    pub fn extents(&self) -> Aabb {
        self.geometry.bounds
    }

    /// Lists everything that would make a batch on this level misleading.
    pub fn issues(&self) -> Vec<LevelIssue> {
        let mut issues = Vec::new();

        let mut seen = BTreeSet::new();
        for entity in self.catalog.iter() {
            if !seen.insert(entity.id) {
                issues.push(LevelIssue::DuplicateId(entity.id));
            }
            if !self.geometry.bounds.contains(entity.position) {
                issues.push(LevelIssue::OutOfBounds(entity.id));
            }
        }

        let mut goals = self.catalog.of_type(EntityType::GoalCompletion);
        if goals.next().is_none() {
            issues.push(LevelIssue::MissingCompletionGoal);
        }
        issues.extend(goals.map(|extra| LevelIssue::ExtraCompletionGoal(extra.id)));

        if !self.geometry.is_walkable(self.start.position) {
            issues.push(LevelIssue::StartNotWalkable);
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use playtest_core::{LevelEntity, Vec3};

    use super::*;

    fn level(entities: Vec<LevelEntity>, start: Vec3) -> LevelDefinition {
        let bounds = Aabb::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 0.0, 10.0));
        LevelDefinition::new(
            "test",
            entities.into_iter().collect(),
            LevelGeometry::open(bounds),
            AgentPose::at(start),
        )
    }

    #[test]
    fn clean_level_has_no_issues() {
        let level = level(
            vec![LevelEntity::new(EntityId(1), EntityType::GoalCompletion, Vec3::new(0.0, 0.0, 9.0))],
            Vec3::ZERO,
        );
        assert!(level.issues().is_empty());
    }

    #[test]
    fn reports_every_authoring_mistake() {
        let level = level(
            vec![
                LevelEntity::new(EntityId(1), EntityType::Poi, Vec3::new(0.0, 0.0, 50.0)),
                LevelEntity::new(EntityId(1), EntityType::HazardEnemy, Vec3::ZERO),
            ],
            Vec3::new(20.0, 0.0, 0.0),
        );
        let issues = level.issues();
        assert!(issues.contains(&LevelIssue::DuplicateId(EntityId(1))));
        assert!(issues.contains(&LevelIssue::OutOfBounds(EntityId(1))));
        assert!(issues.contains(&LevelIssue::MissingCompletionGoal));
        assert!(issues.contains(&LevelIssue::StartNotWalkable));
    }

    #[test]
    fn second_completion_goal_is_flagged() {
        let level = level(
            vec![
                LevelEntity::new(EntityId(1), EntityType::GoalCompletion, Vec3::ZERO),
                LevelEntity::new(EntityId(2), EntityType::GoalCompletion, Vec3::new(1.0, 0.0, 0.0)),
            ],
            Vec3::new(5.0, 0.0, 5.0),
        );
        assert_eq!(level.issues(), vec![LevelIssue::ExtraCompletionGoal(EntityId(2))]);
    }
}
