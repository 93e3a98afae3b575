//! Level loader.
//!
//! Levels are authored on the ground plane: rectangles are `(x, z)` corner
//! pairs and entity positions are full `(x, y, z)` points.

use std::path::Path;

use playtest_core::{
    Aabb, AgentPose, EntityCatalog, EntityId, EntityType, LevelEntity, LevelGeometry, Omniscience,
    Vec3,
};
use serde::Deserialize;
use tracing::warn;

use crate::level::LevelDefinition;
use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Deserialize)]
struct LevelRon {
    name: String,
    bounds: RectRon,
    #[serde(default)]
    obstacles: Vec<RectRon>,
    start: StartRon,
    entities: Vec<EntityRon>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RectRon {
    min: (f32, f32),
    max: (f32, f32),
}

impl From<RectRon> for Aabb {
    fn from(rect: RectRon) -> Self {
        Aabb::new(
            Vec3::new(rect.min.0, 0.0, rect.min.1),
            Vec3::new(rect.max.0, 0.0, rect.max.1),
        )
    }
}

#[derive(Debug, Deserialize)]
struct StartRon {
    position: (f32, f32, f32),
    #[serde(default = "forward")]
    facing: (f32, f32, f32),
}

fn forward() -> (f32, f32, f32) {
    (0.0, 0.0, 1.0)
}

#[derive(Debug, Deserialize)]
struct EntityRon {
    id: u32,
    #[serde(default)]
    name: String,
    kind: EntityType,
    position: (f32, f32, f32),
    #[serde(default)]
    known: Vec<KnownRon>,
}

/// What the agent knows about an entity without seeing it.
#[derive(Debug, Clone, Copy, Deserialize)]
enum KnownRon {
    Direction,
    Position,
}

fn point((x, y, z): (f32, f32, f32)) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Loader for level RON files.
pub struct LevelLoader;

impl LevelLoader {
    /// Load a level from a RON file.
    ///
    /// Authoring problems (duplicate ids, entities outside the bounds, no
    /// completion goal) are logged, not rejected.
    pub fn load(path: &Path) -> LoadResult<LevelDefinition> {
        let content = read_file(path)?;
        let level = Self::parse(&content)?;
        for issue in level.issues() {
            warn!(level = %level.name, path = %path.display(), "{issue}");
        }
        Ok(level)
    }

    pub fn parse(content: &str) -> LoadResult<LevelDefinition> {
        let data: LevelRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse level RON: {}", e))?;

        let catalog: EntityCatalog = data
            .entities
            .into_iter()
            .map(|entity| {
                let omniscience = entity.known.iter().fold(Omniscience::empty(), |acc, known| {
                    acc | match known {
                        KnownRon::Direction => Omniscience::DIRECTION,
                        KnownRon::Position => Omniscience::POSITION,
                    }
                });
                LevelEntity::new(EntityId(entity.id), entity.kind, point(entity.position))
                    .with_name(entity.name)
                    .with_omniscience(omniscience)
            })
            .collect();

        let geometry = LevelGeometry::new(
            data.bounds.into(),
            data.obstacles.into_iter().map(Aabb::from).collect(),
        );

        let position = point(data.start.position);
        let start = match point(data.start.facing).flat().normalized() {
            Some(facing) => AgentPose::new(position, facing),
            None => AgentPose::at(position),
        };

        Ok(LevelDefinition::new(data.name, catalog, geometry, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORRIDOR: &str = r#"
(
    name: "corridor",
    bounds: (min: (-10.0, -10.0), max: (10.0, 50.0)),
    obstacles: [(min: (-10.0, 20.0), max: (-2.0, 22.0))],
    start: (position: (0.0, 0.0, -5.0), facing: (1.0, 0.0, 0.0)),
    entities: [
        (id: 1, name: "Exit", kind: GoalCompletion, position: (0.0, 0.0, 45.0), known: [Direction]),
        (id: 2, kind: Poi, position: (5.0, 0.0, 10.0)),
        (id: 3, name: "Map", kind: ResourceAchievement, position: (-5.0, 0.0, 30.0), known: [Direction, Position]),
    ],
)
"#;

    #[test]
    fn parses_entities_geometry_and_start() {
        let level = LevelLoader::parse(CORRIDOR).unwrap();

        assert_eq!(level.name, "corridor");
        assert_eq!(level.catalog.len(), 3);
        let exit = level.catalog.completion_goal().unwrap();
        assert_eq!(exit.name, "Exit");
        assert!(exit.direction_known() && !exit.position_known());
        let map = level.catalog.get(EntityId(3)).unwrap();
        assert!(map.direction_known() && map.position_known());
        assert!(level.catalog.get(EntityId(2)).unwrap().omniscience.is_empty());

        assert_eq!(level.geometry.obstacles.len(), 1);
        assert!(!level.geometry.is_walkable(Vec3::new(-5.0, 0.0, 21.0)));
        assert_eq!(level.start.facing, Vec3::new(1.0, 0.0, 0.0));
        assert!(level.issues().is_empty());
    }

    #[test]
    fn missing_facing_looks_forward() {
        let source = CORRIDOR.replace(", facing: (1.0, 0.0, 0.0)", "");
        let level = LevelLoader::parse(&source).unwrap();
        assert_eq!(level.start.facing, Vec3::FORWARD);
    }

    #[test]
    fn unknown_entity_kind_fails() {
        let source = CORRIDOR.replace("kind: Poi", "kind: Treasure");
        assert!(LevelLoader::parse(&source).is_err());
    }
}
