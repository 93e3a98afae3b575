//! Per-tick perception.
//!
//! Builds a fresh [`PerceivedInfo`] from the catalog and the agent's pose. The
//! result is never cached; the memory store is the only thing that retains
//! observations across ticks.

use tracing::trace;

use crate::context::SimContext;
use crate::env::SpatialOracle;
use crate::state::{AgentPose, PerceivedEntity, PerceivedInfo};

/// Entities observable from `pose` this tick, plus navigable directions.
///
/// An entity is perceived when it is within `range` and visible, or when an
/// omniscience flag makes it known regardless. Position omniscience yields the
/// true position; direction omniscience alone yields a bearing-only
/// observation placed `range` units along the bearing.
pub fn perceive<S>(ctx: &SimContext, pose: AgentPose, range: f32, spatial: &S) -> PerceivedInfo
where
    S: SpatialOracle + ?Sized,
{
    let range_sqr = range * range;
    let origin = pose.position;

    let entities = ctx
        .catalog()
        .iter()
        .filter_map(|entity| {
            if entity.position_known() {
                return Some(PerceivedEntity::new(
                    entity.id,
                    entity.entity_type,
                    entity.position,
                ));
            }
            if origin.distance_squared(entity.position) <= range_sqr
                && spatial.is_visible(origin, entity.position)
            {
                return Some(PerceivedEntity::new(
                    entity.id,
                    entity.entity_type,
                    entity.position,
                ));
            }
            if entity.direction_known() {
                let observation = match (entity.position - origin).flat().normalized() {
                    Some(bearing) => {
                        PerceivedEntity::bearing(entity.id, entity.entity_type, origin + bearing * range)
                    }
                    // standing on it
                    None => PerceivedEntity::new(entity.id, entity.entity_type, entity.position),
                };
                return Some(observation);
            }
            None
        })
        .collect::<Vec<_>>();

    let nav_directions = spatial.nav_directions(origin, ctx.config().explore_probe_distance);

    trace!(
        tick = ctx.clock.tick,
        perceived = entities.len(),
        directions = nav_directions.len(),
        "perception snapshot"
    );

    PerceivedInfo::new(entities, nav_directions)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::SimConfig;
    use crate::env::{Aabb, LevelGeometry};
    use crate::heuristics::WeightTable;
    use crate::state::{EntityCatalog, EntityId, EntityType, LevelEntity, Omniscience, Vec3};

    fn context(entities: Vec<LevelEntity>) -> SimContext {
        SimContext::new(
            Arc::new(SimConfig::default()),
            Arc::new(EntityCatalog::new(entities)),
            Arc::new(WeightTable::zeroed()),
        )
    }

    fn walled() -> LevelGeometry {
        LevelGeometry::new(
            Aabb::new(Vec3::new(-50.0, 0.0, -50.0), Vec3::new(50.0, 0.0, 50.0)),
            vec![Aabb::new(Vec3::new(4.0, 0.0, -2.0), Vec3::new(5.0, 3.0, 2.0))],
        )
    }

    #[test]
    fn range_and_line_of_sight_gate_perception() {
        let ctx = context(vec![
            LevelEntity::new(EntityId(1), EntityType::Poi, Vec3::new(0.0, 0.0, 5.0)),
            LevelEntity::new(EntityId(2), EntityType::Poi, Vec3::new(0.0, 0.0, 30.0)),
            LevelEntity::new(EntityId(3), EntityType::Poi, Vec3::new(8.0, 0.0, 0.0)),
        ]);
        let info = perceive(&ctx, AgentPose::at(Vec3::ZERO), 10.0, &walled());
        assert!(info.contains(EntityId(1)));
        assert!(!info.contains(EntityId(2)), "out of range");
        assert!(!info.contains(EntityId(3)), "behind the wall");
    }

    #[test]
    fn position_omniscience_bypasses_checks() {
        let far = Vec3::new(0.0, 0.0, 40.0);
        let ctx = context(vec![
            LevelEntity::new(EntityId(1), EntityType::GoalCompletion, far)
                .with_omniscience(Omniscience::POSITION),
        ]);
        let info = perceive(&ctx, AgentPose::at(Vec3::ZERO), 10.0, &walled());
        assert_eq!(info.entities.len(), 1);
        assert_eq!(info.entities[0].position, far);
        assert!(!info.entities[0].bearing_only);
    }

    #[test]
    fn direction_omniscience_gives_bearing_only() {
        let ctx = context(vec![
            LevelEntity::new(EntityId(1), EntityType::GoalCompletion, Vec3::new(0.0, 0.0, 40.0))
                .with_omniscience(Omniscience::DIRECTION),
        ]);
        let info = perceive(&ctx, AgentPose::at(Vec3::ZERO), 10.0, &walled());
        let seen = info.entities[0];
        assert!(seen.bearing_only);
        assert!((seen.position.z - 10.0).abs() < 1e-4);
    }

    #[test]
    fn perception_does_not_retain_anything() {
        let ctx = context(vec![LevelEntity::new(
            EntityId(1),
            EntityType::Poi,
            Vec3::new(0.0, 0.0, 5.0),
        )]);
        let near = perceive(&ctx, AgentPose::at(Vec3::ZERO), 10.0, &walled());
        let away = perceive(&ctx, AgentPose::at(Vec3::new(0.0, 0.0, -30.0)), 10.0, &walled());
        assert!(near.contains(EntityId(1)));
        assert!(!away.contains(EntityId(1)));
    }
}
