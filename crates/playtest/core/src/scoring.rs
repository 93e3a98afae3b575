//! Heuristic utility engine.
//!
//! Every candidate gets `sum(scale_h * weight[h][type])`, adjusted for the
//! completion goal by the endgame rules and clamped to `[0, score_max]`.
//! Selection takes the best utility; anything within `heuristic_epsilon` of
//! it counts as tied.

use std::collections::BTreeSet;

use tracing::trace;

use crate::config::SimConfig;
use crate::heuristics::{Heuristic, HeuristicProfile, WeightTable};
use crate::memory::MemoryStore;
use crate::state::{EntityCatalog, EntityId, EntityType, PerceivedEntity, PerceivedInfo, Vec3};

/// Where a candidate came from. Perceived candidates are listed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateSource {
    Perceived,
    Remembered,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub entity: PerceivedEntity,
    pub source: CandidateSource,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub utility: f32,
}

impl ScoredCandidate {
    pub fn id(&self) -> EntityId {
        self.candidate.entity.id
    }

    pub fn position(&self) -> Vec3 {
        self.candidate.entity.position
    }
}

/// Level progress as seen by one agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndgameStatus {
    pub optional_remaining: usize,
    pub mandatory_remaining: usize,
    /// Known entities, other than hazards and the completion goal, not yet visited.
    pub unexplored: usize,
}

impl EndgameStatus {
    pub fn evaluate(
        catalog: &EntityCatalog,
        visited: &BTreeSet<EntityId>,
        candidates: &[Candidate],
    ) -> Self {
        let remaining = |entity_type| {
            catalog
                .of_type(entity_type)
                .filter(|entity| !visited.contains(&entity.id))
                .count()
        };
        let unexplored = candidates
            .iter()
            .filter(|candidate| {
                let entity_type = candidate.entity.entity_type;
                !entity_type.is_hazard() && entity_type != EntityType::GoalCompletion
            })
            .count();

        Self {
            optional_remaining: remaining(EntityType::GoalOptional),
            mandatory_remaining: remaining(EntityType::GoalMandatory),
            unexplored,
        }
    }
}

/// Perceived plus remembered entities, deduplicated by id, visited ones removed.
///
/// Perceived entities come first in catalog order, then memories in the order
/// they were first stored. [`select_target`] falls back to this order.
pub fn gather_candidates(
    perceived: &PerceivedInfo,
    memory: &MemoryStore,
    visited: &BTreeSet<EntityId>,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let perceived_iter = perceived.entities.iter().map(|entity| Candidate {
        entity: *entity,
        source: CandidateSource::Perceived,
    });
    let remembered_iter = memory.entities().iter().map(|memory| Candidate {
        entity: memory.entity,
        source: CandidateSource::Remembered,
    });
    for candidate in perceived_iter.chain(remembered_iter) {
        let id = candidate.entity.id;
        if visited.contains(&id) || memory.is_visited(id) {
            continue;
        }
        if candidates.iter().any(|existing| existing.entity.id == id) {
            continue;
        }
        candidates.push(candidate);
    }
    candidates
}

/// Scores candidates for one agent.
#[derive(Clone, Copy, Debug)]
pub struct UtilityEngine<'a> {
    profile: &'a HeuristicProfile,
    weights: &'a WeightTable,
    config: &'a SimConfig,
}

impl<'a> UtilityEngine<'a> {
    pub fn new(profile: &'a HeuristicProfile, weights: &'a WeightTable, config: &'a SimConfig) -> Self {
        Self {
            profile,
            weights,
            config,
        }
    }

    /// Unclamped weighted sum for an entity type.
    pub fn raw_score(&self, entity_type: EntityType) -> f32 {
        Heuristic::all()
            .into_iter()
            .map(|heuristic| self.profile.scale(heuristic) * self.weights.weight(heuristic, entity_type))
            .sum()
    }

    /// Final utility of one candidate: endgame adjustment, then clamp.
    pub fn score(&self, entity_type: EntityType, endgame: &EndgameStatus) -> f32 {
        let mut utility = self.raw_score(entity_type);

        if entity_type == EntityType::GoalCompletion {
            if endgame.optional_remaining > 0 {
                utility -= self.config.final_goal_achiever_penalty_factor
                    * self.profile.scale(Heuristic::Achievement)
                    * endgame.optional_remaining as f32;
            } else if endgame.mandatory_remaining == 0 {
                utility *= self.config.final_goal_bonus_factor;
            }
            if endgame.unexplored > 0 {
                utility -= self.config.final_goal_explorer_penalty_factor
                    * self.profile.scale(Heuristic::Curiosity)
                    * endgame.unexplored as f32;
            }
        }

        utility.clamp(0.0, self.config.score_max)
    }

    pub fn rank(&self, candidates: &[Candidate], endgame: &EndgameStatus) -> Vec<ScoredCandidate> {
        candidates
            .iter()
            .map(|candidate| {
                let utility = self.score(candidate.entity.entity_type, endgame);
                trace!(id = %candidate.entity.id, utility, "scored candidate");
                ScoredCandidate {
                    candidate: *candidate,
                    utility,
                }
            })
            .collect()
    }
}

/// Picks the target among scored candidates.
///
/// Candidates within `epsilon` of the best utility are tied. Among ties the
/// previous target wins if present; otherwise the nearest to `agent`;
/// otherwise the first in candidate order. Returns `None` when nothing has a
/// positive utility.
pub fn select_target(
    scored: &[ScoredCandidate],
    agent: Vec3,
    previous: Option<EntityId>,
    epsilon: f32,
) -> Option<ScoredCandidate> {
    let best = scored
        .iter()
        .map(|entry| entry.utility)
        .fold(f32::NEG_INFINITY, f32::max);
    if !(best > 0.0) {
        return None;
    }

    let is_tied = |entry: &&ScoredCandidate| best - entry.utility <= epsilon;
    if let Some(kept) = previous
        .and_then(|previous| scored.iter().filter(is_tied).find(|entry| entry.id() == previous))
    {
        return Some(*kept);
    }

    let mut tied = scored.iter().filter(is_tied);

    let first = tied.next()?;
    let mut chosen = *first;
    let mut chosen_dist = agent.distance_squared(first.position());
    for entry in tied {
        let dist = agent.distance_squared(entry.position());
        if dist < chosen_dist {
            chosen = *entry;
            chosen_dist = dist;
        }
    }
    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{LevelEntity, Vec3};

    fn candidate(id: u32, entity_type: EntityType, position: Vec3) -> Candidate {
        Candidate {
            entity: PerceivedEntity::new(EntityId(id), entity_type, position),
            source: CandidateSource::Perceived,
        }
    }

    fn scored(id: u32, utility: f32, position: Vec3) -> ScoredCandidate {
        ScoredCandidate {
            candidate: candidate(id, EntityType::Poi, position),
            utility,
        }
    }

    #[test]
    fn negative_weights_clamp_to_zero() {
        let profile = HeuristicProfile::zeroed()
            .with(Heuristic::Caution, 1.0)
            .with(Heuristic::Aggression, 0.2);
        let weights = WeightTable::zeroed()
            .with_weight(Heuristic::Caution, EntityType::HazardEnemy, -3.0)
            .with_weight(Heuristic::Aggression, EntityType::HazardEnemy, 1.0);
        let config = SimConfig::default();
        let engine = UtilityEngine::new(&profile, &weights, &config);

        assert!((engine.raw_score(EntityType::HazardEnemy) + 2.8).abs() < 1e-5);
        assert_eq!(engine.score(EntityType::HazardEnemy, &EndgameStatus::default()), 0.0);
    }

    #[test]
    fn optional_goals_left_penalise_completion() {
        let profile = HeuristicProfile::zeroed()
            .with(Heuristic::Completion, 1.0)
            .with(Heuristic::Achievement, 1.0);
        let weights = WeightTable::zeroed().with_weight(Heuristic::Completion, EntityType::GoalCompletion, 2.0);
        let config = SimConfig::default();
        let engine = UtilityEngine::new(&profile, &weights, &config);

        let endgame = EndgameStatus {
            optional_remaining: 1,
            ..EndgameStatus::default()
        };
        assert!((engine.score(EntityType::GoalCompletion, &endgame) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn mandatory_goals_left_withhold_bonus() {
        let profile = HeuristicProfile::zeroed().with(Heuristic::Completion, 1.0);
        let weights = WeightTable::zeroed().with_weight(Heuristic::Completion, EntityType::GoalCompletion, 2.0);
        let config = SimConfig::default();
        let engine = UtilityEngine::new(&profile, &weights, &config);

        let endgame = EndgameStatus {
            mandatory_remaining: 1,
            ..EndgameStatus::default()
        };
        assert!((engine.score(EntityType::GoalCompletion, &endgame) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn endgame_counts_only_unvisited_non_hazard_candidates() {
        let entity = |id, entity_type| LevelEntity::new(EntityId(id), entity_type, Vec3::new(id as f32, 0.0, 0.0));
        let catalog = EntityCatalog::new(vec![
            entity(1, EntityType::GoalOptional),
            entity(2, EntityType::GoalOptional),
            entity(3, EntityType::GoalMandatory),
            entity(4, EntityType::GoalCompletion),
            entity(5, EntityType::HazardEnemy),
            entity(6, EntityType::HazardEnvironment),
            entity(7, EntityType::Poi),
        ]);
        let perceived = PerceivedInfo::new(
            catalog
                .iter()
                .map(|e| PerceivedEntity::new(e.id, e.entity_type, e.position))
                .collect(),
            Vec::new(),
        );
        let visited = BTreeSet::from([EntityId(1)]);

        let candidates = gather_candidates(&perceived, &MemoryStore::new(3), &visited);
        let endgame = EndgameStatus::evaluate(&catalog, &visited, &candidates);

        // optional #2, mandatory #3 and the POI; hazards, the exit and visited #1 are skipped
        assert_eq!(
            endgame,
            EndgameStatus {
                optional_remaining: 1,
                mandatory_remaining: 1,
                unexplored: 3,
            }
        );
    }

    #[test]
    fn explorer_penalty_follows_the_bonus() {
        let profile = HeuristicProfile::zeroed()
            .with(Heuristic::Completion, 1.0)
            .with(Heuristic::Curiosity, 0.5);
        let weights = WeightTable::zeroed().with_weight(Heuristic::Completion, EntityType::GoalCompletion, 10.0);
        let config = SimConfig::default();
        let engine = UtilityEngine::new(&profile, &weights, &config);

        let endgame = EndgameStatus {
            unexplored: 2,
            ..EndgameStatus::default()
        };
        // 10 * 5 - 1 * 0.5 * 2
        assert!((engine.score(EntityType::GoalCompletion, &endgame) - 49.0).abs() < 1e-4);
    }

    #[test]
    fn achiever_and_explorer_penalties_stack() {
        let profile = HeuristicProfile::zeroed()
            .with(Heuristic::Completion, 1.0)
            .with(Heuristic::Achievement, 1.0)
            .with(Heuristic::Curiosity, 0.5);
        let weights = WeightTable::zeroed().with_weight(Heuristic::Completion, EntityType::GoalCompletion, 10.0);
        let config = SimConfig::default();
        let engine = UtilityEngine::new(&profile, &weights, &config);

        let endgame = EndgameStatus {
            optional_remaining: 2,
            mandatory_remaining: 0,
            unexplored: 3,
        };
        // no bonus: 10 - 1 * 1 * 2 - 1 * 0.5 * 3
        assert!((engine.score(EntityType::GoalCompletion, &endgame) - 6.5).abs() < 1e-4);

        // penalties never touch other entity types
        assert!((engine.score(EntityType::Poi, &endgame)).abs() < 1e-6);
    }

    #[test]
    fn tie_prefers_nearest_on_first_pick() {
        let far = scored(1, 1.0, Vec3::new(0.0, 0.0, 10.0));
        let near = scored(2, 0.95, Vec3::new(0.0, 0.0, 2.0));
        let chosen = select_target(&[far, near], Vec3::ZERO, None, 0.1);
        assert_eq!(chosen.map(|c| c.id()), Some(EntityId(2)));
    }

    #[test]
    fn tie_keeps_previous_target() {
        let a = scored(1, 1.0, Vec3::new(0.0, 0.0, 10.0));
        let b = scored(2, 0.95, Vec3::new(0.0, 0.0, 2.0));
        let chosen = select_target(&[a, b], Vec3::ZERO, Some(EntityId(1)), 0.1);
        assert_eq!(chosen.map(|c| c.id()), Some(EntityId(1)));
    }

    #[test]
    fn clear_winner_overrides_previous() {
        let a = scored(1, 0.5, Vec3::new(0.0, 0.0, 1.0));
        let b = scored(2, 2.0, Vec3::new(0.0, 0.0, 9.0));
        let chosen = select_target(&[a, b], Vec3::ZERO, Some(EntityId(1)), 0.1);
        assert_eq!(chosen.map(|c| c.id()), Some(EntityId(2)));
    }

    #[test]
    fn equidistant_ties_fall_back_to_candidate_order() {
        let a = scored(7, 1.0, Vec3::new(3.0, 0.0, 0.0));
        let b = scored(3, 1.0, Vec3::new(-3.0, 0.0, 0.0));
        let chosen = select_target(&[a, b], Vec3::ZERO, None, 0.1);
        assert_eq!(chosen.map(|c| c.id()), Some(EntityId(7)));
    }

    #[test]
    fn nothing_positive_selects_nothing() {
        let a = scored(1, 0.0, Vec3::ZERO);
        assert!(select_target(&[a], Vec3::ZERO, None, 0.1).is_none());
        assert!(select_target(&[], Vec3::ZERO, None, 0.1).is_none());
    }
}
