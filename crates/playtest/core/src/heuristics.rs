//! Psychological drives, per-type weight tables and per-agent profiles.
//!
//! The weight table is authored once per level and shared read-only by every
//! agent; each agent carries its own [`HeuristicProfile`]. Both are indexed by
//! enum discriminant, so lookups never fail. Tables whose shape does not match
//! the enumerated sets are rebuilt from zeros instead of being rejected.

use tracing::warn;

use crate::env::RandomSource;
use crate::state::EntityType;

/// A named psychological drive.
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
pub enum Heuristic {
    /// Drive to see new things.
    Curiosity = 0,
    /// Drive to collect rewards and optional goals.
    Achievement = 1,
    /// Drive to finish the level.
    Completion = 2,
    /// Drive to seek out enemies.
    Aggression = 3,
    /// Drive to seek out danger of any kind.
    Adrenaline = 4,
    /// Drive to avoid danger and keep resources topped up.
    Caution = 5,
    /// Drive to take the shortest route.
    Efficiency = 6,
}

impl Heuristic {
    pub const COUNT: usize = 7;

    pub const fn all() -> [Heuristic; Self::COUNT] {
        [
            Heuristic::Curiosity,
            Heuristic::Achievement,
            Heuristic::Completion,
            Heuristic::Aggression,
            Heuristic::Adrenaline,
            Heuristic::Caution,
            Heuristic::Efficiency,
        ]
    }

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }
}

/// Contribution of one entity type to one heuristic.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityWeight {
    pub entity_type: EntityType,
    pub weight: f32,
}

impl EntityWeight {
    pub fn new(entity_type: EntityType, weight: f32) -> Self {
        Self {
            entity_type,
            weight,
        }
    }
}

/// Authored weight list for one heuristic.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeuristicWeightSet {
    pub heuristic: Heuristic,
    pub weights: Vec<EntityWeight>,
}

impl HeuristicWeightSet {
    /// A set with a zero weight for every entity type.
    pub fn zeroed(heuristic: Heuristic) -> Self {
        Self {
            heuristic,
            weights: EntityType::all()
                .into_iter()
                .map(|entity_type| EntityWeight::new(entity_type, 0.0))
                .collect(),
        }
    }

    /// Weight for `entity_type`; a missing entry counts as `0.0`.
    pub fn weight(&self, entity_type: EntityType) -> f32 {
        self.weights
            .iter()
            .find(|entry| entry.entity_type == entity_type)
            .map_or(0.0, |entry| entry.weight)
    }
}

/// Dense `heuristic x entity type` weight matrix.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<HeuristicWeightSet>", into = "Vec<HeuristicWeightSet>")
)]
pub struct WeightTable {
    weights: [[f32; EntityType::COUNT]; Heuristic::COUNT],
}

impl WeightTable {
    pub fn zeroed() -> Self {
        Self {
            weights: [[0.0; EntityType::COUNT]; Heuristic::COUNT],
        }
    }

    /// Builds the matrix from authored sets.
    ///
    /// A set list that does not hold exactly one set per heuristic is discarded
    /// and the whole table rebuilt as zeros. A single set with the wrong number
    /// of entries is zeroed on its own. Missing entries inside a well-formed
    /// set are `0.0`.
    pub fn from_sets(sets: &[HeuristicWeightSet]) -> Self {
        let mut table = Self::zeroed();

        let mut seen = [false; Heuristic::COUNT];
        for set in sets {
            seen[set.heuristic.as_index()] = true;
        }
        if sets.len() != Heuristic::COUNT || seen.iter().any(|present| !present) {
            warn!(
                sets = sets.len(),
                expected = Heuristic::COUNT,
                "weight table does not cover every heuristic; rebuilding from zeros"
            );
            return table;
        }

        for set in sets {
            if set.weights.len() != EntityType::COUNT {
                warn!(
                    heuristic = %set.heuristic,
                    entries = set.weights.len(),
                    expected = EntityType::COUNT,
                    "weight set does not cover every entity type; zeroing it"
                );
                continue;
            }
            let row = &mut table.weights[set.heuristic.as_index()];
            for entity_type in EntityType::all() {
                row[entity_type.as_index()] = set.weight(entity_type);
            }
        }
        table
    }

    #[inline]
    pub fn weight(&self, heuristic: Heuristic, entity_type: EntityType) -> f32 {
        self.weights[heuristic.as_index()][entity_type.as_index()]
    }

    #[must_use]
    pub fn with_weight(mut self, heuristic: Heuristic, entity_type: EntityType, weight: f32) -> Self {
        self.weights[heuristic.as_index()][entity_type.as_index()] = weight;
        self
    }

    pub fn to_sets(&self) -> Vec<HeuristicWeightSet> {
        Heuristic::all()
            .into_iter()
            .map(|heuristic| HeuristicWeightSet {
                heuristic,
                weights: EntityType::all()
                    .into_iter()
                    .map(|entity_type| {
                        EntityWeight::new(entity_type, self.weight(heuristic, entity_type))
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl From<Vec<HeuristicWeightSet>> for WeightTable {
    fn from(sets: Vec<HeuristicWeightSet>) -> Self {
        Self::from_sets(&sets)
    }
}

impl From<WeightTable> for Vec<HeuristicWeightSet> {
    fn from(table: WeightTable) -> Self {
        table.to_sets()
    }
}

/// Per-agent strength of one heuristic.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeuristicScale {
    pub heuristic: Heuristic,
    pub scale: f32,
}

impl HeuristicScale {
    pub fn new(heuristic: Heuristic, scale: f32) -> Self {
        Self { heuristic, scale }
    }
}

/// One agent's complete scale vector, one `[0, 1]` value per heuristic.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<HeuristicScale>", into = "Vec<HeuristicScale>")
)]
pub struct HeuristicProfile {
    scales: [f32; Heuristic::COUNT],
}

impl HeuristicProfile {
    pub fn zeroed() -> Self {
        Self {
            scales: [0.0; Heuristic::COUNT],
        }
    }

    /// Normalizes an authored scale list.
    ///
    /// Each value is clamped to `[0, 1]`. A list that does not name every
    /// heuristic exactly once is replaced with an all-zero profile.
    pub fn from_scales(scales: &[HeuristicScale]) -> Self {
        let mut profile = Self::zeroed();
        let mut seen = [false; Heuristic::COUNT];
        for entry in scales {
            seen[entry.heuristic.as_index()] = true;
        }
        if scales.len() != Heuristic::COUNT || seen.iter().any(|present| !present) {
            warn!(
                scales = scales.len(),
                expected = Heuristic::COUNT,
                "heuristic scales do not cover every heuristic; using zeros"
            );
            return profile;
        }
        for entry in scales {
            profile.scales[entry.heuristic.as_index()] = entry.scale.clamp(0.0, 1.0);
        }
        profile
    }

    #[must_use]
    pub fn with(mut self, heuristic: Heuristic, scale: f32) -> Self {
        self.scales[heuristic.as_index()] = scale.clamp(0.0, 1.0);
        self
    }

    #[inline]
    pub fn scale(&self, heuristic: Heuristic) -> f32 {
        self.scales[heuristic.as_index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = HeuristicScale> + '_ {
        Heuristic::all()
            .into_iter()
            .map(|heuristic| HeuristicScale::new(heuristic, self.scale(heuristic)))
    }

    pub fn to_scales(&self) -> Vec<HeuristicScale> {
        self.iter().collect()
    }
}

impl Default for HeuristicProfile {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl From<Vec<HeuristicScale>> for HeuristicProfile {
    fn from(scales: Vec<HeuristicScale>) -> Self {
        Self::from_scales(&scales)
    }
}

impl From<HeuristicProfile> for Vec<HeuristicScale> {
    fn from(profile: HeuristicProfile) -> Self {
        profile.to_scales()
    }
}

/// Sampling bounds for one heuristic when generating a population.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeuristicRange {
    pub heuristic: Heuristic,
    pub min: f32,
    pub max: f32,
}

impl HeuristicRange {
    pub fn new(heuristic: Heuristic, min: f32, max: f32) -> Self {
        Self { heuristic, min, max }
    }

    /// Full `[0, 1]` range.
    pub fn full(heuristic: Heuristic) -> Self {
        Self::new(heuristic, 0.0, 1.0)
    }

    /// One range per heuristic, all `[0, 1]`.
    pub fn defaults() -> Vec<Self> {
        Heuristic::all().into_iter().map(Self::full).collect()
    }

    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.range_f32(self.min, self.max)
    }
}

/// How agents of a batch get their scale vectors.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProfileMode {
    /// Every agent uses the same profile.
    Fixed(HeuristicProfile),
    /// Each agent draws every scale uniformly from its range.
    Range(Vec<HeuristicRange>),
    /// Agents take authored profiles in order, wrapping around.
    Load(Vec<HeuristicProfile>),
}

impl ProfileMode {
    /// Profile for the `index`-th agent of a batch.
    pub fn profile_for<R: RandomSource + ?Sized>(&self, index: usize, rng: &mut R) -> HeuristicProfile {
        match self {
            ProfileMode::Fixed(profile) => profile.clone(),
            ProfileMode::Range(ranges) => {
                let rebuilt;
                let ranges = if ranges.len() == Heuristic::COUNT {
                    ranges.as_slice()
                } else {
                    warn!(
                        ranges = ranges.len(),
                        expected = Heuristic::COUNT,
                        "heuristic ranges do not cover every heuristic; using [0, 1]"
                    );
                    rebuilt = HeuristicRange::defaults();
                    rebuilt.as_slice()
                };
                let scales: Vec<_> = ranges
                    .iter()
                    .map(|range| HeuristicScale::new(range.heuristic, range.sample(rng)))
                    .collect();
                HeuristicProfile::from_scales(&scales)
            }
            ProfileMode::Load(profiles) => {
                if profiles.is_empty() {
                    warn!("no profiles to load; using zeros");
                    return HeuristicProfile::zeroed();
                }
                profiles[index % profiles.len()].clone()
            }
        }
    }
}

/// Per-agent experience in `[0, 1]`, mapped onto the memory-navigation chance.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExperienceMode {
    Fixed(f32),
    Range { min: f32, max: f32 },
}

impl ExperienceMode {
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f32 {
        match *self {
            ExperienceMode::Fixed(value) => value.clamp(0.0, 1.0),
            ExperienceMode::Range { min, max } => rng.range_f32(min, max).clamp(0.0, 1.0),
        }
    }
}

impl Default for ExperienceMode {
    fn default() -> Self {
        ExperienceMode::Fixed(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    #[test]
    fn missing_entry_in_set_counts_as_zero() {
        let set = HeuristicWeightSet {
            heuristic: Heuristic::Curiosity,
            weights: vec![EntityWeight::new(EntityType::Poi, 1.0)],
        };
        assert_eq!(set.weight(EntityType::Poi), 1.0);
        assert_eq!(set.weight(EntityType::HazardEnemy), 0.0);
    }

    #[test]
    fn short_set_list_rebuilds_zero_table() {
        let mut set = HeuristicWeightSet::zeroed(Heuristic::Curiosity);
        set.weights[EntityType::Poi.as_index()].weight = 3.0;

        let table = WeightTable::from_sets(&[set]);
        assert_eq!(table, WeightTable::zeroed());
    }

    #[test]
    fn malformed_set_is_zeroed_alone() {
        let mut sets: Vec<_> = Heuristic::all()
            .into_iter()
            .map(HeuristicWeightSet::zeroed)
            .collect();
        sets[Heuristic::Curiosity.as_index()].weights[EntityType::Poi.as_index()].weight = 2.0;
        sets[Heuristic::Caution.as_index()].weights.truncate(2);
        sets[Heuristic::Caution.as_index()].weights[0].weight = 9.0;

        let table = WeightTable::from_sets(&sets);
        assert_eq!(table.weight(Heuristic::Curiosity, EntityType::Poi), 2.0);
        assert_eq!(table.weight(Heuristic::Caution, EntityType::GoalOptional), 0.0);
    }

    #[test]
    fn table_round_trips_through_sets() {
        let table = WeightTable::zeroed().with_weight(Heuristic::Aggression, EntityType::HazardEnemy, -1.5);
        assert_eq!(WeightTable::from_sets(&table.to_sets()), table);
    }

    #[test]
    fn profile_clamps_scales() {
        let scales: Vec<_> = Heuristic::all()
            .into_iter()
            .map(|heuristic| HeuristicScale::new(heuristic, 1.7))
            .collect();
        let profile = HeuristicProfile::from_scales(&scales);
        assert!(profile.iter().all(|entry| entry.scale == 1.0));
    }

    #[test]
    fn profile_with_wrong_cardinality_is_zeroed() {
        let profile = HeuristicProfile::from_scales(&[HeuristicScale::new(Heuristic::Curiosity, 1.0)]);
        assert_eq!(profile, HeuristicProfile::zeroed());
    }

    #[test]
    fn range_mode_samples_within_bounds() {
        let ranges: Vec<_> = Heuristic::all()
            .into_iter()
            .map(|heuristic| HeuristicRange::new(heuristic, 0.25, 0.5))
            .collect();
        let mode = ProfileMode::Range(ranges);
        let mut rng = PcgRng::seeded(11);
        for index in 0..16 {
            let profile = mode.profile_for(index, &mut rng);
            assert!(profile.iter().all(|entry| (0.25..=0.5).contains(&entry.scale)));
        }
    }

    #[test]
    fn load_mode_cycles_profiles() {
        let a = HeuristicProfile::zeroed().with(Heuristic::Curiosity, 1.0);
        let b = HeuristicProfile::zeroed().with(Heuristic::Caution, 1.0);
        let mode = ProfileMode::Load(vec![a.clone(), b.clone()]);
        let mut rng = PcgRng::seeded(0);
        assert_eq!(mode.profile_for(0, &mut rng), a);
        assert_eq!(mode.profile_for(1, &mut rng), b);
        assert_eq!(mode.profile_for(2, &mut rng), a);
    }
}
