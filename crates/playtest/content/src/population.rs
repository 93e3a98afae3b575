//! Who plays: how a batch hands out heuristic profiles and experience.

use playtest_core::{
    AgentTuning, ExperienceMode, HeuristicProfile, HeuristicRange, ProfileMode, RandomSource,
    SimConfig,
};

/// Population settings for a batch of agents.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationSpec {
    pub profiles: ProfileMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience: ExperienceMode,
}

impl Default for PopulationSpec {
    /// Every heuristic drawn from `[0, 1]`, average experience.
    fn default() -> Self {
        Self {
            profiles: ProfileMode::Range(HeuristicRange::defaults()),
            experience: ExperienceMode::default(),
        }
    }
}

impl PopulationSpec {
    /// Profile and tuning for the `index`-th agent.
    pub fn draw<R: RandomSource + ?Sized>(
        &self,
        index: usize,
        config: &SimConfig,
        rng: &mut R,
    ) -> (HeuristicProfile, AgentTuning) {
        let profile = self.profiles.profile_for(index, rng);
        let experience = self.experience.sample(rng);
        (profile, AgentTuning::sample(config, experience, rng))
    }
}
