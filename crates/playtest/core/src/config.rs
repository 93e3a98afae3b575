//! Simulation constants and tunable parameters.

use crate::error::ConfigError;

/// Tunables shared by every agent in an episode.
///
/// Defaults reproduce the reference behaviour; a `config.toml` only needs to
/// name the fields it changes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    // ===== memory =====
    /// Exposure (seconds) after which a memory becomes long-term.
    pub impression_convert_ltm: f32,
    pub forget_time_min: f32,
    pub forget_time_max: f32,
    pub mem_capacity_min: usize,
    pub mem_capacity_max: usize,

    // ===== navigation =====
    /// How close the agent must pass an entity to count it as visited.
    pub visit_threshold_sqr: f32,
    /// Two goal positions closer than this are the same destination.
    pub goal_epsilon_sqr: f32,
    /// How close the agent must get to a waypoint to have crossed it.
    pub waypoint_epsilon_sqr: f32,
    /// Explore memories closer than this (origin distance) may merge.
    pub explore_pos_threshold: f32,
    /// Explore memories within this angle (degrees) may merge.
    pub explore_deg_threshold: f32,
    /// Maximum hop length between two remembered places on a memory path.
    pub memory_link_radius: f32,
    /// How far ahead an explore pseudo-target is placed.
    pub explore_probe_distance: f32,

    // ===== behaviour =====
    pub heuristic_epsilon: f32,
    /// Minimum hop count for a remembered path to be used instead of the navmesh.
    pub min_memory_path_length: usize,
    pub memory_nav_chance: f32,
    pub memory_nav_chance_min: f32,
    pub memory_nav_chance_max: f32,
    pub final_goal_bonus_factor: f32,
    pub final_goal_achiever_penalty_factor: f32,
    pub final_goal_explorer_penalty_factor: f32,
    pub score_max: f32,

    // ===== agent & episode =====
    pub perception_range: f32,
    /// Seconds between re-plans while a route is in progress.
    pub planning_interval: f32,
    /// Simulated seconds per tick.
    pub tick_seconds: f32,
    /// Tick budget per episode.
    pub max_ticks: u64,
    /// Movement speed in units per second.
    pub agent_speed: f32,
    /// Seconds between position samples in the event log.
    pub sample_interval: f32,
}

impl SimConfig {
    pub const IMPRESSION_CONVERT_LTM: f32 = 5.0;
    pub const FORGET_TIME_MIN: f32 = 15.0;
    pub const FORGET_TIME_MAX: f32 = 30.0;
    pub const MEM_CAPACITY_MIN: usize = 3;
    pub const MEM_CAPACITY_MAX: usize = 5;

    pub const VISIT_THRESHOLD_SQR: f32 = 1.0;
    pub const GOAL_EPSILON_SQR: f32 = 0.1;
    pub const WAYPOINT_EPSILON_SQR: f32 = 1.0;
    pub const EXPLORE_POS_THRESHOLD: f32 = 2.0;
    pub const EXPLORE_DEG_THRESHOLD: f32 = 5.0;

    pub const HEURISTIC_EPSILON: f32 = 0.1;
    pub const MIN_A_STAR_MEMORY_LENGTH: usize = 3;
    pub const BASE_MEMORY_NAV_CHANCE: f32 = 0.5;
    pub const MEMORY_NAV_CHANCE_MIN: f32 = 0.0;
    pub const MEMORY_NAV_CHANCE_MAX: f32 = 1.0;
    pub const FINAL_GOAL_BONUS_FACTOR: f32 = 5.0;
    pub const FINAL_GOAL_ACHIEVER_PENALTY_FACTOR: f32 = 1.0;
    pub const FINAL_GOAL_EXPLORER_PENALTY_FACTOR: f32 = 1.0;
    pub const SCORE_MAX: f32 = 10000.0;

    pub const DEFAULT_PERCEPTION_RANGE: f32 = 20.0;
    pub const DEFAULT_PLANNING_INTERVAL: f32 = 0.5;
    pub const DEFAULT_TICK_SECONDS: f32 = 0.1;
    pub const DEFAULT_MAX_TICKS: u64 = 6000;
    pub const DEFAULT_AGENT_SPEED: f32 = 4.0;
    pub const DEFAULT_MEMORY_LINK_RADIUS: f32 = 12.0;
    pub const DEFAULT_EXPLORE_PROBE_DISTANCE: f32 = 8.0;
    pub const DEFAULT_SAMPLE_INTERVAL: f32 = 0.5;

    pub fn new() -> Self {
        Self {
            impression_convert_ltm: Self::IMPRESSION_CONVERT_LTM,
            forget_time_min: Self::FORGET_TIME_MIN,
            forget_time_max: Self::FORGET_TIME_MAX,
            mem_capacity_min: Self::MEM_CAPACITY_MIN,
            mem_capacity_max: Self::MEM_CAPACITY_MAX,
            visit_threshold_sqr: Self::VISIT_THRESHOLD_SQR,
            goal_epsilon_sqr: Self::GOAL_EPSILON_SQR,
            waypoint_epsilon_sqr: Self::WAYPOINT_EPSILON_SQR,
            explore_pos_threshold: Self::EXPLORE_POS_THRESHOLD,
            explore_deg_threshold: Self::EXPLORE_DEG_THRESHOLD,
            memory_link_radius: Self::DEFAULT_MEMORY_LINK_RADIUS,
            explore_probe_distance: Self::DEFAULT_EXPLORE_PROBE_DISTANCE,
            heuristic_epsilon: Self::HEURISTIC_EPSILON,
            min_memory_path_length: Self::MIN_A_STAR_MEMORY_LENGTH,
            memory_nav_chance: Self::BASE_MEMORY_NAV_CHANCE,
            memory_nav_chance_min: Self::MEMORY_NAV_CHANCE_MIN,
            memory_nav_chance_max: Self::MEMORY_NAV_CHANCE_MAX,
            final_goal_bonus_factor: Self::FINAL_GOAL_BONUS_FACTOR,
            final_goal_achiever_penalty_factor: Self::FINAL_GOAL_ACHIEVER_PENALTY_FACTOR,
            final_goal_explorer_penalty_factor: Self::FINAL_GOAL_EXPLORER_PENALTY_FACTOR,
            score_max: Self::SCORE_MAX,
            perception_range: Self::DEFAULT_PERCEPTION_RANGE,
            planning_interval: Self::DEFAULT_PLANNING_INTERVAL,
            tick_seconds: Self::DEFAULT_TICK_SECONDS,
            max_ticks: Self::DEFAULT_MAX_TICKS,
            agent_speed: Self::DEFAULT_AGENT_SPEED,
            sample_interval: Self::DEFAULT_SAMPLE_INTERVAL,
        }
    }

    /// Memory-navigation chance for an agent of the given experience (`0..=1`).
    ///
    /// `0.5` is the configured `memory_nav_chance`; lower experience slides
    /// linearly toward `memory_nav_chance_min`, higher toward `memory_nav_chance_max`.
    pub fn memory_nav_chance_for(&self, experience: f32) -> f32 {
        let t = experience.clamp(0.0, 1.0);
        let base = self.memory_nav_chance;
        if t <= 0.5 {
            self.memory_nav_chance_min + (base - self.memory_nav_chance_min) * (t * 2.0)
        } else {
            base + (self.memory_nav_chance_max - base) * ((t - 0.5) * 2.0)
        }
    }

    /// Checks ranges and intervals.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forget_time_min > self.forget_time_max {
            return Err(ConfigError::InvertedRange {
                field: "forget_time",
                min: self.forget_time_min,
                max: self.forget_time_max,
            });
        }
        if self.mem_capacity_min > self.mem_capacity_max {
            return Err(ConfigError::InvertedRange {
                field: "mem_capacity",
                min: self.mem_capacity_min as f32,
                max: self.mem_capacity_max as f32,
            });
        }
        if self.memory_nav_chance_min > self.memory_nav_chance_max {
            return Err(ConfigError::InvertedRange {
                field: "memory_nav_chance",
                min: self.memory_nav_chance_min,
                max: self.memory_nav_chance_max,
            });
        }
        if !(self.memory_nav_chance_min..=self.memory_nav_chance_max)
            .contains(&self.memory_nav_chance)
        {
            return Err(ConfigError::OutOfRange {
                field: "memory_nav_chance",
                value: self.memory_nav_chance,
            });
        }
        for (field, value) in [
            ("tick_seconds", self.tick_seconds),
            ("planning_interval", self.planning_interval),
            ("agent_speed", self.agent_speed),
            ("perception_range", self.perception_range),
            ("sample_interval", self.sample_interval),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::NonPositive {
                field: "max_ticks",
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_forget_range_is_rejected() {
        let config = SimConfig {
            forget_time_min: 40.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { field: "forget_time", .. })
        ));
    }

    #[test]
    fn average_experience_maps_to_base_chance() {
        let config = SimConfig::default();
        assert!((config.memory_nav_chance_for(0.5) - SimConfig::BASE_MEMORY_NAV_CHANCE).abs() < 1e-6);
        assert_eq!(config.memory_nav_chance_for(2.0), 1.0);
    }

    #[test]
    fn experience_is_anchored_at_the_configured_base_chance() {
        let config = SimConfig {
            memory_nav_chance: 0.9,
            ..SimConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!((config.memory_nav_chance_for(0.5) - 0.9).abs() < 1e-6);
        assert!((config.memory_nav_chance_for(0.0) - config.memory_nav_chance_min).abs() < 1e-6);
        assert!((config.memory_nav_chance_for(1.0) - config.memory_nav_chance_max).abs() < 1e-6);
        // halfway between the base and the upper bound
        let expected = 0.9 + (config.memory_nav_chance_max - 0.9) * 0.5;
        assert!((config.memory_nav_chance_for(0.75) - expected).abs() < 1e-6);
    }
}
