//! Explicit simulation context threaded through every agent call.

use std::sync::Arc;

use crate::config::SimConfig;
use crate::heuristics::WeightTable;
use crate::state::EntityCatalog;

/// Simulated time of one episode.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimClock {
    pub tick: u64,
    /// Simulated seconds since the episode started.
    pub elapsed: f32,
}

impl SimClock {
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed += dt;
    }
}

/// Per-episode clock plus the read-only data every agent shares.
///
/// Cloning is cheap: the catalog, weight table and config are reference
/// counted, and each episode clones its own context so clocks never alias.
#[derive(Clone, Debug)]
pub struct SimContext {
    pub clock: SimClock,
    config: Arc<SimConfig>,
    catalog: Arc<EntityCatalog>,
    weights: Arc<WeightTable>,
}

impl SimContext {
    pub fn new(
        config: Arc<SimConfig>,
        catalog: Arc<EntityCatalog>,
        weights: Arc<WeightTable>,
    ) -> Self {
        Self {
            clock: SimClock::default(),
            config,
            catalog,
            weights,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Length of one tick in simulated seconds.
    pub fn dt(&self) -> f32 {
        self.config.tick_seconds
    }

    pub fn now(&self) -> f32 {
        self.clock.elapsed
    }

    /// Advances the clock by one tick and returns `dt`.
    pub fn advance(&mut self) -> f32 {
        let dt = self.dt();
        self.clock.advance(dt);
        dt
    }

    /// Whether the tick budget has run out.
    pub fn budget_exhausted(&self) -> bool {
        self.clock.tick >= self.config.max_ticks
    }
}
