//! Linear exploration schedule

use serde::{Deserialize, Serialize};

/// Settings for the linear epsilon schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpsilonConfig {
    /// Exploration rate at the start of the run
    pub initial: f64,
    /// Floor reached after `decay_episodes` episodes
    #[serde(rename = "final")]
    pub final_value: f64,
    /// Episodes over which epsilon falls from `initial` to `final_value`
    pub decay_episodes: usize,
}

impl Default for EpsilonConfig {
    fn default() -> Self {
        Self {
            initial: 1.0,
            final_value: 0.1,
            decay_episodes: 400_000,
        }
    }
}

/// Exploration rate that decreases by a fixed step per episode
///
/// The step is `(initial - final) / decay_episodes`. Epsilon never increases
/// and never drops below the floor; a schedule with zero decay episodes
/// reaches the floor on its first decay.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonSchedule {
    config: EpsilonConfig,
    current: f64,
    step: f64,
}

impl EpsilonSchedule {
    pub fn new(config: EpsilonConfig) -> Self {
        let span = (config.initial - config.final_value).max(0.0);
        let step = if config.decay_episodes == 0 {
            span
        } else {
            span / config.decay_episodes as f64
        };
        Self {
            config,
            current: config.initial,
            step,
        }
    }

    /// Fixed exploration rate, e.g. for greedy evaluation
    pub fn constant(epsilon: f64) -> Self {
        Self::new(EpsilonConfig {
            initial: epsilon,
            final_value: epsilon,
            decay_episodes: 0,
        })
    }

    /// Current exploration rate
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Per-episode decrement
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Apply one episode of decay
    pub fn decay(&mut self) {
        if self.current > self.config.final_value {
            self.current = (self.current - self.step).max(self.config.final_value);
        }
    }
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self::new(EpsilonConfig::default())
    }
}
