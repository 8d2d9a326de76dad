//! Q-learning agent
//!
//! Owns the value table, the exploration schedule and the random source, so
//! that every operation takes its state explicitly instead of reaching for
//! module-level globals.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    q_learning::{
        epsilon::{EpsilonConfig, EpsilonSchedule},
        q_table::{NUM_ACTIONS, QTable},
    },
    tictactoe::State,
};

fn entropy_rng() -> StdRng {
    StdRng::from_rng(&mut rand::rng())
}

/// Q-learning agent (off-policy TD control)
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    epsilon: EpsilonSchedule,
    rng: StdRng,
}

impl QLearningAgent {
    /// Create an agent around an existing table (usually from
    /// [`crate::q_learning::serialization::load`])
    pub fn new(q_table: QTable, epsilon: EpsilonConfig) -> Self {
        Self {
            q_table,
            epsilon: EpsilonSchedule::new(epsilon),
            rng: entropy_rng(),
        }
    }

    /// Agent that always exploits its table
    pub fn greedy(q_table: QTable) -> Self {
        Self {
            q_table,
            epsilon: EpsilonSchedule::constant(0.0),
            rng: entropy_rng(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    /// Restart the random stream from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon.current()
    }

    /// ε-greedy selection over all nine actions.
    ///
    /// With probability `epsilon` returns a uniformly random action, otherwise
    /// the highest-valued action (lowest index on ties). Occupied cells are
    /// not filtered out.
    pub fn select_action(&mut self, state: State, epsilon: f64) -> usize {
        if self.rng.random::<f64>() < epsilon {
            self.rng.random_range(0..NUM_ACTIONS)
        } else {
            self.q_table.greedy_action(state)
        }
    }

    /// ε-greedy selection restricted to `legal` actions.
    ///
    /// Returns `None` when `legal` is empty.
    pub fn select_legal_action(
        &mut self,
        state: State,
        legal: &[usize],
        epsilon: f64,
    ) -> Option<usize> {
        if legal.is_empty() {
            return None;
        }
        if self.rng.random::<f64>() < epsilon {
            legal.choose(&mut self.rng).copied()
        } else {
            self.q_table.greedy_legal_action(state, legal)
        }
    }

    /// Apply the one-step TD rule and return the change made to Q(s,a)
    pub fn update(
        &mut self,
        state: State,
        action: usize,
        reward: f64,
        next_state: State,
        alpha: f64,
        gamma: f64,
    ) -> f64 {
        self.q_table
            .q_learning_update(state, action, reward, next_state, alpha, gamma)
    }

    /// Decay epsilon after an episode
    pub fn decay_epsilon(&mut self) {
        self.epsilon.decay();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> QLearningAgent {
        QLearningAgent::new(QTable::new(), EpsilonConfig::default()).with_seed(7)
    }

    #[test]
    fn test_greedy_tie_break_returns_action_zero() {
        let mut agent = agent();
        for _ in 0..20 {
            assert_eq!(agent.select_action(123, 0.0), 0);
        }
    }

    #[test]
    fn test_greedy_follows_table() {
        let mut agent = agent();
        agent.q_table_mut().set(11, 6, 0.3);
        assert_eq!(agent.select_action(11, 0.0), 6);
    }

    #[test]
    fn test_full_exploration_stays_in_range() {
        let mut agent = agent();
        let mut seen = [false; NUM_ACTIONS];
        for _ in 0..500 {
            let action = agent.select_action(0, 1.0);
            assert!(action < NUM_ACTIONS);
            seen[action] = true;
        }
        assert!(seen.iter().all(|&s| s), "uniform exploration should hit all actions");
    }

    #[test]
    fn test_legal_selection_never_leaves_legal_set() {
        let mut agent = agent();
        agent.q_table_mut().set(50, 0, 10.0);
        let legal = [2, 5, 7];
        for epsilon in [0.0, 0.5, 1.0] {
            for _ in 0..200 {
                let action = agent.select_legal_action(50, &legal, epsilon).unwrap();
                assert!(legal.contains(&action));
            }
        }
        assert_eq!(agent.select_legal_action(50, &[], 0.0), None);
    }

    #[test]
    fn test_update_moves_toward_target() {
        let mut agent = agent();
        agent.q_table_mut().set(1, 3, 0.4);
        agent.q_table_mut().set(2, 8, 1.0);

        let before = agent.q_table().td_error(1, 3, 0.5, 2, 0.9).abs();
        agent.update(1, 3, 0.5, 2, 0.2, 0.9);
        let after = agent.q_table().td_error(1, 3, 0.5, 2, 0.9).abs();
        assert!(after < before);
    }

    #[test]
    fn test_decay_epsilon() {
        let mut agent = QLearningAgent::new(
            QTable::new(),
            EpsilonConfig {
                initial: 1.0,
                final_value: 0.5,
                decay_episodes: 2,
            },
        );
        agent.decay_epsilon();
        assert!((agent.epsilon() - 0.75).abs() < 1e-12);
        agent.decay_epsilon();
        agent.decay_epsilon();
        assert_eq!(agent.epsilon(), 0.5);
    }
}
