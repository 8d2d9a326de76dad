//! Dense Q-table indexed by encoded board state and action

use crate::tictactoe::{NUM_CELLS, NUM_STATES, State};

/// Number of actions per state (one per cell)
pub const NUM_ACTIONS: usize = NUM_CELLS;

/// Q-table mapping (state, action) pairs to Q-values
///
/// Values are stored state-major: the nine action values of a state are
/// contiguous, which is also the on-disk layout.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Vec<f64>,
}

impl QTable {
    /// Total number of stored values
    pub const LEN: usize = NUM_STATES * NUM_ACTIONS;

    /// Create a zero-initialised table
    pub fn new() -> Self {
        Self {
            values: vec![0.0; Self::LEN],
        }
    }

    /// Build a table from state-major values.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly [`QTable::LEN`] values are given.
    pub fn from_values(values: Vec<f64>) -> crate::Result<Self> {
        if values.len() != Self::LEN {
            return Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "Q-table needs {} values, got {}",
                    Self::LEN,
                    values.len()
                ),
            });
        }
        Ok(Self { values })
    }

    /// All values, state-major
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: State, action: usize) -> f64 {
        self.values[state * NUM_ACTIONS + action]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: State, action: usize, value: f64) {
        self.values[state * NUM_ACTIONS + action] = value;
    }

    /// The nine action values of a state
    pub fn row(&self, state: State) -> &[f64] {
        let start = state * NUM_ACTIONS;
        &self.values[start..start + NUM_ACTIONS]
    }

    /// Maximum Q-value over all nine actions of a state
    pub fn max_q(&self, state: State) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Highest-valued action, lowest index on ties
    pub fn greedy_action(&self, state: State) -> usize {
        Self::stable_argmax(self.row(state), 0..NUM_ACTIONS).unwrap_or(0)
    }

    /// Highest-valued action among `legal`, lowest index on ties.
    ///
    /// Returns `None` when `legal` is empty.
    pub fn greedy_legal_action(&self, state: State, legal: &[usize]) -> Option<usize> {
        let mut sorted = legal.to_vec();
        sorted.sort_unstable();
        Self::stable_argmax(self.row(state), sorted)
    }

    fn stable_argmax(row: &[f64], actions: impl IntoIterator<Item = usize>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for action in actions {
            let value = row[action];
            match best {
                Some((_, best_value)) if value <= best_value || value.is_nan() => {}
                _ => best = Some((action, value)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Temporal-difference error of a transition before any update
    pub fn td_error(
        &self,
        state: State,
        action: usize,
        reward: f64,
        next_state: State,
        discount_factor: f64,
    ) -> f64 {
        reward + discount_factor * self.max_q(next_state) - self.get(state, action)
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The maximum ranges over all nine actions of `next_state`. Terminal
    /// states are never acted from, so their rows stay at their initial value.
    /// Returns the change applied to Q(s,a).
    pub fn q_learning_update(
        &mut self,
        state: State,
        action: usize,
        reward: f64,
        next_state: State,
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let td_error = self.td_error(state, action, reward, next_state, discount_factor);
        let delta = learning_rate * td_error;
        let current_q = self.get(state, action);
        self.set(state, action, current_q + delta);
        delta
    }

    /// Number of values strictly greater than `threshold`
    pub fn count_above(&self, threshold: f64) -> usize {
        self.values.iter().filter(|&&v| v > threshold).count()
    }

    /// Number of values different from zero
    pub fn nonzero_count(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0.0).count()
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new()
    }
}
