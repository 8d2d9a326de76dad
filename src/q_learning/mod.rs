//! Tabular Q-learning
//!
//! The value table holds one estimate per (encoded board, cell) pair and is
//! trained with the off-policy one-step TD rule:
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use tictac_q::q_learning::{EpsilonConfig, QLearningAgent, serialization};
//!
//! let table = serialization::load("q_table.bin").unwrap();
//! let mut agent = QLearningAgent::new(table, EpsilonConfig::default()).with_seed(42);
//! let action = agent.select_action(0, agent.epsilon());
//! agent.update(0, action, -0.1, 1, 0.2, 0.9);
//! serialization::save(agent.q_table(), "q_table.bin").unwrap();
//! ```

pub mod agent;
pub mod epsilon;
pub mod inspect;
pub mod q_table;
pub mod reward;
pub mod serialization;

// Public re-exports
pub use agent::QLearningAgent;
pub use epsilon::{EpsilonConfig, EpsilonSchedule};
pub use q_table::{NUM_ACTIONS, QTable};
pub use reward::RewardConfig;
