//! Tabular Q-learning for tic-tac-toe
//!
//! This crate provides:
//! - Board rules and the base-3 state encoding
//! - A dense Q-table, epsilon-greedy agent and shaped reward function
//! - Self-play training with raw binary checkpoints
//! - Evaluation against random and defensive opponents
//! - A command-line front end (`tictac-q`)

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;

pub use error::{Error, Result};
pub use pipeline::{Trainer, TrainingConfig, TrainingResult};
pub use q_learning::{EpsilonConfig, QLearningAgent, QTable, RewardConfig};
pub use tictactoe::{Board, Cell, GameOutcome, Player, State, decode, encode};
