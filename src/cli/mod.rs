//! Command-line interface for training, playing against, evaluating and
//! inspecting the Q-learning agent

pub mod commands;
pub mod config;
pub mod output;
