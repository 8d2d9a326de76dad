//! Training and evaluation pipeline
//!
//! This module provides:
//! - The self-play training loop with checkpointing
//! - Observers for progress bars, logs and collected metrics
//! - Fixed opponents and head-to-head evaluation

pub mod evaluation;
pub mod observers;
pub mod opponents;
pub mod training;

pub use evaluation::{EvaluationConfig, EvaluationResult, evaluate, play_game};
pub use observers::{LogObserver, MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver};
pub use opponents::{DefensivePolicy, RandomPolicy, opponent_from_name};
pub use training::{
    ActionFilter, EpisodeStats, MoveRecord, ProgressReport, Trainer, TrainingConfig,
    TrainingResult,
};

pub use crate::ports::{Observer, Policy};
