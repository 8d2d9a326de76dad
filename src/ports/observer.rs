//! Observer port - abstraction for training observation
//!
//! Observers receive training events without being able to influence
//! learning: they see immutable snapshots and cannot reach the table.

use std::path::Path;

use crate::{
    Result,
    pipeline::training::{EpisodeStats, MoveRecord, ProgressReport, TrainingResult},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_move(episode, record)` - for every successful move
///    - `on_episode_end(stats)`
///    - `on_table_saved(episode, path)` - on save intervals
///    - `on_report(report)` - on report intervals
/// 3. `on_table_saved(total, path)` for the final save, then
///    `on_training_end(result)`
///
/// # Examples
///
/// ```no_run
/// use tictac_q::{pipeline::EpisodeStats, ports::Observer};
///
/// struct LongestGame {
///     moves: usize,
/// }
///
/// impl Observer for LongestGame {
///     fn on_episode_end(&mut self, stats: &EpisodeStats) -> tictac_q::Result<()> {
///         self.moves = self.moves.max(stats.moves);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first episode
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called before an episode's first move. Episodes are numbered from 1.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each successful move and its table update
    fn on_move(&mut self, _episode: usize, _record: &MoveRecord) -> Result<()> {
        Ok(())
    }

    /// Called when an episode reaches a terminal board
    fn on_episode_end(&mut self, _stats: &EpisodeStats) -> Result<()> {
        Ok(())
    }

    /// Called every report interval with figures accumulated since the
    /// previous report
    fn on_report(&mut self, _report: &ProgressReport) -> Result<()> {
        Ok(())
    }

    /// Called after the table has been written to disk
    fn on_table_saved(&mut self, _episode: usize, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode
    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        Ok(())
    }
}
