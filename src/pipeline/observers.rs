//! Observer implementations for training runs
//!
//! Observers see training events only; none of them can change what the
//! agent learns.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::{
    Result,
    pipeline::training::{EpisodeStats, ProgressReport, TrainingResult},
    ports::Observer,
    tictactoe::{GameOutcome, Player},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
        }
    }

    fn message(&self, epsilon: f64) -> String {
        format!(
            "X:{} O:{} D:{} eps:{epsilon:.3}",
            self.x_wins, self.o_wins, self.draws
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, stats: &EpisodeStats) -> Result<()> {
        match stats.outcome {
            GameOutcome::Win(Player::X) => self.x_wins += 1,
            GameOutcome::Win(Player::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(stats.episode as u64);
            // Formatting every episode dominates short runs; refresh the text sparingly.
            if stats.episode % 256 == 0 {
                pb.set_message(self.message(stats.epsilon));
            }
        }
        Ok(())
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message(result.final_epsilon));
        }
        Ok(())
    }
}

/// Log observer - Writes progress lines through the `log` facade
#[derive(Debug, Default)]
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for LogObserver {
    fn on_report(&mut self, report: &ProgressReport) -> Result<()> {
        log::info!(
            "episode {}/{}: epsilon={:.4} moves={} reward={:.2} |dQ|={:.4} X/O/D={}/{}/{} void={}",
            report.episode,
            report.total_episodes,
            report.epsilon,
            report.moves,
            report.total_reward,
            report.value_change,
            report.x_wins,
            report.o_wins,
            report.draws,
            report.void_transitions
        );
        Ok(())
    }

    fn on_table_saved(&mut self, episode: usize, path: &Path) -> Result<()> {
        log::debug!("checkpoint at episode {episode}: {}", path.display());
        Ok(())
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        log::info!(
            "training finished: {} episodes, X {:.1}% / O {:.1}% / draw {:.1}%",
            result.total_episodes,
            result.x_win_rate * 100.0,
            result.o_win_rate * 100.0,
            result.draw_rate * 100.0
        );
        Ok(())
    }
}

/// Metrics observer - Keeps every progress report and checkpoint
#[derive(Debug, Default, Clone)]
pub struct MetricsObserver {
    reports: Vec<ProgressReport>,
    checkpoints: Vec<usize>,
    episodes: usize,
    moves: usize,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports received so far, oldest first
    pub fn reports(&self) -> &[ProgressReport] {
        &self.reports
    }

    /// Episodes after which the table was saved
    pub fn checkpoints(&self) -> &[usize] {
        &self.checkpoints
    }

    /// Average game length over all observed episodes
    pub fn avg_game_length(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.moves as f64 / self.episodes as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            reports: self.reports.len(),
            checkpoints: self.checkpoints.len(),
            avg_game_length: self.avg_game_length(),
        }
    }
}

/// Summary of collected metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub reports: usize,
    pub checkpoints: usize,
    pub avg_game_length: f64,
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, stats: &EpisodeStats) -> Result<()> {
        self.episodes += 1;
        self.moves += stats.moves;
        Ok(())
    }

    fn on_report(&mut self, report: &ProgressReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }

    fn on_table_saved(&mut self, episode: usize, _path: &Path) -> Result<()> {
        self.checkpoints.push(episode);
        Ok(())
    }
}

/// Shares an observer with the caller so its state can be read after the
/// trainer has consumed the boxed handle
pub struct SharedObserver<O>(pub std::sync::Arc<std::sync::Mutex<O>>);

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.lock().on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.lock().on_episode_start(episode)
    }

    fn on_move(
        &mut self,
        episode: usize,
        record: &crate::pipeline::training::MoveRecord,
    ) -> Result<()> {
        self.lock().on_move(episode, record)
    }

    fn on_episode_end(&mut self, stats: &EpisodeStats) -> Result<()> {
        self.lock().on_episode_end(stats)
    }

    fn on_report(&mut self, report: &ProgressReport) -> Result<()> {
        self.lock().on_report(report)
    }

    fn on_table_saved(&mut self, episode: usize, path: &Path) -> Result<()> {
        self.lock().on_table_saved(episode, path)
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        self.lock().on_training_end(result)
    }
}

impl<O> SharedObserver<O> {
    fn lock(&self) -> std::sync::MutexGuard<'_, O> {
        // A poisoned lock only means another observer call panicked; the
        // counters inside are still usable.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
