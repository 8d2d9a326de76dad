//! Train command - Self-play Q-learning with periodic checkpoints

use std::{
    fs::File,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::{
        config::sanitize_summary_path,
        output::{format_count_rate, format_number, print_kv, print_section},
    },
    pipeline::{
        ActionFilter, LogObserver, MetricsObserver, MetricsSummary, ProgressObserver,
        SharedObserver, Trainer, TrainingConfig, TrainingResult,
    },
    q_learning::{
        RewardConfig,
        inspect::{self, TableReport},
    },
};

#[derive(Parser, Debug)]
#[command(about = "Train the agent by self-play", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// JSON training configuration; flags below override its fields
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of self-play episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Learning rate α (0.0-1.0]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ (0.0-1.0]
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration rate at the first episode
    #[arg(long)]
    pub epsilon_initial: Option<f64>,

    /// Exploration floor
    #[arg(long)]
    pub epsilon_final: Option<f64>,

    /// Episodes over which epsilon decays linearly to the floor
    #[arg(long)]
    pub decay_episodes: Option<usize>,

    /// Save the table every N episodes (0 saves only at the end)
    #[arg(long)]
    pub save_interval: Option<usize>,

    /// Log a progress line every N episodes (0 disables)
    #[arg(long)]
    pub report_interval: Option<usize>,

    /// Reward schedule: `default`, `aggressive`, or
    /// `win=2,tie=0.5,loss=-1,block=1,step=-0.1`
    #[arg(long, short = 'r')]
    pub rewards: Option<String>,

    /// Candidate actions: `legal` (empty cells) or `unfiltered` (all nine)
    #[arg(long)]
    pub action_filter: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Q-table file to resume from and save to
    #[arg(long, short = 't')]
    pub table: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub progress: bool,
}

impl TrainArgs {
    /// Effective configuration: the config file (or defaults) with every
    /// flag that was given applied on top
    pub fn resolve_config(&self) -> Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::load(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => TrainingConfig::default(),
        };

        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(alpha) = self.alpha {
            config.learning_rate = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.discount_factor = gamma;
        }
        if let Some(initial) = self.epsilon_initial {
            config.epsilon.initial = initial;
        }
        if let Some(final_value) = self.epsilon_final {
            config.epsilon.final_value = final_value;
        }
        if let Some(decay_episodes) = self.decay_episodes {
            config.epsilon.decay_episodes = decay_episodes;
        }
        if let Some(interval) = self.save_interval {
            config.save_interval = interval;
        }
        if let Some(interval) = self.report_interval {
            config.report_interval = interval;
        }
        if let Some(rewards) = &self.rewards {
            config.rewards = rewards.parse::<RewardConfig>()?;
        }
        if let Some(filter) = &self.action_filter {
            config.action_filter = filter.parse::<ActionFilter>()?;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(table) = &self.table {
            config.table_path = Some(table.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    config: &'a TrainingConfig,
    metrics: MetricsSummary,
    table: TableReport,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.resolve_config()?;

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut trainer = Trainer::new(config.clone())
        .with_observer(Box::new(LogObserver::new()))
        .with_observer(Box::new(SharedObserver(Arc::clone(&metrics))));
    if args.progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }

    let mut agent = trainer.build_agent()?;
    let result = trainer.run(&mut agent)?;

    print_section("Training Results");
    print_kv("Episodes", &format_number(result.total_episodes));
    print_kv("X wins", &format_count_rate(result.x_wins, result.x_win_rate));
    print_kv("O wins", &format_count_rate(result.o_wins, result.o_win_rate));
    print_kv("Draws", &format_count_rate(result.draws, result.draw_rate));
    print_kv("Moves", &format_number(result.total_moves));
    if config.action_filter == ActionFilter::Unfiltered {
        print_kv("Void transitions", &format_number(result.void_transitions));
    }
    print_kv("Final epsilon", &format!("{:.4}", result.final_epsilon));
    if let Some(path) = &config.table_path {
        print_kv("Q-table", &path.display().to_string());
    }

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let metrics = metrics
            .lock()
            .map(|m| m.summary())
            .unwrap_or_else(|poisoned| poisoned.into_inner().summary());
        let summary = TrainingSummaryFile {
            training: &result,
            config: &config,
            metrics,
            table: inspect::scan(agent.q_table(), 0.0),
        };

        let file = File::create(&summary_path)
            .with_context(|| format!("Failed to create {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = TrainArgs::parse_from([
            "train",
            "--episodes",
            "25",
            "--alpha",
            "0.3",
            "--epsilon-final",
            "0.0",
            "--rewards",
            "aggressive",
            "--action-filter",
            "unfiltered",
            "--seed",
            "5",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.episodes, 25);
        assert_eq!(config.learning_rate, 0.3);
        assert_eq!(config.discount_factor, TrainingConfig::default().discount_factor);
        assert_eq!(config.epsilon.final_value, 0.0);
        assert_eq!(config.rewards, RewardConfig::aggressive());
        assert_eq!(config.action_filter, ActionFilter::Unfiltered);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn test_negative_reward_values_parse() {
        let args = TrainArgs::parse_from(["train", "--rewards", "loss=-3,step=-0.5"]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.rewards.loss, -3.0);
        assert_eq!(config.rewards.step, -0.5);
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        let args = TrainArgs::parse_from(["train", "--alpha", "1.5"]);
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn test_progress_can_be_disabled() {
        let args = TrainArgs::parse_from(["train", "--progress", "false"]);
        assert!(!args.progress);
        assert!(TrainArgs::parse_from(["train"]).progress);
    }
}
