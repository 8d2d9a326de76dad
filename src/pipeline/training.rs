//! Self-play training loop

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Observer,
    q_learning::{EpsilonConfig, QLearningAgent, RewardConfig, serialization},
    tictactoe::{Board, GameOutcome, Player, State, encode},
};

/// How the engine's action choice relates to cell occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionFilter {
    /// Choose only among empty cells. A failed move is then an invariant
    /// violation and aborts the run.
    #[default]
    Legal,
    /// Choose among all nine cells. A move onto an occupied cell is a void
    /// transition (no reward, no update) and the mover chooses again.
    Unfiltered,
}

impl std::str::FromStr for ActionFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legal" => Ok(ActionFilter::Legal),
            "unfiltered" | "all" => Ok(ActionFilter::Unfiltered),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown action filter '{other}' (expected legal or unfiltered)"),
            }),
        }
    }
}

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of self-play episodes
    pub episodes: usize,

    /// Learning rate α
    pub learning_rate: f64,

    /// Discount factor γ
    pub discount_factor: f64,

    /// Linear exploration schedule
    pub epsilon: EpsilonConfig,

    /// Reward magnitudes
    pub rewards: RewardConfig,

    /// Persist the table every this many episodes (0 disables)
    pub save_interval: usize,

    /// Emit a progress report every this many episodes (0 disables)
    pub report_interval: usize,

    /// Occupied-cell handling during action selection
    pub action_filter: ActionFilter,

    /// Void transitions allowed per turn with [`ActionFilter::Unfiltered`]
    /// before falling back to a legal choice
    pub max_void_attempts: usize,

    /// Random seed
    pub seed: Option<u64>,

    /// Where the table is loaded from and saved to; `None` keeps it in memory
    pub table_path: Option<PathBuf>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 2_000_000,
            learning_rate: 0.2,
            discount_factor: 0.9,
            epsilon: EpsilonConfig::default(),
            rewards: RewardConfig::default(),
            save_interval: 100_000,
            report_interval: 1_000,
            action_filter: ActionFilter::default(),
            max_void_attempts: 64,
            seed: None,
            table_path: Some(PathBuf::from(serialization::DEFAULT_TABLE_PATH)),
        }
    }
}

impl TrainingConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_learning_rate(mut self, alpha: f64) -> Self {
        self.learning_rate = alpha;
        self
    }

    pub fn with_discount_factor(mut self, gamma: f64) -> Self {
        self.discount_factor = gamma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: EpsilonConfig) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_save_interval(mut self, episodes: usize) -> Self {
        self.save_interval = episodes;
        self
    }

    pub fn with_report_interval(mut self, episodes: usize) -> Self {
        self.report_interval = episodes;
        self
    }

    pub fn with_action_filter(mut self, filter: ActionFilter) -> Self {
        self.action_filter = filter;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_table_path(mut self, path: Option<PathBuf>) -> Self {
        self.table_path = path;
        self
    }

    /// Load configuration from a JSON file; missing keys take defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| Error::io(format!("open config {}", path.display()), e))?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Reject settings outside the ranges the update rule is meant for
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });
        let unit_open_closed = |v: f64| v > 0.0 && v <= 1.0;
        let unit_closed = |v: f64| (0.0..=1.0).contains(&v);

        if !unit_open_closed(self.learning_rate) {
            return invalid(format!(
                "learning rate {} must be in (0, 1]",
                self.learning_rate
            ));
        }
        if !unit_open_closed(self.discount_factor) {
            return invalid(format!(
                "discount factor {} must be in (0, 1]",
                self.discount_factor
            ));
        }
        if !unit_closed(self.epsilon.initial) || !unit_closed(self.epsilon.final_value) {
            return invalid(format!(
                "epsilon values ({}, {}) must be in [0, 1]",
                self.epsilon.initial, self.epsilon.final_value
            ));
        }
        if self.epsilon.final_value > self.epsilon.initial {
            return invalid(format!(
                "final epsilon {} exceeds initial epsilon {}",
                self.epsilon.final_value, self.epsilon.initial
            ));
        }
        if self.action_filter == ActionFilter::Unfiltered && self.max_void_attempts == 0 {
            return invalid("max_void_attempts must be positive for unfiltered selection".into());
        }
        Ok(())
    }
}

/// One successful move inside an episode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveRecord {
    pub step: usize,
    pub player: Player,
    pub state: State,
    pub action: usize,
    pub next_state: State,
    pub reward: f64,
    /// Change applied to Q(state, action)
    pub value_change: f64,
    pub terminal: bool,
}

/// Summary of one completed episode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeStats {
    /// 1-based episode number
    pub episode: usize,
    /// Exploration rate the episode was played with
    pub epsilon: f64,
    pub moves: usize,
    pub total_reward: f64,
    /// Sum of |ΔQ| over the episode's updates
    pub value_change: f64,
    pub void_transitions: usize,
    pub outcome: GameOutcome,
}

/// Figures accumulated between two progress reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub episode: usize,
    pub total_episodes: usize,
    pub epsilon: f64,
    pub window_episodes: usize,
    pub moves: usize,
    pub total_reward: f64,
    pub value_change: f64,
    pub void_transitions: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
}

/// Outcome of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub total_episodes: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub total_moves: usize,
    pub void_transitions: usize,
    pub final_epsilon: f64,
    pub x_win_rate: f64,
    pub o_win_rate: f64,
    pub draw_rate: f64,
}

#[derive(Debug, Default)]
struct Tally {
    episodes: usize,
    moves: usize,
    total_reward: f64,
    value_change: f64,
    void_transitions: usize,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
}

impl Tally {
    fn add(&mut self, stats: &EpisodeStats) {
        self.episodes += 1;
        self.moves += stats.moves;
        self.total_reward += stats.total_reward;
        self.value_change += stats.value_change;
        self.void_transitions += stats.void_transitions;
        match stats.outcome {
            GameOutcome::Win(Player::X) => self.x_wins += 1,
            GameOutcome::Win(Player::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }

    fn report(&self, episode: usize, total_episodes: usize, epsilon: f64) -> ProgressReport {
        ProgressReport {
            episode,
            total_episodes,
            epsilon,
            window_episodes: self.episodes,
            moves: self.moves,
            total_reward: self.total_reward,
            value_change: self.value_change,
            void_transitions: self.void_transitions,
            x_wins: self.x_wins,
            o_wins: self.o_wins,
            draws: self.draws,
        }
    }

    fn result(&self, final_epsilon: f64) -> TrainingResult {
        let rate = |n: usize| {
            if self.episodes > 0 {
                n as f64 / self.episodes as f64
            } else {
                0.0
            }
        };
        TrainingResult {
            total_episodes: self.episodes,
            x_wins: self.x_wins,
            o_wins: self.o_wins,
            draws: self.draws,
            total_moves: self.moves,
            void_transitions: self.void_transitions,
            final_epsilon,
            x_win_rate: rate(self.x_wins),
            o_win_rate: rate(self.o_wins),
            draw_rate: rate(self.draws),
        }
    }
}

/// Drives self-play episodes against a single Q-table.
///
/// Both sides are played by the same agent; X always opens.
pub struct Trainer {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
    fallback_warned: bool,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            fallback_warned: false,
        }
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Build an agent from the configured table path (zero table when the
    /// file is missing or no path is set) and the configured schedule
    pub fn build_agent(&self) -> Result<QLearningAgent> {
        let table = match &self.config.table_path {
            Some(path) => serialization::load(path)?,
            None => Default::default(),
        };
        let agent = QLearningAgent::new(table, self.config.epsilon);
        Ok(match self.config.seed {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        })
    }

    /// Run all configured episodes, persisting and reporting on interval
    pub fn run(&mut self, agent: &mut QLearningAgent) -> Result<TrainingResult> {
        self.config.validate()?;
        let total = self.config.episodes;
        log::info!(
            "training {total} episodes (alpha={}, gamma={}, epsilon {} -> {} over {} episodes)",
            self.config.learning_rate,
            self.config.discount_factor,
            self.config.epsilon.initial,
            self.config.epsilon.final_value,
            self.config.epsilon.decay_episodes
        );

        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }

        let mut totals = Tally::default();
        let mut window = Tally::default();

        for episode in 1..=total {
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let stats = self.play_episode(agent, episode)?;
            agent.decay_epsilon();
            totals.add(&stats);
            window.add(&stats);

            for observer in &mut self.observers {
                observer.on_episode_end(&stats)?;
            }

            if self.config.save_interval > 0 && episode % self.config.save_interval == 0 {
                self.save(agent, episode)?;
            }

            if self.config.report_interval > 0 && episode % self.config.report_interval == 0 {
                let report = window.report(episode, total, agent.epsilon());
                for observer in &mut self.observers {
                    observer.on_report(&report)?;
                }
                window = Tally::default();
            }
        }

        self.save(agent, total)?;

        let result = totals.result(agent.epsilon());
        for observer in &mut self.observers {
            observer.on_training_end(&result)?;
        }
        Ok(result)
    }

    /// Play one self-play episode from an empty board, updating the table
    /// after every successful move
    pub fn play_episode(
        &mut self,
        agent: &mut QLearningAgent,
        episode: usize,
    ) -> Result<EpisodeStats> {
        let epsilon = agent.epsilon();
        let mut board = Board::new();
        let mut mover = Player::X;
        let mut stats = EpisodeStats {
            episode,
            epsilon,
            moves: 0,
            total_reward: 0.0,
            value_change: 0.0,
            void_transitions: 0,
            outcome: GameOutcome::Draw,
        };

        loop {
            let state = encode(&board);
            let action = self.select_and_apply(agent, &mut board, state, mover, &mut stats)?;
            let next_state = encode(&board);

            let terminal = board.check_win(mover) || board.check_tie();
            let reward = self.config.rewards.reward(&mut board, terminal, mover);
            let value_change = agent.update(
                state,
                action,
                reward,
                next_state,
                self.config.learning_rate,
                self.config.discount_factor,
            );

            let record = MoveRecord {
                step: stats.moves,
                player: mover,
                state,
                action,
                next_state,
                reward,
                value_change,
                terminal,
            };
            stats.moves += 1;
            stats.total_reward += reward;
            stats.value_change += value_change.abs();
            for observer in &mut self.observers {
                observer.on_move(episode, &record)?;
            }

            if terminal {
                stats.outcome = GameOutcome::from_board(&board).unwrap_or(GameOutcome::Draw);
                break;
            }
            mover = mover.opponent();
        }

        log::debug!(
            "episode {episode}: {:?} in {} moves, reward {:.3}",
            stats.outcome,
            stats.moves,
            stats.total_reward
        );
        Ok(stats)
    }

    /// Choose an action for `mover` and mark it on the board
    fn select_and_apply(
        &mut self,
        agent: &mut QLearningAgent,
        board: &mut Board,
        state: State,
        mover: Player,
        stats: &mut EpisodeStats,
    ) -> Result<usize> {
        if self.config.action_filter == ActionFilter::Unfiltered {
            for _ in 0..self.config.max_void_attempts {
                let action = agent.select_action(state, stats.epsilon);
                if board.play(action, mover) {
                    return Ok(action);
                }
                stats.void_transitions += 1;
            }

            if !self.fallback_warned {
                log::warn!(
                    "{} void transitions in state {state}; choosing among empty cells for this turn",
                    self.config.max_void_attempts
                );
                self.fallback_warned = true;
            }
        }

        let legal = board.legal_actions();
        let action = agent
            .select_legal_action(state, &legal, stats.epsilon)
            .ok_or(Error::NoLegalActions { state })?;
        if !board.play(action, mover) {
            return Err(Error::IllegalAction { state, action });
        }
        Ok(action)
    }

    fn save(&mut self, agent: &QLearningAgent, episode: usize) -> Result<()> {
        let Some(path) = self.config.table_path.clone() else {
            return Ok(());
        };
        serialization::save(agent.q_table(), &path)?;
        log::info!(
            "saved Q-table after episode {episode}/{} to {}",
            self.config.episodes,
            path.display()
        );
        for observer in &mut self.observers {
            observer.on_table_saved(episode, &path)?;
        }
        Ok(())
    }
}
