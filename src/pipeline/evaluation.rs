//! Head-to-head evaluation of two policies
//!
//! X always moves first. Nothing here updates a value table.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Policy,
    tictactoe::{Board, GameOutcome, NUM_CELLS, Player, encode},
};

/// Evaluation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub games: usize,
    /// Mark played by the evaluated policy
    pub agent_player: Player,
    /// Base seed; game `i` reseeds both sides with `seed + i`
    pub seed: Option<u64>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            games: 1_000,
            agent_player: Player::X,
            seed: None,
        }
    }
}

impl EvaluationConfig {
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_agent_player(mut self, player: Player) -> Self {
        self.agent_player = player;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Win/draw/loss counts from the evaluated policy's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
}

impl EvaluationResult {
    fn from_counts(wins: usize, draws: usize, losses: usize) -> Self {
        let games = wins + draws + losses;
        let rate = |n: usize| {
            if games == 0 {
                0.0
            } else {
                n as f64 / games as f64
            }
        };
        Self {
            games,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
        }
    }
}

/// Play one game to completion and return its outcome
pub fn play_game(x: &mut dyn Policy, o: &mut dyn Policy) -> Result<GameOutcome> {
    let mut board = Board::new();
    let mut mover = Player::X;
    loop {
        let policy: &mut dyn Policy = match mover {
            Player::X => &mut *x,
            Player::O => &mut *o,
        };
        let action = policy.select_move(&board, mover)?;
        let state = encode(&board);
        if action >= NUM_CELLS || !board.play(action, mover) {
            return Err(Error::IllegalAction { state, action });
        }
        if let Some(outcome) = GameOutcome::from_board(&board) {
            return Ok(outcome);
        }
        mover = mover.opponent();
    }
}

/// Play `config.games` games of `agent` against `opponent`
pub fn evaluate(
    agent: &mut dyn Policy,
    opponent: &mut dyn Policy,
    config: &EvaluationConfig,
) -> Result<EvaluationResult> {
    let (mut wins, mut draws, mut losses) = (0, 0, 0);

    for game in 0..config.games {
        if let Some(seed) = config.seed {
            let game_seed = seed.wrapping_add(game as u64);
            agent.set_rng_seed(game_seed);
            opponent.set_rng_seed(game_seed.wrapping_add(1));
        }

        let outcome = match config.agent_player {
            Player::X => play_game(agent, opponent)?,
            Player::O => play_game(opponent, agent)?,
        };
        match outcome {
            GameOutcome::Win(winner) if winner == config.agent_player => wins += 1,
            GameOutcome::Win(_) => losses += 1,
            GameOutcome::Draw => draws += 1,
        }
    }

    log::debug!(
        "{} vs {}: {wins}W/{draws}D/{losses}L",
        agent.name(),
        opponent.name()
    );
    Ok(EvaluationResult::from_counts(wins, draws, losses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::opponents::{DefensivePolicy, RandomPolicy};

    /// Always plays the lowest empty cell
    struct FirstEmpty;

    impl Policy for FirstEmpty {
        fn select_move(&mut self, board: &Board, _player: Player) -> Result<usize> {
            board
                .legal_actions()
                .first()
                .copied()
                .ok_or(Error::NoLegalActions { state: encode(board) })
        }

        fn name(&self) -> &str {
            "first-empty"
        }
    }

    /// Tries to reuse cell 0 forever
    struct Stubborn;

    impl Policy for Stubborn {
        fn select_move(&mut self, _board: &Board, _player: Player) -> Result<usize> {
            Ok(0)
        }

        fn name(&self) -> &str {
            "stubborn"
        }
    }

    #[test]
    fn test_first_empty_self_play_x_wins() {
        // X takes 0,2,4,6 and completes the anti-diagonal.
        let outcome = play_game(&mut FirstEmpty, &mut FirstEmpty).unwrap();
        assert_eq!(outcome, GameOutcome::Win(Player::X));
    }

    #[test]
    fn test_mixed_policy_types_alternate() {
        let mut x = RandomPolicy::with_seed(4);
        let mut o = DefensivePolicy::with_seed(5);
        for _ in 0..10 {
            let outcome = play_game(&mut x, &mut o).unwrap();
            assert!(matches!(outcome, GameOutcome::Win(_) | GameOutcome::Draw));
        }
        let outcome = play_game(&mut FirstEmpty, &mut o).unwrap();
        assert!(matches!(outcome, GameOutcome::Win(_) | GameOutcome::Draw));
    }

    #[test]
    fn test_counts_sum_to_games() {
        let mut agent = RandomPolicy::with_seed(1);
        let mut opponent = DefensivePolicy::with_seed(2);
        let config = EvaluationConfig::default().with_games(50).with_seed(9);
        let result = evaluate(&mut agent, &mut opponent, &config).unwrap();
        assert_eq!(result.wins + result.draws + result.losses, 50);
        assert!((result.win_rate + result.draw_rate + result.loss_rate - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_agent_as_o_sees_losses() {
        let mut agent = FirstEmpty;
        let mut opponent = FirstEmpty;
        let config = EvaluationConfig::default()
            .with_games(3)
            .with_agent_player(Player::O);
        let result = evaluate(&mut agent, &mut opponent, &config).unwrap();
        assert_eq!(result.losses, 3);
    }

    #[test]
    fn test_illegal_move_is_an_error() {
        let err = play_game(&mut Stubborn, &mut Stubborn).unwrap_err();
        assert!(matches!(err, Error::IllegalAction { action: 0, .. }));
    }
}
