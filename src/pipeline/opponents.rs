//! Fixed-strategy opponents and the policy adapter for the learned agent
//!
//! - Random baseline
//! - Defensive player (wins when it can, otherwise blocks)
//! - Q-learning agent, choosing among empty cells only

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Error, Result,
    ports::Policy,
    q_learning::QLearningAgent,
    tictactoe::{Board, LineAnalyzer, Player, encode},
};

fn random_cell(rng: &mut StdRng, board: &Board) -> Result<usize> {
    let moves = board.legal_actions();
    if moves.is_empty() {
        return Err(Error::NoLegalActions {
            state: encode(board),
        });
    }
    Ok(moves[rng.random_range(0..moves.len())])
}

/// Uniformly random player (baseline)
pub struct RandomPolicy {
    name: String,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            name: "random".to_string(),
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Random player with a deterministic move stream
    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "random".to_string(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomPolicy {
    fn select_move(&mut self, board: &Board, _player: Player) -> Result<usize> {
        random_cell(&mut self.rng, board)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// Defensive player
///
/// 1. Completes its own line if it can win this turn
/// 2. Otherwise occupies the cell the opponent would win on
/// 3. Otherwise plays randomly
pub struct DefensivePolicy {
    name: String,
    rng: StdRng,
}

impl DefensivePolicy {
    pub fn new() -> Self {
        Self {
            name: "defensive".to_string(),
            rng: StdRng::seed_from_u64(random()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "defensive".to_string(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for DefensivePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for DefensivePolicy {
    fn select_move(&mut self, board: &Board, player: Player) -> Result<usize> {
        let cells = board.cells();
        if let Some(&win) = LineAnalyzer::winning_moves(cells, player).first() {
            return Ok(win);
        }
        if let Some(&block) = LineAnalyzer::winning_moves(cells, player.opponent()).first() {
            return Ok(block);
        }
        random_cell(&mut self.rng, board)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// The agent plays at its current exploration rate; build it with
/// [`QLearningAgent::greedy`] for a purely exploiting opponent.
impl Policy for QLearningAgent {
    fn select_move(&mut self, board: &Board, _player: Player) -> Result<usize> {
        let state = encode(board);
        let epsilon = self.epsilon();
        self.select_legal_action(state, &board.legal_actions(), epsilon)
            .ok_or(Error::NoLegalActions { state })
    }

    fn name(&self) -> &str {
        "q-learning"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.reseed(seed);
    }
}

/// Build an opponent from its CLI name
pub fn opponent_from_name(name: &str, seed: Option<u64>) -> Result<Box<dyn Policy>> {
    let mut policy: Box<dyn Policy> = match name.trim().to_ascii_lowercase().as_str() {
        "random" => Box::new(RandomPolicy::new()),
        "defensive" => Box::new(DefensivePolicy::new()),
        other => {
            return Err(Error::InvalidConfiguration {
                message: format!("unknown opponent '{other}' (expected 'random' or 'defensive')"),
            });
        }
    };
    if let Some(seed) = seed {
        policy.set_rng_seed(seed);
    }
    Ok(policy)
}
