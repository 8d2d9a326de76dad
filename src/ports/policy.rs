//! Policy port - anything that can pick a move on a board
//!
//! Implemented by the trained agent and by the fixed evaluation opponents
//! (random and defensive).

use crate::{
    Result,
    tictactoe::{Board, Player},
};

pub trait Policy {
    /// Choose an empty cell (0-8) for `player` to mark on `board`
    fn select_move(&mut self, board: &Board, player: Player) -> Result<usize>;

    fn name(&self) -> &str;

    /// Reseed any internal randomness
    fn set_rng_seed(&mut self, _seed: u64) {}
}
