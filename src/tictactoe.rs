//! Tic-Tac-Toe rules and state encoding

pub mod board;
pub mod codec;
pub mod lines;

pub use board::{BOARD_SIZE, Board, Cell, NUM_CELLS, Player};
pub use codec::{NUM_STATES, State, decode, encode};
pub use lines::{LineAnalyzer, WINNING_LINES};

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Outcome of a terminal board, `None` while the game is still running
    pub fn from_board(board: &Board) -> Option<Self> {
        if let Some(winner) = board.winner() {
            Some(GameOutcome::Win(winner))
        } else if board.check_tie() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }
}
