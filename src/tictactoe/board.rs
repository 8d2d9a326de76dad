//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;

/// Side length of the board
pub const BOARD_SIZE: usize = 3;

/// Number of cells (and therefore actions) on the board
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }

    /// Base-3 digit used by the state codec (Empty=0, X=1, O=2)
    pub fn digit(self) -> usize {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => 2,
        }
    }

    /// Inverse of [`Cell::digit`]; only the low base-3 digit is considered
    pub fn from_digit(digit: usize) -> Cell {
        match digit % 3 {
            1 => Cell::X,
            2 => Cell::O,
            _ => Cell::Empty,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// Mutable 3x3 board, stored row-major.
///
/// A board is owned by whichever episode or game session created it and is
/// mutated in place by [`Board::make_move`]. It carries no turn information;
/// the caller decides who moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; NUM_CELLS],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board from row-major cells
    pub fn from_cells(cells: [Cell; NUM_CELLS]) -> Self {
        Self { cells }
    }

    /// Parse a board from 9 cell characters (`.` for empty; whitespace and `|` ignored).
    ///
    /// ```
    /// use tictac_q::tictactoe::{Board, Player};
    ///
    /// let board = Board::parse("XXX OO. ...").unwrap();
    /// assert!(board.check_win(Player::X));
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let chars: Vec<char> = s
            .chars()
            .filter(|c| *c != '|' && !c.is_whitespace())
            .collect();
        if chars.len() != NUM_CELLS {
            return None;
        }
        let mut cells = [Cell::Empty; NUM_CELLS];
        for (cell, &c) in cells.iter_mut().zip(chars.iter()) {
            *cell = Cell::from_char(c)?;
        }
        Some(Self { cells })
    }

    /// Row-major cells
    pub fn cells(&self) -> &[Cell; NUM_CELLS] {
        &self.cells
    }

    /// Map (row, col) to a cell index, validating the range.
    pub fn checked_index(row: usize, col: usize) -> crate::Result<usize> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(crate::Error::InvalidPosition { row, col });
        }
        Ok(row * BOARD_SIZE + col)
    }

    fn index(row: usize, col: usize) -> usize {
        assert!(
            row < BOARD_SIZE && col < BOARD_SIZE,
            "cell ({row}, {col}) is outside the 3x3 board"
        );
        row * BOARD_SIZE + col
    }

    /// Cell at (row, col). Panics when out of range.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[Self::index(row, col)]
    }

    /// Cell addressed by action index (0-8)
    pub fn get(&self, action: usize) -> Cell {
        self.cells[action]
    }

    /// Check if the cell addressed by `action` is empty
    pub fn is_empty(&self, action: usize) -> bool {
        self.cells[action] == Cell::Empty
    }

    /// Mark (row, col) for `player` iff the cell is empty.
    ///
    /// Returns `false` without touching the board when the cell is taken.
    /// Row and column must be in `0..3`; anything else panics.
    pub fn make_move(&mut self, row: usize, col: usize, player: Player) -> bool {
        let idx = Self::index(row, col);
        if self.cells[idx] != Cell::Empty {
            return false;
        }
        self.cells[idx] = player.to_cell();
        true
    }

    /// [`Board::make_move`] addressed by action index
    pub fn play(&mut self, action: usize, player: Player) -> bool {
        self.make_move(action / BOARD_SIZE, action % BOARD_SIZE, player)
    }

    /// Reset one cell to empty
    pub(crate) fn clear(&mut self, action: usize) {
        self.cells[action] = Cell::Empty;
    }

    /// True iff `player` owns a full row, column or diagonal
    pub fn check_win(&self, player: Player) -> bool {
        LineAnalyzer::has_won(&self.cells, player)
    }

    /// True iff no cell is empty. Check for a win first: a full board with a
    /// winning line is a win, not a tie.
    pub fn check_tie(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }

    /// Winner, if any
    pub fn winner(&self) -> Option<Player> {
        [Player::X, Player::O]
            .into_iter()
            .find(|&player| self.check_win(player))
    }

    /// Whether the game on this board is over
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.check_tie()
    }

    /// Empty cells as actions, ascending
    pub fn legal_actions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Reset to an empty board
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; NUM_CELLS];
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            if row > 0 {
                writeln!(f, "-+-+-")?;
            }
            let line: Vec<String> = (0..BOARD_SIZE)
                .map(|col| self.cell(row, col).to_char().to_string())
                .collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_move_marks_empty_cell() {
        let mut board = Board::new();
        assert!(board.make_move(1, 2, Player::X));
        assert_eq!(board.cell(1, 2), Cell::X);
        assert_eq!(board.get(5), Cell::X);
    }

    #[test]
    fn test_make_move_rejects_occupied_cell() {
        let mut board = Board::new();
        assert!(board.make_move(0, 0, Player::X));
        let before = board;
        assert!(!board.make_move(0, 0, Player::O));
        assert_eq!(board, before);
    }

    #[test]
    #[should_panic(expected = "outside the 3x3 board")]
    fn test_make_move_out_of_range_panics() {
        let mut board = Board::new();
        board.make_move(3, 0, Player::X);
    }

    #[test]
    fn test_checked_index() {
        assert_eq!(Board::checked_index(2, 1).unwrap(), 7);
        assert!(matches!(
            Board::checked_index(0, 3),
            Err(crate::Error::InvalidPosition { row: 0, col: 3 })
        ));
    }

    #[test]
    fn test_legal_actions() {
        let mut board = Board::new();
        board.play(4, Player::X);
        board.play(0, Player::O);
        assert_eq!(board.legal_actions(), vec![1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_parse_and_display() {
        let board = Board::parse("X.O|.X.|..O").unwrap();
        assert_eq!(board.get(0), Cell::X);
        assert_eq!(board.get(2), Cell::O);
        assert_eq!(board.get(8), Cell::O);
        assert_eq!(board.to_string(), "X|.|O\n-+-+-\n.|X|.\n-+-+-\n.|.|O\n");
        assert!(Board::parse("XO").is_none());
        assert!(Board::parse("XO?......").is_none());
        assert!(Board::parse("0........").is_none());
    }

    #[test]
    fn test_winner_and_terminal() {
        let board = Board::parse("OOO XX. X..").unwrap();
        assert_eq!(board.winner(), Some(Player::O));
        assert!(board.is_terminal());
        assert!(!Board::new().is_terminal());
    }
}
