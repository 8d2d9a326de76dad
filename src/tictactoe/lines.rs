//! Winning line analysis

use super::{Cell, Player};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Utility for analyzing winning lines
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a player has three in a row
    pub fn has_won(cells: &[Cell; 9], player: Player) -> bool {
        let target = player.to_cell();
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }

    /// Positions that would immediately win for the player, ascending and
    /// without duplicates
    pub fn winning_moves(cells: &[Cell; 9], player: Player) -> Vec<usize> {
        let mut moves: Vec<usize> = WINNING_LINES
            .iter()
            .filter_map(|line| Self::winning_move_in_line(cells, player, line))
            .collect();
        moves.sort_unstable();
        moves.dedup();
        moves
    }

    fn winning_move_in_line(cells: &[Cell; 9], player: Player, line: &[usize; 3]) -> Option<usize> {
        let target = player.to_cell();
        let mut count = 0;
        let mut empty_pos = None;

        for &idx in line {
            match cells[idx] {
                Cell::Empty => {
                    if empty_pos.is_some() {
                        return None;
                    }
                    empty_pos = Some(idx);
                }
                c if c == target => count += 1,
                _ => return None,
            }
        }

        if count == 2 { empty_pos } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells_with(player: Cell, positions: &[usize]) -> [Cell; 9] {
        let mut cells = [Cell::Empty; 9];
        for &pos in positions {
            cells[pos] = player;
        }
        cells
    }

    #[test]
    fn test_every_line_wins_for_owner_only() {
        for line in WINNING_LINES {
            let x_cells = cells_with(Cell::X, &line);
            assert!(LineAnalyzer::has_won(&x_cells, Player::X), "{line:?}");
            assert!(!LineAnalyzer::has_won(&x_cells, Player::O), "{line:?}");

            let o_cells = cells_with(Cell::O, &line);
            assert!(LineAnalyzer::has_won(&o_cells, Player::O), "{line:?}");
            assert!(!LineAnalyzer::has_won(&o_cells, Player::X), "{line:?}");
        }
    }

    #[test]
    fn test_blocked_line_is_not_a_win() {
        let mut cells = cells_with(Cell::X, &[0, 1]);
        cells[2] = Cell::O;
        assert!(!LineAnalyzer::has_won(&cells, Player::X));
        assert!(LineAnalyzer::winning_moves(&cells, Player::X).is_empty());
    }

    #[test]
    fn test_winning_moves() {
        // X.X
        // ...
        // ...
        let cells = cells_with(Cell::X, &[0, 2]);
        assert_eq!(LineAnalyzer::winning_moves(&cells, Player::X), vec![1]);
    }

    #[test]
    fn test_winning_moves_multiple() {
        // XX.
        // X..
        // ...
        let cells = cells_with(Cell::X, &[0, 1, 3]);
        assert_eq!(LineAnalyzer::winning_moves(&cells, Player::X), vec![2, 6]);
    }
}
