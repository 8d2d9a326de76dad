//! Integer encoding of board states.
//!
//! Each of the nine cells is a base-3 digit (Empty=0, X=1, O=2). Cells are
//! visited row-major and the first cell is the least significant digit, so
//! the top-left corner contributes `digit * 3^0` and the bottom-right corner
//! `digit * 3^8`. Every board maps into `0..NUM_STATES`, and every integer in
//! that range decodes to a board, reachable or not.

use super::board::{Board, Cell, NUM_CELLS};

/// Number of distinct encodings: 3^9
pub const NUM_STATES: usize = 19_683;

/// Encoded board
pub type State = usize;

/// Encode a board into its state index
pub fn encode(board: &Board) -> State {
    board
        .cells()
        .iter()
        .rev()
        .fold(0, |acc, cell| acc * 3 + cell.digit())
}

/// Decode a state index into a board.
///
/// # Errors
///
/// Returns [`crate::Error::StateOutOfRange`] when `state >= NUM_STATES`.
pub fn decode(state: State) -> crate::Result<Board> {
    if state >= NUM_STATES {
        return Err(crate::Error::StateOutOfRange {
            state,
            limit: NUM_STATES,
        });
    }

    let mut cells = [Cell::Empty; NUM_CELLS];
    let mut rest = state;
    for cell in cells.iter_mut() {
        *cell = Cell::from_digit(rest % 3);
        rest /= 3;
    }
    Ok(Board::from_cells(cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    #[test]
    fn test_empty_board_is_zero() {
        assert_eq!(encode(&Board::new()), 0);
    }

    #[test]
    fn test_digit_order_is_row_major_lsd_first() {
        let mut board = Board::new();
        board.make_move(0, 0, Player::X);
        assert_eq!(encode(&board), 1);

        let mut board = Board::new();
        board.make_move(0, 1, Player::O);
        assert_eq!(encode(&board), 2 * 3);

        let mut board = Board::new();
        board.make_move(2, 2, Player::X);
        assert_eq!(encode(&board), 6561);
    }

    #[test]
    fn test_full_o_board_is_max_state() {
        let board = Board::from_cells([Cell::O; NUM_CELLS]);
        assert_eq!(encode(&board), NUM_STATES - 1);
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        assert!(matches!(
            decode(NUM_STATES),
            Err(crate::Error::StateOutOfRange { state: 19_683, .. })
        ));
    }
}
