//! Encoding laws over the full board space

use tictac_q::{
    Error,
    tictactoe::{Board, Cell, NUM_CELLS, NUM_STATES, decode, encode},
};

/// Every assignment of {empty, X, O} to the nine cells, legal game position or not
fn all_boards() -> impl Iterator<Item = Board> {
    (0..NUM_STATES).map(|mut n| {
        let mut cells = [Cell::Empty; NUM_CELLS];
        for cell in cells.iter_mut() {
            *cell = Cell::from_digit(n % 3);
            n /= 3;
        }
        Board::from_cells(cells)
    })
}

#[test]
fn decode_inverts_encode_for_every_board() {
    for board in all_boards() {
        let state = encode(&board);
        assert_eq!(decode(state).unwrap(), board, "state {state}");
    }
}

#[test]
fn encode_covers_the_range_exactly_once() {
    let mut seen = vec![false; NUM_STATES];
    for board in all_boards() {
        let state = encode(&board);
        assert!(state < NUM_STATES);
        assert!(!seen[state], "state {state} produced twice");
        seen[state] = true;
    }
    assert!(seen.into_iter().all(|s| s));
}

#[test]
fn first_cell_is_least_significant_digit() {
    let x_at_origin = Board::parse("X.. ... ...").unwrap();
    let o_at_origin = Board::parse("O.. ... ...").unwrap();
    let x_at_last = Board::parse("... ... ..X").unwrap();
    assert_eq!(encode(&Board::new()), 0);
    assert_eq!(encode(&x_at_origin), 1);
    assert_eq!(encode(&o_at_origin), 2);
    assert_eq!(encode(&x_at_last), 3usize.pow(8));
    assert_eq!(encode(&Board::parse("OOO OOO OOO").unwrap()), NUM_STATES - 1);
}

#[test]
fn decode_rejects_out_of_range_states() {
    assert!(matches!(
        decode(NUM_STATES),
        Err(Error::StateOutOfRange { state, .. }) if state == NUM_STATES
    ));
}
