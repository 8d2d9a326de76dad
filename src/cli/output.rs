//! Output formatting for CLI commands

use crate::tictactoe::{BOARD_SIZE, Board};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{key}:"), value);
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// `count (rate%)`
pub fn format_count_rate(count: usize, rate: f64) -> String {
    format!("{} ({:.1}%)", format_number(count), rate * 100.0)
}

/// Board with 1-9 labels on the empty cells, for the play prompt
pub fn render_numbered_board(board: &Board) -> String {
    let mut out = String::new();
    for row in 0..BOARD_SIZE {
        if row > 0 {
            out.push_str("---+---+---\n");
        }
        let line: Vec<String> = (0..BOARD_SIZE)
            .map(|col| {
                let index = row * BOARD_SIZE + col;
                if board.is_empty(index) {
                    format!(" {} ", index + 1)
                } else {
                    format!(" {} ", board.get(index).to_char())
                }
            })
            .collect();
        out.push_str(&line.join("|"));
        out.push('\n');
    }
    out
}
