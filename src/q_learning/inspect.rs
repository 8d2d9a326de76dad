//! Read-only diagnostics over a stored Q-table

use std::io::Write;

use serde::Serialize;

use crate::{
    Result,
    q_learning::q_table::{NUM_ACTIONS, QTable},
    tictactoe::{NUM_STATES, State, decode},
};

/// Aggregate figures from a table scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableReport {
    pub threshold: f64,
    /// Entries strictly above `threshold`
    pub above_threshold: usize,
    pub nonzero: usize,
    /// States with at least one non-zero action value
    pub visited_states: usize,
    pub min_value: f64,
    pub max_value: f64,
}

/// Summarise a table without modifying it
pub fn scan(table: &QTable, threshold: f64) -> TableReport {
    let visited_states = (0..NUM_STATES)
        .filter(|&state| table.row(state).iter().any(|&v| v != 0.0))
        .count();
    let (min_value, max_value) = table
        .values()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    TableReport {
        threshold,
        above_threshold: table.count_above(threshold),
        nonzero: table.nonzero_count(),
        visited_states,
        min_value,
        max_value,
    }
}

/// Write one `State s, Action a: Q-value = v` line per entry.
///
/// With `nonzero_only` set, entries equal to zero are skipped.
pub fn write_entries<W: Write>(table: &QTable, out: &mut W, nonzero_only: bool) -> Result<()> {
    for state in 0..NUM_STATES {
        for (action, &value) in table.row(state).iter().enumerate() {
            if nonzero_only && value == 0.0 {
                continue;
            }
            writeln!(out, "State {state}, Action {action}: Q-value = {value}")?;
        }
    }
    Ok(())
}

/// Print one state as a board followed by its nine action values
pub fn write_state<W: Write>(table: &QTable, state: State, out: &mut W) -> Result<()> {
    let board = decode(state)?;
    writeln!(out, "State {state}")?;
    write!(out, "{board}")?;
    for action in 0..NUM_ACTIONS {
        writeln!(
            out,
            "  ({}, {}) {:>10.4}{}",
            action / 3,
            action % 3,
            table.get(state, action),
            if board.is_empty(action) { "" } else { "  occupied" }
        )?;
    }
    Ok(())
}
