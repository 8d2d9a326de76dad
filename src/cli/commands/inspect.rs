//! Inspect command - Read-only dump of a stored Q-table

use std::io::{self, BufWriter, Write};

use anyhow::{Result, bail};
use clap::Parser;

use crate::{
    cli::{
        config::TableArgs,
        output::{format_number, print_kv, print_section},
    },
    q_learning::{QTable, inspect},
    tictactoe::NUM_STATES,
};

#[derive(Parser, Debug)]
#[command(about = "Print the values stored in a Q-table", allow_negative_numbers = true)]
pub struct InspectArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Count values strictly above this threshold
    #[arg(long, default_value_t = 0.0)]
    pub threshold: f64,

    /// Skip entries equal to zero
    #[arg(long)]
    pub nonzero: bool,

    /// Print a single state as a board with its nine action values
    #[arg(long)]
    pub state: Option<usize>,
}

/// Write the requested view of `table` to `out`
pub fn write_report<W: Write>(args: &InspectArgs, table: &QTable, out: &mut W) -> Result<()> {
    if let Some(state) = args.state {
        if state >= NUM_STATES {
            bail!("State {state} is out of range (0..{NUM_STATES})");
        }
        inspect::write_state(table, state, out)?;
        return Ok(());
    }

    inspect::write_entries(table, out, args.nonzero)?;
    let report = inspect::scan(table, args.threshold);
    writeln!(
        out,
        "Number of Q-values greater than {}: {}",
        report.threshold, report.above_threshold
    )?;
    Ok(())
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let table = args.table.load_table()?;
    {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        write_report(&args, &table, &mut out)?;
        out.flush()?;
    }

    if args.state.is_none() {
        let report = inspect::scan(&table, args.threshold);
        print_section("Q-table Summary");
        print_kv("Non-zero values", &format_number(report.nonzero));
        print_kv("Visited states", &format_number(report.visited_states));
        print_kv("Min value", &format!("{:.4}", report.min_value));
        print_kv("Max value", &format!("{:.4}", report.max_value));
    }
    Ok(())
}
