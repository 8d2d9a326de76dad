//! tictac-q - Tabular Q-learning for tic-tac-toe
//!
//! This CLI provides a unified interface for:
//! - Training the agent by self-play
//! - Playing against it in the terminal
//! - Evaluating it against fixed opponents
//! - Inspecting the stored Q-table

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tictac-q")]
#[command(version, about = "Tabular Q-learning for tic-tac-toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent by self-play
    Train(Box<tictac_q::cli::commands::train::TrainArgs>),

    /// Play against the agent (you are X)
    Play(tictac_q::cli::commands::play::PlayArgs),

    /// Evaluate the greedy agent against a fixed opponent
    Evaluate(tictac_q::cli::commands::evaluate::EvaluateArgs),

    /// Print the values stored in a Q-table
    Inspect(tictac_q::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => tictac_q::cli::commands::train::execute(*args),
        Commands::Play(args) => tictac_q::cli::commands::play::execute(args),
        Commands::Evaluate(args) => tictac_q::cli::commands::evaluate::execute(args),
        Commands::Inspect(args) => tictac_q::cli::commands::inspect::execute(args),
    }
}
