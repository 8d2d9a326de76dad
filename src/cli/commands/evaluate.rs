//! Evaluate command - Greedy agent against a fixed opponent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        config::{TableArgs, parse_player_token},
        output::{format_count_rate, format_number, print_kv, print_section},
    },
    pipeline::{EvaluationConfig, EvaluationResult, evaluate, opponent_from_name},
    q_learning::QLearningAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate the greedy agent against a fixed opponent")]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Opponent to evaluate against (`random` or `defensive`)
    #[arg(long, short = 'o', default_value = "random")]
    pub opponent: String,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 1_000)]
    pub games: usize,

    /// Which mark the agent plays (`x` or `o`); X always moves first
    #[arg(long = "as", default_value = "x")]
    pub agent_player: String,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn run(args: &EvaluateArgs) -> Result<EvaluationResult> {
    let agent_player = parse_player_token(&args.agent_player, "--as")?;
    let mut agent = QLearningAgent::greedy(args.table.load_table()?);
    let mut opponent = opponent_from_name(&args.opponent, None)?;

    let mut config = EvaluationConfig::default()
        .with_games(args.games)
        .with_agent_player(agent_player);
    if let Some(seed) = args.table.seed {
        config = config.with_seed(seed);
    }

    Ok(evaluate(&mut agent, opponent.as_mut(), &config)?)
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let result = run(&args)?;

    print_section(&format!(
        "Evaluation: agent ({}) vs {}",
        args.agent_player.to_ascii_uppercase(),
        args.opponent
    ));
    print_kv("Games", &format_number(result.games));
    print_kv("Wins", &format_count_rate(result.wins, result.win_rate));
    print_kv("Draws", &format_count_rate(result.draws, result.draw_rate));
    print_kv("Losses", &format_count_rate(result.losses, result.loss_rate));

    if let Some(path) = &args.export {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &result)?;
        println!("\nResults exported to {}", path.display());
    }

    Ok(())
}
