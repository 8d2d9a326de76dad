//! Play command - Human (X) against the agent (O) in the terminal

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{config::TableArgs, output::render_numbered_board},
    q_learning::{QLearningAgent, RewardConfig},
    tictactoe::{Board, GameOutcome, NUM_CELLS, Player, encode},
};

#[derive(Parser, Debug)]
#[command(about = "Play against the agent", allow_negative_numbers = true)]
pub struct PlayArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Update the table from the agent's moves and save it on exit
    #[arg(long)]
    pub learn: bool,

    /// Learning rate used with --learn
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,

    /// Discount factor used with --learn
    #[arg(long, default_value_t = 0.5)]
    pub gamma: f64,

    /// Exploration rate of the agent during play
    #[arg(long, default_value_t = 0.0)]
    pub epsilon: f64,

    /// Reward schedule used with --learn
    #[arg(long, default_value = "default")]
    pub rewards: String,
}

/// Results of one terminal session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTally {
    pub games: usize,
    pub human_wins: usize,
    pub agent_wins: usize,
    pub draws: usize,
}

/// What a line of input asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Move(usize),
    NewGame,
    Quit,
}

/// Accepts `row col` (0-based, space or comma separated), a single digit
/// 1-9, `new` or `quit`
fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim().to_ascii_lowercase();
    match trimmed.as_str() {
        "quit" | "q" | "exit" => return Some(Command::Quit),
        "new" | "n" => return Some(Command::NewGame),
        _ => {}
    }

    let parts: Vec<&str> = trimmed
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    match parts.as_slice() {
        [digit] => {
            let n: usize = digit.parse().ok()?;
            (1..=NUM_CELLS).contains(&n).then(|| Command::Move(n - 1))
        }
        [row, col] => {
            let row: usize = row.parse().ok()?;
            let col: usize = col.parse().ok()?;
            Board::checked_index(row, col).ok().map(Command::Move)
        }
        _ => None,
    }
}

/// One terminal session against the agent
pub struct PlaySession {
    agent: QLearningAgent,
    rewards: RewardConfig,
    learning: Option<(f64, f64)>,
    epsilon: f64,
}

impl PlaySession {
    pub fn new(agent: QLearningAgent) -> Self {
        Self {
            agent,
            rewards: RewardConfig::default(),
            learning: None,
            epsilon: 0.0,
        }
    }

    /// Update the table after each agent move
    pub fn with_learning(mut self, alpha: f64, gamma: f64) -> Self {
        self.learning = Some((alpha, gamma));
        self
    }

    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn into_agent(self) -> QLearningAgent {
        self.agent
    }

    /// Run games until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<SessionTally> {
        let mut tally = SessionTally::default();
        let mut board = Board::new();
        let mut lines = input.lines();

        writeln!(out, "You are X and move first.")?;
        loop {
            write!(out, "\n{}", render_numbered_board(&board))?;
            write!(out, "Your move (row col, 1-9, new, quit): ")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            let line = line?;

            let action = match parse_command(&line) {
                Some(Command::Quit) => break,
                Some(Command::NewGame) => {
                    board.reset();
                    writeln!(out, "New game.")?;
                    continue;
                }
                Some(Command::Move(action)) => action,
                None => {
                    writeln!(out, "Could not read '{}'.", line.trim())?;
                    continue;
                }
            };

            if !board.play(action, Player::X) {
                writeln!(out, "That cell is taken.")?;
                continue;
            }
            if self.finish_if_over(&board, &mut tally, out)? {
                board.reset();
                continue;
            }

            let action = self.agent_move(&mut board)?;
            writeln!(
                out,
                "Agent plays {} ({}, {}).",
                action + 1,
                action / 3,
                action % 3
            )?;
            if self.finish_if_over(&board, &mut tally, out)? {
                board.reset();
            }
        }

        writeln!(
            out,
            "Played {}: you won {}, agent won {}, {} draws.",
            tally.games, tally.human_wins, tally.agent_wins, tally.draws
        )?;
        Ok(tally)
    }

    fn agent_move(&mut self, board: &mut Board) -> Result<usize> {
        let state = encode(board);
        let legal = board.legal_actions();
        let action = self
            .agent
            .select_legal_action(state, &legal, self.epsilon)
            .ok_or(crate::Error::NoLegalActions { state })?;
        if !board.play(action, Player::O) {
            return Err(crate::Error::IllegalAction { state, action }.into());
        }

        if let Some((alpha, gamma)) = self.learning {
            let next_state = encode(board);
            let terminal = board.check_win(Player::O) || board.check_tie();
            let reward = self.rewards.reward(board, terminal, Player::O);
            let change = self
                .agent
                .update(state, action, reward, next_state, alpha, gamma);
            log::debug!("learned Q({state},{action}) += {change:.4} (reward {reward})");
        }
        Ok(action)
    }

    fn finish_if_over<W: Write>(
        &self,
        board: &Board,
        tally: &mut SessionTally,
        out: &mut W,
    ) -> Result<bool> {
        let Some(outcome) = GameOutcome::from_board(board) else {
            return Ok(false);
        };
        tally.games += 1;
        write!(out, "\n{board}")?;
        match outcome {
            GameOutcome::Win(Player::X) => {
                tally.human_wins += 1;
                writeln!(out, "You win!")?;
            }
            GameOutcome::Win(Player::O) => {
                tally.agent_wins += 1;
                writeln!(out, "The agent wins.")?;
            }
            GameOutcome::Draw => {
                tally.draws += 1;
                writeln!(out, "Draw.")?;
            }
        }
        writeln!(out, "New game.")?;
        Ok(true)
    }
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let rewards: RewardConfig = args.rewards.parse()?;
    let mut agent = QLearningAgent::greedy(args.table.load_table()?);
    if let Some(seed) = args.table.seed {
        agent = agent.with_seed(seed);
    }

    let mut session = PlaySession::new(agent)
        .with_rewards(rewards)
        .with_epsilon(args.epsilon);
    if args.learn {
        session = session.with_learning(args.alpha, args.gamma);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    session.run(stdin.lock(), &mut out)?;

    if args.learn {
        args.table.save_table(session.into_agent().q_table())?;
        log::info!("saved updated Q-table to {}", args.table.table.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::QTable;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("1 2"), Some(Command::Move(5)));
        assert_eq!(parse_command("2,0"), Some(Command::Move(6)));
        assert_eq!(parse_command("9"), Some(Command::Move(8)));
        assert_eq!(parse_command(" QUIT "), Some(Command::Quit));
        assert_eq!(parse_command("new"), Some(Command::NewGame));
        assert_eq!(parse_command("0"), None);
        assert_eq!(parse_command("3 0"), None);
        assert_eq!(parse_command("a b"), None);
    }

    #[test]
    fn test_taken_cell_is_rejected() {
        let mut session = PlaySession::new(QLearningAgent::greedy(QTable::new()));
        // Greedy zero agent answers 1 with cell 1 (0-based), so "2" is taken.
        let input = "1\n2\nquit\n".as_bytes();
        let mut out = Vec::new();
        let tally = session.run(input, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Agent plays 2 (0, 1)."));
        assert!(text.contains("That cell is taken."));
        assert_eq!(tally.games, 0);
    }
}
