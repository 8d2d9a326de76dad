//! Reward shaping for self-play training

use std::{fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::tictactoe::{Board, Player};

/// Reward magnitudes for each kind of transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Mover completed a line
    pub win: f64,
    /// Board filled with no line
    pub tie: f64,
    /// Game ended and the mover did not win or tie
    pub loss: f64,
    /// Non-terminal move while the opponent had a winning reply available
    pub block: f64,
    /// Any other non-terminal move
    pub step: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            win: 2.0,
            tie: 0.5,
            loss: -1.0,
            block: 1.0,
            step: -0.1,
        }
    }
}

impl RewardConfig {
    /// Larger magnitudes with a harsher step penalty
    pub fn aggressive() -> Self {
        Self {
            win: 10.0,
            tie: 0.5,
            loss: -10.0,
            block: 5.0,
            step: -0.25,
        }
    }

    /// Reward for `player`, who has just moved on `board`.
    ///
    /// Terminal boards score win, tie or loss from `player`'s point of view.
    /// On a non-terminal board every empty cell is probed with the
    /// opponent's mark; if any probe completes a line for the opponent the
    /// move counts as a block. Only the counterfactual is evaluated: the
    /// move just played is not required to occupy that cell.
    ///
    /// Probes are reverted before returning, so `board` is left unchanged.
    pub fn reward(&self, board: &mut Board, is_terminal: bool, player: Player) -> f64 {
        if is_terminal {
            return if board.check_win(player) {
                self.win
            } else if board.check_tie() {
                self.tie
            } else {
                self.loss
            };
        }

        let opponent = player.opponent();
        for action in board.legal_actions() {
            let probe = Probe::place(board, action, opponent);
            if probe.check_win(opponent) {
                return self.block;
            }
        }
        self.step
    }
}

/// Hypothetical placement that is removed again when dropped
struct Probe<'a> {
    board: &'a mut Board,
    action: usize,
}

impl<'a> Probe<'a> {
    fn place(board: &'a mut Board, action: usize, player: Player) -> Self {
        let placed = board.play(action, player);
        debug_assert!(placed, "probe placed on occupied cell {action}");
        Self { board, action }
    }
}

impl Deref for Probe<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        self.board.clear(self.action);
    }
}

impl fmt::Display for RewardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "win={},tie={},loss={},block={},step={}",
            self.win, self.tie, self.loss, self.block, self.step
        )
    }
}

impl FromStr for RewardConfig {
    type Err = crate::Error;

    /// Parse `win=2,tie=0.5,loss=-1,block=1,step=-0.1`, or one of the named
    /// presets `default` and `aggressive`. Keys left out keep their default
    /// value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default" => return Ok(Self::default()),
            "aggressive" => return Ok(Self::aggressive()),
            _ => {}
        }

        let invalid = |message: String| crate::Error::InvalidConfiguration { message };
        let mut config = Self::default();

        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (key, value_str) = trimmed
                .split_once('=')
                .ok_or_else(|| invalid(format!("invalid reward entry: '{trimmed}'")))?;
            let value: f64 = value_str.trim().parse().map_err(|_| {
                invalid(format!(
                    "invalid reward value '{}' for '{}'",
                    value_str.trim(),
                    key.trim()
                ))
            })?;

            match key.trim().to_ascii_lowercase().as_str() {
                "win" => config.win = value,
                "tie" | "draw" => config.tie = value,
                "loss" => config.loss = value,
                "block" => config.block = value,
                "step" => config.step = value,
                other => {
                    return Err(invalid(format!(
                        "unknown reward key '{other}' (expected win, tie, loss, block or step)"
                    )));
                }
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_rewards() {
        let config = RewardConfig::default();

        let mut win = Board::parse("XXX OO. ...").unwrap();
        assert_eq!(config.reward(&mut win, true, Player::X), 2.0);
        assert_eq!(config.reward(&mut win, true, Player::O), -1.0);

        let mut tie = Board::parse("XOX XOO OXX").unwrap();
        assert_eq!(config.reward(&mut tie, true, Player::X), 0.5);
        assert_eq!(config.reward(&mut tie, true, Player::O), 0.5);
    }

    #[test]
    fn test_full_board_with_line_is_a_win() {
        let config = RewardConfig::default();
        let mut board = Board::parse("XXX OOX OXO").unwrap();
        assert_eq!(config.reward(&mut board, true, Player::X), config.win);
    }

    #[test]
    fn test_block_detected_and_board_restored() {
        let config = RewardConfig::default();
        // O threatens the middle row; X just moved elsewhere.
        let mut board = Board::parse("X.. OO. ..X").unwrap();
        let before = board;
        assert_eq!(config.reward(&mut board, false, Player::X), 1.0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_step_penalty_and_board_restored() {
        let config = RewardConfig::default();
        let mut board = Board::parse("X.. .O. ...").unwrap();
        let before = board;
        assert_eq!(config.reward(&mut board, false, Player::X), -0.1);
        assert_eq!(board, before);
    }

    #[test]
    fn test_aggressive_preset() {
        let config = RewardConfig::aggressive();
        let mut board = Board::parse("OOO XX. X..").unwrap();
        assert_eq!(config.reward(&mut board, true, Player::O), 10.0);
        assert_eq!(config.reward(&mut board, true, Player::X), -10.0);
    }

    #[test]
    fn test_parse_schedule() {
        let config: RewardConfig = "win=3, loss=-2".parse().unwrap();
        assert_eq!(config.win, 3.0);
        assert_eq!(config.loss, -2.0);
        assert_eq!(config.tie, RewardConfig::default().tie);

        assert_eq!(
            "aggressive".parse::<RewardConfig>().unwrap(),
            RewardConfig::aggressive()
        );
        assert!("win".parse::<RewardConfig>().is_err());
        assert!("win=abc".parse::<RewardConfig>().is_err());
        assert!("bonus=1".parse::<RewardConfig>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        let config = RewardConfig::aggressive();
        let parsed: RewardConfig = config.to_string().parse().unwrap();
        assert_eq!(parsed, config);
    }
}
