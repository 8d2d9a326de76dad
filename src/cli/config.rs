//! Shared configuration for CLI commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Args;
use serde::Serialize;

use crate::{
    q_learning::{QTable, serialization},
    tictactoe::Player,
};

/// Options every command that touches the value table accepts
#[derive(Args, Debug, Clone, Serialize)]
pub struct TableArgs {
    /// Q-table file (raw little-endian f64 values)
    #[arg(long, short = 't', default_value = serialization::DEFAULT_TABLE_PATH)]
    pub table: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl TableArgs {
    /// Load the table, falling back to zeros when the file does not exist
    pub fn load_table(&self) -> Result<QTable> {
        serialization::load(&self.table)
            .with_context(|| format!("Failed to load Q-table from {}", self.table.display()))
    }

    pub fn save_table(&self, table: &QTable) -> Result<()> {
        serialization::save(table, &self.table)
            .with_context(|| format!("Failed to save Q-table to {}", self.table.display()))
    }
}

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" => Ok(Player::X),
        "o" | "second" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

/// Normalise a summary target: directories get `training_summary.json`,
/// other paths get a `.json` extension
pub(crate) fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}
