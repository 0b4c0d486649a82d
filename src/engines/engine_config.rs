//! Engine configuration, loadable from JSON.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{ChessError, ChessResult};
use crate::search::board_scoring::EvaluationWeights;
use crate::search::iterative_deepening::{SearchLimits, TerminalScoring};

/// Environment variable the binary reads an optional config path from.
pub const CONFIG_PATH_ENV: &str = "X88_CHESS_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_depth: u8,
    pub stats_interval_ms: u64,
    pub use_opening_book: bool,
    pub terminal_scoring: TerminalScoring,
    pub weights: EvaluationWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            stats_interval_ms: 200,
            use_opening_book: true,
            terminal_scoring: TerminalScoring::Disabled,
            weights: EvaluationWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> ChessResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> ChessResult<Self> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), ?config, "loaded engine configuration");
        Ok(config)
    }

    pub fn validate(&self) -> ChessResult<()> {
        if self.max_depth == 0 {
            return Err(ChessError::Config("max_depth must be at least 1".to_owned()));
        }
        if self.stats_interval_ms == 0 {
            return Err(ChessError::Config(
                "stats_interval_ms must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_depth: self.max_depth,
            stats_interval: Duration::from_millis(self.stats_interval_ms),
            terminal_scoring: self.terminal_scoring,
        }
    }
}
