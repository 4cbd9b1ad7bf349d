//! Analysis error types

use chess_core::replay::ReplayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Player '{player}' not found (white: {white}, black: {black})")]
    PlayerNotFound {
        player: String,
        white: String,
        black: String,
    },

    #[error("Stockfish error: {0}")]
    Stockfish(String),

    #[error("Stockfish did not finish depth {depth} in time for {fen}")]
    Timeout { fen: String, depth: u32 },

    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// True when the evaluation engine failed rather than the submitted game.
    /// Callers can offer a retry for these.
    pub fn is_evaluation_failure(&self) -> bool {
        matches!(self, AnalysisError::Stockfish(_) | AnalysisError::Timeout { .. })
    }
}
