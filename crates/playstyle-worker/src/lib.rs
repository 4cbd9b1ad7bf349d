//! Stockfish-backed game analysis and cross-game playstyle profiling.
//!
//! Games are replayed with `chess-core`, every position is scored through an
//! [`evaluator::EvaluationSource`], moves are classified by centipawn loss,
//! and the resulting [`analyzer::GameAnalysis`] records feed the
//! [`playstyle::PlaystyleAnalyzer`].

pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod game_stats;
pub mod playstyle;
pub mod stockfish;
