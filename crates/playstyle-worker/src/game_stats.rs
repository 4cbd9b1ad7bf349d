//! Per-game aggregates derived from an ordered list of move evaluations.
//!
//! Everything here is a pure function of the evaluation list and the tracked
//! player's side, so a stored analysis can always be recomputed exactly.

use chess_core::game_data::Side;
use serde::{Deserialize, Serialize};

use crate::analysis::QualityFlags;

/// Logistic scale mapping pawns to win probability
pub const WIN_CHANCE_SCALE: f64 = 0.5;

/// Minimum evaluation swing (pawns) against the mover for a critical mistake
pub const CRITICAL_SWING: f64 = 1.5;

/// A side counts as "better" beyond this evaluation (pawns)
pub const ADVANTAGE_BAND: f64 = 0.5;

/// Weight of the blunder share in the consistency rating
const CONSISTENCY_BLUNDER_PENALTY: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEvaluation {
    /// Full-move number, shared by White's and Black's move
    pub move_number: u32,
    /// Position after the move
    pub fen: String,
    #[serde(rename = "move")]
    pub san: String,
    pub uci: String,
    /// Pawns, positive = White is better
    pub evaluation: f64,
    pub depth: u32,
    /// Engine's best move in the resulting position
    pub best_move: Option<String>,
    /// Engine's best move in the position the move was played from
    pub engine_choice: Option<String>,
    pub is_blunder: bool,
    pub is_mistake: bool,
    pub is_inaccuracy: bool,
    pub centipawn_loss: u32,
}

impl MoveEvaluation {
    pub fn flags(&self) -> QualityFlags {
        QualityFlags {
            is_blunder: self.is_blunder,
            is_mistake: self.is_mistake,
            is_inaccuracy: self.is_inaccuracy,
        }
    }

    /// Evaluation from `side`'s point of view.
    pub fn eval_for(&self, side: Side) -> f64 {
        match side {
            Side::White => self.evaluation,
            Side::Black => -self.evaluation,
        }
    }
}

/// Move number for the 0-based half-move index.
pub fn move_number_of(index: usize) -> u32 {
    (index / 2 + 1) as u32
}

/// Moves made by `side`, with their half-move index.
pub fn tracked_moves(
    evaluations: &[MoveEvaluation],
    side: Side,
) -> impl Iterator<Item = (usize, &MoveEvaluation)> {
    evaluations
        .iter()
        .enumerate()
        .filter(move |(i, _)| Side::of_ply_index(*i) == side)
}

/// Winning chance for `side` as a 0–100 percentage.
pub fn winning_chance(evaluation: f64, side: Side) -> u8 {
    let white = 1.0 / (1.0 + (-WIN_CHANCE_SCALE * evaluation).exp());
    let p = match side {
        Side::White => white,
        Side::Black => 1.0 - white,
    };
    (p * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Share of clean moves minus a blunder penalty, 0 when there are no moves.
pub fn consistency_rating<'a>(moves: impl IntoIterator<Item = &'a MoveEvaluation>) -> u8 {
    let mut total = 0u32;
    let mut good = 0u32;
    let mut blunders = 0u32;
    for m in moves {
        total += 1;
        if !m.flags().is_flagged() {
            good += 1;
        }
        if m.is_blunder {
            blunders += 1;
        }
    }
    if total == 0 {
        return 0;
    }
    let base = good as f64 / total as f64 * 100.0;
    let penalty = blunders as f64 / total as f64 * CONSISTENCY_BLUNDER_PENALTY;
    (base - penalty).clamp(0.0, 100.0).round() as u8
}

/// Flagged blunders/mistakes by `side` that swung the evaluation against it
/// by at least [`CRITICAL_SWING`] compared to the previous move.
pub fn critical_mistakes(evaluations: &[MoveEvaluation], side: Side) -> Vec<MoveEvaluation> {
    evaluations
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let (prev, curr) = (&pair[0], &pair[1]);
            if Side::of_ply_index(i + 1) != side {
                return None;
            }
            let swing = prev.eval_for(side) - curr.eval_for(side);
            (swing >= CRITICAL_SWING && (curr.is_blunder || curr.is_mistake)).then(|| curr.clone())
        })
        .collect()
}

/// Moves after which the favoured side flipped across the ±0.5 band.
pub fn turning_points(evaluations: &[MoveEvaluation]) -> Vec<MoveEvaluation> {
    evaluations
        .windows(2)
        .filter(|pair| {
            let (prev, curr) = (pair[0].evaluation, pair[1].evaluation);
            (prev > ADVANTAGE_BAND && curr < -ADVANTAGE_BAND)
                || (prev < -ADVANTAGE_BAND && curr > ADVANTAGE_BAND)
        })
        .map(|pair| pair[1].clone())
        .collect()
}

/// Aggregates for the tracked player.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStats {
    pub blunder_count: u32,
    pub mistake_count: u32,
    pub inaccuracy_count: u32,
    pub average_centipawn_loss: f64,
    pub winning_chances: Vec<u8>,
    pub consistency_rating: u8,
    pub critical_mistakes: Vec<MoveEvaluation>,
    pub turning_points: Vec<MoveEvaluation>,
}

impl GameStats {
    pub fn from_evaluations(evaluations: &[MoveEvaluation], side: Side) -> Self {
        let mut blunder_count = 0;
        let mut mistake_count = 0;
        let mut inaccuracy_count = 0;
        let mut total_loss = 0u64;
        let mut tracked = 0u32;

        for (_, m) in tracked_moves(evaluations, side) {
            tracked += 1;
            total_loss += u64::from(m.centipawn_loss);
            if m.is_blunder {
                blunder_count += 1;
            } else if m.is_mistake {
                mistake_count += 1;
            } else if m.is_inaccuracy {
                inaccuracy_count += 1;
            }
        }

        let average_centipawn_loss = if tracked > 0 {
            total_loss as f64 / tracked as f64
        } else {
            0.0
        };

        Self {
            blunder_count,
            mistake_count,
            inaccuracy_count,
            average_centipawn_loss,
            winning_chances: evaluations
                .iter()
                .map(|m| winning_chance(m.evaluation, side))
                .collect(),
            consistency_rating: consistency_rating(
                tracked_moves(evaluations, side).map(|(_, m)| m),
            ),
            critical_mistakes: critical_mistakes(evaluations, side),
            turning_points: turning_points(evaluations),
        }
    }
}
