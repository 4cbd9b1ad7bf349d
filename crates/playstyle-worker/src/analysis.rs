//! Move classification. Pure functions only, no board or engine access.

use chess_core::game_data::Side;
use serde::{Deserialize, Serialize};

/// Classification thresholds (centipawn loss)
pub const THRESHOLD_BEST: u32 = 5;
pub const THRESHOLD_INACCURACY: u32 = 20;
pub const THRESHOLD_MISTAKE: u32 = 50;
pub const THRESHOLD_BLUNDER: u32 = 100;

/// Stored quality flags. At most one is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityFlags {
    pub is_blunder: bool,
    pub is_mistake: bool,
    pub is_inaccuracy: bool,
}

impl QualityFlags {
    pub fn is_flagged(&self) -> bool {
        self.is_blunder || self.is_mistake || self.is_inaccuracy
    }
}

/// Display label for a move. `Best` and `Good` both mean "no flag".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveQuality {
    Best,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl MoveQuality {
    pub fn from_loss(cp_loss: u32) -> Self {
        let flags = classify(cp_loss);
        if flags.is_blunder {
            MoveQuality::Blunder
        } else if flags.is_mistake {
            MoveQuality::Mistake
        } else if flags.is_inaccuracy {
            MoveQuality::Inaccuracy
        } else if cp_loss <= THRESHOLD_BEST {
            MoveQuality::Best
        } else {
            MoveQuality::Good
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoveQuality::Best => "best",
            MoveQuality::Good => "good",
            MoveQuality::Inaccuracy => "inaccuracy",
            MoveQuality::Mistake => "mistake",
            MoveQuality::Blunder => "blunder",
        }
    }
}

pub fn classify(cp_loss: u32) -> QualityFlags {
    QualityFlags {
        is_blunder: cp_loss >= THRESHOLD_BLUNDER,
        is_mistake: (THRESHOLD_MISTAKE..THRESHOLD_BLUNDER).contains(&cp_loss),
        is_inaccuracy: (THRESHOLD_INACCURACY..THRESHOLD_MISTAKE).contains(&cp_loss),
    }
}

/// Pawns lost by `mover`, in centipawns. Evaluations are in pawns from
/// White's perspective; engine noise in the mover's favour clamps to 0.
pub fn calculate_cp_loss(best_eval: f64, actual_eval: f64, mover: Side) -> u32 {
    let swing = match mover {
        Side::White => best_eval - actual_eval,
        Side::Black => actual_eval - best_eval,
    };
    let cp = (swing * 100.0).round();
    if cp.is_finite() && cp > 0.0 {
        cp as u32
    } else {
        0
    }
}
