//! Style scores over a whole game history.
//!
//! Each score is a weighted heuristic recomputed from scratch. Only the
//! tracked player's moves count towards move-level ratios.

use std::collections::HashMap;

use chess_core::game_data::Outcome;

use crate::analyzer::GameAnalysis;

/// Player is "in trouble" once down this many pawns
const BAD_POSITION: f64 = 2.0;
/// Improvement (pawns) that counts as a recovery from a bad position
const RECOVERY_GAIN: f64 = 1.5;
/// Half-move index (exclusive) considered the end of the opening
const OPENING_PLIES: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleMetrics {
    pub tactics_vs_positional: f64,
    pub aggression_score: f64,
    pub defensive_strength: f64,
    pub opening_stability: f64,
    pub blunder_rate: f64,
    pub accuracy_variance: f64,
}

impl StyleMetrics {
    pub fn compute(games: &[&GameAnalysis]) -> Self {
        let blunder_rate = blunder_rate(games);
        Self {
            tactics_vs_positional: tactical_balance(games, blunder_rate),
            aggression_score: aggression_score(games),
            defensive_strength: defensive_strength(games, blunder_rate),
            opening_stability: opening_stability(games),
            blunder_rate,
            accuracy_variance: accuracy_variance(games),
        }
    }
}

fn score(raw: f64) -> f64 {
    raw.clamp(0.0, 100.0).round()
}

fn player_won(game: &GameAnalysis) -> bool {
    game.result.outcome_for(game.player_color) == Some(Outcome::Win)
}

/// Blunders as a percentage of the tracked player's moves.
pub fn blunder_rate(games: &[&GameAnalysis]) -> f64 {
    let mut moves = 0u32;
    let mut blunders = 0u32;
    for game in games {
        for (_, m) in game.player_moves() {
            moves += 1;
            if m.is_blunder {
                blunders += 1;
            }
        }
    }
    if moves == 0 {
        return 0.0;
    }
    blunders as f64 / moves as f64 * 100.0
}

/// Population standard deviation of the tracked player's centipawn loss.
pub fn accuracy_variance(games: &[&GameAnalysis]) -> f64 {
    let losses: Vec<f64> = games
        .iter()
        .flat_map(|game| game.player_moves().map(|(_, m)| m.centipawn_loss as f64))
        .collect();
    if losses.is_empty() {
        return 0.0;
    }
    let n = losses.len() as f64;
    let mean = losses.iter().sum::<f64>() / n;
    let variance = losses.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Mean absolute evaluation change between consecutive moves of one game.
fn volatility(game: &GameAnalysis) -> f64 {
    let evals = &game.move_evaluations;
    let changes: f64 = evals
        .windows(2)
        .map(|pair| (pair[1].evaluation - pair[0].evaluation).abs())
        .sum();
    changes / evals.len().saturating_sub(1).max(1) as f64
}

pub fn tactical_balance(games: &[&GameAnalysis], blunder_rate: f64) -> f64 {
    if games.is_empty() {
        return 50.0;
    }
    let count = games.len() as f64;

    let attack_wins = games
        .iter()
        .filter(|game| player_won(game) && !game.turning_points.is_empty())
        .count();
    let attack_win_rate = attack_wins as f64 / count * 100.0;

    let mean_volatility = games.iter().map(|game| volatility(game)).sum::<f64>() / count;

    score(50.0 + blunder_rate * 0.2 + attack_win_rate * 0.3 + mean_volatility * 15.0)
}

pub fn aggression_score(games: &[&GameAnalysis]) -> f64 {
    if games.is_empty() {
        return 50.0;
    }

    let mut improving = 0u32;
    let mut total = 0u32;
    for game in games {
        let side = game.player_color;
        let mut previous: Option<f64> = None;
        for (_, m) in game.player_moves() {
            total += 1;
            let current = m.eval_for(side);
            if previous.is_some_and(|p| current > p) {
                improving += 1;
            }
            previous = Some(current);
        }
    }

    let ratio = if total > 0 {
        improving as f64 / total as f64
    } else {
        0.0
    };
    score(50.0 + ratio * 50.0)
}

/// Whether the player, once in a bad position, later climbed at least
/// [`RECOVERY_GAIN`] pawns above any evaluation from that point on.
/// `None` if never in trouble.
fn recovered_from_bad_position(game: &GameAnalysis) -> Option<bool> {
    let side = game.player_color;
    let evals: Vec<f64> = game
        .move_evaluations
        .iter()
        .map(|m| m.eval_for(side))
        .collect();

    let first_bad = evals.iter().position(|&e| e <= -BAD_POSITION)?;
    let mut low = evals[first_bad];
    for &e in &evals[first_bad + 1..] {
        if e - low >= RECOVERY_GAIN {
            return Some(true);
        }
        low = low.min(e);
    }
    Some(false)
}

pub fn defensive_strength(games: &[&GameAnalysis], blunder_rate: f64) -> f64 {
    if games.is_empty() {
        return 50.0;
    }

    let mut bad_positions = 0u32;
    let mut recoveries = 0u32;
    for game in games {
        if let Some(recovered) = recovered_from_bad_position(game) {
            bad_positions += 1;
            if recovered {
                recoveries += 1;
            }
        }
    }

    let recovery_rate = if bad_positions > 0 {
        recoveries as f64 / bad_positions as f64
    } else {
        0.0
    };
    score(50.0 + recovery_rate * 30.0 - blunder_rate * 0.3)
}

pub fn opening_stability(games: &[&GameAnalysis]) -> f64 {
    if games.is_empty() {
        return 50.0;
    }
    let count = games.len() as f64;

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for game in games {
        *counts.entry(game.opening_label()).or_default() += 1;
    }
    let unique = counts.len() as f64;
    let top = counts.values().copied().max().unwrap_or(0) as f64;

    score(100.0 - unique / count * 100.0 + top / count * 20.0)
}

/// Player-perspective evaluation at the end of the opening phase.
pub fn opening_evaluation(game: &GameAnalysis) -> Option<f64> {
    let end = game.move_evaluations.len().min(OPENING_PLIES).checked_sub(1)?;
    Some(game.move_evaluations[end].eval_for(game.player_color))
}
