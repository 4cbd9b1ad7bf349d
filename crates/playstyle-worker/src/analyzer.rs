//! Core game analysis: evaluate every position of a replayed game, classify
//! each move and derive the tracked player's per-game statistics.

use chess_core::game_data::{GameResult, Side};
use chess_core::pgn::parse_pgn;
use chess_core::replay::{replay_game, ReplayedGame};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{calculate_cp_loss, classify};
use crate::error::AnalysisError;
use crate::evaluator::EvaluationSource;
use crate::game_stats::{move_number_of, tracked_moves, GameStats, MoveEvaluation};

/// Label used when a game carries no opening name
pub const UNKNOWN_OPENING: &str = "Unknown Opening";

// 64-bit FNV-1a, used for game ids
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// One finished analysis run over one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAnalysis {
    pub game_id: String,
    pub player: String,
    pub player_color: Side,
    pub opponent: String,
    pub date: String,
    pub result: GameResult,
    pub opening: Option<String>,
    pub time_control: Option<String>,
    pub move_evaluations: Vec<MoveEvaluation>,
    pub blunder_count: u32,
    pub mistake_count: u32,
    pub inaccuracy_count: u32,
    pub average_centipawn_loss: f64,
    pub winning_chances: Vec<u8>,
    pub consistency_rating: u8,
    pub critical_mistakes: Vec<MoveEvaluation>,
    pub turning_points: Vec<MoveEvaluation>,
}

impl GameAnalysis {
    /// Moves made by the tracked player, with their half-move index.
    pub fn player_moves(&self) -> impl Iterator<Item = (usize, &MoveEvaluation)> {
        tracked_moves(&self.move_evaluations, self.player_color)
    }

    /// Opening label, falling back to [`UNKNOWN_OPENING`].
    pub fn opening_label(&self) -> &str {
        match self.opening.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_OPENING,
        }
    }

    /// Recompute the aggregates from the stored move evaluations.
    pub fn recompute_stats(&self) -> GameStats {
        GameStats::from_evaluations(&self.move_evaluations, self.player_color)
    }

    /// Structural checks that cross-game aggregation relies on: move numbers
    /// follow the half-move order, flags agree with centipawn loss, and
    /// evaluations are finite.
    pub fn is_well_formed(&self) -> bool {
        if self.winning_chances.len() != self.move_evaluations.len() {
            return false;
        }
        self.move_evaluations.iter().enumerate().all(|(i, m)| {
            m.move_number == move_number_of(i)
                && m.evaluation.is_finite()
                && m.flags() == classify(m.centipawn_loss)
        })
    }
}

/// Parse a single PGN game and replay it move by move.
pub fn replay_pgn(pgn: &str) -> Result<ReplayedGame, AnalysisError> {
    let data = parse_pgn(pgn)
        .ok_or_else(|| AnalysisError::Input("PGN has no moves or a non-standard start".into()))?;
    Ok(replay_game(&data)?)
}

/// Analyze a replayed game for `player` at `depth`.
///
/// All positions (start + after each move) are evaluated before any
/// aggregation; a single evaluation failure fails the whole game.
pub async fn analyze_game<S: EvaluationSource>(
    source: &S,
    game: &ReplayedGame,
    player: &str,
    depth: u32,
) -> Result<GameAnalysis, AnalysisError> {
    let meta = &game.metadata;
    let player_color = meta
        .side_of(player)
        .ok_or_else(|| AnalysisError::PlayerNotFound {
            player: player.to_string(),
            white: meta.white.clone(),
            black: meta.black.clone(),
        })?;

    validate_moves(game)?;
    if depth == 0 {
        return Err(AnalysisError::Input("search depth must be at least 1".into()));
    }

    let game_id = generate_game_id(game);
    info!(
        game_id = %game_id,
        move_count = game.moves.len(),
        depth,
        "Starting analysis"
    );

    // Evaluate all positions (start + after each move)
    let positions = game.positions();
    let evals = try_join_all(
        positions
            .iter()
            .map(|fen| source.analyze_position(fen, depth)),
    )
    .await?;

    // Classify moves
    let mut move_evaluations = Vec::with_capacity(game.moves.len());
    for (i, played) in game.moves.iter().enumerate() {
        let before = &evals[i];
        let after = &evals[i + 1];

        let cp_loss = if before.best_move.as_deref() == Some(played.uci.as_str()) {
            0
        } else {
            calculate_cp_loss(before.evaluation, after.evaluation, played.mover)
        };
        let flags = classify(cp_loss);

        debug!(ply = played.ply, san = %played.san, cp_loss, "Classified move");

        move_evaluations.push(MoveEvaluation {
            move_number: move_number_of(i),
            fen: played.fen_after.clone(),
            san: played.san.clone(),
            uci: played.uci.clone(),
            evaluation: after.evaluation,
            depth,
            best_move: after.best_move.clone(),
            engine_choice: before.best_move.clone(),
            is_blunder: flags.is_blunder,
            is_mistake: flags.is_mistake,
            is_inaccuracy: flags.is_inaccuracy,
            centipawn_loss: cp_loss,
        });
    }

    let stats = GameStats::from_evaluations(&move_evaluations, player_color);

    info!(
        game_id = %game_id,
        blunders = stats.blunder_count,
        mistakes = stats.mistake_count,
        inaccuracies = stats.inaccuracy_count,
        consistency = stats.consistency_rating,
        "Analysis complete"
    );

    Ok(GameAnalysis {
        game_id,
        player: meta.name_of(player_color).to_string(),
        player_color,
        opponent: meta.name_of(player_color.opposite()).to_string(),
        date: game_date(game),
        result: meta.result,
        opening: Some(detect_opening(game).to_string()),
        time_control: meta.time_control.clone(),
        move_evaluations,
        blunder_count: stats.blunder_count,
        mistake_count: stats.mistake_count,
        inaccuracy_count: stats.inaccuracy_count,
        average_centipawn_loss: stats.average_centipawn_loss,
        winning_chances: stats.winning_chances,
        consistency_rating: stats.consistency_rating,
        critical_mistakes: stats.critical_mistakes,
        turning_points: stats.turning_points,
    })
}

/// Reject empty or inconsistent move sequences before touching the engine.
fn validate_moves(game: &ReplayedGame) -> Result<(), AnalysisError> {
    if game.moves.is_empty() {
        return Err(AnalysisError::Input("game has no moves".into()));
    }

    let mut previous_fen = game.start_fen.as_str();
    for (i, played) in game.moves.iter().enumerate() {
        if played.mover != Side::of_ply_index(i) {
            return Err(AnalysisError::Input(format!(
                "move {} ({}) is out of turn order",
                i + 1,
                played.san
            )));
        }
        if played.fen_before != previous_fen {
            return Err(AnalysisError::Input(format!(
                "move {} ({}) does not follow the previous position",
                i + 1,
                played.san
            )));
        }
        previous_fen = &played.fen_after;
    }
    Ok(())
}

/// Opening name from the game headers (no book lookup).
fn detect_opening(game: &ReplayedGame) -> &str {
    match game.metadata.opening.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => UNKNOWN_OPENING,
    }
}

fn game_date(game: &ReplayedGame) -> String {
    game.metadata
        .date
        .clone()
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string())
}

/// `white-black-date-NNN`, where NNN is derived from the move list so the
/// same game always gets the same id.
fn generate_game_id(game: &ReplayedGame) -> String {
    let meta = &game.metadata;
    format!(
        "{}-{}-{}-{:03}",
        meta.white,
        meta.black,
        meta.date.as_deref().unwrap_or("unknown"),
        moves_hash(game) % 1000
    )
}

/// FNV-1a over the UCI moves, each followed by a space.
fn moves_hash(game: &ReplayedGame) -> u64 {
    game.moves
        .iter()
        .flat_map(|played| played.uci.bytes().chain(std::iter::once(b' ')))
        .fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
}
