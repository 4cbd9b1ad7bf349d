#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use chess_core::game_data::{GameResult, Side};
use chess_core::pgn::parse_pgn;
use chess_core::replay::{replay_game, ReplayedGame};
use playstyle_worker::analysis::classify;
use playstyle_worker::analyzer::GameAnalysis;
use playstyle_worker::error::AnalysisError;
use playstyle_worker::evaluator::{EvaluationSource, PositionEval};
use playstyle_worker::game_stats::{move_number_of, GameStats, MoveEvaluation};

pub const DEPTH: u32 = 12;

/// Parse and replay a single-game PGN.
pub fn replayed(pgn: &str) -> ReplayedGame {
    let data = parse_pgn(pgn).expect("test PGN should parse");
    replay_game(&data).expect("test PGN should be legal")
}

/// Short game between alice (White) and bob (Black).
pub fn short_game(result: &str) -> ReplayedGame {
    replayed(&format!(
        "[Event \"Casual\"]\n[White \"alice\"]\n[Black \"bob\"]\n[Result \"{result}\"]\n\
         [Date \"2024.03.01\"]\n[Opening \"King's Knight Opening\"]\n\n\
         1. e4 e5 2. Nf3 Nc6 {result}\n"
    ))
}

/// Evaluation source answering from a fixed FEN → evaluation table.
pub struct ScriptedSource {
    evals: HashMap<String, PositionEval>,
    fail_on: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    /// Script one evaluation per position of `game` (start position first).
    pub fn for_game(game: &ReplayedGame, evals: &[f64], best_moves: &[Option<&str>]) -> Self {
        let positions = game.positions();
        assert_eq!(positions.len(), evals.len(), "one evaluation per position");

        let evals = positions
            .iter()
            .enumerate()
            .map(|(i, fen)| {
                let eval = PositionEval {
                    evaluation: evals[i],
                    best_move: best_moves.get(i).copied().flatten().map(str::to_string),
                    depth_reached: DEPTH,
                };
                (fen.to_string(), eval)
            })
            .collect();

        Self {
            evals,
            fail_on: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Make the evaluation of `fen` fail like a crashed engine.
    pub fn failing_on(mut self, fen: &str) -> Self {
        self.fail_on = Some(fen.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EvaluationSource for ScriptedSource {
    async fn analyze_position(&self, fen: &str, depth: u32) -> Result<PositionEval, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.as_deref() == Some(fen) {
            return Err(AnalysisError::Stockfish("Stockfish process exited".into()));
        }
        let mut eval = self
            .evals
            .get(fen)
            .cloned()
            .ok_or_else(|| AnalysisError::Stockfish(format!("unscripted position {fen}")))?;
        eval.depth_reached = depth;
        Ok(eval)
    }
}

/// Build a stored analysis directly from (evaluation, centipawn loss) pairs,
/// one per half-move.
pub fn stored_game(
    side: Side,
    result: GameResult,
    opening: Option<&str>,
    opponent: &str,
    moves: &[(f64, u32)],
) -> GameAnalysis {
    let move_evaluations: Vec<MoveEvaluation> = moves
        .iter()
        .enumerate()
        .map(|(i, &(evaluation, loss))| {
            let flags = classify(loss);
            MoveEvaluation {
                move_number: move_number_of(i),
                fen: String::new(),
                san: format!("m{i}"),
                uci: String::new(),
                evaluation,
                depth: DEPTH,
                best_move: None,
                engine_choice: None,
                is_blunder: flags.is_blunder,
                is_mistake: flags.is_mistake,
                is_inaccuracy: flags.is_inaccuracy,
                centipawn_loss: loss,
            }
        })
        .collect();
    let stats = GameStats::from_evaluations(&move_evaluations, side);

    GameAnalysis {
        game_id: format!("me-{opponent}-{}", moves.len()),
        player: "me".into(),
        player_color: side,
        opponent: opponent.into(),
        date: "2024.03.01".into(),
        result,
        opening: opening.map(str::to_string),
        time_control: None,
        move_evaluations,
        blunder_count: stats.blunder_count,
        mistake_count: stats.mistake_count,
        inaccuracy_count: stats.inaccuracy_count,
        average_centipawn_loss: stats.average_centipawn_loss,
        winning_chances: stats.winning_chances,
        consistency_rating: stats.consistency_rating,
        critical_mistakes: stats.critical_mistakes,
        turning_points: stats.turning_points,
    }
}

/// Quiet game: every move keeps the evaluation level and loses nothing.
pub fn quiet_game(side: Side, result: GameResult, opening: Option<&str>, opponent: &str) -> GameAnalysis {
    stored_game(side, result, opening, opponent, &[(0.1, 0), (0.1, 0), (0.1, 0), (0.1, 0)])
}
