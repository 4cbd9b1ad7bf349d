//! Replay SAN movetext into a sequence of positions using shakmaty.

use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position};
use thiserror::Error;

use crate::game_data::{GameData, GameMetadata, Side};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Invalid SAN '{san}' at ply {ply}")]
    InvalidSan { ply: usize, san: String },

    #[error("Illegal move '{san}' at ply {ply}")]
    IllegalMove { ply: usize, san: String },
}

/// One half-move with its surrounding positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayedMove {
    /// 1-indexed half-move number
    pub ply: usize,
    pub mover: Side,
    pub san: String,
    pub uci: String,
    pub from: Option<String>,
    pub to: String,
    pub promotion: Option<char>,
    pub piece: char,
    pub captured: Option<char>,
    pub fen_before: String,
    pub fen_after: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayedGame {
    pub metadata: GameMetadata,
    pub start_fen: String,
    pub moves: Vec<PlayedMove>,
}

impl ReplayedGame {
    /// FENs of the starting position followed by the position after each move.
    pub fn positions(&self) -> Vec<&str> {
        std::iter::once(self.start_fen.as_str())
            .chain(self.moves.iter().map(|m| m.fen_after.as_str()))
            .collect()
    }
}

fn fen_of(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Replay a parsed game from the standard starting position.
/// Fails on the first move that does not parse or is not legal.
pub fn replay_game(game: &GameData) -> Result<ReplayedGame, ReplayError> {
    let mut pos = Chess::default();
    let start_fen = fen_of(&pos);
    let mut moves = Vec::with_capacity(game.moves.len());

    for (i, san_str) in game.moves.iter().enumerate() {
        let ply = i + 1;
        let san_plus: SanPlus = san_str.trim().parse().map_err(|_| ReplayError::InvalidSan {
            ply,
            san: san_str.clone(),
        })?;
        let mv = san_plus
            .san
            .to_move(&pos)
            .map_err(|_| ReplayError::IllegalMove {
                ply,
                san: san_str.clone(),
            })?;

        let mover = Side::from(pos.turn());
        let fen_before = fen_of(&pos);
        let uci = mv.to_uci(CastlingMode::Standard).to_string();
        let from = mv.from().map(|sq| sq.to_string());
        let to = mv.to().to_string();
        let promotion = mv.promotion().map(|role| role.char());
        let piece = mv.role().char();
        let captured = mv.capture().map(|role| role.char());

        pos.play_unchecked(mv);

        moves.push(PlayedMove {
            ply,
            mover,
            san: san_str.trim().to_string(),
            uci,
            from,
            to,
            promotion,
            piece,
            captured,
            fen_before,
            fen_after: fen_of(&pos),
        });
    }

    Ok(ReplayedGame {
        metadata: game.metadata.clone(),
        start_fen,
        moves,
    })
}
