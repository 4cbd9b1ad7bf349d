use serde::{Deserialize, Serialize};

/// Side of the board a player (or a move) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// Side that plays the 0-based half-move `index`.
    pub fn of_ply_index(index: usize) -> Self {
        if index % 2 == 0 {
            Side::White
        } else {
            Side::Black
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl From<shakmaty::Color> for Side {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Side::White,
            shakmaty::Color::Black => Side::Black,
        }
    }
}

/// Game outcome from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "1/2-1/2")]
    Draw,
    #[serde(rename = "*")]
    Ongoing,
}

impl GameResult {
    /// Parse a PGN result tag. Anything unrecognised is treated as "*".
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "1-0" => GameResult::WhiteWins,
            "0-1" => GameResult::BlackWins,
            "1/2-1/2" | "½-½" => GameResult::Draw,
            _ => GameResult::Ongoing,
        }
    }

    /// Outcome for `side`, or None for an unfinished game.
    pub fn outcome_for(&self, side: Side) -> Option<Outcome> {
        match (self, side) {
            (GameResult::Draw, _) => Some(Outcome::Draw),
            (GameResult::WhiteWins, Side::White) | (GameResult::BlackWins, Side::Black) => {
                Some(Outcome::Win)
            }
            (GameResult::WhiteWins, Side::Black) | (GameResult::BlackWins, Side::White) => {
                Some(Outcome::Loss)
            }
            (GameResult::Ongoing, _) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: String,
    pub black: String,
    pub result: GameResult,
    pub date: Option<String>,
    pub time_control: Option<String>,
    pub eco: Option<String>,
    pub opening: Option<String>,
    pub event: Option<String>,
    pub link: Option<String>,
}

impl GameMetadata {
    /// Side played by `player`. Exact match first, then case-insensitive.
    pub fn side_of(&self, player: &str) -> Option<Side> {
        if self.white == player {
            return Some(Side::White);
        }
        if self.black == player {
            return Some(Side::Black);
        }
        if self.white.eq_ignore_ascii_case(player) {
            return Some(Side::White);
        }
        if self.black.eq_ignore_ascii_case(player) {
            return Some(Side::Black);
        }
        None
    }

    pub fn name_of(&self, side: Side) -> &str {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub metadata: GameMetadata,
    pub moves: Vec<String>, // SAN notation
    pub pgn: String,
}
