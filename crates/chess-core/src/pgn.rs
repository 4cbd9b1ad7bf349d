//! PGN parsing utilities: a lightweight regex-based parser.

use std::sync::LazyLock;

use regex::Regex;

use crate::game_data::{GameData, GameMetadata, GameResult};

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).expect("header regex"));
static HEADER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("header line regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("comment regex"));
static VARIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("variation regex"));
static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"O-O-O[+#]?|O-O[+#]?|[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?")
        .expect("move regex")
});

/// Parse a single-game PGN string into a GameData struct.
/// Returns None for games without moves or starting from a custom position.
pub fn parse_pgn(pgn: &str) -> Option<GameData> {
    let mut white = "Unknown".to_string();
    let mut black = "Unknown".to_string();
    let mut result = GameResult::Ongoing;
    let mut date = None;
    let mut time_control = None;
    let mut eco = None;
    let mut opening = None;
    let mut event = None;
    let mut link = None;
    let mut setup = None;
    let mut fen = None;

    for cap in HEADER_RE.captures_iter(pgn) {
        let key = &cap[1];
        let value = cap[2].to_string();
        match key {
            "White" => white = value,
            "Black" => black = value,
            "Result" => result = GameResult::from_tag(&value),
            "Date" => date = non_empty(value),
            "TimeControl" => time_control = non_empty(value),
            "ECO" => eco = non_empty(value),
            "Opening" => opening = non_empty(value),
            "Event" => event = non_empty(value),
            "Link" | "Site" => {
                if link.is_none() {
                    link = non_empty(value);
                }
            }
            "SetUp" => setup = Some(value),
            "FEN" => fen = Some(value),
            _ => {}
        }
    }

    // Filter non-standard positions
    if setup.as_deref() == Some("1") {
        if let Some(ref f) = fen {
            if f != STANDARD_START_FEN {
                return None;
            }
        }
    }

    let moves = extract_moves(pgn);
    if moves.is_empty() {
        return None;
    }

    Some(GameData {
        metadata: GameMetadata {
            white,
            black,
            result,
            date,
            time_control,
            eco,
            opening,
            event,
            link,
        },
        moves,
        pgn: pgn.to_string(),
    })
}

/// Split a multi-game PGN file into one slice per game.
///
/// A new game starts at the first header line that follows movetext.
pub fn split_games(text: &str) -> Vec<&str> {
    let mut games = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut seen_movetext = false;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            if seen_movetext {
                games.push(text[start..offset].trim());
                start = offset;
                seen_movetext = false;
            }
        } else if !trimmed.is_empty() {
            seen_movetext = true;
        }
        offset += line.len();
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        games.push(tail);
    }
    games
}

/// Extract SAN moves from PGN text (after removing headers, comments, variations).
fn extract_moves(pgn: &str) -> Vec<String> {
    let no_headers = HEADER_LINE_RE.replace_all(pgn, "");
    let no_comments = COMMENT_RE.replace_all(&no_headers, "");
    let no_variations = VARIATION_RE.replace_all(&no_comments, "");

    MOVE_RE
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() || value == "?" || value == "????.??.??" {
        None
    } else {
        Some(value)
    }
}
