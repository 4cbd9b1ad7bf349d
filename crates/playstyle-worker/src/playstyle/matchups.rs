use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::openings::ResultTally;
use super::tables::StyleTables;
use super::PlaystyleType;
use crate::analyzer::GameAnalysis;
use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupAnalysis {
    pub against_style: PlaystyleType,
    pub games_played: u32,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    /// Mean of the per-game average centipawn loss
    pub average_centipawn_loss: f64,
    pub recommended_counter_strategy: String,
}

/// Read a JSON object mapping opponent names to playstyles, e.g.
/// `{"bob": "tacticalAttacker"}`.
pub async fn load_opponent_styles(
    path: &Path,
) -> Result<HashMap<String, PlaystyleType>, AnalysisError> {
    let text = tokio::fs::read_to_string(path).await?;
    let styles: HashMap<String, PlaystyleType> = serde_json::from_str(&text)?;
    info!(opponents = styles.len(), path = %path.display(), "Opponent styles loaded");
    Ok(styles)
}

/// Group games by the opponent's assumed style. Opponents missing from
/// `opponent_styles` get the table's default style.
pub fn matchups(
    games: &[&GameAnalysis],
    opponent_styles: &HashMap<String, PlaystyleType>,
    tables: &StyleTables,
) -> Vec<MatchupAnalysis> {
    let mut groups: HashMap<PlaystyleType, (ResultTally, f64)> = HashMap::new();
    for game in games {
        let style = opponent_styles
            .get(&game.opponent)
            .copied()
            .unwrap_or(tables.default_opponent_style);
        let (tally, total_loss) = groups.entry(style).or_default();
        tally.record(game);
        *total_loss += game.average_centipawn_loss;
    }

    let mut analysis: Vec<MatchupAnalysis> = PlaystyleType::ALL
        .into_iter()
        .filter_map(|style| {
            let (tally, total_loss) = groups.get(&style)?;
            Some(MatchupAnalysis {
                against_style: style,
                games_played: tally.games,
                win_rate: tally.win_rate(),
                draw_rate: tally.draw_rate(),
                loss_rate: tally.loss_rate(),
                average_centipawn_loss: total_loss / tally.games as f64,
                recommended_counter_strategy: tables.counter_strategy(style).to_string(),
            })
        })
        .collect();

    analysis.sort_by(|a, b| b.games_played.cmp(&a.games_played));
    analysis
}
