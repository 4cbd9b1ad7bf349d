use chess_core::game_data::Outcome;
use serde::{Deserialize, Serialize};

use super::metrics::opening_evaluation;
use crate::analyzer::GameAnalysis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningPerformance {
    pub name: String,
    pub games_played: u32,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    /// Player-perspective evaluation at the end of the opening, in pawns
    pub average_evaluation: f64,
}

/// Win/draw/loss tally shared by the opening and matchup aggregates.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ResultTally {
    pub games: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl ResultTally {
    pub fn record(&mut self, game: &GameAnalysis) {
        self.games += 1;
        match game.result.outcome_for(game.player_color) {
            Some(Outcome::Win) => self.wins += 1,
            Some(Outcome::Draw) => self.draws += 1,
            Some(Outcome::Loss) => self.losses += 1,
            None => {}
        }
    }

    fn rate(&self, count: u32) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        count as f64 / self.games as f64 * 100.0
    }

    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }
}

/// Group by opening label, most played first. Ties keep first-seen order.
pub fn opening_performance(games: &[&GameAnalysis]) -> Vec<OpeningPerformance> {
    let mut groups: Vec<(&str, ResultTally, f64)> = Vec::new();

    for game in games {
        let label = game.opening_label();
        let index = match groups.iter().position(|(name, _, _)| *name == label) {
            Some(i) => i,
            None => {
                groups.push((label, ResultTally::default(), 0.0));
                groups.len() - 1
            }
        };
        let (_, tally, total_eval) = &mut groups[index];
        tally.record(game);
        *total_eval += opening_evaluation(game).unwrap_or(0.0);
    }

    let mut performance: Vec<OpeningPerformance> = groups
        .into_iter()
        .map(|(name, tally, total_eval)| OpeningPerformance {
            name: name.to_string(),
            games_played: tally.games,
            win_rate: tally.win_rate(),
            draw_rate: tally.draw_rate(),
            loss_rate: tally.loss_rate(),
            average_evaluation: total_eval / tally.games as f64,
        })
        .collect();

    performance.sort_by(|a, b| b.games_played.cmp(&a.games_played));
    performance
}
