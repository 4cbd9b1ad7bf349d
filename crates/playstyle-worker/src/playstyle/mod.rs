//! Cross-game playstyle profiling.
//!
//! Every operation here is a pure function of the game history passed in:
//! profiles are recomputed from scratch on each call. Histories may come from
//! storage, so each game is checked with [`GameAnalysis::is_well_formed`] and
//! malformed entries are left out of every aggregate.

pub mod classify;
pub mod matchups;
pub mod metrics;
pub mod openings;
pub mod tables;
pub mod training;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analyzer::GameAnalysis;

pub use matchups::MatchupAnalysis;
pub use metrics::StyleMetrics;
pub use openings::OpeningPerformance;
pub use tables::{GrandmasterPick, StyleTables};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaystyleType {
    TacticalAttacker,
    PositionalPlayer,
    EndgameSpecialist,
    BlitzSpeedster,
    DefensivePlayer,
    UnstablePlayer,
}

impl PlaystyleType {
    pub const ALL: [PlaystyleType; 6] = [
        PlaystyleType::TacticalAttacker,
        PlaystyleType::PositionalPlayer,
        PlaystyleType::EndgameSpecialist,
        PlaystyleType::BlitzSpeedster,
        PlaystyleType::DefensivePlayer,
        PlaystyleType::UnstablePlayer,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaystyleProfile {
    pub primary_style: PlaystyleType,
    pub secondary_style: Option<PlaystyleType>,
    /// 0–100, higher means more tactical
    #[serde(rename = "tacticsvPositional")]
    pub tactics_vs_positional: f64,
    pub aggression_score: f64,
    pub defensive_strength: f64,
    pub opening_stability: f64,
    /// Percentage of the player's moves that were blunders
    pub blunder_rate: f64,
    /// Standard deviation of the player's centipawn loss
    pub accuracy_variance: f64,
    pub similar_grandmaster: Option<String>,
}

impl Default for PlaystyleProfile {
    /// Neutral baseline used when there is no history.
    fn default() -> Self {
        Self {
            primary_style: PlaystyleType::PositionalPlayer,
            secondary_style: None,
            tactics_vs_positional: 50.0,
            aggression_score: 50.0,
            defensive_strength: 50.0,
            opening_stability: 50.0,
            blunder_rate: 5.0,
            accuracy_variance: 15.0,
            similar_grandmaster: None,
        }
    }
}

impl PlaystyleProfile {
    pub fn metrics(&self) -> StyleMetrics {
        StyleMetrics {
            tactics_vs_positional: self.tactics_vs_positional,
            aggression_score: self.aggression_score,
            defensive_strength: self.defensive_strength,
            opening_stability: self.opening_stability,
            blunder_rate: self.blunder_rate,
            accuracy_variance: self.accuracy_variance,
        }
    }
}

/// Everything the dashboard shows for one player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerReport {
    pub username: String,
    pub playstyle_profile: PlaystyleProfile,
    pub game_history: Vec<GameAnalysis>,
    pub opening_performance: Vec<OpeningPerformance>,
    pub matchup_analysis: Vec<MatchupAnalysis>,
    pub training_recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PlaystyleAnalyzer {
    tables: StyleTables,
}

impl PlaystyleAnalyzer {
    pub fn new(tables: StyleTables) -> Self {
        Self { tables }
    }

    /// Derive a profile from the whole history. No usable games yields the
    /// default profile.
    pub fn analyze_playstyle(&self, games: &[GameAnalysis]) -> PlaystyleProfile {
        let games = usable_games(games);
        if games.is_empty() {
            return PlaystyleProfile::default();
        }

        let metrics = StyleMetrics::compute(&games);
        let primary_style = classify::primary_style(&metrics);
        let secondary_style = classify::secondary_style(&metrics, primary_style);
        let similar_grandmaster = self.tables.similar_grandmaster(primary_style);

        PlaystyleProfile {
            primary_style,
            secondary_style,
            tactics_vs_positional: metrics.tactics_vs_positional,
            aggression_score: metrics.aggression_score,
            defensive_strength: metrics.defensive_strength,
            opening_stability: metrics.opening_stability,
            blunder_rate: metrics.blunder_rate,
            accuracy_variance: metrics.accuracy_variance,
            similar_grandmaster,
        }
    }

    pub fn analyze_opening_performance(&self, games: &[GameAnalysis]) -> Vec<OpeningPerformance> {
        openings::opening_performance(&usable_games(games))
    }

    pub fn analyze_matchups(
        &self,
        games: &[GameAnalysis],
        opponent_styles: &HashMap<String, PlaystyleType>,
    ) -> Vec<MatchupAnalysis> {
        matchups::matchups(&usable_games(games), opponent_styles, &self.tables)
    }

    pub fn generate_training_recommendations(
        &self,
        profile: &PlaystyleProfile,
        games: &[GameAnalysis],
    ) -> Vec<String> {
        training::recommendations(profile, &usable_games(games))
    }

    /// Build the full report for `username` from their history.
    pub fn build_report(
        &self,
        username: &str,
        games: Vec<GameAnalysis>,
        opponent_styles: &HashMap<String, PlaystyleType>,
    ) -> PlayerReport {
        let playstyle_profile = self.analyze_playstyle(&games);
        let opening_performance = self.analyze_opening_performance(&games);
        let matchup_analysis = self.analyze_matchups(&games, opponent_styles);
        let training_recommendations =
            self.generate_training_recommendations(&playstyle_profile, &games);

        PlayerReport {
            username: username.to_string(),
            playstyle_profile,
            game_history: games,
            opening_performance,
            matchup_analysis,
            training_recommendations,
        }
    }
}

/// Drop malformed entries so they cannot skew the aggregates.
fn usable_games(games: &[GameAnalysis]) -> Vec<&GameAnalysis> {
    games
        .iter()
        .filter(|game| {
            let ok = game.is_well_formed();
            if !ok {
                warn!(game_id = %game.game_id, "Skipping malformed game analysis");
            }
            ok
        })
        .collect()
}
