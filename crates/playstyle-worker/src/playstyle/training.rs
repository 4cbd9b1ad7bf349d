use super::{PlaystyleProfile, PlaystyleType};
use crate::analyzer::GameAnalysis;

pub const MAX_RECOMMENDATIONS: usize = 5;

fn style_advice(style: PlaystyleType) -> [&'static str; 2] {
    match style {
        PlaystyleType::TacticalAttacker => [
            "Practice positional and endgame puzzles to balance your tactical skills",
            "Work on reducing your blunder rate by implementing a pre-move check routine",
        ],
        PlaystyleType::PositionalPlayer => [
            "Practice tactical puzzles to improve calculation abilities",
            "Study attacking games by Tal, Kasparov and Alekhine to develop attacking skills",
        ],
        PlaystyleType::EndgameSpecialist => [
            "Study complex middlegame positions to improve strategic planning",
            "Practice aggressive openings that lead to dynamic positions",
        ],
        PlaystyleType::BlitzSpeedster => [
            "Slow down and practice longer time controls to develop deeper calculation",
            "Develop a more consistent opening repertoire",
        ],
        PlaystyleType::DefensivePlayer => [
            "Practice attacking patterns and piece sacrifices",
            "Study games with dynamic pawn structures to improve attacking skills",
        ],
        PlaystyleType::UnstablePlayer => [
            "Focus on reducing blunders with systematic thought process",
            "Practice basic tactics and pattern recognition",
        ],
    }
}

/// Style advice first, then metric triggers, in insertion order, capped at
/// [`MAX_RECOMMENDATIONS`].
pub fn recommendations(profile: &PlaystyleProfile, _games: &[&GameAnalysis]) -> Vec<String> {
    let mut out: Vec<&str> = style_advice(profile.primary_style).to_vec();

    if profile.blunder_rate > 10.0 {
        out.push(
            "Use a blunder check technique: look for checks, captures, and threats before each move",
        );
    }
    if profile.tactics_vs_positional < 30.0 {
        out.push("Train with tactical puzzles focusing on combinations and sacrifices");
    } else if profile.tactics_vs_positional > 70.0 {
        out.push(
            "Study positional concepts like pawn structures, weak squares, and piece placement",
        );
    }
    if profile.opening_stability < 40.0 {
        out.push("Develop a more focused opening repertoire with 2-3 main openings for each color");
    }

    out.into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(str::to_string)
        .collect()
}
