//! Style classification from computed metrics.

use super::metrics::StyleMetrics;
use super::PlaystyleType;

/// Primary style. Rules are checked in order and the first match wins.
pub fn primary_style(m: &StyleMetrics) -> PlaystyleType {
    let tactical = m.tactics_vs_positional;

    if tactical > 70.0 && m.aggression_score > 70.0 && m.blunder_rate > 8.0 {
        return PlaystyleType::TacticalAttacker;
    }
    if tactical < 40.0 && m.blunder_rate < 5.0 && m.accuracy_variance < 15.0 {
        return PlaystyleType::PositionalPlayer;
    }
    if tactical > 40.0 && tactical < 60.0 && m.blunder_rate < 7.0 && m.defensive_strength > 65.0 {
        return PlaystyleType::EndgameSpecialist;
    }
    if m.opening_stability < 30.0 && m.blunder_rate > 10.0 && m.accuracy_variance > 20.0 {
        return PlaystyleType::BlitzSpeedster;
    }
    if m.defensive_strength > 75.0 && m.aggression_score < 40.0 && m.blunder_rate < 6.0 {
        return PlaystyleType::DefensivePlayer;
    }
    if m.blunder_rate > 12.0 && m.accuracy_variance > 25.0 {
        return PlaystyleType::UnstablePlayer;
    }

    if tactical > 50.0 {
        PlaystyleType::TacticalAttacker
    } else {
        PlaystyleType::PositionalPlayer
    }
}

/// Secondary style: first strong tendency that differs from the primary.
pub fn secondary_style(m: &StyleMetrics, primary: PlaystyleType) -> Option<PlaystyleType> {
    [
        (m.defensive_strength > 70.0, PlaystyleType::EndgameSpecialist),
        (m.tactics_vs_positional > 65.0, PlaystyleType::TacticalAttacker),
        (m.aggression_score < 35.0, PlaystyleType::DefensivePlayer),
    ]
    .into_iter()
    .find(|&(matched, style)| matched && style != primary)
    .map(|(_, style)| style)
}
