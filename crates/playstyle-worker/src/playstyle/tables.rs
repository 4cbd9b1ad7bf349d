//! Fixed reference data for style profiling, passed in as configuration.

use std::collections::HashMap;

use rand::seq::SliceRandom;

use super::PlaystyleType;

/// How to choose among grandmasters sharing a style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GrandmasterPick {
    /// First matching entry in table order
    #[default]
    FirstListed,
    /// Uniformly random matching entry
    Random,
}

#[derive(Debug, Clone)]
pub struct StyleTables {
    /// Grandmaster name and the style they are known for, in lookup order
    pub grandmasters: Vec<(String, PlaystyleType)>,
    pub counter_strategies: HashMap<PlaystyleType, String>,
    /// Assumed style for opponents missing from the lookup
    pub default_opponent_style: PlaystyleType,
    pub grandmaster_pick: GrandmasterPick,
}

impl Default for StyleTables {
    fn default() -> Self {
        use PlaystyleType::*;

        let grandmasters = [
            ("Garry Kasparov", TacticalAttacker),
            ("Anatoly Karpov", PositionalPlayer),
            ("Magnus Carlsen", EndgameSpecialist),
            ("Hikaru Nakamura", BlitzSpeedster),
            ("Tigran Petrosian", DefensivePlayer),
            ("Mikhail Tal", TacticalAttacker),
            ("Vladimir Kramnik", PositionalPlayer),
            ("Jose Raul Capablanca", EndgameSpecialist),
            ("Alexander Alekhine", TacticalAttacker),
            ("Bobby Fischer", TacticalAttacker),
        ]
        .into_iter()
        .map(|(name, style)| (name.to_string(), style))
        .collect();

        let counter_strategies = [
            (TacticalAttacker, "Simplify positions and avoid tactical complications"),
            (PositionalPlayer, "Create imbalances and seek tactical opportunities"),
            (EndgameSpecialist, "Keep pieces on the board and avoid simplification"),
            (BlitzSpeedster, "Play solid openings and maintain a steady pace"),
            (DefensivePlayer, "Maintain patience and develop slow attacking plans"),
            (UnstablePlayer, "Maintain steady pressure and avoid wild complications"),
        ]
        .into_iter()
        .map(|(style, text)| (style, text.to_string()))
        .collect();

        Self {
            grandmasters,
            counter_strategies,
            default_opponent_style: TacticalAttacker,
            grandmaster_pick: GrandmasterPick::default(),
        }
    }
}

impl StyleTables {
    pub fn with_pick(mut self, pick: GrandmasterPick) -> Self {
        self.grandmaster_pick = pick;
        self
    }

    /// Grandmasters listed under `style`, in table order.
    pub fn grandmasters_for(&self, style: PlaystyleType) -> Vec<&str> {
        self.grandmasters
            .iter()
            .filter(|(_, s)| *s == style)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn similar_grandmaster(&self, style: PlaystyleType) -> Option<String> {
        let candidates = self.grandmasters_for(style);
        let picked = match self.grandmaster_pick {
            GrandmasterPick::FirstListed => candidates.first(),
            GrandmasterPick::Random => candidates.choose(&mut rand::thread_rng()),
        };
        picked.map(|name| name.to_string())
    }

    pub fn counter_strategy(&self, style: PlaystyleType) -> &str {
        self.counter_strategies
            .get(&style)
            .map(String::as_str)
            .unwrap_or_default()
    }
}
