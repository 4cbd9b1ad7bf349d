//! Integration tests: cross-game profiling, opening and matchup aggregates,
//! training recommendations and the full player report.

mod common;

use std::collections::HashMap;

use chess_core::game_data::{GameResult, Side};
use common::{quiet_game, short_game, stored_game, ScriptedSource, DEPTH};
use playstyle_worker::analyzer::analyze_game;
use playstyle_worker::error::AnalysisError;
use playstyle_worker::playstyle::matchups::load_opponent_styles;
use playstyle_worker::playstyle::{
    GrandmasterPick, PlaystyleAnalyzer, PlaystyleProfile, PlaystyleType, StyleTables,
};

fn analyzer() -> PlaystyleAnalyzer {
    PlaystyleAnalyzer::default()
}

// ---------------------------------------------------------------------------
// Empty history
// ---------------------------------------------------------------------------

#[test]
fn empty_history_gives_default_profile() {
    let profile = analyzer().analyze_playstyle(&[]);
    assert_eq!(profile, PlaystyleProfile::default());
    assert_eq!(profile.primary_style, PlaystyleType::PositionalPlayer);
    assert_eq!(profile.tactics_vs_positional, 50.0);
    assert_eq!(profile.aggression_score, 50.0);
    assert_eq!(profile.defensive_strength, 50.0);
    assert_eq!(profile.opening_stability, 50.0);
    assert_eq!(profile.blunder_rate, 5.0);
    assert_eq!(profile.accuracy_variance, 15.0);
    assert!(profile.secondary_style.is_none());
    assert!(profile.similar_grandmaster.is_none());
}

#[test]
fn empty_history_gives_empty_aggregates() {
    let a = analyzer();
    assert!(a.analyze_opening_performance(&[]).is_empty());
    assert!(a.analyze_matchups(&[], &HashMap::new()).is_empty());
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[test]
fn quiet_games_profile_as_positional() {
    let games = vec![
        quiet_game(Side::White, GameResult::Draw, Some("London System"), "bob"),
        quiet_game(Side::White, GameResult::WhiteWins, Some("London System"), "bob"),
    ];
    let profile = analyzer().analyze_playstyle(&games);

    assert_eq!(profile.tactics_vs_positional, 50.0);
    assert_eq!(profile.aggression_score, 50.0);
    assert_eq!(profile.defensive_strength, 50.0);
    // 100 - 50 + 20
    assert_eq!(profile.opening_stability, 70.0);
    assert_eq!(profile.blunder_rate, 0.0);
    assert_eq!(profile.accuracy_variance, 0.0);
    assert_eq!(profile.primary_style, PlaystyleType::PositionalPlayer);
    assert!(profile.secondary_style.is_none());
    assert_eq!(profile.similar_grandmaster.as_deref(), Some("Anatoly Karpov"));
}

#[test]
fn profile_does_not_depend_on_history_order() {
    let a = quiet_game(Side::White, GameResult::Draw, Some("French Defense"), "bob");
    let b = stored_game(
        Side::Black,
        GameResult::WhiteWins,
        Some("Sicilian Defense"),
        "carl",
        &[(0.3, 0), (0.5, 20), (1.8, 0), (3.1, 150)],
    );
    let forward = analyzer().analyze_playstyle(&[a.clone(), b.clone()]);
    let backward = analyzer().analyze_playstyle(&[b, a]);
    assert_eq!(forward, backward);
}

#[test]
fn random_grandmaster_shares_primary_style() {
    let tables = StyleTables::default().with_pick(GrandmasterPick::Random);
    let analyzer = PlaystyleAnalyzer::new(tables);
    let games = vec![quiet_game(Side::White, GameResult::Draw, None, "bob")];

    for _ in 0..20 {
        let profile = analyzer.analyze_playstyle(&games);
        let gm = profile.similar_grandmaster.unwrap();
        assert!(gm == "Anatoly Karpov" || gm == "Vladimir Kramnik", "unexpected {gm}");
    }
}

#[test]
fn custom_tables_replace_defaults() {
    let tables = StyleTables {
        grandmasters: vec![("Ulf Andersson".to_string(), PlaystyleType::PositionalPlayer)],
        ..StyleTables::default()
    };
    let games = vec![quiet_game(Side::White, GameResult::Draw, None, "bob")];
    let profile = PlaystyleAnalyzer::new(tables).analyze_playstyle(&games);
    assert_eq!(profile.similar_grandmaster.as_deref(), Some("Ulf Andersson"));
}

// ---------------------------------------------------------------------------
// Malformed history entries
// ---------------------------------------------------------------------------

#[test]
fn malformed_entries_are_excluded() {
    let good = quiet_game(Side::White, GameResult::WhiteWins, Some("Italian Game"), "bob");

    let mut truncated = quiet_game(Side::Black, GameResult::WhiteWins, Some("Dutch"), "carl");
    truncated.winning_chances.clear();

    let mut mislabelled = quiet_game(Side::White, GameResult::BlackWins, Some("Dutch"), "dana");
    mislabelled.move_evaluations[0].centipawn_loss = 300;

    let mut renumbered = quiet_game(Side::White, GameResult::Draw, Some("Dutch"), "erin");
    renumbered.move_evaluations[1].move_number = 7;

    let a = analyzer();
    let all = vec![good.clone(), truncated, mislabelled, renumbered];
    assert_eq!(a.analyze_playstyle(&all), a.analyze_playstyle(&[good.clone()]));

    let openings = a.analyze_opening_performance(&all);
    assert_eq!(openings.len(), 1);
    assert_eq!(openings[0].name, "Italian Game");

    let matchups = a.analyze_matchups(&all, &HashMap::new());
    assert_eq!(matchups.len(), 1);
    assert_eq!(matchups[0].games_played, 1);
}

#[test]
fn only_malformed_history_gives_default_profile() {
    let mut bad = quiet_game(Side::White, GameResult::Draw, None, "bob");
    bad.move_evaluations[2].evaluation = f64::NAN;
    assert_eq!(analyzer().analyze_playstyle(&[bad]), PlaystyleProfile::default());
}

// ---------------------------------------------------------------------------
// Openings
// ---------------------------------------------------------------------------

#[test]
fn opening_results_from_player_perspective() {
    let games = vec![
        quiet_game(Side::White, GameResult::WhiteWins, Some("Sicilian Defense"), "bob"),
        quiet_game(Side::Black, GameResult::Draw, Some("Sicilian Defense"), "carl"),
    ];
    let openings = analyzer().analyze_opening_performance(&games);

    assert_eq!(openings.len(), 1);
    let sicilian = &openings[0];
    assert_eq!(sicilian.name, "Sicilian Defense");
    assert_eq!(sicilian.games_played, 2);
    assert_eq!(sicilian.win_rate, 50.0);
    assert_eq!(sicilian.draw_rate, 50.0);
    assert_eq!(sicilian.loss_rate, 0.0);
    // +0.1 for White, -0.1 for Black
    assert!(sicilian.average_evaluation.abs() < 1e-9);
}

#[test]
fn openings_sorted_by_games_played() {
    let games = vec![
        quiet_game(Side::White, GameResult::BlackWins, Some("French Defense"), "bob"),
        quiet_game(Side::White, GameResult::WhiteWins, Some("Sicilian Defense"), "bob"),
        quiet_game(Side::White, GameResult::WhiteWins, None, "bob"),
        quiet_game(Side::White, GameResult::Draw, Some("Sicilian Defense"), "bob"),
    ];
    let openings = analyzer().analyze_opening_performance(&games);

    let names: Vec<&str> = openings.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["Sicilian Defense", "French Defense", "Unknown Opening"]);
    assert_eq!(openings[1].loss_rate, 100.0);
    assert_eq!(openings[2].win_rate, 100.0);
}

#[test]
fn unfinished_games_count_as_played_only() {
    let games = vec![quiet_game(Side::White, GameResult::Ongoing, Some("Grob"), "bob")];
    let grob = &analyzer().analyze_opening_performance(&games)[0];
    assert_eq!(grob.games_played, 1);
    assert_eq!(grob.win_rate + grob.draw_rate + grob.loss_rate, 0.0);
}

// ---------------------------------------------------------------------------
// Matchups
// ---------------------------------------------------------------------------

#[test]
fn matchups_grouped_by_opponent_style() {
    let styles = HashMap::from([
        ("magnus".to_string(), PlaystyleType::EndgameSpecialist),
        ("tigran".to_string(), PlaystyleType::DefensivePlayer),
    ]);
    let games = vec![
        stored_game(
            Side::White,
            GameResult::WhiteWins,
            None,
            "magnus",
            &[(0.1, 30), (0.1, 0), (0.1, 10), (0.1, 0)],
        ),
        quiet_game(Side::Black, GameResult::WhiteWins, None, "magnus"),
        quiet_game(Side::White, GameResult::Draw, None, "stranger"),
    ];
    let matchups = analyzer().analyze_matchups(&games, &styles);

    assert_eq!(matchups.len(), 2);

    let endgame = &matchups[0];
    assert_eq!(endgame.against_style, PlaystyleType::EndgameSpecialist);
    assert_eq!(endgame.games_played, 2);
    assert_eq!(endgame.win_rate, 50.0);
    assert_eq!(endgame.loss_rate, 50.0);
    // per-game averages 20 and 0
    assert!((endgame.average_centipawn_loss - 10.0).abs() < 1e-9);
    assert_eq!(
        endgame.recommended_counter_strategy,
        "Keep pieces on the board and avoid simplification"
    );

    // Unknown opponents default to tactical attackers
    let tactical = &matchups[1];
    assert_eq!(tactical.against_style, PlaystyleType::TacticalAttacker);
    assert_eq!(tactical.draw_rate, 100.0);
    assert_eq!(
        tactical.recommended_counter_strategy,
        "Simplify positions and avoid tactical complications"
    );
}

#[test]
fn matchup_ties_follow_style_order() {
    let styles = HashMap::from([("tigran".to_string(), PlaystyleType::DefensivePlayer)]);
    let games = vec![
        quiet_game(Side::White, GameResult::Draw, None, "tigran"),
        quiet_game(Side::White, GameResult::Draw, None, "stranger"),
    ];
    let matchups = analyzer().analyze_matchups(&games, &styles);
    let order: Vec<PlaystyleType> = matchups.iter().map(|m| m.against_style).collect();
    assert_eq!(order, [PlaystyleType::TacticalAttacker, PlaystyleType::DefensivePlayer]);
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn report_from_analyzed_game() {
    let game = short_game("1-0");
    let source = ScriptedSource::for_game(&game, &[0.5, 0.3, 0.2, -1.4, 1.0], &[Some("e2e4")]);
    let analysis = analyze_game(&source, &game, "alice", DEPTH).await.unwrap();

    let report = analyzer().build_report("alice", vec![analysis], &HashMap::new());
    let profile = &report.playstyle_profile;

    // One blunder in two moves
    assert_eq!(profile.blunder_rate, 50.0);
    // 50 + 10 + 30 + 15 * 4.1 / 3, clamped
    assert_eq!(profile.tactics_vs_positional, 100.0);
    assert_eq!(profile.aggression_score, 50.0);
    assert_eq!(profile.defensive_strength, 35.0);
    assert_eq!(profile.opening_stability, 20.0);
    assert!((profile.accuracy_variance - 80.0).abs() < 1e-9);

    // Blitz rule is checked before the unstable rule
    assert_eq!(profile.primary_style, PlaystyleType::BlitzSpeedster);
    assert_eq!(profile.secondary_style, Some(PlaystyleType::TacticalAttacker));
    assert_eq!(profile.similar_grandmaster.as_deref(), Some("Hikaru Nakamura"));

    assert_eq!(report.training_recommendations.len(), 5);
    assert_eq!(
        report.training_recommendations[0],
        "Slow down and practice longer time controls to develop deeper calculation"
    );

    assert_eq!(report.opening_performance[0].name, "King's Knight Opening");
    assert_eq!(report.opening_performance[0].win_rate, 100.0);
    assert_eq!(report.matchup_analysis[0].against_style, PlaystyleType::TacticalAttacker);
    assert_eq!(report.game_history.len(), 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["playstyleProfile"]["primaryStyle"], "blitzSpeedster");
    assert_eq!(json["playstyleProfile"]["tacticsvPositional"], 100.0);
    assert_eq!(json["matchupAnalysis"][0]["againstStyle"], "tacticalAttacker");
}

// ---------------------------------------------------------------------------
// Opponent style file
// ---------------------------------------------------------------------------

fn style_file(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn loads_opponent_styles_from_json() {
    let path = style_file("styles.json", r#"{"bob": "tacticalAttacker", "carol": "defensivePlayer"}"#);
    let styles = load_opponent_styles(&path).await.unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(styles.len(), 2);
    assert_eq!(styles["bob"], PlaystyleType::TacticalAttacker);
    assert_eq!(styles["carol"], PlaystyleType::DefensivePlayer);
}

#[tokio::test]
async fn opponent_style_file_errors() {
    let missing = std::env::temp_dir().join(format!("{}-no-such-styles.json", std::process::id()));
    let err = load_opponent_styles(&missing).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Io(_)), "got {err:?}");

    let path = style_file("bad-styles.json", r#"{"bob": "speedDemon"}"#);
    let err = load_opponent_styles(&path).await.unwrap_err();
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(err, AnalysisError::Json(_)), "got {err:?}");
}
