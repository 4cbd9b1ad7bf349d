//! Playstyle Worker
//!
//! Analyzes a player's games from PGN files with a pool of native Stockfish
//! processes and prints the resulting player report as JSON.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use chess_core::pgn::split_games;
use chess_core::replay::ReplayedGame;
use playstyle_worker::analyzer::{analyze_game, replay_pgn, GameAnalysis};
use playstyle_worker::config::WorkerConfig;
use playstyle_worker::evaluator::EnginePool;
use playstyle_worker::playstyle::matchups::load_opponent_styles;
use playstyle_worker::playstyle::{GrandmasterPick, PlaystyleAnalyzer, StyleTables};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Player whose games are analyzed (matched against the White/Black headers)
    #[arg(short, long)]
    player: String,

    /// Search depth per position (overrides ANALYSIS_DEPTH)
    #[arg(short, long)]
    depth: Option<u32>,

    /// Number of Stockfish processes (overrides ENGINE_POOL_SIZE)
    #[arg(short, long)]
    engines: Option<usize>,

    /// JSON object mapping opponent names to playstyles
    #[arg(long)]
    opponent_styles: Option<PathBuf>,

    /// Pick the similar grandmaster at random instead of the first listed
    #[arg(long)]
    random_grandmaster: bool,

    /// PGN files, each holding one or more games
    #[arg(required = true)]
    pgn_files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let mut config = WorkerConfig::load()?;
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    if let Some(engines) = args.engines {
        config.pool_size = engines;
    }
    config.validate()?;

    let opponent_styles = match &args.opponent_styles {
        Some(path) => load_opponent_styles(path)
            .await
            .with_context(|| format!("Invalid opponent style file {}", path.display()))?,
        None => HashMap::new(),
    };

    let games = load_games(&args.pgn_files).await?;
    info!(games = games.len(), player = %args.player, "Games loaded");

    let pool = EnginePool::spawn(&config)
        .await
        .context("Failed to start Stockfish engines")?;
    info!(engines = pool.size(), depth = config.depth, "Engine pool ready");

    let mut history: Vec<GameAnalysis> = Vec::with_capacity(games.len());
    let mut failed = 0u32;
    for game in &games {
        match analyze_game(&pool, game, &args.player, config.depth).await {
            Ok(analysis) => history.push(analysis),
            Err(e) if e.is_evaluation_failure() => {
                error!(error = %e, "Engine failed, skipping game");
                failed += 1;
            }
            Err(e) => {
                warn!(error = %e, white = %game.metadata.white, black = %game.metadata.black, "Skipping game");
                failed += 1;
            }
        }
    }
    pool.shutdown().await;

    info!(analyzed = history.len(), failed, "Analysis finished");

    let pick = if args.random_grandmaster {
        GrandmasterPick::Random
    } else {
        GrandmasterPick::FirstListed
    };
    let analyzer = PlaystyleAnalyzer::new(StyleTables::default().with_pick(pick));
    let report = analyzer.build_report(&args.player, history, &opponent_styles);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Read, split, parse and replay every game in `paths`. Unparseable or
/// illegal games are logged and skipped.
async fn load_games(paths: &[PathBuf]) -> anyhow::Result<Vec<ReplayedGame>> {
    let mut games = Vec::new();
    for path in paths {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        for (i, pgn) in split_games(&text).into_iter().enumerate() {
            match replay_pgn(pgn) {
                Ok(replayed) => games.push(replayed),
                Err(e) => {
                    warn!(file = %path.display(), index = i, error = %e, "Skipping unusable game")
                }
            }
        }
    }
    Ok(games)
}
