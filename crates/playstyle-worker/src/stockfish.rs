//! Stockfish engine wrapper using UCI protocol (async I/O)

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use tracing::{debug, warn};

use crate::error::AnalysisError;

/// Result of a single position search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalResult {
    /// Centipawn score (from engine's perspective, i.e., side to move)
    pub cp: Option<i32>,
    /// Mate in N moves (positive = side to move mates, negative = gets mated)
    pub mate: Option<i32>,
    /// Best move in UCI notation, None when the side to move has no legal moves
    pub best_move: Option<String>,
    /// Deepest completed iteration reported by the engine
    pub depth: u32,
}

impl EvalResult {
    /// Score in centipawns from White's perspective.
    pub fn white_cp(&self, white_to_move: bool) -> i32 {
        eval_to_white_cp(self.cp, self.mate, white_to_move)
    }
}

/// UCI options applied after the handshake
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub threads: u32,
    pub hash_mb: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            hash_mb: 256,
        }
    }
}

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    /// A `go` was sent and its `bestmove` has not been read yet
    searching: bool,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub async fn new(path: &str, options: EngineOptions) -> Result<Self, AnalysisError> {
        let mut process = Command::new(path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AnalysisError::Stockfish(format!("Failed to spawn Stockfish: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| AnalysisError::Stockfish("Stockfish stdin unavailable".into()))?;
        let stdout = process
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| AnalysisError::Stockfish("Stockfish stdout unavailable".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout,
            searching: false,
        };

        // Initialize UCI
        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        // Configure for analysis
        engine
            .send(&format!("setoption name Threads value {}", options.threads))
            .await?;
        engine
            .send(&format!("setoption name Hash value {}", options.hash_mb))
            .await?;
        engine.send("setoption name UCI_AnalyseMode value true").await?;
        engine.ready().await?;

        Ok(engine)
    }

    /// Round-trip `isready` / `readyok`
    pub async fn ready(&mut self) -> Result<(), AnalysisError> {
        self.send("isready").await?;
        self.wait_for("readyok").await
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), AnalysisError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| AnalysisError::Stockfish(format!("Failed to write to Stockfish: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| AnalysisError::Stockfish(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    /// Read one trimmed output line. EOF means the process died.
    async fn read_line(&mut self) -> Result<String, AnalysisError> {
        let mut line = String::new();
        let n = self
            .stdout
            .read_line(&mut line)
            .await
            .map_err(|e| AnalysisError::Stockfish(format!("Failed to read from Stockfish: {e}")))?;
        if n == 0 {
            return Err(AnalysisError::Stockfish("Stockfish closed its output".into()));
        }
        let trimmed = line.trim().to_string();
        debug!(line = %trimmed, "SF >");
        Ok(trimmed)
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), AnalysisError> {
        loop {
            if self.read_line().await? == expected {
                return Ok(());
            }
        }
    }

    /// Stop an abandoned search and discard its output.
    async fn resync(&mut self) -> Result<(), AnalysisError> {
        warn!("Discarding output of an abandoned search");
        self.send("stop").await?;
        self.ready().await?;
        self.searching = false;
        Ok(())
    }

    /// Search a position to a fixed depth.
    ///
    /// Completes on the engine's `bestmove` line. Terminal positions finish
    /// below the requested depth; that is not an error.
    pub async fn evaluate(&mut self, fen: &str, depth: u32) -> Result<EvalResult, AnalysisError> {
        if self.searching {
            self.resync().await?;
        }

        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go depth {depth}")).await?;
        self.searching = true;

        let mut result = EvalResult::default();
        let mut pv_head: Option<String> = None;

        loop {
            let line = self.read_line().await?;

            if line.starts_with("info") && line.contains(" score ") {
                if let Some(d) = parse_depth(&line) {
                    result.depth = result.depth.max(d);
                }
                if let Some(cp) = parse_cp(&line) {
                    result.cp = Some(cp);
                    result.mate = None;
                }
                if let Some(mate) = parse_mate(&line) {
                    result.mate = Some(mate);
                    result.cp = None;
                }
                if let Some(first) = parse_pv(&line).into_iter().next() {
                    pv_head = Some(first);
                }
            } else if line.starts_with("bestmove") {
                result.best_move = parse_bestmove(&line).or(pv_head);
                break;
            }
        }

        self.searching = false;

        if result.cp.is_none() && result.mate.is_none() {
            return Err(AnalysisError::Stockfish(format!("No score reported for {fen}")));
        }
        Ok(result)
    }

    /// Like [`evaluate`](Self::evaluate), bounded by `limit`.
    pub async fn evaluate_with_timeout(
        &mut self,
        fen: &str,
        depth: u32,
        limit: Duration,
    ) -> Result<EvalResult, AnalysisError> {
        match tokio::time::timeout(limit, self.evaluate(fen, depth)).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout {
                fen: fen.to_string(),
                depth,
            }),
        }
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

/// Convert a side-to-move score to centipawns from White's perspective.
/// Mate scores map near ±10000, shorter mates further from zero.
pub fn eval_to_white_cp(cp: Option<i32>, mate: Option<i32>, is_white_to_move: bool) -> i32 {
    let score = if let Some(m) = mate {
        if m > 0 {
            10000 - m * 10
        } else {
            -10000 - m * 10
        }
    } else {
        cp.unwrap_or(0)
    };
    if is_white_to_move {
        score
    } else {
        -score
    }
}

/// Side to move from the second FEN field.
pub fn white_to_move(fen: &str) -> bool {
    fen.split_whitespace().nth(1) != Some("b")
}

fn token_after<T: std::str::FromStr>(line: &str, key: &str) -> Option<T> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == key && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    token_after(line, "cp")
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    token_after(line, "mate")
}

/// Parse search depth from info line
fn parse_depth(line: &str) -> Option<u32> {
    token_after(line, "depth")
}

/// Parse the move from a `bestmove` line
fn parse_bestmove(line: &str) -> Option<String> {
    match line.split_whitespace().nth(1) {
        Some("(none)") | Some("0000") | None => None,
        Some(mv) => Some(mv.to_string()),
    }
}

/// Parse PV moves from info line
fn parse_pv(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let mut in_pv = false;
    let mut moves = Vec::new();

    for part in parts {
        if part == "pv" {
            in_pv = true;
            continue;
        }
        if in_pv {
            // PV ends at next keyword or end of line
            if part.starts_with("bmc") || part == "string" {
                break;
            }
            moves.push(part.to_string());
        }
    }

    moves
}
