//! Position evaluation source and the Stockfish engine pool behind it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info};

use crate::config::WorkerConfig;
use crate::error::AnalysisError;
use crate::stockfish::{white_to_move, EngineOptions, StockfishEngine};

/// Engine verdict on one position, normalised to White's perspective.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionEval {
    /// Signed evaluation in pawns, positive = White is better
    pub evaluation: f64,
    /// Best move in UCI notation
    pub best_move: Option<String>,
    pub depth_reached: u32,
}

/// Anything that can score a position at a given search depth.
///
/// Implementations must fail rather than hang when the depth cannot be reached.
pub trait EvaluationSource {
    fn analyze_position(
        &self,
        fen: &str,
        depth: u32,
    ) -> impl Future<Output = Result<PositionEval, AnalysisError>> + Send;
}

/// A fixed set of Stockfish processes shared by concurrent evaluations.
///
/// Each engine serves one search at a time; the semaphore bounds in-flight
/// requests to the number of engines.
pub struct EnginePool {
    engines: Vec<Arc<Mutex<StockfishEngine>>>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl EnginePool {
    /// Spawn `config.pool_size` engines and wait until each reports ready.
    pub async fn spawn(config: &WorkerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;

        let options = EngineOptions {
            threads: config.engine_threads,
            hash_mb: config.engine_hash_mb,
        };

        let mut engines = Vec::with_capacity(config.pool_size);
        for i in 0..config.pool_size {
            let engine = StockfishEngine::new(&config.stockfish_path, options).await?;
            info!(engine_id = i, "Stockfish engine ready");
            engines.push(Arc::new(Mutex::new(engine)));
        }

        Ok(Self {
            permits: Arc::new(Semaphore::new(engines.len())),
            engines,
            timeout: config.eval_timeout,
        })
    }

    pub fn size(&self) -> usize {
        self.engines.len()
    }

    /// Quit every engine process.
    pub async fn shutdown(self) {
        info!("Shutting down Stockfish engines");
        for engine in &self.engines {
            engine.lock().await.quit().await;
        }
    }
}

impl EvaluationSource for EnginePool {
    async fn analyze_position(&self, fen: &str, depth: u32) -> Result<PositionEval, AnalysisError> {
        // Declared before the guard so the engine is released first.
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AnalysisError::Stockfish("Engine pool closed".into()))?;

        let free = self.engines.iter().find_map(|engine| engine.try_lock().ok());
        let mut engine = match free {
            Some(guard) => guard,
            None => self.engines[0].lock().await,
        };

        let result = engine.evaluate_with_timeout(fen, depth, self.timeout).await?;
        let white = white_to_move(fen);
        debug!(fen, depth = result.depth, cp = ?result.cp, mate = ?result.mate, "Position evaluated");

        Ok(PositionEval {
            evaluation: result.white_cp(white) as f64 / 100.0,
            best_move: result.best_move,
            depth_reached: result.depth,
        })
    }
}
