//! Worker configuration from environment variables

use std::env;
use std::time::Duration;

use tracing::info;

use crate::error::AnalysisError;

/// Default search depth per position
pub const DEFAULT_DEPTH: u32 = 18;

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Path to Stockfish binary
    pub stockfish_path: String,

    /// Search depth per position
    pub depth: u32,

    /// Number of Stockfish processes in the pool
    pub pool_size: usize,

    /// Threads per Stockfish process
    pub engine_threads: u32,

    /// Hash table size per Stockfish process (MB)
    pub engine_hash_mb: u32,

    /// Upper bound on a single position search
    pub eval_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            stockfish_path: "/usr/local/bin/stockfish".to_string(),
            depth: DEFAULT_DEPTH,
            pool_size: num_cpus::get(),
            engine_threads: 1,
            engine_hash_mb: 256,
            eval_timeout: Duration::from_secs(60),
        }
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn load() -> Result<Self, AnalysisError> {
        let defaults = Self::default();

        let stockfish_path = env::var("STOCKFISH_PATH").unwrap_or(defaults.stockfish_path);
        let depth = env_parse("ANALYSIS_DEPTH").unwrap_or(defaults.depth);
        let pool_size = env_parse("ENGINE_POOL_SIZE").unwrap_or(defaults.pool_size);
        let engine_threads = env_parse("ENGINE_THREADS").unwrap_or(defaults.engine_threads);
        let engine_hash_mb = env_parse("ENGINE_HASH_MB").unwrap_or(defaults.engine_hash_mb);
        let eval_timeout = env_parse("EVAL_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.eval_timeout);

        let config = Self {
            stockfish_path,
            depth,
            pool_size,
            engine_threads,
            engine_hash_mb,
            eval_timeout,
        };
        config.validate()?;

        info!(
            stockfish_path = %config.stockfish_path,
            depth = config.depth,
            pool_size = config.pool_size,
            "Worker config loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.depth == 0 {
            return Err(AnalysisError::Config("ANALYSIS_DEPTH must be at least 1"));
        }
        if self.pool_size == 0 {
            return Err(AnalysisError::Config("ENGINE_POOL_SIZE must be at least 1"));
        }
        if self.eval_timeout.is_zero() {
            return Err(AnalysisError::Config("EVAL_TIMEOUT_SECS must be positive"));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
