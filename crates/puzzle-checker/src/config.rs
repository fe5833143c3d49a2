//! Checker configuration from environment variables

use std::env;
use std::path::PathBuf;

use crate::error::CheckerError;

pub const DEFAULT_LOG_PATH: &str = "invalid.txt";
pub const PUZZLE_EXTENSION: &str = "pgn";

#[derive(Clone, Debug)]
pub struct CheckerConfig {
    /// UCI `Threads` option
    pub threads: u32,

    /// UCI `Hash` option in MB
    pub hash_mb: u32,

    /// UCI `Minimum Thinking Time` option in milliseconds
    pub min_think_ms: u32,

    /// Search depth for every top-moves query
    pub depth: u32,

    /// Failure log, truncated at startup
    pub log_path: PathBuf,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            threads: 16,
            hash_mb: 256,
            min_think_ms: 8,
            depth: 20,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl CheckerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, CheckerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CheckerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let number = |key: &str, default: u32| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        let config = Self {
            threads: number("ENGINE_THREADS", defaults.threads),
            hash_mb: number("ENGINE_HASH_MB", defaults.hash_mb),
            min_think_ms: number("ENGINE_MIN_THINK_MS", defaults.min_think_ms),
            depth: number("ENGINE_DEPTH", defaults.depth),
            log_path: lookup("INVALID_LOG_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.log_path),
        };

        if config.threads == 0 {
            return Err(CheckerError::Config("ENGINE_THREADS must be at least 1"));
        }
        if config.depth == 0 {
            return Err(CheckerError::Config("ENGINE_DEPTH must be at least 1"));
        }

        Ok(config)
    }
}
