//! Checker error types

use chess_core::PuzzleParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Illegal move {uci} in position {fen}")]
    IllegalMove { uci: String, fen: String },

    #[error("Engine returned no candidate moves")]
    NoCandidates,

    #[error("Puzzle parse error: {0}")]
    Parse(#[from] PuzzleParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid directory pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Cannot read puzzle directory: {0}")]
    Glob(#[from] glob::GlobError),
}
