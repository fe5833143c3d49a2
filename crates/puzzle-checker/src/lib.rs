//! Puzzle checker
//!
//! Replays the mainline of every puzzle in a directory of PGN files against a
//! UCI engine and flags puzzles whose solver moves are not the unique best move.

pub mod batch;
pub mod config;
pub mod error;
pub mod failure_log;
pub mod oracle;
pub mod report;
pub mod stockfish;
pub mod validator;

pub use error::CheckerError;
pub use oracle::{CandidateMove, Oracle};
pub use validator::{validate, Failure, Verdict};
