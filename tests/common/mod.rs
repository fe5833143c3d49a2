#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use chess_core::PuzzleRecord;
use puzzle_checker::{CandidateMove, CheckerError, Oracle};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Deterministic oracle: candidates are scripted per (position, applied line).
#[derive(Default)]
pub struct ScriptedOracle {
    script: HashMap<(String, String), Vec<CandidateMove>>,
    illegal: HashSet<String>,
    fen: Option<String>,
    line: Vec<String>,
    /// Number of `set_position` calls
    pub resets: usize,
    /// Ply at which each `best_moves` query was made
    pub queried_plies: Vec<usize>,
    /// Every move applied since the last reset
    pub applied: Vec<String>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the candidates returned after `line` has been played from `fen`.
    pub fn with(mut self, fen: &str, line: &[&str], candidates: Vec<CandidateMove>) -> Self {
        self.script
            .insert((fen.to_string(), line.join(" ")), candidates);
        self
    }

    /// Make `advance` reject `uci` as illegal.
    pub fn rejecting(mut self, uci: &str) -> Self {
        self.illegal.insert(uci.to_string());
        self
    }
}

impl Oracle for ScriptedOracle {
    async fn set_position(&mut self, fen: &str) -> Result<(), CheckerError> {
        self.resets += 1;
        self.fen = Some(fen.to_string());
        self.line.clear();
        self.applied.clear();
        Ok(())
    }

    async fn best_moves(&mut self, n: usize) -> Result<Vec<CandidateMove>, CheckerError> {
        let fen = self
            .fen
            .clone()
            .ok_or_else(|| CheckerError::Engine("No position set".into()))?;
        self.queried_plies.push(self.line.len());

        let key = (fen, self.line.join(" "));
        let candidates = self
            .script
            .get(&key)
            .ok_or_else(|| CheckerError::Engine(format!("Unscripted position {key:?}")))?;
        Ok(candidates.iter().take(n).cloned().collect())
    }

    async fn advance(&mut self, uci: &str) -> Result<(), CheckerError> {
        if self.illegal.contains(uci) {
            return Err(CheckerError::IllegalMove {
                uci: uci.to_string(),
                fen: self.fen.clone().unwrap_or_default(),
            });
        }
        self.line.push(uci.to_string());
        self.applied.push(uci.to_string());
        Ok(())
    }
}

pub fn cp(uci: &str, rank: u32, score: i32) -> CandidateMove {
    CandidateMove::centipawns(uci, rank, score)
}

pub fn mate(uci: &str, rank: u32, moves: i32) -> CandidateMove {
    CandidateMove::mate_in(uci, rank, moves)
}

pub fn puzzle(fen: &str, moves: &[&str]) -> PuzzleRecord {
    PuzzleRecord {
        fen: fen.to_string(),
        moves: moves.iter().map(|m| m.to_string()).collect(),
        event: None,
        site: None,
    }
}
