//! Move-evaluation oracle abstraction

use std::fmt;

use crate::error::CheckerError;

/// A ranked move suggestion from the oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMove {
    /// Move in UCI notation
    pub uci: String,
    /// 1-based rank (1 = best)
    pub rank: u32,
    /// Centipawn score from the side to move's perspective
    pub cp: Option<i32>,
    /// Mate in N (positive = side to move mates)
    pub mate: Option<i32>,
}

impl CandidateMove {
    pub fn centipawns(uci: &str, rank: u32, cp: i32) -> Self {
        Self {
            uci: uci.to_string(),
            rank,
            cp: Some(cp),
            mate: None,
        }
    }

    pub fn mate_in(uci: &str, rank: u32, mate: i32) -> Self {
        Self {
            uci: uci.to_string(),
            rank,
            cp: None,
            mate: Some(mate),
        }
    }
}

impl fmt::Display for CandidateMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mate, self.cp) {
            (Some(mate), _) => write!(f, "{} (mate {mate})", self.uci),
            (None, Some(cp)) => write!(f, "{} (cp {cp})", self.uci),
            (None, None) => write!(f, "{}", self.uci),
        }
    }
}

/// The capability the validator needs from an engine.
///
/// One position is live at a time: `set_position` resets it, `advance` plays
/// a move on it, `best_moves` ranks candidates for the side to move.
#[allow(async_fn_in_trait)]
pub trait Oracle {
    async fn set_position(&mut self, fen: &str) -> Result<(), CheckerError>;

    /// Up to `n` candidates, best first.
    async fn best_moves(&mut self, n: usize) -> Result<Vec<CandidateMove>, CheckerError>;

    async fn advance(&mut self, uci: &str) -> Result<(), CheckerError>;
}
