//! Puzzle validation
//!
//! A puzzle is valid when, at every solver ply, the engine's best move is
//! unique and equals the move the puzzle plays. Opponent plies are replayed
//! but never judged, since a puzzle may accept any defence.

use std::fmt;

use chess_core::PuzzleRecord;
use tracing::debug;

use crate::error::CheckerError;
use crate::failure_log::{FailureLog, FailureLogEntry};
use crate::oracle::{CandidateMove, Oracle};

/// Candidates requested per solver ply: the best move and its closest rival.
const CANDIDATES_PER_PLY: usize = 2;

/// Why a puzzle was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    NoMoves,
    AmbiguousBestMove {
        ply: usize,
        best: CandidateMove,
        runner_up: CandidateMove,
    },
    SuboptimalMove {
        ply: usize,
        played: String,
        best: CandidateMove,
    },
}

impl Failure {
    /// Compact form used in the failure log.
    pub fn discrepancy(&self) -> String {
        match self {
            Failure::NoMoves => "no moves".to_string(),
            Failure::AmbiguousBestMove {
                best, runner_up, ..
            } => format!("{} & {}", best.uci, runner_up.uci),
            Failure::SuboptimalMove { played, best, .. } => format!("{played} < {}", best.uci),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::NoMoves => write!(f, "No moves in puzzle"),
            Failure::AmbiguousBestMove {
                ply,
                best,
                runner_up,
            } => write!(f, "Two best moves at ply {ply}: {best} & {runner_up}"),
            Failure::SuboptimalMove { ply, played, best } => {
                write!(f, "Not best move at ply {ply}: {played} < {best}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Failure),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

/// Oracle state bound to one puzzle's starting position.
///
/// `ply()` always equals the number of mainline moves applied so far.
pub struct EvaluationSession<'a, O: Oracle> {
    oracle: &'a mut O,
    applied: usize,
}

impl<'a, O: Oracle> EvaluationSession<'a, O> {
    pub async fn bind(oracle: &'a mut O, fen: &str) -> Result<Self, CheckerError> {
        oracle.set_position(fen).await?;
        Ok(Self { oracle, applied: 0 })
    }

    pub fn ply(&self) -> usize {
        self.applied
    }

    pub async fn top_candidates(&mut self, n: usize) -> Result<Vec<CandidateMove>, CheckerError> {
        self.oracle.best_moves(n).await
    }

    pub async fn advance(&mut self, uci: &str) -> Result<(), CheckerError> {
        self.oracle.advance(uci).await?;
        self.applied += 1;
        Ok(())
    }
}

/// Even plies belong to the solver; odd plies are the opponent's reply.
pub fn is_solver_ply(ply: usize) -> bool {
    ply % 2 == 0
}

/// Two candidates tie when both centipawn and mate scores agree,
/// including both being absent.
pub fn is_tied(best: &CandidateMove, runner_up: &CandidateMove) -> bool {
    best.cp == runner_up.cp && best.mate == runner_up.mate
}

pub fn matches_best(played: &str, best: &CandidateMove) -> bool {
    played == best.uci
}

/// Judge the solver's move at the session's current ply.
async fn judge_solver_move<O: Oracle>(
    session: &mut EvaluationSession<'_, O>,
    played: &str,
) -> Result<Option<Failure>, CheckerError> {
    let ply = session.ply();
    let mut ranked = session
        .top_candidates(CANDIDATES_PER_PLY)
        .await?
        .into_iter();
    let best = ranked.next().ok_or(CheckerError::NoCandidates)?;

    if let Some(runner_up) = ranked.next() {
        if is_tied(&best, &runner_up) {
            return Ok(Some(Failure::AmbiguousBestMove {
                ply,
                best,
                runner_up,
            }));
        }
    }

    if !matches_best(played, &best) {
        return Ok(Some(Failure::SuboptimalMove {
            ply,
            played: played.to_string(),
            best,
        }));
    }

    debug!(ply, played, "Solver move is the unique best");
    Ok(None)
}

/// Replay a puzzle against the oracle and decide its verdict.
pub async fn evaluate<O: Oracle>(
    oracle: &mut O,
    puzzle: &PuzzleRecord,
) -> Result<Verdict, CheckerError> {
    if puzzle.is_empty() {
        return Ok(Verdict::Invalid(Failure::NoMoves));
    }

    let mut session = EvaluationSession::bind(oracle, &puzzle.fen).await?;
    for (ply, played) in puzzle.moves.iter().enumerate() {
        if is_solver_ply(ply) {
            if let Some(failure) = judge_solver_move(&mut session, played).await? {
                return Ok(Verdict::Invalid(failure));
            }
        }
        session.advance(played).await?;
    }

    Ok(Verdict::Valid)
}

/// Evaluate a puzzle and append a log line if it is invalid.
pub async fn validate<O: Oracle, L: FailureLog>(
    oracle: &mut O,
    log: &mut L,
    puzzle: &PuzzleRecord,
) -> Result<Verdict, CheckerError> {
    let verdict = evaluate(oracle, puzzle).await?;

    if let Verdict::Invalid(failure) = &verdict {
        debug!(fen = %puzzle.fen, reason = %failure, "Puzzle rejected");
        log.write_line(&FailureLogEntry::new(puzzle, failure).to_string())?;
    }

    Ok(verdict)
}
