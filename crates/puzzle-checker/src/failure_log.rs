//! Append-only log of rejected puzzles

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chess_core::PuzzleRecord;
use tracing::info;

use crate::error::CheckerError;
use crate::validator::Failure;

/// Sink for one diagnostic line per invalid puzzle.
pub trait FailureLog {
    fn write_line(&mut self, line: &str) -> Result<(), CheckerError>;
}

/// In-memory sink
impl FailureLog for Vec<String> {
    fn write_line(&mut self, line: &str) -> Result<(), CheckerError> {
        self.push(line.to_string());
        Ok(())
    }
}

/// File sink, truncated once when created
pub struct FileFailureLog {
    file: File,
}

impl FileFailureLog {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, CheckerError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        info!(path = %path.display(), "Failure log cleared");
        Ok(Self { file })
    }
}

impl FailureLog for FileFailureLog {
    fn write_line(&mut self, line: &str) -> Result<(), CheckerError> {
        writeln!(self.file, "{line}")?;
        self.file.flush()?;
        Ok(())
    }
}

/// One log line: starting position, full mainline, and the discrepancy.
pub struct FailureLogEntry<'a> {
    pub puzzle: &'a PuzzleRecord,
    pub failure: &'a Failure,
}

impl<'a> FailureLogEntry<'a> {
    pub fn new(puzzle: &'a PuzzleRecord, failure: &'a Failure) -> Self {
        Self { puzzle, failure }
    }
}

impl fmt::Display for FailureLogEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.puzzle.fen,
            self.puzzle.move_line(),
            self.failure.discrepancy()
        )
    }
}
