//! Directory-level driver: every puzzle file, every puzzle, in order

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use chess_core::PuzzleReader;
use tracing::{error, info};

use crate::error::CheckerError;
use crate::failure_log::FailureLog;
use crate::oracle::Oracle;
use crate::report;
use crate::validator::{validate, Verdict};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub files: usize,
    pub valid: usize,
    pub invalid: usize,
}

impl BatchSummary {
    pub fn puzzles(&self) -> usize {
        self.valid + self.invalid
    }

    fn record(&mut self, verdict: &Verdict) {
        if verdict.is_valid() {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
    }
}

/// Files in `dir` whose name ends with `.{extension}`, in path order.
pub fn puzzle_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, CheckerError> {
    if !dir.is_dir() {
        return Err(CheckerError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        extension
    );
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Validate every puzzle in every puzzle file of `dir`.
///
/// Invalid puzzles are logged and counted; any error stops the run.
pub async fn run_directory<O: Oracle, L: FailureLog>(
    oracle: &mut O,
    log: &mut L,
    dir: &Path,
    extension: &str,
) -> Result<BatchSummary, CheckerError> {
    let files = puzzle_files(dir, extension)?;
    info!(count = files.len(), dir = %dir.display(), "Found puzzle files");

    let mut summary = BatchSummary::default();
    for path in &files {
        report::print_file(path);
        summary.files += 1;

        let reader = PuzzleReader::new(BufReader::new(File::open(path)?));
        for puzzle in reader {
            let puzzle = puzzle.inspect_err(|e| {
                error!(file = %path.display(), error = %e, "Unreadable puzzle");
            })?;

            report::print_puzzle(&puzzle);
            let verdict = validate(oracle, log, &puzzle).await?;
            report::print_verdict(&verdict);
            summary.record(&verdict);
        }
    }

    info!(
        files = summary.files,
        valid = summary.valid,
        invalid = summary.invalid,
        "Batch complete"
    );
    Ok(summary)
}
