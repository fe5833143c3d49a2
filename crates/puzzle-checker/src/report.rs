//! Human-readable console trace

use std::path::Path;

use chess_core::PuzzleRecord;
use colored::{ColoredString, Colorize};

use crate::batch::BatchSummary;
use crate::validator::Verdict;

pub fn file_banner(path: &Path) -> ColoredString {
    format!("File: {}", path.display()).yellow()
}

pub fn puzzle_banner(puzzle: &PuzzleRecord) -> ColoredString {
    format!("Evaluating: {}", puzzle.fen).magenta()
}

/// `Event (Site)` from whichever headers the puzzle carries
pub fn puzzle_source(puzzle: &PuzzleRecord) -> Option<String> {
    match (&puzzle.event, &puzzle.site) {
        (Some(event), Some(site)) => Some(format!("{event} ({site})")),
        (Some(label), None) | (None, Some(label)) => Some(label.clone()),
        (None, None) => None,
    }
}

pub fn verdict_tag(verdict: &Verdict) -> ColoredString {
    if verdict.is_valid() {
        "VALID!".green()
    } else {
        "INVALID!".red()
    }
}

pub fn print_file(path: &Path) {
    println!("{}", file_banner(path));
}

pub fn print_puzzle(puzzle: &PuzzleRecord) {
    println!("{}", puzzle_banner(puzzle));
    if let Some(source) = puzzle_source(puzzle) {
        println!("{source}");
    }
    if puzzle.is_empty() {
        println!("NO MOVES IN PUZZLE?!");
    } else {
        println!("{}", puzzle.move_line());
    }
}

pub fn print_verdict(verdict: &Verdict) {
    if let Verdict::Invalid(failure) = verdict {
        println!("{failure}");
    }
    println!("{}\n", verdict_tag(verdict));
}

pub fn print_summary(summary: &BatchSummary) {
    println!(
        "{} files, {} puzzles: {} valid, {} invalid",
        summary.files,
        summary.puzzles(),
        summary.valid.to_string().green(),
        summary.invalid.to_string().red()
    );
}
