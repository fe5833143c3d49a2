/// End-to-end tests for directory processing: PGN files on disk, a scripted
/// oracle, and the real file-backed failure log.
mod common;

use std::fs;
use std::path::Path;

use chess_core::PuzzleParseError;
use common::{cp, ScriptedOracle, START_FEN};
use puzzle_checker::batch::{run_directory, BatchSummary};
use puzzle_checker::failure_log::FileFailureLog;
use puzzle_checker::CheckerError;

const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

fn write_pgn(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

fn log_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn oracle() -> ScriptedOracle {
    ScriptedOracle::new()
        .with(START_FEN, &[], vec![cp("e2e4", 1, 35), cp("d2d4", 2, 30)])
        .with(START_FEN, &["e2e4", "e7e5"], vec![cp("g1f3", 1, 40), cp("f1c4", 2, 25)])
        .with(AFTER_E4, &[], vec![cp("c7c5", 1, -30), cp("e7e5", 2, -30)])
}

#[tokio::test]
async fn test_directory_run_counts_and_logs_invalid_puzzles() {
    let pgn_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let log_path = out_dir.path().join("invalid.txt");
    fs::write(&log_path, "stale line\n").unwrap();

    write_pgn(
        pgn_dir.path(),
        "a.pgn",
        &format!(
            r#"[Event "Open game"]
[FEN "{START_FEN}"]

1. e4 e5 2. Nf3 *

[Event "Wrong first move"]
[FEN "{START_FEN}"]

1. d4 *
"#
        ),
    );
    write_pgn(
        pgn_dir.path(),
        "b.pgn",
        &format!(
            r#"[Event "Sicilian or open"]
[FEN "{AFTER_E4}"]

1... c5 *
"#
        ),
    );
    write_pgn(pgn_dir.path(), "readme.txt", "[FEN \"garbage\"]\n\n1. e4 *\n");

    let mut oracle = oracle();
    let mut log = FileFailureLog::create(&log_path).unwrap();

    let summary = run_directory(&mut oracle, &mut log, pgn_dir.path(), "pgn")
        .await
        .unwrap();

    assert_eq!(
        summary,
        BatchSummary {
            files: 2,
            valid: 1,
            invalid: 2,
        }
    );
    assert_eq!(summary.puzzles(), 3);

    let lines = log_lines(&log_path);
    assert_eq!(
        lines,
        vec![
            format!("{START_FEN} d2d4 d2d4 < e2e4"),
            format!("{AFTER_E4} c7c5 c7c5 & e7e5"),
        ]
    );
}

#[tokio::test]
async fn test_valid_puzzles_leave_log_empty() {
    let pgn_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let log_path = out_dir.path().join("invalid.txt");

    write_pgn(
        pgn_dir.path(),
        "only.pgn",
        &format!("[FEN \"{START_FEN}\"]\n\n1. e4 *\n\n[FEN \"{START_FEN}\"]\n\n1. e4 e5 2. Nf3 Nc6 *\n"),
    );

    let mut oracle = oracle();
    let mut log = FileFailureLog::create(&log_path).unwrap();

    let summary = run_directory(&mut oracle, &mut log, pgn_dir.path(), "pgn")
        .await
        .unwrap();

    assert_eq!(summary.valid, 2);
    assert_eq!(summary.invalid, 0);
    assert!(log_lines(&log_path).is_empty());
}

#[tokio::test]
async fn test_missing_fen_halts_run_but_keeps_earlier_log_lines() {
    let pgn_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let log_path = out_dir.path().join("invalid.txt");

    write_pgn(
        pgn_dir.path(),
        "1-first.pgn",
        &format!("[FEN \"{START_FEN}\"]\n\n1. d4 *\n"),
    );
    write_pgn(
        pgn_dir.path(),
        "2-broken.pgn",
        "[Event \"No FEN here\"]\n\n1. e4 *\n",
    );

    let mut oracle = oracle();
    let mut log = FileFailureLog::create(&log_path).unwrap();

    let result = run_directory(&mut oracle, &mut log, pgn_dir.path(), "pgn").await;

    assert!(matches!(
        result,
        Err(CheckerError::Parse(PuzzleParseError::MissingFen))
    ));
    assert_eq!(log_lines(&log_path).len(), 1);
}

#[tokio::test]
async fn test_empty_directory() {
    let pgn_dir = tempfile::tempdir().unwrap();
    let mut oracle = oracle();
    let mut log: Vec<String> = Vec::new();

    let summary = run_directory(&mut oracle, &mut log, pgn_dir.path(), "pgn")
        .await
        .unwrap();

    assert_eq!(summary, BatchSummary::default());
    assert_eq!(oracle.resets, 0);
}
