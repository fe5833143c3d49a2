//! Puzzle checker
//!
//! Checks PGN puzzle files to ensure every solver move in the mainline is the
//! engine's unique best move.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use puzzle_checker::batch;
use puzzle_checker::config::{CheckerConfig, PUZZLE_EXTENSION};
use puzzle_checker::failure_log::FileFailureLog;
use puzzle_checker::report;
use puzzle_checker::stockfish::StockfishEngine;

#[derive(Parser, Debug)]
#[command(
    name = "puzzle-checker",
    version,
    about = "Checks pgn files to ensure mainline plays best moves",
    after_help = "NOTE: the failure log (INVALID_LOG_PATH, default invalid.txt) is cleared at start"
)]
struct Cli {
    /// Path to a UCI engine executable (e.g. Stockfish)
    engine_path: PathBuf,

    /// Directory containing .pgn puzzle files
    pgn_directory: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load .env file for local overrides
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = CheckerConfig::load()?;
    info!(
        threads = config.threads,
        depth = config.depth,
        min_think_ms = config.min_think_ms,
        log_path = %config.log_path.display(),
        "Checker config loaded"
    );

    let mut log = FileFailureLog::create(&config.log_path)?;

    let mut engine = StockfishEngine::new(&cli.engine_path, &config).await?;
    info!(engine = %cli.engine_path.display(), "Engine ready");

    let result =
        batch::run_directory(&mut engine, &mut log, &cli.pgn_directory, PUZZLE_EXTENSION).await;

    engine.quit().await;

    let summary = result?;
    report::print_summary(&summary);

    Ok(())
}
