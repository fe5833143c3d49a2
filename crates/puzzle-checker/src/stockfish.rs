//! Stockfish engine wrapper using UCI protocol (async I/O)

use std::path::Path;

use chess_core::pgn::parse_fen;
use shakmaty::{fen::Fen, uci::UciMove, Chess, EnPassantMode, Position};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use crate::config::CheckerConfig;
use crate::error::CheckerError;
use crate::oracle::{CandidateMove, Oracle};

/// The puzzle line currently loaded into the engine
struct LoadedLine {
    fen: String,
    board: Chess,
    moves: Vec<String>,
}

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    depth: u32,
    line: Option<LoadedLine>,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub async fn new(path: impl AsRef<Path>, config: &CheckerConfig) -> Result<Self, CheckerError> {
        let path = path.as_ref();
        let mut process = Command::new(path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| {
                CheckerError::Engine(format!("Failed to spawn {}: {e}", path.display()))
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| CheckerError::Engine("Engine stdin unavailable".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| CheckerError::Engine("Engine stdout unavailable".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            depth: config.depth,
            line: None,
        };

        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        engine
            .send(&format!("setoption name Threads value {}", config.threads))
            .await?;
        engine
            .send(&format!("setoption name Hash value {}", config.hash_mb))
            .await?;
        engine
            .send(&format!(
                "setoption name Minimum Thinking Time value {}",
                config.min_think_ms
            ))
            .await?;
        engine.send("setoption name UCI_AnalyseMode value true").await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), CheckerError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| CheckerError::Engine(format!("Failed to write to engine: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| CheckerError::Engine(format!("Failed to flush engine stdin: {e}")))?;
        Ok(())
    }

    /// Read one trimmed line. A closed pipe is an error, not an empty line.
    async fn read_line(&mut self) -> Result<String, CheckerError> {
        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .await
            .map_err(|e| CheckerError::Engine(format!("Failed to read from engine: {e}")))?;
        if read == 0 {
            return Err(CheckerError::Engine("Engine closed its output".into()));
        }
        let trimmed = line.trim().to_string();
        debug!(line = %trimmed, "SF >");
        Ok(trimmed)
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), CheckerError> {
        loop {
            if self.read_line().await? == expected {
                return Ok(());
            }
        }
    }

    fn loaded(&self) -> Result<&LoadedLine, CheckerError> {
        self.line
            .as_ref()
            .ok_or_else(|| CheckerError::Engine("No position set".into()))
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Oracle for StockfishEngine {
    async fn set_position(&mut self, fen: &str) -> Result<(), CheckerError> {
        let board = parse_fen(fen).map_err(|e| CheckerError::InvalidFen(e.to_string()))?;

        self.send("ucinewgame").await?;
        self.send("isready").await?;
        self.wait_for("readyok").await?;

        self.line = Some(LoadedLine {
            fen: fen.trim().to_string(),
            board,
            moves: Vec::new(),
        });
        Ok(())
    }

    async fn best_moves(&mut self, n: usize) -> Result<Vec<CandidateMove>, CheckerError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let position = position_command(self.loaded()?);

        self.send(&format!("setoption name MultiPV value {n}")).await?;
        self.send(&position).await?;
        self.send(&format!("go depth {}", self.depth)).await?;

        let mut slots = MultiPvSlots::new(n);
        loop {
            let line = self.read_line().await?;

            if line.starts_with("info") && line.contains(" pv ") {
                slots.observe(&line);
            } else if line.starts_with("bestmove") {
                break;
            }
        }

        // Reset MultiPV to 1
        self.send("setoption name MultiPV value 1").await?;

        Ok(slots.into_candidates())
    }

    async fn advance(&mut self, uci: &str) -> Result<(), CheckerError> {
        let line = self
            .line
            .as_mut()
            .ok_or_else(|| CheckerError::Engine("No position set".into()))?;

        let legal = uci
            .parse::<UciMove>()
            .ok()
            .and_then(|m| m.to_move(&line.board).ok());
        let Some(mv) = legal else {
            return Err(CheckerError::IllegalMove {
                uci: uci.to_string(),
                fen: Fen::from_position(&line.board, EnPassantMode::Legal).to_string(),
            });
        };

        line.board.play_unchecked(mv);
        line.moves.push(uci.to_string());
        Ok(())
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

/// Latest exact line per MultiPV rank, all taken from the deepest depth reported
struct MultiPvSlots {
    depth: u32,
    slots: Vec<Option<CandidateMove>>,
}

impl MultiPvSlots {
    fn new(n: usize) -> Self {
        Self {
            depth: 0,
            slots: vec![None; n],
        }
    }

    fn observe(&mut self, line: &str) {
        // Bound scores come from aspiration window fails, not settled lines
        if is_bound(line) {
            return;
        }
        let depth = parse_depth(line).unwrap_or(0);
        if depth < self.depth {
            return;
        }
        if depth > self.depth {
            self.depth = depth;
            self.slots.fill(None);
        }

        let rank = parse_multipv_index(line).unwrap_or(1);
        let Some(slot) = (rank as usize)
            .checked_sub(1)
            .and_then(|idx| self.slots.get_mut(idx))
        else {
            return;
        };
        if let Some(first) = parse_pv(line).into_iter().next() {
            *slot = Some(CandidateMove {
                uci: first,
                rank,
                cp: parse_cp(line),
                mate: parse_mate(line),
            });
        }
    }

    fn into_candidates(self) -> Vec<CandidateMove> {
        self.slots.into_iter().flatten().collect()
    }
}

fn position_command(line: &LoadedLine) -> String {
    if line.moves.is_empty() {
        format!("position fen {}", line.fen)
    } else {
        format!("position fen {} moves {}", line.fen, line.moves.join(" "))
    }
}

/// Value of the token following `key` in an info line
fn token_after<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let mut parts = line.split_whitespace();
    parts.by_ref().find(|part| *part == key)?;
    parts.next()
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    token_after(line, "cp")?.parse().ok()
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    token_after(line, "mate")?.parse().ok()
}

fn parse_depth(line: &str) -> Option<u32> {
    token_after(line, "depth")?.parse().ok()
}

/// Parse multipv index from info line
fn parse_multipv_index(line: &str) -> Option<u32> {
    token_after(line, "multipv")?.parse().ok()
}

fn is_bound(line: &str) -> bool {
    line.split_whitespace()
        .any(|part| part == "lowerbound" || part == "upperbound")
}

/// Parse PV moves from info line
fn parse_pv(line: &str) -> Vec<String> {
    line.split_whitespace()
        .skip_while(|part| *part != "pv")
        .skip(1)
        // PV ends at next keyword or end of line
        .take_while(|part| !part.starts_with("bmc") && *part != "string")
        .map(str::to_string)
        .collect()
}
