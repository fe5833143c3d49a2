//! PGN puzzle reader built on `pgn-reader`.
//!
//! Each game in a puzzle collection must carry a `FEN` header. Mainline SAN
//! moves are resolved against that position and stored as UCI so they can be
//! compared directly with engine output. Variations are skipped.

use std::io::Read;
use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Visitor};
use shakmaty::{fen::Fen, CastlingMode, Chess, EnPassantMode, Position};
use thiserror::Error;

use crate::puzzle_data::PuzzleRecord;

#[derive(Error, Debug)]
pub enum PuzzleParseError {
    #[error("Puzzle has no FEN header")]
    MissingFen,

    #[error("Invalid FEN \"{fen}\": {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Illegal move {san} at ply {ply} in {fen}")]
    IllegalMove { san: String, ply: usize, fen: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse and validate a FEN string into a playable position.
pub fn parse_fen(fen: &str) -> Result<Chess, PuzzleParseError> {
    let invalid = |reason: String| PuzzleParseError::InvalidFen {
        fen: fen.to_string(),
        reason,
    };

    let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| invalid(format!("{e}")))
}

/// Headers of interest collected while reading the tag section.
#[derive(Default)]
struct PuzzleTags {
    fen: Option<String>,
    event: Option<String>,
    site: Option<String>,
}

/// State during movetext parsing.
struct PuzzleState {
    board: Chess,
    record: PuzzleRecord,
}

/// Visitor that turns one PGN game into a `PuzzleRecord`.
struct PuzzleBuilder;

impl Visitor for PuzzleBuilder {
    type Tags = PuzzleTags;
    type Movetext = PuzzleState;
    type Output = Result<PuzzleRecord, PuzzleParseError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, PuzzleTags> {
        ControlFlow::Continue(PuzzleTags::default())
    }

    fn tag(
        &mut self,
        tags: &mut PuzzleTags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let value = value.decode_utf8_lossy().into_owned();
        match name {
            b"FEN" => tags.fen = Some(value),
            b"Event" => tags.event = Some(value),
            b"Site" => tags.site = Some(value),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: PuzzleTags) -> ControlFlow<Self::Output, PuzzleState> {
        let Some(fen) = tags.fen else {
            return ControlFlow::Break(Err(PuzzleParseError::MissingFen));
        };

        let board = match parse_fen(&fen) {
            Ok(board) => board,
            Err(e) => return ControlFlow::Break(Err(e)),
        };

        ControlFlow::Continue(PuzzleState {
            board,
            record: PuzzleRecord {
                fen: fen.trim().to_string(),
                moves: Vec::new(),
                event: tags.event,
                site: tags.site,
            },
        })
    }

    fn san(&mut self, state: &mut PuzzleState, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        match san_plus.san.to_move(&state.board) {
            Ok(mv) => {
                state
                    .record
                    .moves
                    .push(mv.to_uci(CastlingMode::Standard).to_string());
                state.board.play_unchecked(mv);
                ControlFlow::Continue(())
            }
            Err(_) => ControlFlow::Break(Err(PuzzleParseError::IllegalMove {
                san: san_plus.san.to_string(),
                ply: state.record.moves.len(),
                fen: Fen::from_position(&state.board, EnPassantMode::Legal).to_string(),
            })),
        }
    }

    fn end_game(&mut self, state: PuzzleState) -> Self::Output {
        Ok(state.record)
    }
}

/// Streams puzzle records out of a PGN source, one game at a time.
pub struct PuzzleReader<R> {
    reader: Reader<R>,
}

impl<R: Read> PuzzleReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::new(source),
        }
    }

    /// Read the next puzzle. Returns `Ok(None)` once the source is exhausted.
    pub fn next_puzzle(&mut self) -> Result<Option<PuzzleRecord>, PuzzleParseError> {
        match self.reader.read_game(&mut PuzzleBuilder)? {
            Some(result) => result.map(Some),
            None => Ok(None),
        }
    }
}

impl<R: Read> Iterator for PuzzleReader<R> {
    type Item = Result<PuzzleRecord, PuzzleParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_puzzle().transpose()
    }
}
