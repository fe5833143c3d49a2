pub mod pgn;
pub mod puzzle_data;

pub use pgn::{PuzzleParseError, PuzzleReader};
pub use puzzle_data::PuzzleRecord;
