#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleRecord {
    /// Starting position, taken verbatim from the `FEN` header
    pub fen: String,
    pub moves: Vec<String>, // UCI notation, mainline only
    pub event: Option<String>,
    pub site: Option<String>,
}

impl PuzzleRecord {
    /// Mainline as a single space-separated UCI line.
    pub fn move_line(&self) -> String {
        self.moves.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
