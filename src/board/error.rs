use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("Board must be square, row {row} has {found} tiles but the board has {expected} rows")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Board must be at least 2x2, got {size}x{size}")]
    TooSmall { size: usize },
    #[error("Tile values must be 0 or a power of two greater than 1, got {value}")]
    InvalidTile { value: u32 },
    #[error("Could not parse row `{row}`")]
    InvalidRow { row: String },
    #[error("Cell ({row}, {col}) is outside of a {size}x{size} board")]
    CellOutOfBounds { row: usize, col: usize, size: usize },
    #[error("Cannot insert a tile on ({row}, {col}), the cell is already occupied")]
    CellOccupied { row: usize, col: usize },
    #[error("Invalid move `{input}`, expected one of up, down, left, right")]
    InvalidMove { input: String },
}
