//! Core traits for the tile-game search.

use std::fmt::Debug;

/// The rules engine the search drives. Implementations own the slide/merge
/// rules; the search only clones boards and applies moves or tiles to the copies.
pub trait TileBoard: Clone {
    type Move: Copy + PartialEq + Debug;
    type Cell: Copy + Debug;
    type MoveList: AsRef<[Self::Move]>;
    type CellList: AsRef<[Self::Cell]>;

    /// Board dimension; the board has `size * size` cells.
    fn size(&self) -> usize;

    /// Row-major tile values, 0 for empty cells.
    fn contents(&self) -> &[u32];

    /// Moves that change the board, in a fixed order.
    fn available_moves(&self) -> Self::MoveList;

    /// Empty cells, in a fixed order.
    fn available_cells(&self) -> Self::CellList;

    fn apply_move(&mut self, game_move: Self::Move);

    fn insert_tile(&mut self, cell: Self::Cell, value: u32);

    /// Tile at `(row, col)`, or `None` when the coordinate is off the board.
    fn cell_value(&self, row: isize, col: isize) -> Option<u32>;
}

/// Scores a board. Higher is better for the player; scores are never negative.
pub trait Evaluator<B: TileBoard> {
    fn evaluate(&mut self, board: &B) -> f64;
}
