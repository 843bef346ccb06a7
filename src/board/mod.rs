pub mod cell;
pub mod error;
pub mod moves;

mod display;
mod parse;

use rand::Rng;
use smallvec::SmallVec;

pub use cell::Cell;
pub use error::BoardError;
pub use moves::{Move, ALL_MOVES};

pub type MoveList = SmallVec<[Move; 4]>;
pub type CellList = SmallVec<[Cell; 16]>;

type Line = SmallVec<[u32; 8]>;

/// Probability that a spawned tile is a 2 rather than a 4.
const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Largest tile a `u32` can hold. Two of them never merge.
pub const MAX_TILE: u32 = 1 << 31;

/// An n x n grid of tiles stored row-major. Every tile is either 0 (empty)
/// or a power of two greater than 1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    tiles: Vec<u32>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Board {
    /// Creates an empty `size` x `size` board.
    ///
    /// # Panics
    ///
    /// Panics if `size` is below 2, the smallest board `from_rows` accepts.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "board must be at least 2x2, got {}x{}", size, size);
        Self {
            size,
            tiles: vec![0; size * size],
        }
    }

    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, BoardError> {
        let size = rows.len();
        if size < 2 {
            return Err(BoardError::TooSmall { size });
        }

        let mut tiles = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    expected: size,
                    found: values.len(),
                });
            }
            for value in values {
                if !is_valid_tile(value) {
                    return Err(BoardError::InvalidTile { value });
                }
                tiles.push(value);
            }
        }

        Ok(Self { size, tiles })
    }

    /// Builds a board from a flat row-major tile list. The number of tiles
    /// must be a perfect square.
    pub fn from_tiles(tiles: Vec<u32>) -> Result<Self, BoardError> {
        let size = (tiles.len() as f64).sqrt().round() as usize;
        if size * size != tiles.len() {
            return Err(BoardError::NotSquare {
                row: 0,
                expected: size,
                found: tiles.len(),
            });
        }
        let rows = tiles.chunks(size.max(1)).map(|row| row.to_vec()).collect();
        Self::from_rows(rows)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major tile values.
    pub fn contents(&self) -> &[u32] {
        &self.tiles
    }

    /// Returns the tile at `(row, col)`, or `None` when the coordinate is off the board.
    pub fn cell_value(&self, row: isize, col: isize) -> Option<u32> {
        if row < 0 || col < 0 || row as usize >= self.size || col as usize >= self.size {
            return None;
        }
        Some(self.tiles[row as usize * self.size + col as usize])
    }

    pub fn get(&self, cell: Cell) -> u32 {
        self.tiles[self.index(cell)]
    }

    pub fn max_tile(&self) -> u32 {
        self.tiles.iter().copied().max().unwrap_or(0)
    }

    pub fn empty_count(&self) -> usize {
        self.tiles.iter().filter(|&&value| value == 0).count()
    }

    /// Empty cells in row-major order.
    pub fn available_cells(&self) -> CellList {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == 0)
            .map(|(i, _)| Cell::new(i / self.size, i % self.size))
            .collect()
    }

    /// Moves that would change the board, in `ALL_MOVES` order.
    pub fn available_moves(&self) -> MoveList {
        ALL_MOVES
            .iter()
            .copied()
            .filter(|&mv| self.can_move(mv))
            .collect()
    }

    pub fn is_game_over(&self) -> bool {
        self.available_moves().is_empty()
    }

    /// Slides every line toward the wall in the direction of `mv`, merging equal
    /// neighbours once per move. Returns the points scored by the merges.
    pub fn apply_move(&mut self, mv: Move) -> u32 {
        let mut points: u32 = 0;
        for lane in 0..self.size {
            let indices: SmallVec<[usize; 8]> = (0..self.size)
                .map(|offset| self.line_index(mv, lane, offset))
                .collect();
            let line: Line = indices
                .iter()
                .map(|&i| self.tiles[i])
                .filter(|&value| value != 0)
                .collect();
            let (merged, line_points) = merge_line(&line);
            points = points.saturating_add(line_points);
            for (offset, &i) in indices.iter().enumerate() {
                self.tiles[i] = merged.get(offset).copied().unwrap_or(0);
            }
        }
        points
    }

    /// Places `value` on `cell`. The caller guarantees the cell is empty and on the board.
    pub fn insert_tile(&mut self, cell: Cell, value: u32) {
        debug_assert!(self.get(cell) == 0, "cell {} is occupied", cell);
        let i = self.index(cell);
        self.tiles[i] = value;
    }

    pub fn try_insert_tile(&mut self, cell: Cell, value: u32) -> Result<(), BoardError> {
        if cell.row >= self.size || cell.col >= self.size {
            return Err(BoardError::CellOutOfBounds {
                row: cell.row,
                col: cell.col,
                size: self.size,
            });
        }
        if value == 0 || !is_valid_tile(value) {
            return Err(BoardError::InvalidTile { value });
        }
        if self.get(cell) != 0 {
            return Err(BoardError::CellOccupied {
                row: cell.row,
                col: cell.col,
            });
        }
        self.insert_tile(cell, value);
        Ok(())
    }

    /// Spawns a 2 (90%) or a 4 (10%) on a uniformly chosen empty cell.
    /// A full board is returned unchanged.
    pub fn with_random_tile<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        let cells = self.available_cells();
        if cells.is_empty() {
            return self;
        }
        let cell = cells[rng.gen_range(0..cells.len())];
        let value = if rng.gen_bool(SPAWN_TWO_PROBABILITY) {
            2
        } else {
            4
        };
        self.insert_tile(cell, value);
        self
    }

    fn can_move(&self, mv: Move) -> bool {
        (0..self.size).any(|lane| {
            (1..self.size).any(|offset| {
                let nearer = self.tiles[self.line_index(mv, lane, offset - 1)];
                let farther = self.tiles[self.line_index(mv, lane, offset)];
                (nearer == 0 && farther != 0)
                    || (nearer != 0 && nearer == farther && nearer < MAX_TILE)
            })
        })
    }

    /// Index of the tile `offset` cells away from the wall that `mv` slides toward.
    fn line_index(&self, mv: Move, lane: usize, offset: usize) -> usize {
        let n = self.size;
        match mv {
            Move::Left => lane * n + offset,
            Move::Right => lane * n + (n - 1 - offset),
            Move::Up => offset * n + lane,
            Move::Down => (n - 1 - offset) * n + lane,
        }
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row * self.size + cell.col
    }
}

pub(crate) fn is_valid_tile(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Merges a compacted line (no empty tiles) toward its front.
fn merge_line(line: &[u32]) -> (Line, u32) {
    let mut merged = Line::new();
    let mut points: u32 = 0;
    let mut i = 0;
    while i < line.len() {
        if i + 1 < line.len() && line[i] == line[i + 1] && line[i] < MAX_TILE {
            let value = line[i] * 2;
            merged.push(value);
            points = points.saturating_add(value);
            i += 2;
        } else {
            merged.push(line[i]);
            i += 1;
        }
    }
    (merged, points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_grid;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_merge_line_merges_each_tile_once() {
        assert_eq!(merge_line(&[2, 2, 2, 2]).0.as_slice(), &[4, 4]);
        assert_eq!(merge_line(&[2, 2, 4]).0.as_slice(), &[4, 4]);
        assert_eq!(merge_line(&[4, 2, 2]).0.as_slice(), &[4, 4]);
        assert_eq!(merge_line(&[2, 2, 2]).0.as_slice(), &[4, 2]);
        assert_eq!(merge_line(&[8, 8, 16]).1, 16);
    }

    #[test]
    fn test_largest_tiles_do_not_merge() {
        let mut board: Board = "2147483648,2147483648/0,0".parse().unwrap();
        assert_eq!(board.max_tile(), MAX_TILE);
        assert_eq!(board.available_moves().as_slice(), &[Move::Down]);

        let points = board.apply_move(Move::Down);
        assert_eq!(points, 0);
        assert_eq!(board.contents(), &[0, 0, MAX_TILE, MAX_TILE]);
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_merge_points_saturate() {
        let mut board = tile_grid! {
            1073741824 1073741824
            1073741824 1073741824
        };
        let points = board.apply_move(Move::Left);
        assert_eq!(points, u32::MAX);
        assert_eq!(board.contents(), &[MAX_TILE, 0, MAX_TILE, 0]);
    }

    #[test]
    #[should_panic(expected = "board must be at least 2x2")]
    fn test_new_rejects_degenerate_size() {
        Board::new(0);
    }

    #[test]
    fn test_apply_move_left() {
        let mut board = tile_grid! {
            2 2 0 4
            0 0 0 2
            4 4 4 4
            8 0 8 2
        };
        let points = board.apply_move(Move::Left);
        let expected = tile_grid! {
            4 4 0 0
            2 0 0 0
            8 8 0 0
            16 2 0 0
        };
        assert_eq!(board, expected);
        assert_eq!(points, 4 + 8 + 8 + 16);
    }

    #[test]
    fn test_apply_move_right_prioritises_tiles_near_the_wall() {
        let mut board = tile_grid! {
            2 2 2 0
            0 0 0 0
            0 0 0 0
            0 0 0 0
        };
        board.apply_move(Move::Right);
        assert_eq!(&board.contents()[0..4], &[0, 0, 2, 4]);
    }

    #[test]
    fn test_apply_move_up_and_down() {
        let board = tile_grid! {
            2 0 0 0
            2 0 0 0
            4 0 0 2
            0 0 0 2
        };

        let mut up = board.clone();
        up.apply_move(Move::Up);
        assert_eq!(
            up,
            tile_grid! {
                4 0 0 4
                4 0 0 0
                0 0 0 0
                0 0 0 0
            }
        );

        let mut down = board.clone();
        down.apply_move(Move::Down);
        assert_eq!(
            down,
            tile_grid! {
                0 0 0 0
                0 0 0 0
                4 0 0 0
                4 0 0 4
            }
        );
    }

    #[test]
    fn test_available_moves_in_fixed_order() {
        let board = tile_grid! {
            2 4 8 16
            0 0 0 0
            0 0 0 0
            0 0 0 0
        };
        assert_eq!(board.available_moves().as_slice(), &[Move::Down]);

        let board = tile_grid! {
            0 0 0 0
            0 2 0 0
            0 0 0 0
            0 0 0 0
        };
        assert_eq!(
            board.available_moves().as_slice(),
            &[Move::Up, Move::Down, Move::Left, Move::Right]
        );
    }

    #[test]
    fn test_available_moves_on_locked_board() {
        let board = tile_grid! {
            2 4 2 4
            4 2 4 2
            2 4 2 4
            4 2 4 2
        };
        assert!(board.available_moves().is_empty());
        assert!(board.is_game_over());
    }

    #[test]
    fn test_available_cells_row_major() {
        let board = tile_grid! {
            2 0
            0 4
        };
        assert_eq!(
            board.available_cells().as_slice(),
            &[Cell::new(0, 1), Cell::new(1, 0)]
        );
    }

    #[test]
    fn test_cell_value_out_of_bounds() {
        let board = tile_grid! {
            2 0
            0 4
        };
        assert_eq!(board.cell_value(1, 1), Some(4));
        assert_eq!(board.cell_value(-1, 0), None);
        assert_eq!(board.cell_value(0, 2), None);
    }

    #[test]
    fn test_try_insert_tile_rejects_bad_input() {
        let mut board = Board::new(2);
        assert!(board.try_insert_tile(Cell::new(0, 0), 2).is_ok());
        assert_eq!(
            board.try_insert_tile(Cell::new(0, 0), 4),
            Err(BoardError::CellOccupied { row: 0, col: 0 })
        );
        assert_eq!(
            board.try_insert_tile(Cell::new(0, 1), 3),
            Err(BoardError::InvalidTile { value: 3 })
        );
        assert!(matches!(
            board.try_insert_tile(Cell::new(2, 0), 2),
            Err(BoardError::CellOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_from_rows_validation() {
        assert_eq!(
            Board::from_rows(vec![vec![2]]),
            Err(BoardError::TooSmall { size: 1 })
        );
        assert!(matches!(
            Board::from_rows(vec![vec![2, 0], vec![0]]),
            Err(BoardError::NotSquare { row: 1, .. })
        ));
        assert_eq!(
            Board::from_rows(vec![vec![2, 1], vec![0, 0]]),
            Err(BoardError::InvalidTile { value: 1 })
        );
    }

    #[test]
    fn test_with_random_tile_fills_one_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::new(4).with_random_tile(&mut rng);
        assert_eq!(board.empty_count(), 15);
        assert!(matches!(board.max_tile(), 2 | 4));
    }

    #[test]
    fn test_clone_is_independent() {
        let board = tile_grid! {
            2 2
            0 0
        };
        let mut copy = board.clone();
        copy.apply_move(Move::Left);
        assert_eq!(board.contents(), &[2, 2, 0, 0]);
        assert_eq!(copy.contents(), &[4, 0, 0, 0]);
    }
}
