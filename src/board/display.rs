use super::Board;
use std::fmt;

const MIN_CELL_WIDTH: usize = 4;

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = self.max_tile().to_string().len().max(MIN_CELL_WIDTH);
        let separator = format!(
            "+{}",
            format!("{}+", "-".repeat(width + 2)).repeat(self.size())
        );

        writeln!(f, "{}", separator)?;
        for row in self.contents().chunks(self.size()) {
            write!(f, "|")?;
            for &value in row {
                if value == 0 {
                    write!(f, " {:>width$} |", ".", width = width)?;
                } else {
                    write!(f, " {:>width$} |", value, width = width)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "{}", separator)?;
        }
        Ok(())
    }
}

/// Builds a `Board` from a square grid of tile literals, row by row.
///
/// ```
/// use twenty48::tile_grid;
///
/// let board = tile_grid! {
///     2 4 8 16
///     0 0 0 0
///     0 0 0 0
///     0 0 0 0
/// };
/// assert_eq!(board.size(), 4);
/// ```
#[macro_export]
macro_rules! tile_grid {
    ($($tile:literal)*) => {{
        let tiles: Vec<u32> = vec![$($tile),*];
        match $crate::board::Board::from_tiles(tiles) {
            Ok(board) => board,
            Err(error) => panic!("invalid tile grid: {}", error),
        }
    }};
}
