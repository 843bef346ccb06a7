use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::BoardError;
use super::Board;

// A row is a list of tiles separated by commas and/or spaces; `.` marks an empty cell.
static ROW_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d+|\.)(?:\s*,\s*|\s+)?(?:(?:\d+|\.)(?:\s*,\s*|\s+)?)*$")
        .expect("row pattern is valid")
});
static TILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+|\.").expect("tile pattern is valid"));

impl FromStr for Board {
    type Err = BoardError;

    /// Parses rows separated by `/` (or newlines), e.g. `2,4,8,16/0,0,0,0/./...`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .split(|c| c == '/' || c == '\n')
            .filter(|row| !row.trim().is_empty())
            .map(parse_row)
            .collect::<Result<Vec<_>, _>>()?;
        Board::from_rows(rows)
    }
}

fn parse_row(row: &str) -> Result<Vec<u32>, BoardError> {
    let invalid_row = || BoardError::InvalidRow {
        row: row.trim().to_string(),
    };

    if !ROW_PATTERN.is_match(row) {
        return Err(invalid_row());
    }

    TILE_PATTERN
        .find_iter(row)
        .map(|tile| match tile.as_str() {
            "." => Ok(0),
            digits => digits.parse::<u32>().map_err(|_| invalid_row()),
        })
        .collect()
}
